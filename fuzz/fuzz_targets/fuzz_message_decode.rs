#![no_main]

use libfuzzer_sys::fuzz_target;
use tftp_wire::{Message, WireMessage};

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic; anything that decodes must re-encode
    if let Ok((msg, used)) = Message::decode(data) {
        assert!(used <= data.len());
        if let Ok(bytes) = msg.to_bytes() {
            let _ = Message::decode(&bytes);
        }
    }
});
