#![no_main]

use libfuzzer_sys::fuzz_target;
use tftp_wire::OptionSet;

fuzz_target!(|data: &[u8]| {
    if let Ok((set, used)) = OptionSet::decode(data) {
        assert_eq!(used, data.len());
        for option in &set {
            let _ = option.as_u64();
        }
    }
});
