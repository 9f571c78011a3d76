// test-only module included via protocol/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use crate::config::NegotiationConfig;
use crate::error::CodecError;
use crate::protocol::ack::Ack;
use crate::protocol::data::Data;
use crate::protocol::dispatcher::Dispatcher;
use crate::protocol::error_msg::ErrorMessage;
use crate::protocol::message::{peek_opcode, Message, WireMessage};
use crate::protocol::negotiation::negotiate;
use crate::protocol::oack::OptionAck;
use crate::protocol::opcode::{ErrorCode, Opcode, TransferMode};
use crate::protocol::request::Request;

fn sample_messages() -> Vec<Message> {
    vec![
        Request::read("a.bin", TransferMode::Octet).into(),
        Request::write("b.txt", TransferMode::Netascii)
            .with_option("tsize", "42")
            .into(),
        Data::new(9, vec![1u8, 2, 3]).into(),
        Ack::new(9).into(),
        ErrorMessage::from_code(ErrorCode::AccessViolation).into(),
        OptionAck::default().with_option("blksize", "1024").into(),
    ]
}

#[test]
fn test_first_two_bytes_are_opcode() {
    for msg in sample_messages() {
        let bytes = msg.to_bytes().expect("encode");
        assert_eq!(peek_opcode(&bytes).unwrap(), msg.opcode().as_u16());
        assert_eq!(bytes.len(), msg.encoded_len());
    }
}

#[test]
fn test_message_dispatches_on_opcode() {
    for msg in sample_messages() {
        let bytes = msg.to_bytes().expect("encode");
        let (decoded, used) = Message::decode(&bytes).expect("decode");
        assert_eq!(decoded, msg);
        assert_eq!(used, bytes.len());
    }
}

#[test]
fn test_unknown_opcode_is_reported_raw() {
    assert!(matches!(
        Message::decode(&[0x00, 0x07, 0x00, 0x00]),
        Err(CodecError::UnknownOpcode(7))
    ));
    assert!(matches!(
        Message::decode(&[0xFF, 0xFF]),
        Err(CodecError::UnknownOpcode(0xFFFF))
    ));
}

#[test]
fn test_empty_and_short_datagrams() {
    assert!(matches!(Message::decode(&[]), Err(CodecError::Truncated(_))));
    assert!(matches!(Message::decode(&[0x00]), Err(CodecError::Truncated(_))));
}

#[test]
fn test_variant_decoder_checks_opcode_first() {
    let ack = Ack::new(1).to_bytes().unwrap();
    assert!(matches!(
        Data::decode(&ack),
        Err(CodecError::UnexpectedOpcode {
            expected: 3,
            found: 4
        })
    ));
    assert!(matches!(
        OptionAck::decode(&ack),
        Err(CodecError::UnexpectedOpcode { found: 4, .. })
    ));
}

#[test]
fn test_dispatcher_routes_by_opcode() {
    let dispatcher = Dispatcher::new();
    dispatcher
        .register(Opcode::Data, |msg| match msg {
            Message::Data(data) => Ok(Ack::new(data.block()).into()),
            _ => panic!("Expected Data message"),
        })
        .unwrap();

    let datagram = Data::new(17, vec![0u8; 4]).to_bytes().unwrap();
    let reply = dispatcher.dispatch_datagram(&datagram).unwrap();
    assert_eq!(reply, Message::Ack(Ack::new(17)));

    let ack = Ack::new(1).to_bytes().unwrap();
    assert!(matches!(
        dispatcher.dispatch_datagram(&ack),
        Err(CodecError::UnhandledOpcode(Opcode::Ack))
    ));
}

#[test]
fn test_dispatcher_request_to_oack_flow() {
    let dispatcher = Dispatcher::new();
    dispatcher
        .register(Opcode::ReadRequest, |msg| {
            let Message::Request(req) = msg else {
                panic!("Expected request");
            };
            if !req.mode().is_valid() {
                return Ok(ErrorMessage::from_code(ErrorCode::IllegalOperation).into());
            }
            let outcome = negotiate(req.options(), &NegotiationConfig::default(), Some(2048));
            Ok(match outcome.option_ack() {
                Some(oack) => oack.into(),
                None => Data::new(1, vec![0u8; 512]).into(),
            })
        })
        .unwrap();

    let rrq = Request::read("boot.img", TransferMode::Octet)
        .with_option("blksize", "1400")
        .with_option("tsize", "0")
        .to_bytes()
        .unwrap();
    let Message::OptionAck(oack) = dispatcher.dispatch_datagram(&rrq).unwrap() else {
        panic!("Expected OACK");
    };
    assert_eq!(oack.options().find("blksize").unwrap().as_u32(), 1400);
    assert_eq!(oack.options().find("tsize").unwrap().as_u64(), 2048);

    let bad_mode = b"\x00\x01boot.img\0binary\0";
    let reply = dispatcher.dispatch_datagram(bad_mode).unwrap();
    assert!(matches!(reply, Message::Error(e) if e.code() == 4));
}

#[test]
fn test_handler_error_maps_to_error_packet() {
    let dispatcher = Dispatcher::new();
    dispatcher
        .register(Opcode::Ack, |_| Err(CodecError::Malformed("bad ack")))
        .unwrap();

    let err = dispatcher.dispatch(&Ack::new(3).into()).unwrap_err();
    let packet = err.to_error_message();
    assert_eq!(packet.error_code(), Ok(ErrorCode::IllegalOperation));
    assert!(packet.message().contains("bad ack"));
}
