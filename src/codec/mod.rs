// Packet decode/encode driven by a format description

pub mod decode;
pub mod encode;
pub mod packet;

pub use decode::{decode_fields, decode_packet, DecodeError};
pub use encode::{encode_fields, encode_packet, EncodeError};
pub use packet::{DecodedValue, Packet};

/// Reserved identifier for console/stdio side-channel packets
///
/// The highest standard 11-bit CAN identifier, never assigned to a data
/// format in the catalogs. Packets carrying it are plain text and bypass
/// the field codec entirely.
pub const CONSOLE_PACKET_ID: u32 = 0x7FF;

/// An inbound message, classified before any format lookup happens
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// Console side-channel text, diverted away from the field codec
    Console(String),
    /// A telemetry packet awaiting decode against the registry
    Telemetry(Packet),
}

/// Classify an inbound message against the default console marker
pub fn dispatch(id: u32, payload: &[u8]) -> Inbound {
    dispatch_with(CONSOLE_PACKET_ID, id, payload)
}

/// Classify an inbound message against a caller-chosen console marker
pub fn dispatch_with(console_id: u32, id: u32, payload: &[u8]) -> Inbound {
    if id == console_id {
        Inbound::Console(String::from_utf8_lossy(payload).into_owned())
    } else {
        Inbound::Telemetry(Packet::new(id, payload.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_diversion() {
        let inbound = dispatch(CONSOLE_PACKET_ID, b"boot ok\n");
        assert_eq!(inbound, Inbound::Console("boot ok\n".to_string()));
    }

    #[test]
    fn test_telemetry_passthrough() {
        let inbound = dispatch(0x20, &[1, 2, 3]);
        match inbound {
            Inbound::Telemetry(packet) => {
                assert_eq!(packet.id, 0x20);
                assert_eq!(packet.raw, vec![1, 2, 3]);
                assert!(packet.decoded.is_empty());
            }
            other => panic!("expected telemetry, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_marker() {
        let inbound = dispatch_with(0x123, 0x123, b"hi");
        assert!(matches!(inbound, Inbound::Console(_)));

        // the default marker is just a data id under a custom marker
        let inbound = dispatch_with(0x123, CONSOLE_PACKET_ID, &[0]);
        assert!(matches!(inbound, Inbound::Telemetry(_)));
    }
}
