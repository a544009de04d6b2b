// Packet decoder: format-driven walk over a raw payload

use super::packet::{DecodedValue, Packet};
use crate::format::{PacketFormat, Registry};
use crate::wire::{self, unpack_bit};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Recoverable: the caller decides whether an unregistered identifier
    /// is fatal or simply "not our packet"
    #[error("No format registered for identifier {0}")]
    UnknownFormat(u32),

    /// The declared layout reads past the payload; corrupt catalog entry
    /// or truncated payload. Rejects this packet only.
    #[error("Payload overrun: {0}")]
    Overrun(#[from] wire::WireError),
}

pub type Result<T> = std::result::Result<T, DecodeError>;

/// Decode a raw payload against one format, in declared field order
pub fn decode_fields(
    format: &PacketFormat,
    payload: &[u8],
) -> Result<HashMap<String, DecodedValue>> {
    let mut decoded = HashMap::new();
    let mut cursor = 0usize;

    for field in &format.fields {
        let value = wire::read_field(payload, cursor, field.ty, format.endian)?;

        if field.ty.is_bitfield() {
            // Each declared flag becomes its own entry; scale never applies
            // to a bitfield, declared or not.
            let byte = value as u8;
            for flag in &field.bits {
                decoded.insert(flag.name.clone(), DecodedValue::flag(unpack_bit(byte, flag.bit)));
            }
            decoded.insert(field.name.clone(), DecodedValue::plain(value));
        } else {
            let cvalue = match field.scale {
                Some(scale) => value * scale,
                None => value,
            };
            decoded.insert(
                field.name.clone(),
                DecodedValue {
                    value,
                    cvalue,
                    unit: field.unit.clone().unwrap_or_default(),
                    decimals: field.decimals,
                },
            );
        }

        cursor += field.width();
    }

    Ok(decoded)
}

/// Decode a packet in place against the registry
///
/// On success the decoded map is fully replaced; on any error it is left
/// exactly as it was.
pub fn decode_packet(registry: &Registry, packet: &mut Packet) -> Result<()> {
    let format = registry
        .by_id(packet.id)
        .ok_or(DecodeError::UnknownFormat(packet.id))?;

    let decoded = decode_fields(format, &packet.raw)?;

    tracing::debug!(
        id = packet.id,
        format = %format.name,
        fields = decoded.len(),
        "decoded packet"
    );

    packet.name = Some(format.name.clone());
    packet.board = format.board.clone();
    packet.decoded = decoded;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{BitFlag, FieldSpec, Link, PacketFormat};
    use crate::wire::{Endianness, FieldType};

    fn battery_format() -> PacketFormat {
        PacketFormat::new(0x21, "battery", Link::Stream)
            .endian(Endianness::Little)
            .board("bms")
            .field(FieldSpec::new("voltage", FieldType::U16).scale(0.1).unit("V").decimals(1))
            .field(FieldSpec::new("current", FieldType::I16).unit("A"))
            .field(FieldSpec::with_bits(
                "status",
                vec![BitFlag::new("charging", 1), BitFlag::new("balancing", 3)],
            ))
    }

    fn registry() -> Registry {
        Registry::load(vec![battery_format()]).unwrap()
    }

    #[test]
    fn test_decode_walk() {
        // voltage = 250 (25.0 V), current = -2 A, status bits 1+3
        let payload = [0xFA, 0x00, 0xFE, 0xFF, 0x0A];
        let decoded = decode_fields(&battery_format(), &payload).unwrap();

        let voltage = &decoded["voltage"];
        assert_eq!(voltage.value, 250.0);
        assert_eq!(voltage.cvalue, 25.0);
        assert_eq!(voltage.unit, "V");
        assert_eq!(voltage.decimals, Some(1));

        let current = &decoded["current"];
        assert_eq!(current.value, -2.0);
        assert_eq!(current.cvalue, -2.0);
        assert_eq!(current.decimals, None);

        assert_eq!(decoded["charging"], DecodedValue::flag(true));
        assert_eq!(decoded["balancing"], DecodedValue::flag(true));
        assert_eq!(decoded["status"].value, 0x0A as f64);
    }

    #[test]
    fn test_decode_packet_fills_metadata() {
        let registry = registry();
        let mut packet = Packet::new(0x21, vec![0xFA, 0x00, 0x00, 0x00, 0x00]);
        decode_packet(&registry, &mut packet).unwrap();

        assert_eq!(packet.name.as_deref(), Some("battery"));
        assert_eq!(packet.board.as_deref(), Some("bms"));
        assert_eq!(packet.value("voltage"), Some(250.0));
        assert_eq!(packet.decoded["charging"], DecodedValue::flag(false));
    }

    #[test]
    fn test_unknown_format_leaves_map_untouched() {
        let registry = registry();
        let mut packet = Packet::new(0x99, vec![0x01]);
        packet
            .decoded
            .insert("stale".to_string(), DecodedValue::plain(1.0));

        let err = decode_packet(&registry, &mut packet).unwrap_err();
        assert_eq!(err, DecodeError::UnknownFormat(0x99));
        assert_eq!(packet.decoded.len(), 1);
        assert!(packet.decoded.contains_key("stale"));
    }

    #[test]
    fn test_truncated_payload() {
        let registry = registry();
        let mut packet = Packet::new(0x21, vec![0xFA]);
        assert!(matches!(
            decode_packet(&registry, &mut packet).unwrap_err(),
            DecodeError::Overrun(_)
        ));
        assert!(packet.decoded.is_empty());
    }

    #[test]
    fn test_map_fully_replaced() {
        let registry = registry();
        let mut packet = Packet::new(0x21, vec![0; 5]);
        packet
            .decoded
            .insert("stale".to_string(), DecodedValue::plain(1.0));

        decode_packet(&registry, &mut packet).unwrap();
        assert!(!packet.decoded.contains_key("stale"));
    }

    #[test]
    fn test_float_field() {
        let format = PacketFormat::new(1, "temps", Link::Can)
            .field(FieldSpec::new("cell_temp", FieldType::F32).unit("degC"));
        let payload = 36.5f32.to_be_bytes();
        let decoded = decode_fields(&format, &payload).unwrap();
        assert_eq!(decoded["cell_temp"].value, 36.5f32 as f64);
    }
}
