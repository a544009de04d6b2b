// Packet encoder: inverse walk, values back into payload bytes
//
// Callers supply values already in raw units. Scale is a decode-side
// display conversion and is never applied in reverse here.

use crate::format::{PacketFormat, Registry};
use crate::wire::{self, pack_bits};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("No format registered for identifier {0}")]
    UnknownFormat(u32),

    /// The supplied field map lacks a declared field (or bit flag) name
    #[error("Field map is missing '{0}'")]
    MissingField(String),

    #[error("Payload overrun: {0}")]
    Overrun(#[from] wire::WireError),
}

pub type Result<T> = std::result::Result<T, EncodeError>;

fn fetch(values: &HashMap<String, f64>, name: &str) -> Result<f64> {
    values
        .get(name)
        .copied()
        .ok_or_else(|| EncodeError::MissingField(name.to_string()))
}

/// Encode a field map into payload bytes, in declared field order
///
/// Returns the full layout width on success and nothing at all on error:
/// a missing field never produces partial output.
pub fn encode_fields(format: &PacketFormat, values: &HashMap<String, f64>) -> Result<Vec<u8>> {
    let mut payload = vec![0u8; format.payload_width()];
    let mut cursor = 0usize;

    for field in &format.fields {
        if field.ty.is_bitfield() {
            let mut flags = Vec::with_capacity(field.bits.len());
            for flag in &field.bits {
                flags.push((flag.bit, fetch(values, &flag.name)? != 0.0));
            }
            wire::write_field(
                &mut payload,
                cursor,
                field.ty,
                format.endian,
                pack_bits(flags) as f64,
            )?;
        } else {
            let value = fetch(values, &field.name)?;
            wire::write_field(&mut payload, cursor, field.ty, format.endian, value)?;
        }

        cursor += field.width();
    }

    tracing::debug!(
        format = %format.name,
        bytes = payload.len(),
        "encoded packet"
    );

    Ok(payload)
}

/// Encode against the registry for an outbound packet request
pub fn encode_packet(
    registry: &Registry,
    id: u32,
    values: &HashMap<String, f64>,
) -> Result<Vec<u8>> {
    let format = registry.by_id(id).ok_or(EncodeError::UnknownFormat(id))?;
    encode_fields(format, values)
}
