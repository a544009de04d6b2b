// Declarative packet format model
// Loaded once from a catalog document, immutable afterward

use crate::wire::{Endianness, FieldType};
use serde::Serialize;

/// One boolean flag inside a bitfield byte
///
/// `bit` is the flag's position in the byte; bit 0 is least significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitFlag {
    pub name: String,
    pub bit: u8,
}

impl BitFlag {
    pub fn new(name: impl Into<String>, bit: u8) -> Self {
        Self {
            name: name.into(),
            bit,
        }
    }
}

/// One field in a packet format's ordered field list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub ty: FieldType,

    /// Flag declarations, present only for `FieldType::Bitfield`
    pub bits: Vec<BitFlag>,

    /// Multiplier applied to the raw value for display. Absence means the
    /// raw value is already in display units, which is distinct from a
    /// declared scale of 1.0.
    pub scale: Option<f64>,

    pub unit: Option<String>,

    /// Decimal places to show when rendering the converted value
    pub decimals: Option<u8>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
            bits: Vec::new(),
            scale: None,
            unit: None,
            decimals: None,
        }
    }

    pub fn with_bits(name: impl Into<String>, bits: Vec<BitFlag>) -> Self {
        Self {
            name: name.into(),
            ty: FieldType::Bitfield,
            bits,
            scale: None,
            unit: None,
            decimals: None,
        }
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Byte width this field occupies in the payload
    pub fn width(&self) -> usize {
        self.ty.width()
    }
}

/// Transport link a format belongs to, which fixes its payload capacity
///
/// Capacity is a property of the link hardware, never derived from the
/// field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Link {
    /// Generic event-stream packet, 8 data bytes
    Stream,
    /// CAN-style serial bridge packet, 15 data bytes
    Can,
}

impl Link {
    /// Maximum payload bytes a packet on this link can carry
    pub fn capacity(&self) -> usize {
        match self {
            Link::Stream => 8,
            Link::Can => 15,
        }
    }
}

/// A complete packet format: identifier, byte order, and ordered field list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketFormat {
    pub id: u32,
    pub name: String,
    pub board: Option<String>,
    pub endian: Endianness,
    pub link: Link,
    pub fields: Vec<FieldSpec>,
}

impl PacketFormat {
    pub fn new(id: u32, name: impl Into<String>, link: Link) -> Self {
        Self {
            id,
            name: name.into(),
            board: None,
            endian: Endianness::default(),
            link,
            fields: Vec::new(),
        }
    }

    pub fn endian(mut self, endian: Endianness) -> Self {
        self.endian = endian;
        self
    }

    pub fn board(mut self, board: impl Into<String>) -> Self {
        self.board = Some(board.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Total byte width of the declared field layout
    pub fn payload_width(&self) -> usize {
        self.fields.iter().map(|f| f.width()).sum()
    }

    /// Payload capacity of this format's link
    pub fn capacity(&self) -> usize {
        self.link.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_capacity() {
        assert_eq!(Link::Stream.capacity(), 8);
        assert_eq!(Link::Can.capacity(), 15);
    }

    #[test]
    fn test_payload_width() {
        let format = PacketFormat::new(0x20, "motor_status", Link::Stream)
            .field(FieldSpec::new("rpm", FieldType::U16))
            .field(FieldSpec::new("current", FieldType::I16).scale(0.1).unit("A"))
            .field(FieldSpec::with_bits(
                "faults",
                vec![BitFlag::new("overtemp", 0), BitFlag::new("overvolt", 1)],
            ));

        assert_eq!(format.payload_width(), 5);
        assert!(format.payload_width() <= format.capacity());
    }

    #[test]
    fn test_scale_absence_is_not_unity() {
        let plain = FieldSpec::new("ticks", FieldType::U32);
        let unity = FieldSpec::new("ticks", FieldType::U32).scale(1.0);
        assert_eq!(plain.scale, None);
        assert_eq!(unity.scale, Some(1.0));
        assert_ne!(plain, unity);
    }
}
