// Common type definitions for payload parsing

use serde::{Deserialize, Serialize};

/// Endianness for multi-byte values, fixed per packet format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    Big,
    Little,
}

impl Endianness {
    pub fn is_big(&self) -> bool {
        matches!(self, Endianness::Big)
    }

    pub fn is_little(&self) -> bool {
        matches!(self, Endianness::Little)
    }
}

impl Default for Endianness {
    fn default() -> Self {
        Endianness::Big
    }
}

/// Field types a packet format may declare
///
/// Serde names are the C-style strings used in the catalog documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    #[serde(rename = "uint8_t")]
    U8,
    #[serde(rename = "int8_t")]
    I8,
    #[serde(rename = "uint16_t")]
    U16,
    #[serde(rename = "int16_t")]
    I16,
    #[serde(rename = "uint32_t")]
    U32,
    #[serde(rename = "int32_t")]
    I32,
    #[serde(rename = "float")]
    F32,
    #[serde(rename = "bitfield")]
    Bitfield,
}

impl FieldType {
    /// Fixed byte width of a field of this type
    pub fn width(&self) -> usize {
        match self {
            FieldType::U8 | FieldType::I8 | FieldType::Bitfield => 1,
            FieldType::U16 | FieldType::I16 => 2,
            FieldType::U32 | FieldType::I32 | FieldType::F32 => 4,
        }
    }

    pub fn is_bitfield(&self) -> bool {
        matches!(self, FieldType::Bitfield)
    }
}
