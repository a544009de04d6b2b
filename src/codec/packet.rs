// Per-message packet carrier and decoded field values

use serde::Serialize;
use std::collections::HashMap;

/// One decoded field: raw value plus display metadata
///
/// Serializes to the `{value, cvalue, unit}` shape the dashboard's event
/// stream carries, with `decimals` omitted when the format declares none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedValue {
    /// Raw decoded value (0/1 for a bit flag)
    pub value: f64,

    /// Value after unit scaling; equals `value` when no scale is declared
    pub cvalue: f64,

    /// Display unit, empty when the format declares none
    pub unit: String,

    /// Decimal places for display
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl DecodedValue {
    /// A raw value with no scale, unit, or decimals attached
    pub fn plain(value: f64) -> Self {
        Self {
            value,
            cvalue: value,
            unit: String::new(),
            decimals: None,
        }
    }

    /// A boolean flag value; flags carry the fixed "bool" unit marker
    pub fn flag(set: bool) -> Self {
        let value = if set { 1.0 } else { 0.0 };
        Self {
            value,
            cvalue: value,
            unit: "bool".to_string(),
            decimals: None,
        }
    }
}

/// One telemetry message: identifier, raw payload, decoded field map
///
/// `raw` and `decoded` are consistent after a successful decode or encode;
/// before that they may legitimately diverge (a freshly received packet has
/// raw bytes and an empty map).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Packet {
    pub id: u32,
    pub raw: Vec<u8>,

    /// Format name, filled in by decode
    pub name: Option<String>,

    /// Originating board, filled in by decode when the format declares one
    pub board: Option<String>,

    pub decoded: HashMap<String, DecodedValue>,
}

impl Packet {
    pub fn new(id: u32, raw: Vec<u8>) -> Self {
        Self {
            id,
            raw,
            ..Default::default()
        }
    }

    /// Raw value of a decoded field, if present
    pub fn value(&self, field: &str) -> Option<f64> {
        self.decoded.get(field).map(|v| v.value)
    }

    /// Flat name → raw-value map, the shape the encoder consumes
    pub fn values(&self) -> HashMap<String, f64> {
        self.decoded
            .iter()
            .map(|(name, v)| (name.clone(), v.value))
            .collect()
    }
}
