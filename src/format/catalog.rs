// Format catalog loading
// Two JSON layouts exist in the wild: the dashboard document
// {"packets": [...]} keyed by "id", and the serial bridge's bare array
// keyed by "address". Both produce the same PacketFormat model.

use super::spec::{BitFlag, FieldSpec, Link, PacketFormat};
use crate::wire::{Endianness, FieldType};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Format '{0}' declares neither 'id' nor 'address'")]
    MissingIdentifier(String),

    #[error("Format '{0}' declares both 'id' and 'address'")]
    AmbiguousIdentifier(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogDoc {
    Wrapped { packets: Vec<FormatDef> },
    Bare(Vec<FormatDef>),
}

impl CatalogDoc {
    fn into_defs(self) -> Vec<FormatDef> {
        match self {
            CatalogDoc::Wrapped { packets } => packets,
            CatalogDoc::Bare(defs) => defs,
        }
    }
}

#[derive(Debug, Deserialize)]
struct FormatDef {
    /// Stream-link identifier
    #[serde(default)]
    id: Option<u32>,

    /// CAN-style serial-link identifier
    #[serde(default)]
    address: Option<u32>,

    name: String,

    #[serde(default)]
    board: Option<String>,

    #[serde(default)]
    endian: Option<Endianness>,

    data: Vec<FieldDef>,
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    name: String,

    #[serde(rename = "type")]
    ty: FieldType,

    #[serde(default)]
    bits: Vec<BitFlagDef>,

    /// The dashboard documents call this "conversion"
    #[serde(default, alias = "conversion")]
    scale: Option<f64>,

    #[serde(default)]
    unit: Option<String>,

    #[serde(default)]
    decimals: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct BitFlagDef {
    name: String,

    /// Explicit bit position; defaults to the flag's position in the array
    #[serde(default)]
    bit: Option<u8>,
}

impl FormatDef {
    fn into_format(self) -> Result<PacketFormat> {
        let (id, link) = match (self.id, self.address) {
            (Some(id), None) => (id, Link::Stream),
            (None, Some(address)) => (address, Link::Can),
            (None, None) => return Err(CatalogError::MissingIdentifier(self.name)),
            (Some(_), Some(_)) => return Err(CatalogError::AmbiguousIdentifier(self.name)),
        };

        let fields = self
            .data
            .into_iter()
            .map(|field| {
                let bits = field
                    .bits
                    .into_iter()
                    .enumerate()
                    .map(|(position, flag)| BitFlag {
                        name: flag.name,
                        bit: flag.bit.unwrap_or(position as u8),
                    })
                    .collect();

                FieldSpec {
                    name: field.name,
                    ty: field.ty,
                    bits,
                    scale: field.scale,
                    unit: field.unit,
                    decimals: field.decimals,
                }
            })
            .collect();

        Ok(PacketFormat {
            id,
            name: self.name,
            board: self.board,
            endian: self.endian.unwrap_or_default(),
            link,
            fields,
        })
    }
}

/// Parse a catalog document from a JSON string
pub fn load_catalog_str(json: &str) -> Result<Vec<PacketFormat>> {
    let doc: CatalogDoc = serde_json::from_str(json)?;
    doc.into_defs()
        .into_iter()
        .map(FormatDef::into_format)
        .collect()
}

/// Load a catalog document from a file
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Vec<PacketFormat>> {
    let mut file = File::open(path)?;
    let mut json = String::new();
    file.read_to_string(&mut json)?;
    load_catalog_str(&json)
}
