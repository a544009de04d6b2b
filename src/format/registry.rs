// Format registry: built once from a catalog, read-only afterward

use super::spec::PacketFormat;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Formats '{first}' and '{second}' share identifier {id}")]
    DuplicateIdentifier {
        id: u32,
        first: String,
        second: String,
    },

    #[error("Two formats share the name '{0}'")]
    DuplicateName(String),

    #[error("Format '{format}' declares field '{field}' more than once")]
    DuplicateField { format: String, field: String },

    #[error("Format '{format}' layout is {width} bytes but its link carries at most {capacity}")]
    LayoutTooWide {
        format: String,
        width: usize,
        capacity: usize,
    },

    #[error("Field '{field}' of format '{format}' has flags colliding on bit {bit}")]
    BitCollision {
        format: String,
        field: String,
        bit: u8,
    },

    #[error("Field '{field}' of format '{format}' declares bit {bit}, outside 0..=7")]
    BitOutOfRange {
        format: String,
        field: String,
        bit: u8,
    },

    #[error("Field '{field}' of format '{format}' {problem}")]
    MalformedBitfield {
        format: String,
        field: String,
        problem: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Read-only index of every known packet format, by identifier and by name
///
/// Built once at startup; decode and encode calls only ever borrow it, so
/// it can be shared freely across threads.
#[derive(Debug, Default)]
pub struct Registry {
    formats: Vec<PacketFormat>,
    by_id: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
}

impl Registry {
    /// Build a registry from loaded formats, rejecting catalog mistakes
    ///
    /// Duplicate identifiers or names, oversized layouts, and malformed
    /// bitfield declarations are all programmer errors in the catalog, so
    /// they fail construction instead of shadowing silently at runtime.
    pub fn load(formats: Vec<PacketFormat>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(formats.len());
        let mut by_name = HashMap::with_capacity(formats.len());

        for (index, format) in formats.iter().enumerate() {
            validate_layout(format)?;

            if let Some(&prior) = by_id.get(&format.id) {
                let prior: &PacketFormat = &formats[prior];
                return Err(RegistryError::DuplicateIdentifier {
                    id: format.id,
                    first: prior.name.clone(),
                    second: format.name.clone(),
                });
            }
            by_id.insert(format.id, index);

            if by_name.insert(format.name.clone(), index).is_some() {
                return Err(RegistryError::DuplicateName(format.name.clone()));
            }
        }

        Ok(Self {
            formats,
            by_id,
            by_name,
        })
    }

    /// Look up a format by its packet identifier
    pub fn by_id(&self, id: u32) -> Option<&PacketFormat> {
        self.by_id.get(&id).map(|&index| &self.formats[index])
    }

    /// Look up a format by its human-readable name
    pub fn by_name(&self, name: &str) -> Option<&PacketFormat> {
        self.by_name.get(name).map(|&index| &self.formats[index])
    }

    /// All loaded formats, in catalog order
    pub fn formats(&self) -> &[PacketFormat] {
        &self.formats
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

fn validate_layout(format: &PacketFormat) -> Result<()> {
    let width = format.payload_width();
    let capacity = format.capacity();
    if width > capacity {
        return Err(RegistryError::LayoutTooWide {
            format: format.name.clone(),
            width,
            capacity,
        });
    }

    let mut field_names = HashMap::new();
    for field in &format.fields {
        if field_names.insert(field.name.as_str(), ()).is_some() {
            return Err(RegistryError::DuplicateField {
                format: format.name.clone(),
                field: field.name.clone(),
            });
        }

        if field.ty.is_bitfield() {
            if field.bits.is_empty() {
                return Err(RegistryError::MalformedBitfield {
                    format: format.name.clone(),
                    field: field.name.clone(),
                    problem: "is a bitfield with no flags",
                });
            }

            let mut seen = [false; 8];
            for flag in &field.bits {
                if flag.bit > 7 {
                    return Err(RegistryError::BitOutOfRange {
                        format: format.name.clone(),
                        field: field.name.clone(),
                        bit: flag.bit,
                    });
                }
                if seen[flag.bit as usize] {
                    return Err(RegistryError::BitCollision {
                        format: format.name.clone(),
                        field: field.name.clone(),
                        bit: flag.bit,
                    });
                }
                seen[flag.bit as usize] = true;
            }
        } else if !field.bits.is_empty() {
            return Err(RegistryError::MalformedBitfield {
                format: format.name.clone(),
                field: field.name.clone(),
                problem: "declares flags but is not a bitfield",
            });
        }
    }

    Ok(())
}
