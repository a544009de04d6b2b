// Byte-level reading and writing for fixed-layout packet payloads

pub mod bitfield;
pub mod elements;
pub mod types;

pub use bitfield::{pack_bits, unpack_bit};
pub use elements::{read_field, write_field, WireError};
pub use types::{Endianness, FieldType};
