// TELEPACK-RS: format-driven codec for fixed-layout telemetry packets
// Copyright 2026 - Licensed under GPLv3

pub mod codec;
pub mod format;
pub mod frame;
pub mod wire;

// Re-export commonly used types
pub use codec::{
    decode_fields, decode_packet, dispatch, dispatch_with, encode_fields, encode_packet,
    DecodeError, DecodedValue, EncodeError, Inbound, Packet, CONSOLE_PACKET_ID,
};
pub use format::{
    load_catalog, load_catalog_str, BitFlag, CatalogError, FieldSpec, Link, PacketFormat,
    Registry, RegistryError,
};
pub use frame::{Deframer, Frame, FrameError};
pub use wire::{Endianness, FieldType, WireError};

/// TELEPACK version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
