// Packet format descriptions and the load-once format registry

pub mod catalog;
pub mod registry;
pub mod spec;

pub use catalog::{load_catalog, load_catalog_str, CatalogError};
pub use registry::{Registry, RegistryError};
pub use spec::{BitFlag, FieldSpec, Link, PacketFormat};
