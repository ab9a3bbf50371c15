pub mod collections;
pub mod metadata;
pub mod provider;
pub mod severity;
