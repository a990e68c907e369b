//! Key-value storage

pub mod errors;
mod file;
mod memory;
pub mod service;

pub use errors::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use service::*;
