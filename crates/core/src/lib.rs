//! Stockroom
//!
//! Stockroom is the catalog domain behind a single-user product admin panel: products,
//! identifier allocation, filtering, statistics, image ingestion and the stored document
//! format. Nothing in this crate performs I/O.

pub mod catalog;
pub mod document;
pub mod filter;
pub mod ids;
pub mod images;
pub mod prelude;
pub mod products;
pub mod stats;
