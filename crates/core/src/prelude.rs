//! Stockroom prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, ImageChange},
    document::{DocumentError, decode, encode},
    filter::{CategoryFilter, ProductFilter, StatusFilter},
    ids::IdSequence,
    images::{EncodedImage, ImageError, ingest},
    products::{Product, ProductDraft, ProductId, ProductStatus},
    stats::CatalogStats,
};
