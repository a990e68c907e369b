//! Stored catalog document
//!
//! The whole catalog is persisted as one JSON value:
//!
//! ```json
//! { "nextId": 3, "products": [ { "id": 2, "title": "…", … }, … ] }
//! ```
//!
//! A bare JSON array of products is also accepted, which is how catalogs were stored
//! before the id counter was persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{catalog::Catalog, products::Product};

/// Errors reading or writing a catalog document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The stored value is not a catalog.
    #[error("malformed catalog document")]
    Malformed(#[source] serde_json::Error),

    /// The catalog could not be serialized.
    #[error("failed to serialize catalog")]
    Serialize(#[source] serde_json::Error),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocumentRef<'a> {
    next_id: u64,
    products: &'a [Product],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogDocument {
    next_id: u64,
    products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredCatalog {
    Current(CatalogDocument),
    Legacy(Vec<Product>),
}

/// Parses a stored catalog. A blank value is an empty catalog.
///
/// # Errors
///
/// Returns [`DocumentError::Malformed`] if `raw` is neither document format.
pub fn decode(raw: &str) -> Result<Catalog, DocumentError> {
    if raw.trim().is_empty() {
        return Ok(Catalog::new());
    }

    let stored: StoredCatalog = serde_json::from_str(raw).map_err(DocumentError::Malformed)?;

    Ok(match stored {
        StoredCatalog::Current(CatalogDocument { next_id, products }) => {
            Catalog::from_parts(products, next_id)
        }
        StoredCatalog::Legacy(products) => Catalog::from_products(products),
    })
}

/// Serializes the whole catalog, including the id counter.
///
/// # Errors
///
/// Returns [`DocumentError::Serialize`] if serialization fails.
pub fn encode(catalog: &Catalog) -> Result<String, DocumentError> {
    serde_json::to_string(&CatalogDocumentRef {
        next_id: catalog.next_id(),
        products: catalog.products(),
    })
    .map_err(DocumentError::Serialize)
}
