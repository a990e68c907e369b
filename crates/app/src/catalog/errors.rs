//! Catalog controller errors.

use stockroom::{document::DocumentError, products::ProductId};
use thiserror::Error;

use crate::storage::StoreError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("the product editor is not open")]
    EditorClosed,

    #[error("a product image is required")]
    MissingImage,

    #[error("product {0} no longer exists")]
    NotFound(ProductId),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("failed to write catalog")]
    Store(#[from] StoreError),
}
