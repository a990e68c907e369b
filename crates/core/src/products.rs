//! Products

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    num::ParseIntError,
    str::FromStr,
};

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Product identifier, unique within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Wraps a raw identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Errors parsing a [`ProductStatus`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown product status `{0}`, expected `available` or `sold`")]
pub struct ParseStatusError(String);

/// Availability of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Can be sold.
    #[default]
    Available,

    /// Already sold.
    Sold,
}

impl ProductStatus {
    /// Stored/display form of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
        }
    }

    /// The opposite status.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Available => Self::Sold,
            Self::Sold => Self::Available,
        }
    }
}

impl Display for ProductStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// Product
///
/// Field names serialize in camelCase to stay readable by documents written by earlier
/// versions of the admin panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog-unique identifier
    pub id: ProductId,

    /// Product title
    pub title: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Category name
    #[serde(default)]
    pub category: String,

    /// Availability
    #[serde(default)]
    pub status: ProductStatus,

    /// Price as entered, not parsed
    #[serde(default)]
    pub price: String,

    /// Units in stock
    #[serde(default, deserialize_with = "quantity_or_zero")]
    pub quantity: u32,

    /// New-stock flag, independent of `status`
    #[serde(default)]
    pub is_new: bool,

    /// Embedded JPEG as a `data:` URL
    #[serde(default)]
    pub image: String,

    /// Creation time, never changed by edits
    pub created_at: Timestamp,
}

impl Product {
    /// Builds a product from form data.
    pub fn from_draft(
        id: ProductId,
        draft: ProductDraft,
        image: String,
        created_at: Timestamp,
    ) -> Self {
        let ProductDraft {
            title,
            description,
            category,
            status,
            price,
            quantity,
            is_new,
        } = draft.normalized();

        Self {
            id,
            title,
            description,
            category,
            status,
            price,
            quantity,
            is_new,
            image,
            created_at,
        }
    }

    /// Overwrites every user-editable field, leaving `id`, `created_at` and `image` alone.
    pub fn apply(&mut self, draft: ProductDraft) {
        let draft = draft.normalized();

        self.title = draft.title;
        self.description = draft.description;
        self.category = draft.category;
        self.status = draft.status;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.is_new = draft.is_new;
    }
}

/// Form data for creating or editing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    /// Product title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// Category name
    pub category: String,

    /// Availability
    pub status: ProductStatus,

    /// Price as entered
    pub price: String,

    /// Units in stock
    pub quantity: u32,

    /// New-stock flag
    pub is_new: bool,
}

impl ProductDraft {
    /// Trims surrounding whitespace from the free-text fields.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price.trim().to_string(),
            ..self
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            description: product.description.clone(),
            category: product.category.clone(),
            status: product.status,
            price: product.price.clone(),
            quantity: product.quantity,
            is_new: product.is_new,
        }
    }
}

// Older documents may carry `null` where the quantity field failed to parse.
fn quantity_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or_default())
}
