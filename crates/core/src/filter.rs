//! Product filtering

use std::{
    convert::Infallible,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use thiserror::Error;

use crate::products::{Product, ProductStatus};

/// Errors parsing a [`StatusFilter`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown status filter `{0}`, expected one of all, available, sold, new")]
pub struct ParseStatusFilterError(String);

/// Status selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every product
    #[default]
    All,

    /// Products whose status is available
    Available,

    /// Products whose status is sold
    Sold,

    /// Products carrying the new-stock flag, whatever their status
    New,
}

impl StatusFilter {
    /// Selector value as shown in the UI.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Available => "available",
            Self::Sold => "sold",
            Self::New => "new",
        }
    }

    /// Whether `product` passes this selector.
    pub fn matches(self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::New => product.is_new,
            Self::Available => product.status == ProductStatus::Available,
            Self::Sold => product.status == ProductStatus::Sold,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = ParseStatusFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            "new" => Ok(Self::New),
            _ => Err(ParseStatusFilterError(s.to_string())),
        }
    }
}

/// Category selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category
    #[default]
    All,

    /// Exactly this category
    Only(String),
}

impl CategoryFilter {
    /// Whether `product` passes this selector.
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => product.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = s.trim();

        if category.is_empty() || category.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        Ok(Self::Only(category.to_string()))
    }
}

/// Search box plus the two selectors, AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Lowercased search text
    query: String,

    status: StatusFilter,

    category: CategoryFilter,
}

impl ProductFilter {
    /// Creates a filter from the three inputs.
    pub fn new(query: &str, status: StatusFilter, category: CategoryFilter) -> Self {
        Self {
            query: query.to_lowercase(),
            status,
            category,
        }
    }

    /// Replaces the search text.
    #[must_use]
    pub fn with_query(self, query: &str) -> Self {
        Self {
            query: query.to_lowercase(),
            ..self
        }
    }

    /// Replaces the status selector.
    #[must_use]
    pub fn with_status(self, status: StatusFilter) -> Self {
        Self { status, ..self }
    }

    /// Replaces the category selector.
    #[must_use]
    pub fn with_category(self, category: CategoryFilter) -> Self {
        Self { category, ..self }
    }

    /// Lowercased search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Active status selector.
    pub fn status(&self) -> StatusFilter {
        self.status
    }

    /// Active category selector.
    pub fn category(&self) -> &CategoryFilter {
        &self.category
    }

    /// Whether `product` passes every predicate.
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_query(product)
            && self.status.matches(product)
            && self.category.matches(product)
    }

    fn matches_query(&self, product: &Product) -> bool {
        self.query.is_empty()
            || product.title.to_lowercase().contains(&self.query)
            || product.description.to_lowercase().contains(&self.query)
    }
}
