//! Catalog statistics

use crate::products::{Product, ProductStatus};

/// Summary counters, always computed over the full catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of products
    pub total: usize,

    /// Products whose status is available
    pub available: usize,

    /// Products carrying the new-stock flag
    pub new_stock: usize,

    /// Products whose status is sold
    pub sold: usize,
}

impl CatalogStats {
    /// Counts `products`.
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a Product>) -> Self {
        products
            .into_iter()
            .fold(Self::default(), |mut stats, product| {
                stats.total += 1;

                match product.status {
                    ProductStatus::Available => stats.available += 1,
                    ProductStatus::Sold => stats.sold += 1,
                }

                if product.is_new {
                    stats.new_stock += 1;
                }

                stats
            })
    }
}
