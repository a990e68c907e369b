//! Catalog
//!
//! The ordered product sequence and the pure operations over it. New products go to the
//! front, so iteration order is most-recent-first.

use std::collections::BTreeSet;

use jiff::Timestamp;

use crate::{
    filter::ProductFilter,
    ids::IdSequence,
    images::EncodedImage,
    products::{Product, ProductDraft, ProductId, ProductStatus},
    stats::CatalogStats,
};

/// What an edit does to the stored image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    /// Keep the stored image.
    #[default]
    Keep,

    /// Replace it with a newly ingested one.
    Replace(EncodedImage),
}

/// Ordered product catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
    ids: IdSequence,
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog from stored products and the stored counter. The counter is moved past any
    /// id already in use.
    pub fn from_parts(products: Vec<Product>, next_id: u64) -> Self {
        let mut ids = IdSequence::starting_at(next_id);

        for product in &products {
            ids.observe(product.id);
        }

        Self { products, ids }
    }

    /// Catalog from products alone; the counter resumes after the largest id.
    pub fn from_products(products: Vec<Product>) -> Self {
        let ids = IdSequence::resume_after(products.iter().map(|product| product.id));

        Self { products, ids }
    }

    /// Products, most recent first.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Iterates products, most recent first.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// True when the catalog holds no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The id the next created product will receive.
    pub fn next_id(&self) -> u64 {
        self.ids.peek()
    }

    /// Looks a product up by id.
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.products.iter_mut().find(|product| product.id == id)
    }

    /// Puts a product at the front of the catalog.
    ///
    /// Ids stay unique: a product already holding the same id is removed and returned, and
    /// the sequence never hands the id out again.
    pub fn insert(&mut self, product: Product) -> Option<Product> {
        let replaced = self.remove(product.id);

        self.ids.observe(product.id);
        self.products.insert(0, product);

        replaced
    }

    /// Creates a product at the front of the catalog and returns its id.
    pub fn create(
        &mut self,
        draft: ProductDraft,
        image: EncodedImage,
        created_at: Timestamp,
    ) -> ProductId {
        let id = self.ids.allocate();

        self.insert(Product::from_draft(id, draft, image.into_data_url(), created_at));

        id
    }

    /// Overwrites a product in place, keeping its id and creation time.
    ///
    /// Returns `None` when no product has `id`.
    pub fn update(
        &mut self,
        id: ProductId,
        draft: ProductDraft,
        image: ImageChange,
    ) -> Option<&Product> {
        let product = self.get_mut(id)?;

        product.apply(draft);

        if let ImageChange::Replace(image) = image {
            product.image = image.into_data_url();
        }

        Some(product)
    }

    /// Removes and returns the product with `id`.
    pub fn remove(&mut self, id: ProductId) -> Option<Product> {
        let index = self.products.iter().position(|product| product.id == id)?;

        Some(self.products.remove(index))
    }

    /// Sets the status of one product, returning the status now stored.
    pub fn set_status(&mut self, id: ProductId, status: ProductStatus) -> Option<ProductStatus> {
        let product = self.get_mut(id)?;

        product.status = status;

        Some(product.status)
    }

    /// Flips between available and sold, returning the new status.
    pub fn toggle_status(&mut self, id: ProductId) -> Option<ProductStatus> {
        let product = self.get_mut(id)?;

        product.status = product.status.toggled();

        Some(product.status)
    }

    /// Flips the new-stock flag, returning the new value.
    pub fn toggle_new(&mut self, id: ProductId) -> Option<bool> {
        let product = self.get_mut(id)?;

        product.is_new = !product.is_new;

        Some(product.is_new)
    }

    /// Products passing `filter`, in catalog order.
    pub fn filter(&self, filter: &ProductFilter) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|product| filter.matches(product))
            .collect()
    }

    /// Counters over the whole catalog.
    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_products(&self.products)
    }

    /// Distinct non-empty categories, sorted.
    pub fn categories(&self) -> BTreeSet<&str> {
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| !category.is_empty())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}
