//! Catalog controller.
//!
//! Owns the catalog for one admin session and implements the editor, delete, toggle and
//! filter flows on top of the pure operations in [`stockroom::catalog`]. Presentation code
//! feeds it user input and reads back a [`CatalogView`]; it never reaches into widgets.

use std::{
    collections::BTreeSet,
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use jiff::Timestamp;
use stockroom::{
    catalog::{Catalog, ImageChange},
    document,
    filter::{CategoryFilter, ProductFilter, StatusFilter},
    images::{self, EncodedImage, ImageError},
    products::{Product, ProductDraft, ProductId, ProductStatus},
    stats::CatalogStats,
};
use tracing::{debug, error, info, warn};

use crate::{
    catalog::errors::{SaveError, SubmitError},
    confirm::Confirm,
    notifications::{Notification, Notifier, Severity},
    storage::KeyValueStore,
};

/// Storage key holding the serialized catalog.
pub const CATALOG_KEY: &str = "admin-products";

/// Question asked before a product is deleted.
pub const DELETE_PROMPT: &str =
    "Are you sure you want to delete this product? This action cannot be undone.";

// The catalog lives in the shared namespace of the store.
const SHARED: bool = true;

/// Product editor state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Editor {
    #[default]
    Closed,

    /// Blank form for a new product.
    Creating,

    /// Form pre-filled from an existing product.
    Editing(ProductId),
}

/// Everything a presentation layer redraws after a change.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogView<'a> {
    /// Counters over the full catalog.
    pub stats: CatalogStats,

    /// Products passing the active filter, most recent first.
    pub products: Vec<&'a Product>,

    /// Options for the category selector.
    pub categories: BTreeSet<&'a str>,
}

pub struct CatalogController {
    catalog: Catalog,
    editor: Editor,

    /// Image uploaded during the current editor session. Its presence is the
    /// "image changed" flag for edits.
    pending_image: Option<EncodedImage>,

    filter: ProductFilter,
    notification: Option<Notification>,

    /// False while in-memory changes have not reached the store.
    persisted: bool,

    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
}

impl Debug for CatalogController {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CatalogController")
            .field("products", &self.catalog.len())
            .field("editor", &self.editor)
            .field("filter", &self.filter)
            .field("persisted", &self.persisted)
            .finish_non_exhaustive()
    }
}

impl CatalogController {
    /// Controller over an empty catalog. Call [`load`](Self::load) to read the store.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
    ) -> Self {
        Self {
            catalog: Catalog::new(),
            editor: Editor::Closed,
            pending_image: None,
            filter: ProductFilter::default(),
            notification: None,
            persisted: true,
            store,
            notifier,
            confirm,
        }
    }

    /// Replaces the in-memory catalog with the stored one.
    ///
    /// A missing key, a read failure or an unreadable document all leave an empty catalog;
    /// failures are logged and not shown to the user.
    pub async fn load(&mut self) {
        self.catalog = match self.store.get(CATALOG_KEY, SHARED).await {
            Ok(Some(stored)) => document::decode(&stored.value).unwrap_or_else(|source| {
                error!("failed to parse stored catalog: {source}");

                Catalog::new()
            }),
            Ok(None) => {
                debug!("no stored catalog under {CATALOG_KEY}");

                Catalog::new()
            }
            Err(source) => {
                error!("failed to load catalog: {source}");

                Catalog::new()
            }
        };

        self.persisted = true;

        info!("loaded {} products", self.catalog.len());
    }

    /// Writes the whole catalog to the store and reports the outcome as a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be serialized or written. In-memory state is
    /// kept either way.
    pub async fn save(&mut self) -> Result<(), SaveError> {
        match self.write_catalog().await {
            Ok(()) => {
                self.persisted = true;
                self.notify("Products saved successfully!", Severity::Success);

                Ok(())
            }
            Err(source) => {
                error!("failed to save catalog: {source}");

                self.persisted = false;
                self.notify("Error saving products. Please try again.", Severity::Error);

                Err(source)
            }
        }
    }

    async fn write_catalog(&self) -> Result<(), SaveError> {
        let encoded = document::encode(&self.catalog)?;

        self.store.set(CATALOG_KEY, encoded, SHARED).await?;

        Ok(())
    }

    async fn persist(&mut self) {
        self.persisted = false;

        if let Err(source) = self.save().await {
            warn!("catalog changes kept in memory only: {source}");
        }
    }

    /// Opens a blank editor for a new product and returns the blank form.
    pub fn open_add(&mut self) -> ProductDraft {
        self.editor = Editor::Creating;
        self.pending_image = None;

        ProductDraft::default()
    }

    /// Opens the editor on an existing product and returns the pre-filled form.
    ///
    /// Does nothing and returns `None` when no product has `id`.
    pub fn open_edit(&mut self, id: ProductId) -> Option<ProductDraft> {
        let draft = ProductDraft::from(self.catalog.get(id)?);

        self.editor = Editor::Editing(id);
        self.pending_image = None;

        Some(draft)
    }

    /// Closes the editor, discarding any uploaded image.
    pub fn close_editor(&mut self) {
        self.editor = Editor::Closed;
        self.pending_image = None;
    }

    /// Ingests an uploaded image and holds it for the next submit.
    ///
    /// # Errors
    ///
    /// Returns the ingestion error after notifying the user; any earlier upload from this
    /// editor session is kept.
    pub fn upload_image(&mut self, bytes: &[u8]) -> Result<(), ImageError> {
        match images::ingest(bytes) {
            Ok(image) => {
                debug!(
                    "accepted {} byte upload as {}x{} JPEG",
                    bytes.len(),
                    image.width(),
                    image.height()
                );

                self.pending_image = Some(image);

                Ok(())
            }
            Err(source) => {
                let message = match source {
                    ImageError::TooLarge { .. } => {
                        "Image too large. Please use an image under 5MB."
                    }
                    ImageError::Decode(_) | ImageError::Encode(_) => "Could not read image.",
                };

                warn!("rejected image upload: {source}");
                self.notify(message, Severity::Error);

                Err(source)
            }
        }
    }

    /// Discards the uploaded image. When editing, the stored image is kept.
    pub fn clear_image(&mut self) {
        self.pending_image = None;
    }

    /// The image the open form would show: this session's upload, otherwise the stored
    /// image of the product being edited.
    pub fn preview(&self) -> Option<&str> {
        if let Some(image) = &self.pending_image {
            return Some(image.as_data_url());
        }

        match self.editor {
            Editor::Editing(id) => self
                .catalog
                .get(id)
                .map(|product| product.image.as_str())
                .filter(|image| !image.is_empty()),
            Editor::Creating | Editor::Closed => None,
        }
    }

    /// Submits the open form.
    ///
    /// Creating requires an uploaded image; the new product goes to the front of the
    /// catalog. Editing keeps the product's id and creation time and replaces its image only
    /// if one was uploaded in this session. On success the catalog is saved and the editor
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError`] without changing the catalog if the editor is closed, no image
    /// was uploaded for a new product, or the edited product has disappeared.
    pub async fn submit(&mut self, draft: ProductDraft) -> Result<ProductId, SubmitError> {
        let id = match self.editor {
            Editor::Closed => return Err(SubmitError::EditorClosed),
            Editor::Creating => {
                let Some(image) = self.pending_image.take() else {
                    self.notify("Please upload a product image.", Severity::Error);

                    return Err(SubmitError::MissingImage);
                };

                let id = self.catalog.create(draft, image, Timestamp::now());

                info!("created product {id}");
                self.notify("Product added successfully!", Severity::Success);

                id
            }
            Editor::Editing(id) => {
                if self.catalog.get(id).is_none() {
                    return Err(SubmitError::NotFound(id));
                }

                let image = self
                    .pending_image
                    .take()
                    .map_or(ImageChange::Keep, ImageChange::Replace);

                self.catalog.update(id, draft, image);

                info!("updated product {id}");
                self.notify("Product updated successfully!", Severity::Success);

                id
            }
        };

        self.persist().await;
        self.close_editor();

        Ok(id)
    }

    /// Deletes a product after the user confirms. Returns the removed product.
    pub async fn delete(&mut self, id: ProductId) -> Option<Product> {
        if !self.confirm.confirm(DELETE_PROMPT) {
            debug!("delete of product {id} cancelled");

            return None;
        }

        let removed = self.catalog.remove(id)?;

        info!("deleted product {id}");

        self.notify("Product deleted successfully!", Severity::Success);
        self.persist().await;

        Some(removed)
    }

    /// Sets a product's status. Returns `None`, without saving, for an unknown id.
    pub async fn set_status(
        &mut self,
        id: ProductId,
        status: ProductStatus,
    ) -> Option<ProductStatus> {
        let status = self.catalog.set_status(id, status)?;

        self.notify(format!("Product marked as {status}!"), Severity::Success);
        self.persist().await;

        Some(status)
    }

    /// Flips a product between available and sold.
    pub async fn toggle_status(&mut self, id: ProductId) -> Option<ProductStatus> {
        let status = self.catalog.get(id)?.status.toggled();

        self.set_status(id, status).await
    }

    /// Flips a product's new-stock flag.
    pub async fn toggle_new(&mut self, id: ProductId) -> Option<bool> {
        let is_new = self.catalog.toggle_new(id)?;

        let verb = if is_new { "marked" } else { "unmarked" };
        self.notify(format!("Product {verb} as new stock!"), Severity::Success);

        self.persist().await;

        Some(is_new)
    }

    /// Replaces all three filter inputs.
    pub fn set_filter(&mut self, filter: ProductFilter) {
        self.filter = filter;
    }

    /// Search box input.
    pub fn set_query(&mut self, query: &str) {
        self.filter = std::mem::take(&mut self.filter).with_query(query);
    }

    /// Status selector input.
    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter = std::mem::take(&mut self.filter).with_status(status);
    }

    /// Category selector input.
    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.filter = std::mem::take(&mut self.filter).with_category(category);
    }

    #[must_use]
    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    /// Products passing the active filter.
    #[must_use]
    pub fn visible(&self) -> Vec<&Product> {
        self.catalog.filter(&self.filter)
    }

    /// Counters over the full catalog, regardless of the filter.
    #[must_use]
    pub fn stats(&self) -> CatalogStats {
        self.catalog.stats()
    }

    #[must_use]
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            stats: self.stats(),
            products: self.visible(),
            categories: self.catalog.categories(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn editor(&self) -> Editor {
        self.editor
    }

    /// Whether the store holds everything shown in memory.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// The banner currently on screen, if it has not been dismissed by `now`.
    #[must_use]
    pub fn notification_at(&self, now: Timestamp) -> Option<&Notification> {
        self.notification
            .as_ref()
            .filter(|notification| notification.is_visible_at(now))
    }

    fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        let notification = Notification::new(message, severity, Timestamp::now());

        self.notifier.notify(&notification);
        self.notification = Some(notification);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Cursor,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use image::{ImageFormat, RgbImage};
    use jiff::SignedDuration;
    use stockroom::images::MAX_UPLOAD_BYTES;
    use testresult::TestResult;

    use crate::{
        confirm::{AssumeYes, MockConfirm},
        storage::{MemoryStore, MockKeyValueStore, StoreError},
    };

    use super::*;

    #[derive(Debug, Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<(Severity, String)>>,
    }

    impl RecordingNotifier {
        fn messages(&self) -> Vec<(Severity, String)> {
            self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: &Notification) {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push((notification.severity(), notification.message().to_string()));
            }
        }
    }

    fn png(width: u32, height: u32) -> TestResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());

        RgbImage::new(width, height).write_to(&mut out, ImageFormat::Png)?;

        Ok(out.into_inner())
    }

    fn draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            price: "199".to_string(),
            description: format!("{title} description"),
            category: "furniture".to_string(),
            quantity: 2,
            ..ProductDraft::default()
        }
    }

    fn controller_with(
        store: Arc<dyn KeyValueStore>,
        confirm: Arc<dyn Confirm>,
    ) -> (CatalogController, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let controller = CatalogController::new(store, notifier.clone(), confirm);

        (controller, notifier)
    }

    fn controller() -> (CatalogController, Arc<RecordingNotifier>) {
        controller_with(Arc::new(MemoryStore::new()), Arc::new(AssumeYes))
    }

    async fn add(controller: &mut CatalogController, title: &str) -> TestResult<ProductId> {
        controller.open_add();
        controller.upload_image(&png(8, 8)?)?;

        Ok(controller.submit(draft(title)).await?)
    }

    #[tokio::test]
    async fn add_places_product_at_front_and_saves() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let (mut controller, notifier) = controller_with(store.clone(), Arc::new(AssumeYes));

        let first = add(&mut controller, "First").await?;
        let second = add(&mut controller, "Second").await?;

        let ids: Vec<ProductId> = controller.catalog().iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![second, first]);
        assert_eq!(controller.editor(), Editor::Closed);
        assert!(controller.is_persisted(), "catalog should be saved");
        assert!(
            store.get(CATALOG_KEY, true).await?.is_some(),
            "catalog should be written under the shared key"
        );
        assert_eq!(
            notifier.messages().last(),
            Some(&(Severity::Success, "Products saved successfully!".to_string()))
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_without_image_is_rejected() -> TestResult {
        let (mut controller, notifier) = controller();

        controller.open_add();
        let result = controller.submit(draft("No image")).await;

        assert_eq!(result, Err(SubmitError::MissingImage));
        assert!(controller.catalog().is_empty());
        assert_eq!(controller.editor(), Editor::Creating);
        assert_eq!(
            notifier.messages(),
            vec![(Severity::Error, "Please upload a product image.".to_string())]
        );

        Ok(())
    }

    #[tokio::test]
    async fn submit_with_closed_editor_is_rejected() {
        let (mut controller, _) = controller();

        let result = controller.submit(draft("x")).await;

        assert_eq!(result, Err(SubmitError::EditorClosed));
    }

    #[tokio::test]
    async fn oversized_upload_sets_no_preview() -> TestResult {
        let (mut controller, notifier) = controller();

        controller.open_add();

        let result = controller.upload_image(&vec![0; MAX_UPLOAD_BYTES + 1]);

        assert!(
            matches!(result, Err(ImageError::TooLarge { .. })),
            "expected TooLarge, got {result:?}"
        );
        assert_eq!(controller.preview(), None);
        assert_eq!(
            notifier.messages().last(),
            Some(&(
                Severity::Error,
                "Image too large. Please use an image under 5MB.".to_string()
            ))
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_upload_keeps_earlier_upload() -> TestResult {
        let (mut controller, _) = controller();

        controller.open_add();
        controller.upload_image(&png(8, 8)?)?;
        let accepted = controller.preview().map(str::to_string);

        assert!(
            controller.upload_image(&vec![0; MAX_UPLOAD_BYTES + 1]).is_err(),
            "oversized upload should be rejected"
        );
        assert!(
            controller.upload_image(b"not an image").is_err(),
            "undecodable upload should be rejected"
        );
        assert_eq!(controller.preview().map(str::to_string), accepted);

        controller.submit(draft("Kept")).await?;
        assert_eq!(controller.catalog().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn cleared_upload_blocks_create() -> TestResult {
        let (mut controller, _) = controller();

        controller.open_add();
        controller.upload_image(&png(8, 8)?)?;
        controller.clear_image();

        assert_eq!(controller.preview(), None);
        assert_eq!(
            controller.submit(draft("No image")).await,
            Err(SubmitError::MissingImage)
        );
        assert!(controller.catalog().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn cleared_upload_during_edit_keeps_stored_image() -> TestResult {
        let (mut controller, _) = controller();
        let id = add(&mut controller, "Chair").await?;
        let stored = controller.catalog().get(id).map(|p| p.image.clone()).ok_or("missing")?;

        let form = controller.open_edit(id).ok_or("product should open")?;
        controller.upload_image(&png(1600, 900)?)?;
        assert_ne!(controller.preview(), Some(stored.as_str()));

        controller.clear_image();
        assert_eq!(controller.preview(), Some(stored.as_str()));

        controller.submit(form).await?;

        assert_eq!(
            controller.catalog().get(id).map(|p| p.image.as_str()),
            Some(stored.as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn edit_preserves_id_created_at_and_image() -> TestResult {
        let (mut controller, _) = controller();
        let id = add(&mut controller, "Chair").await?;
        let original = controller.catalog().get(id).cloned().ok_or("missing")?;

        let mut form = controller.open_edit(id).ok_or("product should open")?;
        assert_eq!(controller.preview(), Some(original.image.as_str()));

        form.title = "Armchair".to_string();
        form.status = ProductStatus::Sold;
        form.is_new = true;

        assert_eq!(controller.submit(form).await?, id);

        let updated = controller.catalog().get(id).ok_or("missing")?;

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.image, original.image);
        assert_eq!(updated.title, "Armchair");
        assert_eq!(updated.status, ProductStatus::Sold);
        assert!(updated.is_new, "flag should be updated");
        assert_eq!(controller.catalog().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn edit_with_new_upload_replaces_image() -> TestResult {
        let (mut controller, _) = controller();
        let id = add(&mut controller, "Chair").await?;
        let before = controller.catalog().get(id).map(|p| p.image.clone());

        let form = controller.open_edit(id).ok_or("product should open")?;
        controller.upload_image(&png(1600, 900)?)?;
        controller.submit(form).await?;

        let after = controller.catalog().get(id).map(|p| p.image.clone());

        assert_ne!(before, after);

        Ok(())
    }

    #[tokio::test]
    async fn open_edit_unknown_id_is_a_silent_no_op() {
        let (mut controller, notifier) = controller();

        assert_eq!(controller.open_edit(ProductId::new(42)), None);
        assert_eq!(controller.editor(), Editor::Closed);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn refused_delete_changes_nothing() -> TestResult {
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt.to_string() == DELETE_PROMPT)
            .once()
            .return_const(false);

        let (mut controller, _) = controller();
        let id = add(&mut controller, "Target").await?;
        controller.confirm = Arc::new(confirm);

        let before = controller.catalog().clone();

        assert_eq!(controller.delete(id).await, None);
        assert_eq!(controller.catalog(), &before);

        Ok(())
    }

    #[tokio::test]
    async fn confirmed_delete_removes_only_the_target() -> TestResult {
        let (mut controller, notifier) = controller();
        let keep = add(&mut controller, "Keep").await?;
        let target = add(&mut controller, "Target").await?;
        let kept = controller.catalog().get(keep).cloned();

        let removed = controller.delete(target).await.ok_or("should delete")?;

        assert_eq!(removed.id, target);
        assert_eq!(controller.catalog().len(), 1);
        assert_eq!(controller.catalog().get(keep).cloned(), kept);
        assert!(
            notifier
                .messages()
                .contains(&(Severity::Success, "Product deleted successfully!".to_string())),
            "delete should be announced"
        );

        Ok(())
    }

    #[tokio::test]
    async fn toggles_flip_one_field_and_save() -> TestResult {
        let (mut controller, notifier) = controller();
        let other = add(&mut controller, "Other").await?;
        let id = add(&mut controller, "Target").await?;
        let untouched = controller.catalog().get(other).cloned();

        assert_eq!(controller.toggle_status(id).await, Some(ProductStatus::Sold));
        assert!(
            notifier
                .messages()
                .contains(&(Severity::Success, "Product marked as sold!".to_string())),
            "status change should be announced"
        );

        assert_eq!(controller.toggle_new(id).await, Some(true));
        assert!(
            notifier
                .messages()
                .contains(&(Severity::Success, "Product marked as new stock!".to_string())),
            "new-stock flag should be announced"
        );
        assert_eq!(
            notifier.messages().last(),
            Some(&(Severity::Success, "Products saved successfully!".to_string()))
        );

        assert_eq!(controller.catalog().get(other).cloned(), untouched);
        assert_eq!(
            controller.stats(),
            CatalogStats {
                total: 2,
                available: 1,
                new_stock: 1,
                sold: 1,
            }
        );

        Ok(())
    }

    #[tokio::test]
    async fn toggle_unknown_id_does_not_save() {
        let mut store = MockKeyValueStore::new();
        store.expect_set().never();

        let (mut controller, notifier) = controller_with(Arc::new(store), Arc::new(AssumeYes));

        assert_eq!(controller.toggle_new(ProductId::new(3)).await, None);
        assert_eq!(controller.toggle_status(ProductId::new(3)).await, None);
        assert!(notifier.messages().is_empty());
    }

    #[tokio::test]
    async fn failed_load_resets_to_empty_silently() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_get()
            .once()
            .returning(|_, _| Err(StoreError::Unavailable("offline".to_string())));

        let (mut controller, notifier) = controller_with(Arc::new(store), Arc::new(AssumeYes));

        controller.load().await;

        assert!(controller.catalog().is_empty());
        assert!(notifier.messages().is_empty(), "load failures are not surfaced");
    }

    #[tokio::test]
    async fn unreadable_document_resets_to_empty() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(CATALOG_KEY, "{broken".to_string(), true).await?;

        let (mut controller, _) = controller_with(store, Arc::new(AssumeYes));
        controller.load().await;

        assert!(controller.catalog().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_save_keeps_memory_and_reports_error() -> TestResult {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .returning(|_, _, _| Err(StoreError::Unavailable("quota exceeded".to_string())));

        let (mut controller, notifier) = controller_with(Arc::new(store), Arc::new(AssumeYes));

        let id = add(&mut controller, "Unsaved").await?;

        assert!(controller.catalog().get(id).is_some(), "product stays in memory");
        assert!(!controller.is_persisted(), "memory and storage diverge");
        assert_eq!(
            notifier.messages().last(),
            Some(&(
                Severity::Error,
                "Error saving products. Please try again.".to_string()
            ))
        );

        Ok(())
    }

    #[tokio::test]
    async fn failed_save_after_toggle_or_delete_leaves_error_banner() -> TestResult {
        let writes = AtomicUsize::new(0);
        let mut store = MockKeyValueStore::new();
        store.expect_set().returning(move |_, _, _| {
            if writes.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(())
            } else {
                Err(StoreError::Unavailable("quota exceeded".to_string()))
            }
        });

        let (mut controller, _) = controller_with(Arc::new(store), Arc::new(AssumeYes));
        let id = add(&mut controller, "Lamp").await?;

        let save_failed = Some((
            Severity::Error,
            "Error saving products. Please try again.".to_string(),
        ));
        let banner = |controller: &CatalogController| {
            controller
                .notification_at(Timestamp::now())
                .map(|n| (n.severity(), n.message().to_string()))
        };

        controller.toggle_new(id).await.ok_or("toggle should apply")?;
        assert!(!controller.is_persisted(), "toggle save should fail");
        assert_eq!(banner(&controller), save_failed);

        controller
            .set_status(id, ProductStatus::Sold)
            .await
            .ok_or("status should apply")?;
        assert_eq!(banner(&controller), save_failed);

        controller.delete(id).await.ok_or("delete should apply")?;
        assert!(!controller.is_persisted(), "delete save should fail");
        assert_eq!(banner(&controller), save_failed);

        Ok(())
    }

    #[tokio::test]
    async fn reload_round_trips_through_the_store() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let (mut controller, _) = controller_with(store.clone(), Arc::new(AssumeYes));
        let id = add(&mut controller, "Persisted").await?;

        let (mut reopened, _) = controller_with(store, Arc::new(AssumeYes));
        reopened.load().await;

        assert_eq!(reopened.catalog(), controller.catalog());

        let next = add(&mut reopened, "Next").await?;
        assert!(next > id, "ids keep increasing across sessions");

        Ok(())
    }

    #[tokio::test]
    async fn filter_changes_view_but_not_stats() -> TestResult {
        let (mut controller, _) = controller();
        add(&mut controller, "Oak chair").await?;
        add(&mut controller, "Lamp").await?;

        controller.set_query("CHAIR");

        let view = controller.view();

        assert_eq!(view.products.len(), 1);
        assert_eq!(view.stats.total, 2);
        assert_eq!(view.categories.into_iter().collect::<Vec<_>>(), vec!["furniture"]);

        controller.set_status_filter(StatusFilter::Sold);
        assert!(controller.visible().is_empty());

        controller.set_filter(ProductFilter::default());
        assert_eq!(controller.visible().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn category_filter_narrows_view_but_not_stats() -> TestResult {
        let (mut controller, _) = controller();
        add(&mut controller, "Oak chair").await?;

        controller.open_add();
        controller.upload_image(&png(8, 8)?)?;
        controller
            .submit(ProductDraft {
                category: "lighting".to_string(),
                ..draft("Lamp")
            })
            .await?;

        let before = controller.stats();

        controller.set_category_filter(CategoryFilter::Only("lighting".to_string()));

        let titles: Vec<&str> = controller.visible().iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["Lamp"]);
        assert_eq!(controller.stats(), before);
        assert_eq!(
            controller.filter().category(),
            &CategoryFilter::Only("lighting".to_string())
        );

        controller.set_category_filter(CategoryFilter::All);
        assert_eq!(controller.visible().len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn notification_expires_after_three_seconds() -> TestResult {
        let (mut controller, _) = controller();
        add(&mut controller, "Item").await?;

        let raised_at = controller
            .notification_at(Timestamp::now())
            .map(Notification::raised_at)
            .ok_or("notification should be visible")?;

        let later = raised_at.checked_add(SignedDuration::from_secs(3))?;

        assert!(controller.notification_at(later).is_none());

        Ok(())
    }
}
