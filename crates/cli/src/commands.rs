//! Subcommands and their dispatch onto the catalog controller

use std::{io, path::PathBuf};

use clap::{Args, Subcommand};
use stockroom::{
    filter::{CategoryFilter, ProductFilter, StatusFilter},
    images::ImageError,
    products::{ProductDraft, ProductId, ProductStatus},
};
use stockroom_app::catalog::{CatalogController, SubmitError};
use thiserror::Error;
use tracing::debug;

use crate::render;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("no product with id {0}")]
    NotFound(ProductId),

    #[error("failed to read image {path}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("image rejected")]
    Image(#[from] ImageError),

    #[error("product not submitted")]
    Submit(#[from] SubmitError),

    #[error("changes are kept in memory only and were not saved")]
    Unsaved,

    #[error("failed to write output")]
    Output(#[from] io::Error),
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List products matching the search and selectors
    List(ListArgs),

    /// Show the catalog counters
    Stats,

    /// Show every field of one product
    Show {
        /// Product id
        id: ProductId,
    },

    /// List the categories in use
    Categories,

    /// Add a product
    Add(AddArgs),

    /// Edit a product; omitted fields keep their current value
    Edit(EditArgs),

    /// Delete a product
    Delete {
        /// Product id
        id: ProductId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Mark a product as sold
    MarkSold {
        /// Product id
        id: ProductId,
    },

    /// Mark a product as available
    MarkAvailable {
        /// Product id
        id: ProductId,
    },

    /// Flip a product's new-stock flag
    ToggleNew {
        /// Product id
        id: ProductId,
    },
}

impl Command {
    /// Whether the user pre-approved destructive actions.
    pub(crate) fn assumes_yes(&self) -> bool {
        matches!(self, Self::Delete { yes: true, .. })
    }
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Case-insensitive search in title and description
    #[arg(short, long, default_value = "")]
    query: String,

    /// all, available, sold or new
    #[arg(short, long, default_value = "all")]
    status: StatusFilter,

    /// A category, or all
    #[arg(short, long, default_value = "all")]
    category: CategoryFilter,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    #[arg(long)]
    title: String,

    /// Free-form price text
    #[arg(long)]
    price: String,

    #[arg(long)]
    category: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value_t = 1)]
    quantity: u32,

    #[arg(long, default_value = "available")]
    status: ProductStatus,

    /// Flag the product as new stock
    #[arg(long = "new")]
    is_new: bool,

    /// Product photo; required for new products
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct EditArgs {
    /// Product id
    id: ProductId,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    price: Option<String>,

    #[arg(long)]
    category: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    quantity: Option<u32>,

    #[arg(long)]
    status: Option<ProductStatus>,

    /// New-stock flag (true or false)
    #[arg(long = "new")]
    is_new: Option<bool>,

    /// Replacement photo; the stored one is kept when omitted
    #[arg(long)]
    image: Option<PathBuf>,
}

impl EditArgs {
    fn apply_to(self, draft: &mut ProductDraft) -> Option<PathBuf> {
        let Self {
            id: _,
            title,
            price,
            category,
            description,
            quantity,
            status,
            is_new,
            image,
        } = self;

        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(price) = price {
            draft.price = price;
        }
        if let Some(category) = category {
            draft.category = category;
        }
        if let Some(description) = description {
            draft.description = description;
        }
        if let Some(quantity) = quantity {
            draft.quantity = quantity;
        }
        if let Some(status) = status {
            draft.status = status;
        }
        if let Some(is_new) = is_new {
            draft.is_new = is_new;
        }

        image
    }
}

/// Runs one command against a loaded catalog and writes the result to `out`.
///
/// # Errors
///
/// Returns an error if the command names an unknown product, an image cannot be read or is
/// rejected, the form is rejected, output cannot be written, or a change could not be saved.
pub(crate) async fn run(
    command: Command,
    controller: &mut CatalogController,
    mut out: impl io::Write,
) -> Result<(), CliError> {
    match command {
        Command::List(args) => {
            controller.set_filter(ProductFilter::new(&args.query, args.status, args.category));

            render::write_view(&mut out, &controller.view())?;
        }
        Command::Stats => render::write_stats(&mut out, &controller.stats())?,
        Command::Show { id } => {
            let product = controller.catalog().get(id).ok_or(CliError::NotFound(id))?;

            render::write_product(&mut out, product)?;
        }
        Command::Categories => {
            for category in controller.catalog().categories() {
                writeln!(out, "{category}")?;
            }
        }
        Command::Add(args) => {
            let id = add(controller, args).await?;

            show(controller, id, out)?;
        }
        Command::Edit(args) => {
            let id = edit(controller, args).await?;

            show(controller, id, out)?;
        }
        Command::Delete { id, .. } => {
            if controller.catalog().get(id).is_none() {
                return Err(CliError::NotFound(id));
            }

            if controller.delete(id).await.is_none() {
                writeln!(out, "Delete cancelled.")?;
            }
        }
        Command::MarkSold { id } => {
            controller
                .set_status(id, ProductStatus::Sold)
                .await
                .ok_or(CliError::NotFound(id))?;

            show(controller, id, out)?;
        }
        Command::MarkAvailable { id } => {
            controller
                .set_status(id, ProductStatus::Available)
                .await
                .ok_or(CliError::NotFound(id))?;

            show(controller, id, out)?;
        }
        Command::ToggleNew { id } => {
            controller
                .toggle_new(id)
                .await
                .ok_or(CliError::NotFound(id))?;

            show(controller, id, out)?;
        }
    }

    if controller.is_persisted() {
        Ok(())
    } else {
        Err(CliError::Unsaved)
    }
}

async fn add(controller: &mut CatalogController, args: AddArgs) -> Result<ProductId, CliError> {
    let AddArgs {
        title,
        price,
        category,
        description,
        quantity,
        status,
        is_new,
        image,
    } = args;

    let mut draft = controller.open_add();

    draft.title = title;
    draft.price = price;
    draft.category = category;
    draft.description = description;
    draft.quantity = quantity;
    draft.status = status;
    draft.is_new = is_new;

    if let Some(path) = image {
        upload(controller, path).await?;
    }

    Ok(controller.submit(draft).await?)
}

async fn edit(controller: &mut CatalogController, args: EditArgs) -> Result<ProductId, CliError> {
    let id = args.id;
    let mut draft = controller.open_edit(id).ok_or(CliError::NotFound(id))?;

    if let Some(path) = args.apply_to(&mut draft) {
        upload(controller, path).await?;
    }

    Ok(controller.submit(draft).await?)
}

async fn upload(controller: &mut CatalogController, path: PathBuf) -> Result<(), CliError> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(source) => return Err(CliError::ReadImage { path, source }),
    };

    debug!("read {} bytes from {}", bytes.len(), path.display());

    controller.upload_image(&bytes)?;

    Ok(())
}

fn show(
    controller: &CatalogController,
    id: ProductId,
    out: impl io::Write,
) -> Result<(), CliError> {
    let product = controller.catalog().get(id).ok_or(CliError::NotFound(id))?;

    render::write_product(out, product)?;

    Ok(())
}
