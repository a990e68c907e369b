//! Terminal rendering of products, statistics and notifications

use std::io::{self, Write};

use stockroom::{
    products::{Product, ProductStatus},
    stats::CatalogStats,
};
use stockroom_app::catalog::CatalogView;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

const EMPTY_STATE: &str = "No products found. Add a product or change the filters.";

/// Writes the summary counters followed by the visible product cards.
pub(crate) fn write_view(mut out: impl Write, view: &CatalogView<'_>) -> io::Result<()> {
    write_stats(&mut out, &view.stats)?;
    write_products(&mut out, &view.products)
}

/// Writes the four summary counters.
pub(crate) fn write_stats(mut out: impl Write, stats: &CatalogStats) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["Total", "Available", "New stock", "Sold"]);
    builder.push_record([
        stats.total.to_string(),
        stats.available.to_string(),
        stats.new_stock.to_string(),
        stats.sold.to_string(),
    ]);

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Rows::new(1..), Alignment::right());

    writeln!(out, "{table}")
}

/// Writes one row per product, or the empty-state message.
pub(crate) fn write_products(mut out: impl Write, products: &[&Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "{EMPTY_STATE}");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Title", "Category", "Price", "Qty", "Status", "Badges"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.title.clone(),
            product.category.clone(),
            format!("R{}", product.price),
            product.quantity.to_string(),
            status_badge(product).to_string(),
            new_badge(product).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")
}

/// Writes every field of one product.
pub(crate) fn write_product(mut out: impl Write, product: &Product) -> io::Result<()> {
    let mut builder = Builder::default();

    push_field(&mut builder, "ID", &product.id.to_string());
    push_field(&mut builder, "Title", &product.title);
    push_field(&mut builder, "Description", &product.description);
    push_field(&mut builder, "Category", &product.category);
    push_field(&mut builder, "Price", &format!("R{}", product.price));
    push_field(&mut builder, "Quantity", &product.quantity.to_string());
    push_field(&mut builder, "Status", status_badge(product));
    push_field(&mut builder, "New stock", if product.is_new { "yes" } else { "no" });
    push_field(&mut builder, "Image", &image_summary(&product.image));
    push_field(&mut builder, "Created", &product.created_at.to_string());

    let mut table = builder.build();

    table.with(Style::rounded());
    table.modify(Columns::first(), Color::BOLD);

    writeln!(out, "{table}")
}

fn push_field(builder: &mut Builder, label: &str, value: &str) {
    builder.push_record([label, value]);
}

fn status_badge(product: &Product) -> &'static str {
    match product.status {
        ProductStatus::Available => "AVAILABLE",
        ProductStatus::Sold => "SOLD",
    }
}

fn new_badge(product: &Product) -> &'static str {
    if product.is_new { "NEW" } else { "" }
}

fn image_summary(image: &str) -> String {
    if image.is_empty() {
        return "none".to_string();
    }

    let kilobytes = image.len().div_ceil(1024);

    format!("embedded JPEG, {kilobytes} KiB encoded")
}
