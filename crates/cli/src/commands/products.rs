//! Catalog browsing.

use std::fmt::Write as _;

use elitecart_client::ApiClient;
use elitecart_core::{Product, ProductFilter, ProductId};

use super::{CommandError, OrExplain};

/// List products matching a filter.
#[allow(clippy::print_stdout)]
pub async fn list(api: &ApiClient, filter: &ProductFilter) -> Result<(), CommandError> {
    let list = api
        .list_products(filter)
        .await
        .or_explain("Failed to load products")?;

    if list.products.is_empty() {
        println!("No products found");
        return Ok(());
    }
    for product in &list.products {
        println!("{}", render_row(product));
    }
    Ok(())
}

/// Show one product.
#[allow(clippy::print_stdout)]
pub async fn show(api: &ApiClient, id: ProductId) -> Result<(), CommandError> {
    let product = api
        .get_product(id)
        .await
        .or_explain("Failed to load product")?;
    println!("{}", render_detail(&product));
    Ok(())
}

pub fn stock_label(product: &Product) -> String {
    if product.in_stock() {
        format!("{} in stock", product.stock)
    } else {
        "Out of Stock".to_string()
    }
}

fn render_row(product: &Product) -> String {
    format!(
        "#{:<5} {:<32} {:>10}  {:<7} {}",
        product.product_id,
        product.name,
        product.price.to_string(),
        product.category,
        stock_label(product)
    )
}

fn render_detail(product: &Product) -> String {
    let mut out = format!("{} (#{})\n", product.name, product.product_id);
    let _ = writeln!(out, "Price:    {}", product.price);
    let _ = writeln!(out, "Category: {}", product.category);
    let _ = writeln!(out, "Stock:    {}", stock_label(product));
    if !product.image_url.is_empty() {
        let _ = writeln!(out, "Image:    {}", product.image_url);
    }
    if !product.description.is_empty() {
        let _ = write!(out, "\n{}", product.description);
    }
    out.trim_end().to_string()
}
