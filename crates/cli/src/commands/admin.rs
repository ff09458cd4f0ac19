//! Product management commands.
//!
//! All of these need a signed-in session; the backend decides whether the
//! account may actually change the catalog.

use elitecart_client::ApiClient;
use elitecart_core::{CATEGORIES, ProductFilter, ProductId, ProductInput, ProductUpdate};

use super::{CommandError, OrExplain};

/// Refuse to run admin commands without a session.
pub fn require_login(api: &ApiClient) -> Result<(), CommandError> {
    if api.session().is_authenticated() {
        Ok(())
    } else {
        Err(CommandError::new("Please log in to manage products"))
    }
}

/// List every product with its stock.
#[allow(clippy::print_stdout)]
pub async fn list(api: &ApiClient) -> Result<(), CommandError> {
    let list = api
        .list_products(&ProductFilter::default())
        .await
        .or_explain("Failed to load products")?;

    println!("{:<6} {:<32} {:>10} {:>6}  CATEGORY", "ID", "NAME", "PRICE", "STOCK");
    for product in &list.products {
        println!(
            "{:<6} {:<32} {:>10} {:>6}  {}",
            product.product_id,
            product.name,
            product.price.to_string(),
            product.stock,
            product.category
        );
    }
    Ok(())
}

/// Create a product.
#[allow(clippy::print_stdout)]
pub async fn create(api: &ApiClient, input: ProductInput) -> Result<(), CommandError> {
    if input.name.trim().is_empty() {
        return Err(CommandError::new("Product name is required"));
    }
    validate_category(&input.category)?;

    let created = api
        .create_product(&input)
        .await
        .or_explain("Failed to save product")?;

    match created.product_id {
        Some(id) => println!("Product created (#{id})"),
        None => println!("Product created"),
    }
    Ok(())
}

/// Update the given fields of a product.
#[allow(clippy::print_stdout)]
pub async fn update(
    api: &ApiClient,
    id: ProductId,
    update: ProductUpdate,
) -> Result<(), CommandError> {
    if update.is_empty() {
        return Err(CommandError::new("Nothing to update"));
    }
    if let Some(category) = &update.category {
        validate_category(category)?;
    }

    api.update_product(id, &update)
        .await
        .or_explain("Failed to save product")?;
    println!("Product #{id} updated");
    Ok(())
}

/// Delete a product.
#[allow(clippy::print_stdout)]
pub async fn delete(api: &ApiClient, id: ProductId) -> Result<(), CommandError> {
    api.delete_product(id)
        .await
        .or_explain("Failed to delete product")?;
    println!("Product #{id} deleted");
    Ok(())
}

fn validate_category(category: &str) -> Result<(), CommandError> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(CommandError::new(format!(
            "Unknown category '{category}'. Choose one of: {}",
            CATEGORIES.join(", ")
        )))
    }
}
