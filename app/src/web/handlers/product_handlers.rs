// app/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = app_state.products.list_products().await?;
  info!("Fetched {} products.", products.len());

  Ok(HttpResponse::Ok().json(json!({
      "message": "Products fetched successfully.",
      "products": products
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.products.find_product(product_id).await? {
    Some(product) => {
      let category = app_state
        .products
        .list_categories()
        .await?
        .into_iter()
        .find(|c| c.id == product.category_id);
      let ingredients: Vec<_> = app_state
        .products
        .list_ingredients()
        .await?
        .into_iter()
        .filter(|i| product.ingredient_ids.contains(&i.id))
        .collect();

      Ok(HttpResponse::Ok().json(json!({
          "message": "Product fetched successfully.",
          "product": product,
          "category": category,
          "ingredients": ingredients
      })))
    }
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
    }
  }
}
