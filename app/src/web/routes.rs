// app/src/web/routes.rs

use actix_web::dev::Service;
use actix_web::web;

use crate::web::extractors::attach_new_session_cookie;
use crate::web::handlers::{order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .route("/health", web::get().to(health_check_handler))
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
    )
    .service(
      web::scope("/order")
        .wrap_fn(|req, srv| {
          let fut = srv.call(req);
          async move {
            let mut res = fut.await?;
            attach_new_session_cookie(&mut res);
            Ok(res)
          }
        })
        .route("/create", web::get().to(order_handlers::create_handler))
        .route("/items", web::post().to(order_handlers::add_item_handler))
        .route("/cart", web::get().to(order_handlers::cart_handler))
        .route("/place", web::post().to(order_handlers::place_order_handler))
        .route("/history", web::get().to(order_handlers::history_handler)),
    );
}
