//! Route definitions for the glass stock API

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes
        .nest("/materials", material_routes(state.clone()))
        .nest("/products", product_routes(state.clone()))
        .nest("/suppliers", supplier_routes(state.clone()))
        .nest("/purchases", purchase_routes(state.clone()))
        .nest("/kardex", kardex_routes(state.clone()))
        .nest("/inventory", inventory_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
}

/// Material routes (protected)
fn material_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_materials).post(handlers::create_material))
        .route("/:id", get(handlers::get_material).put(handlers::update_material))
        .route("/:id/add", post(handlers::add_material_stock))
        .route("/:id/remove", post(handlers::remove_material_stock))
        .route("/:id/suppliers", get(handlers::material_suppliers))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/:id", get(handlers::get_product).put(handlers::update_product))
        .route("/:id/add", post(handlers::add_product_stock))
        .route("/:id/remove", post(handlers::remove_product_stock))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Supplier routes (protected)
fn supplier_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_suppliers).post(handlers::create_supplier))
        .route("/by-material/:material_id", get(handlers::suppliers_by_material))
        .route(
            "/:id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Purchase order routes (protected)
fn purchase_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/orders", get(handlers::list_orders).post(handlers::create_order))
        .route("/orders/:id/complete", put(handlers::complete_order))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Kardex routes (protected)
fn kardex_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_kardex).post(handlers::create_kardex_entry))
        .route("/material/:id", get(handlers::material_kardex))
        .route("/product/:id", get(handlers::product_kardex))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory alert routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/alerts/materials", get(handlers::material_alerts))
        .route("/alerts/products", get(handlers::product_alerts))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
