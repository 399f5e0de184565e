use crate::handlers::{self, AppState};
use crate::models::{BalanceUpdate, ErrorBody, NewWallet, Wallet, WalletType};
use axum::{
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Wallet API", version = "1.0", description = "Wallet API"),
    paths(
        handlers::list_wallets,
        handlers::list_user_wallets,
        handlers::create_wallet,
        handlers::update_wallet,
        handlers::delete_user_wallets,
    ),
    components(schemas(Wallet, WalletType, NewWallet, BalanceUpdate, ErrorBody)),
    tags((name = "wallet", description = "Wallet management"))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full router: `/api/v1` wallet routes, health check and the OpenAPI document.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/wallets",
            get(handlers::list_wallets)
                .post(handlers::create_wallet)
                .put(handlers::update_wallet),
        )
        .route(
            "/users/:id/wallets",
            get(handlers::list_user_wallets).delete(handlers::delete_user_wallets),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Request/response logging
}
