use crate::errors::{WalletError, WalletResult};
use crate::models::*;
use crate::repository::WalletStore;
use crate::validation::parse_user_id;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;

/// Application state shared across handlers
///
/// The store is a trait object: PostgreSQL in production, a stand-in in tests.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WalletStore>,
}

impl AppState {
    pub fn new(store: impl WalletStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Turn any JSON extraction failure (syntax, missing field, unknown wallet
/// type, wrong content type) into a plain 400.
fn bind_body<T>(payload: Result<Json<T>, JsonRejection>) -> WalletResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| WalletError::InvalidRequest(rejection.body_text()))
}

/// Query string as raw pairs so a repeated `wallet_type` keeps its first value
/// instead of failing deserialization.
fn bind_query(
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> WalletResult<WalletQuery> {
    query
        .map(|Query(pairs)| WalletQuery::from_pairs(pairs))
        .map_err(|rejection| WalletError::InvalidRequest(rejection.body_text()))
}

/// `{id}` segment of the user routes; undecodable segments are invalid ids.
fn bind_user_id(path: Result<Path<String>, PathRejection>) -> WalletResult<i64> {
    let Path(raw) = path.map_err(|rejection| WalletError::InvalidUserId(rejection.body_text()))?;
    parse_user_id(&raw)
}

/// List all wallets, optionally filtered by type
#[utoipa::path(
    get,
    path = "/api/v1/wallets",
    params(WalletQuery),
    responses(
        (status = 200, description = "Wallets ordered by id", body = [Wallet]),
        (status = 400, description = "Undecodable query string", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "wallet"
)]
pub async fn list_wallets(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> WalletResult<Json<Vec<Wallet>>> {
    let query = bind_query(query)?;

    let Some(filter) = WalletFilter::from_query(&query, None) else {
        return Ok(Json(Vec::new()));
    };

    let wallets = state.store.list(&filter).await?;

    Ok(Json(wallets))
}

/// List the wallets of one user, optionally filtered by type
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/wallets",
    params(
        ("id" = i64, Path, description = "User ID"),
        WalletQuery
    ),
    responses(
        (status = 200, description = "Wallets ordered by id", body = [Wallet]),
        (status = 400, description = "Missing or non-numeric user id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "wallet"
)]
pub async fn list_user_wallets(
    State(state): State<AppState>,
    raw_user_id: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> WalletResult<Json<Vec<Wallet>>> {
    let user_id = bind_user_id(raw_user_id)?;
    let query = bind_query(query)?;

    let Some(filter) = WalletFilter::from_query(&query, Some(user_id)) else {
        return Ok(Json(Vec::new()));
    };

    let wallets = state.store.list(&filter).await?;

    Ok(Json(wallets))
}

/// Create a wallet
#[utoipa::path(
    post,
    path = "/api/v1/wallets",
    request_body = NewWallet,
    responses(
        (status = 201, description = "Wallet created", body = Wallet),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "wallet"
)]
pub async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<NewWallet>, JsonRejection>,
) -> WalletResult<(StatusCode, Json<Wallet>)> {
    let new_wallet = bind_body(payload)?;
    tracing::info!(user_id = new_wallet.user_id, wallet_type = %new_wallet.wallet_type, "Creating wallet");

    let wallet = state.store.create(&new_wallet).await?;

    tracing::info!(wallet_id = wallet.id, user_id = wallet.user_id, "Wallet created");

    Ok((StatusCode::CREATED, Json(wallet)))
}

/// Update a wallet's balance
#[utoipa::path(
    put,
    path = "/api/v1/wallets",
    request_body = BalanceUpdate,
    responses(
        (status = 200, description = "Persisted wallet after the update", body = Wallet),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 500, description = "Storage failure, including unknown id", body = ErrorBody)
    ),
    tag = "wallet"
)]
pub async fn update_wallet(
    State(state): State<AppState>,
    payload: Result<Json<BalanceUpdate>, JsonRejection>,
) -> WalletResult<Json<Wallet>> {
    let update = bind_body(payload)?;
    tracing::info!(wallet_id = update.id, balance = %update.balance, "Updating wallet balance");

    let wallet = state.store.update_balance(&update).await?;

    Ok(Json(wallet))
}

/// Delete every wallet owned by a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/wallets",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Wallets deleted (possibly none)"),
        (status = 400, description = "Missing or non-numeric user id", body = ErrorBody),
        (status = 500, description = "Storage failure", body = ErrorBody)
    ),
    tag = "wallet"
)]
pub async fn delete_user_wallets(
    State(state): State<AppState>,
    raw_user_id: Result<Path<String>, PathRejection>,
) -> WalletResult<StatusCode> {
    let user_id = bind_user_id(raw_user_id)?;
    tracing::info!(user_id, "Deleting user wallets");

    state.store.delete_by_user(user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}
