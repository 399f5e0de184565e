use crate::errors::WalletResult;
use crate::models::{BalanceUpdate, NewWallet, Wallet, WalletFilter};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const WALLET_COLUMNS: &str = "id, user_id, user_name, wallet_name, wallet_type, balance, created_at";

/// Storage contract the handlers depend on
///
/// Handlers only see this trait, so tests can hand them an in-memory store
/// instead of PostgreSQL.
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Wallets matching `filter`, ordered by id ascending. Empty when nothing matches.
    async fn list(&self, filter: &WalletFilter) -> WalletResult<Vec<Wallet>>;

    /// Insert a wallet and return the persisted row (id and created_at filled in).
    async fn create(&self, wallet: &NewWallet) -> WalletResult<Wallet>;

    /// Overwrite the balance of wallet `update.id` and return the persisted row.
    async fn update_balance(&self, update: &BalanceUpdate) -> WalletResult<Wallet>;

    /// Remove every wallet owned by `user_id`. Zero rows is not an error.
    async fn delete_by_user(&self, user_id: i64) -> WalletResult<()>;
}

/// PostgreSQL-backed wallet store over the `user_wallet` table
///
/// Every operation is one statement; writes return the stored row with `RETURNING`.
#[derive(Clone)]
pub struct WalletRepository {
    pool: PgPool,
}

impl WalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// SELECT for `filter`; each present field adds one equality predicate.
pub(crate) fn select_with_filter(filter: &WalletFilter) -> QueryBuilder<'static, Postgres> {
    let mut query: QueryBuilder<'static, Postgres> =
        QueryBuilder::new(format!("SELECT {WALLET_COLUMNS} FROM user_wallet"));

    let mut separator = " WHERE ";

    if let Some(wallet_type) = filter.wallet_type {
        query.push(separator).push("wallet_type = ");
        query.push_bind(wallet_type.as_str());
        separator = " AND ";
    }

    if let Some(user_id) = filter.user_id {
        query.push(separator).push("user_id = ");
        query.push_bind(user_id);
    }

    query.push(" ORDER BY id ASC");
    query
}

#[async_trait]
impl WalletStore for WalletRepository {
    async fn list(&self, filter: &WalletFilter) -> WalletResult<Vec<Wallet>> {
        let mut query = select_with_filter(filter);
        tracing::debug!(sql = %query.sql(), ?filter, "Listing wallets");

        let wallets = query
            .build_query_as::<Wallet>()
            .fetch_all(&self.pool)
            .await?;

        Ok(wallets)
    }

    /// Single statement: the INSERT hands back the whole row, so there is
    /// no separate read that a concurrent delete could race with.
    async fn create(&self, wallet: &NewWallet) -> WalletResult<Wallet> {
        tracing::debug!(user_id = wallet.user_id, "Inserting wallet");

        let created = sqlx::query_as::<_, Wallet>(&format!(
            r#"
            INSERT INTO user_wallet (user_id, user_name, wallet_name, wallet_type, balance)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {WALLET_COLUMNS}
            "#
        ))
        .bind(wallet.user_id)
        .bind(&wallet.user_name)
        .bind(&wallet.wallet_name)
        .bind(wallet.wallet_type.as_str())
        .bind(wallet.balance)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Unknown id surfaces as `sqlx::Error::RowNotFound`.
    async fn update_balance(&self, update: &BalanceUpdate) -> WalletResult<Wallet> {
        tracing::debug!(wallet_id = update.id, balance = %update.balance, "Updating balance");

        let updated = sqlx::query_as::<_, Wallet>(&format!(
            r#"
            UPDATE user_wallet
            SET balance = $1
            WHERE id = $2
            RETURNING {WALLET_COLUMNS}
            "#
        ))
        .bind(update.balance)
        .bind(update.id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_by_user(&self, user_id: i64) -> WalletResult<()> {
        let rows_affected = sqlx::query("DELETE FROM user_wallet WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!(user_id, rows_affected, "Deleted user wallets");
        Ok(())
    }
}
