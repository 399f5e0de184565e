use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

/// Wallet entity - one row of `user_wallet`
///
/// Key design decisions:
/// - `id` and `created_at` are assigned by the database, never by the client
/// - `balance` is Decimal (never f64!) but travels as a JSON number
/// - `wallet_type` is decoded from text so the column can be VARCHAR or TEXT
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Wallet {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub wallet_name: String,
    #[sqlx(try_from = "String")]
    pub wallet_type: WalletType,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// The closed set of wallet categories accepted by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum WalletType {
    #[serde(rename = "Savings")]
    Savings,

    #[serde(rename = "Credit Card")]
    CreditCard,

    #[serde(rename = "Crypto Wallet")]
    CryptoWallet,
}

impl WalletType {
    pub const ALL: [WalletType; 3] = [
        WalletType::Savings,
        WalletType::CreditCard,
        WalletType::CryptoWallet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Savings => "Savings",
            WalletType::CreditCard => "Credit Card",
            WalletType::CryptoWallet => "Crypto Wallet",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown wallet type: {0:?}")]
pub struct UnknownWalletType(pub String);

impl FromStr for WalletType {
    type Err = UnknownWalletType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownWalletType(s.to_string()))
    }
}

impl TryFrom<String> for WalletType {
    type Error = UnknownWalletType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// === API Request Models ===

/// Request body for creating a wallet
///
/// Wallet-shaped, but `id` and `created_at` are not part of it:
/// serde drops them if a client sends them anyway.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewWallet {
    pub user_id: i64,
    pub user_name: String,
    pub wallet_name: String,
    pub wallet_type: WalletType,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance: Decimal,
}

/// Request body for updating a wallet - only the balance is writable
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BalanceUpdate {
    pub id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub balance: Decimal,
}

/// `?wallet_type=` query string shared by both list routes
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WalletQuery {
    /// Filter by wallet type
    pub wallet_type: Option<String>,
}

/// Selects a subset of wallets. `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletFilter {
    pub wallet_type: Option<WalletType>,
    pub user_id: Option<i64>,
}

/// Error body returned on every 4xx/5xx
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn wallet_type_uses_display_names() {
        assert_eq!("Credit Card".parse::<WalletType>(), Ok(WalletType::CreditCard));
        assert_eq!(WalletType::CryptoWallet.to_string(), "Crypto Wallet");
        assert!("credit card".parse::<WalletType>().is_err());
        assert!("".parse::<WalletType>().is_err());
    }

    #[test]
    fn wallet_serializes_balance_as_number() {
        let wallet = Wallet {
            id: 7,
            user_id: 1,
            user_name: "u1".to_string(),
            wallet_name: "main".to_string(),
            wallet_type: WalletType::Savings,
            balance: dec!(100.5),
            created_at: "2024-03-01T10:00:00Z".parse().unwrap(),
        };

        let json = serde_json::to_value(&wallet).unwrap();
        assert_eq!(json["balance"], serde_json::json!(100.5));
        assert_eq!(json["wallet_type"], "Savings");
        assert_eq!(json["created_at"], "2024-03-01T10:00:00Z");
    }

    #[test]
    fn new_wallet_ignores_client_id() {
        let body = r#"{"id":99,"user_id":1,"user_name":"u1","wallet_name":"main",
            "wallet_type":"Savings","balance":100,"created_at":"2020-01-01T00:00:00Z"}"#;
        let new: NewWallet = serde_json::from_str(body).unwrap();
        assert_eq!(new.user_id, 1);
        assert_eq!(new.balance, dec!(100));
    }

    #[test]
    fn new_wallet_rejects_unknown_type() {
        let body = r#"{"user_id":1,"user_name":"u1","wallet_name":"main",
            "wallet_type":"Checking","balance":100}"#;
        assert!(serde_json::from_str::<NewWallet>(body).is_err());
    }
}
