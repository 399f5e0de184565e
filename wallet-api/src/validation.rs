use crate::errors::{WalletError, WalletResult};
use crate::models::{WalletFilter, WalletQuery, WalletType};

/// True iff `wallet_type` names one of the allowed categories. Empty is invalid.
pub fn is_wallet_type_valid(wallet_type: &str) -> bool {
    wallet_type.parse::<WalletType>().is_ok()
}

/// Parse the `{id}` path segment of the user routes.
pub fn parse_user_id(raw: &str) -> WalletResult<i64> {
    if raw.is_empty() {
        return Err(WalletError::UserIdRequired);
    }

    raw.parse::<i64>()
        .map_err(|_| WalletError::InvalidUserId(raw.to_string()))
}

impl WalletQuery {
    /// Keep the first `wallet_type` of the query string; later repeats and
    /// unrelated keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> WalletQuery {
        let wallet_type = pairs
            .into_iter()
            .find(|(key, _)| key == "wallet_type")
            .map(|(_, value)| value);

        WalletQuery { wallet_type }
    }
}

impl WalletFilter {
    /// Build a filter from the list query string.
    ///
    /// Returns `None` when `wallet_type` is present but not an allowed type:
    /// the caller answers with an empty list and never touches storage.
    pub fn from_query(query: &WalletQuery, user_id: Option<i64>) -> Option<WalletFilter> {
        let wallet_type = match query.wallet_type.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                if !is_wallet_type_valid(raw) {
                    tracing::debug!(wallet_type = %raw, "Unknown wallet type filter, skipping query");
                    return None;
                }
                raw.parse().ok()
            }
        };

        Some(WalletFilter {
            wallet_type,
            user_id,
        })
    }
}
