use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved identifier of the ledger's issuance account. Mining rewards are
/// credited from it; it never belongs to a real user.
pub const ISSUANCE_ACCOUNT: &str = "0";

/// Opaque account token as typed by the user. No format validation is done;
/// the empty string is a legal identifier like any other.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        AccountId(id.into())
    }

    pub fn issuance() -> Self {
        AccountId(ISSUANCE_ACCOUNT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_issuance(&self) -> bool {
        self.0 == ISSUANCE_ACCOUNT
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        AccountId(s.to_string())
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        AccountId(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issuance_account_is_literal_zero() {
        assert!(AccountId::issuance().is_issuance());
        assert!(AccountId::from("0").is_issuance());
        assert!(!AccountId::from("00").is_issuance());
        assert!(!AccountId::from("").is_issuance());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = AccountId::from("alice");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"alice\"");
    }
}
