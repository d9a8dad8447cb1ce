use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::iter::Sum;
use std::ops::{Add, Sub, Neg};
use std::fmt;
use crate::types::amount::{decimal_from_number, serialize_decimal, Amount};

/// Signed balance in base units, the result of replaying a ledger for one account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Balance(Decimal);

impl Balance {
    pub fn new(value: Decimal) -> Self {
        Balance(value)
    }

    pub fn from_i64(value: i64) -> Self {
        Balance(Decimal::from(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn zero() -> Self {
        Balance(Decimal::ZERO)
    }

    /// Credit an amount. Saturates at the decimal bounds.
    pub fn credit(self, amount: Amount) -> Self {
        Balance(self.0.saturating_add(amount.value()))
    }

    /// Debit an amount. Saturates at the decimal bounds.
    pub fn debit(self, amount: Amount) -> Self {
        Balance(self.0.saturating_sub(amount.value()))
    }
}

impl Add for Balance {
    type Output = Balance;
    fn add(self, other: Balance) -> Balance {
        Balance(self.0.saturating_add(other.0))
    }
}

impl Sub for Balance {
    type Output = Balance;
    fn sub(self, other: Balance) -> Balance {
        Balance(self.0.saturating_sub(other.0))
    }
}

impl Neg for Balance {
    type Output = Balance;
    fn neg(self) -> Balance {
        Balance(-self.0)
    }
}

impl Sum for Balance {
    fn sum<I: Iterator<Item = Balance>>(iter: I) -> Balance {
        iter.fold(Balance::zero(), |acc, b| acc + b)
    }
}

impl From<Amount> for Balance {
    fn from(amount: Amount) -> Self {
        Balance(amount.value())
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl Serialize for Balance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_decimal(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        decimal_from_number(&number).map(Balance).map_err(de::Error::custom)
    }
}
