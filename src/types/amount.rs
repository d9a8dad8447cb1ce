use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Transfer quantity in the ledger's base unit.
///
/// The node stores whatever number the sender posted, so fractional and
/// negative values are carried through unchanged. On the wire an amount is a
/// JSON number; strings and `null` are rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Amount(value)
    }

    pub fn from_i64(value: i64) -> Self {
        Amount(Decimal::from(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl std::str::FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str_exact(s.trim()).map(Amount)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_decimal(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        Amount::try_from(&number).map_err(de::Error::custom)
    }
}

impl TryFrom<&serde_json::Number> for Amount {
    type Error = String;

    fn try_from(number: &serde_json::Number) -> Result<Self, Self::Error> {
        decimal_from_number(number).map(Amount)
    }
}

/// Write a decimal as a JSON number: an integer when it has no fractional
/// part, a float otherwise. The node sums amounts numerically, never as text.
pub(crate) fn serialize_decimal<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract().is_zero() {
        if let Some(v) = value.to_i64() {
            return serializer.serialize_i64(v);
        }
    }
    match value.to_f64() {
        Some(v) => serializer.serialize_f64(v),
        None => Err(serde::ser::Error::custom(format!("{} has no float form", value))),
    }
}

pub(crate) fn decimal_from_number(number: &serde_json::Number) -> Result<Decimal, String> {
    if let Some(v) = number.as_i64() {
        return Ok(Decimal::from(v));
    }
    if let Some(v) = number.as_u64() {
        return Ok(Decimal::from(v));
    }
    number
        .as_f64()
        .and_then(Decimal::from_f64)
        .ok_or_else(|| format!("amount {} out of range", number))
}
