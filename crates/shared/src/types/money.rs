//! Monetary amount formatting.
//!
//! Amounts travel as decimal strings with exactly two fractional digits
//! (`"5000000.00"`). Use as `#[serde(with = "bukubesar_shared::types::money")]`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serializer};

/// Number of fractional digits carried by every stored amount.
pub const SCALE: u32 = 2;

/// Rounds to two places (half away from zero) and renders with both digits.
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00".to_string();
    }
    format!("{rounded:.2}")
}

/// Serializes an amount as a two-digit decimal string.
pub fn serialize<S>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_amount(*amount))
}

/// Accepts either a JSON string or a JSON number.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    <Decimal as Deserialize>::deserialize(deserializer)
}
