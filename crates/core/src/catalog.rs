//! Field rules for categories and products, plus stock valuation.
//!
//! Handlers normalise request fields through these functions before they
//! reach the repositories. The database carries matching CHECK constraints.

use rust_decimal::Decimal;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Maximum length of a product name, in characters.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a category description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Decimal places stored for unit prices (`NUMERIC(12,2)`).
pub const PRICE_SCALE: u32 = 2;

/// Exclusive upper bound for unit prices (ten integer digits).
pub const MAX_UNIT_PRICE: Decimal = Decimal::from_parts(1_410_065_408, 2, 0, false, 0);

// ---------------------------------------------------------------------------
// Names and descriptions
// ---------------------------------------------------------------------------

/// Trim a display name and check it is non-empty and within `max_len`.
///
/// `field` names the field in the error message (e.g. `"Category name"`).
pub fn normalize_name(raw: &str, field: &str, max_len: usize) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    let len = name.chars().count();
    if len > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters, got {len}"
        )));
    }
    Ok(name.to_string())
}

/// Normalise an optional description: blank text becomes `None`.
pub fn normalize_description(raw: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    let len = text.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must be at most {MAX_DESCRIPTION_LEN} characters, got {len}"
        )));
    }
    Ok(Some(text.to_string()))
}

// ---------------------------------------------------------------------------
// Quantities and prices
// ---------------------------------------------------------------------------

/// Validate that a stored quantity is non-negative.
pub fn validate_quantity(quantity: i64) -> Result<(), CoreError> {
    if quantity < 0 {
        return Err(CoreError::Validation(format!(
            "Quantity must be >= 0, got {quantity}"
        )));
    }
    Ok(())
}

/// Validate a unit price and rescale it to [`PRICE_SCALE`] decimal places.
///
/// Rejects negative prices, prices with more than two significant decimal
/// places and prices at or above [`MAX_UNIT_PRICE`].
pub fn normalize_unit_price(price: Decimal) -> Result<Decimal, CoreError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(CoreError::Validation(format!(
            "Unit price must be >= 0, got {price}"
        )));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(CoreError::Validation(format!(
            "Unit price must have at most {PRICE_SCALE} decimal places, got {price}"
        )));
    }
    if price >= MAX_UNIT_PRICE {
        return Err(CoreError::Validation(format!(
            "Unit price must be below {MAX_UNIT_PRICE}, got {price}"
        )));
    }
    Ok(to_price_scale(price.abs()))
}

/// Rescale a money amount to [`PRICE_SCALE`] decimal places.
///
/// PostgreSQL returns a `NUMERIC(12,2)` zero without its scale, so stored
/// and computed amounts pass through here before they are serialised.
pub fn to_price_scale(amount: Decimal) -> Decimal {
    let mut rescaled = amount;
    rescaled.rescale(PRICE_SCALE);
    rescaled
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

/// Stock value of one product line: `quantity * unit_price`.
pub fn line_value(quantity: i64, unit_price: Decimal) -> Result<Decimal, CoreError> {
    Decimal::from(quantity)
        .checked_mul(unit_price)
        .map(to_price_scale)
        .ok_or_else(|| {
            CoreError::Internal(format!(
                "Line value overflow for {quantity} x {unit_price}"
            ))
        })
}

/// Sum line values, failing on overflow.
pub fn total_value<I>(values: I) -> Result<Decimal, CoreError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| {
            acc.checked_add(v)
                .ok_or_else(|| CoreError::Internal("Stock valuation total overflow".into()))
        })
        .map(to_price_scale)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
