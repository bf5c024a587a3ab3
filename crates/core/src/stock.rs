//! Stock issue: withdrawing a quantity from a product.
//!
//! [`plan_issue`] decides which single write a stock issue performs. It is
//! evaluated against the quantity read under a row lock, so the range check
//! holds even when two issues race for the same product.

use crate::error::CoreError;

/// The one write a stock issue performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockWrite {
    /// Persist the new quantity; the product record stays.
    SetQuantity(i64),
    /// Remove the product record.
    DeleteProduct,
}

/// Decide the write for withdrawing `requested` units from `current`.
///
/// Requires `1 <= requested <= current`. When the withdrawal empties the
/// product, `delete_when_empty` selects between deleting the record and
/// keeping it at quantity zero.
pub fn plan_issue(
    current: i64,
    requested: i64,
    delete_when_empty: bool,
) -> Result<StockWrite, CoreError> {
    if current < 0 {
        return Err(CoreError::Internal(format!(
            "Stored quantity is negative ({current})"
        )));
    }
    if requested < 1 {
        return Err(CoreError::Validation(format!(
            "Issued quantity must be at least 1, got {requested}"
        )));
    }
    if requested > current {
        return Err(CoreError::Validation(format!(
            "Cannot issue {requested} units, only {current} in stock"
        )));
    }

    let remaining = current - requested;
    if remaining == 0 && delete_when_empty {
        Ok(StockWrite::DeleteProduct)
    } else {
        Ok(StockWrite::SetQuantity(remaining))
    }
}
