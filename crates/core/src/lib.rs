//! Domain logic for the stockroom inventory service.
//!
//! Everything here is pure: no database, no HTTP. The `db` and `api` crates
//! call into these modules for validation and for the stock issue decision.

pub mod catalog;
pub mod error;
pub mod stock;
pub mod types;
