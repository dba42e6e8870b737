//! Core types for Tavola.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{CartTotals, format_price, round_for_display};
pub use status::OrderStatus;
