//! Tavola Cart - the client-resident cart store.
//!
//! The cart lives entirely on the browsing side: an ordered collection of
//! (menu item snapshot, quantity) pairs that survives page reloads through a
//! fixed-namespace key-value slot. Prices carried here are advisory
//! snapshots - the server re-validates availability and total consistency at
//! checkout.
//!
//! # Modules
//!
//! - [`store`] - [`CartStore`] and its mutation/read operations
//! - [`storage`] - the [`CartStorage`] persistence seam and its backends
//! - [`checkout`] - building the checkout submission payload

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod storage;
pub mod store;

pub use checkout::{CheckoutError, CheckoutItem, CheckoutRequest, CustomerDetails};
pub use storage::{CartStorage, JsonFileStorage, MemoryStorage, StorageError};
pub use store::{CartLine, CartStore, MenuItemSnapshot};
