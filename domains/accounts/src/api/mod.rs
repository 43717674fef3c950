//! API layer for the accounts domain
//!
//! Contains HTTP handlers, routes, and the account-aware extractors
//! other domains build their authorization on.

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{CurrentAccount, MaybeAccount};
pub use routes::routes;
