//! Query modules for the card market SDK.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes methods returning
//! `Result<T>` with typed payloads.

pub mod sales;

pub use sales::{SalesFilter, SalesQuery};
