//! Shared domain types and pure reservation rules.
//!
//! This crate is deliberately dependency-light: type aliases, the domain
//! error, and the pure predicates the reservation coordinator is built on.
//! Nothing here touches the database or the network.

pub mod error;
pub mod reservation;
pub mod types;
