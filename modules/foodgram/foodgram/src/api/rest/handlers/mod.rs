//! REST handlers.
//!
//! Handlers are thin: parse input, call the domain service, map the result
//! to a DTO. Domain errors become Problem responses through `?`.

pub mod catalog;
pub mod recipes;
pub mod shopping;
pub mod users;
