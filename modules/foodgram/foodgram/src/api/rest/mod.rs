//! REST surface of the foodgram module, mounted under `/api`.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod openapi;
pub mod pagination;
pub mod problem;
pub mod routes;
