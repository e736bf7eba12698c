//! Application layer module
//!
//! Use cases composing the infrastructure pieces into the product page
//! pipeline.

pub mod parsing_service;

pub use parsing_service::ParsingService;
