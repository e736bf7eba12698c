//! Domain module - product record and identifier types
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod constants;
pub mod product;
pub mod product_url;

pub use product::{Characteristics, ProductRecord};
pub use product_url::Sku;
