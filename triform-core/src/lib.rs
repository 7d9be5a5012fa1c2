//! Core models shared by the triform crates.
//!
//! Reads arrive here already parsed: a [`models::ReadSet`] holds the aligned
//! read intervals of one sample and [`models::ChromSizes`] describes the
//! genome they were aligned against. All coordinates are zero-based and
//! half-open (`[start, end)`).

pub mod errors;
pub mod models;
pub mod utils;

pub use errors::ValidationError;
