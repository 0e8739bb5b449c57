//! # Infrastructure Layer
//!
//! Host-facing helpers used by the search engine. Nothing in here knows
//! about histories or specifications.
//!
//! ## Module Organization
//!
//! - `memory`: process memory sampling reported alongside check results

pub mod memory;
