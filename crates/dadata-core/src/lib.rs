//! dadata-core: error taxonomy and upstream wire shapes.
//!
//! This crate defines the contracts shared by the exporter: what the Dadata
//! profile API returns and how failures talking to it are classified. It
//! carries no HTTP or runtime dependencies so it can be reused by other
//! clients and tooling.
//!
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `DadataError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod api;
pub mod error;

pub use error::{DadataError, ErrorKind, Result};
