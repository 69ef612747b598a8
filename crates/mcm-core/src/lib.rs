//! # mcm-core
//!
//! Evidence engine, gauge transform, and search algorithms for Minimally
//! Complex Models (MCMs): partitions of a set of categorical variables into
//! Independent Complete Components (ICCs) that maximize a Dirichlet-multinomial
//! log-marginal-likelihood.
//!
//! This crate has no I/O surface of its own: [`Dataset::from_rows`] takes
//! already-parsed observation rows, and every search entry point on
//! [`Model`] returns its result in memory. Reading dataset files, writing
//! output files, and the command-line surface live in `mcm-cli`.

#![deny(unsafe_code)]

pub mod bitpack;
pub mod dataset;
pub mod error;
pub mod evidence;
pub mod gauge;
pub mod model;
pub mod partition;
pub mod search;
pub mod spin;

pub use dataset::Dataset;
pub use error::{McmError, Result};
pub use model::Model;
pub use partition::Partition;
