// Copyright (c) 2024-present, Andrew Werner
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Construction-time validation errors.
//!
//! Absence of a key is never an error anywhere in this crate; lookups
//! and deletions report misses through `Option` and `bool`. The only
//! fallible surface is [`SkipList::with_config`](crate::SkipList::with_config),
//! which rejects invalid parameters up front instead of deferring the
//! failure to first use.

use thiserror::Error;

/// Result alias used by the fallible constructors in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected construction parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The level ceiling must leave room for at least one level.
    #[error("max level must be greater than zero, got {0}")]
    InvalidMaxLevel(usize),

    /// The promotion probability must lie strictly between zero and one.
    #[error("promotion probability must lie in (0, 1), got {0}")]
    InvalidProbability(f64),
}
