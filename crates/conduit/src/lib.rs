//! Client for the AI tool-execution service.
//!
//! See [`ConduitClient`].

#![warn(missing_docs)]

pub mod client;

pub use client::{
    memory_key, ConduitClient, DEFAULT_MEMORY_CATEGORY, DEFAULT_TIMEOUT, FORTUNE_UNAVAILABLE,
    NO_FORTUNE,
};
