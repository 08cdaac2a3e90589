//! # scaffold-std
//!
//! Standard collaborators for the scaffold request pipeline.
//!
//! This crate provides:
//! - **Buffered transport**: [`BufferedResponse`], an in-memory response channel
//! - **Time limits**: [`timeout::Timeout`] stage wrapper (feature `timeout`)
//! - **Testing utilities**: recording transports and counting stages

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use scaffold_core;

// Modules
mod buffered;
pub mod testing;
#[cfg(feature = "timeout")]
pub mod timeout;

pub use buffered::BufferedResponse;
