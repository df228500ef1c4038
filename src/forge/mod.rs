//! forge
//!
//! Abstraction for remote forges (GitHub v1).
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for reading and mutating
//! declared resources on a remote hosting service. Commands use the
//! [`create_forge`] factory function rather than importing specific forge
//! implementations directly.
//!
//! Forge operations are invoked only after the full configuration has
//! validated and linked; a forge failure aborts the apply but cannot
//! corrupt anything locally, because this layer keeps no local state.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Forge selection and creation

mod factory;
pub mod github;
pub mod mock;
mod traits;

pub use factory::{create_forge, valid_forge_names, ForgeProvider};
pub use traits::*;
