//! Forgeform - declarative configuration for source forges
//!
//! Forgeform describes the desired state of forge-hosted resources (a
//! repository, its default branch, branch protection, issue labels) as typed
//! records in a TOML manifest, resolves the dependency graph between them
//! into a deterministic apply order, and reconciles the difference against
//! the actual remote state through a provider API client.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Assemble → Link → Scan → Plan → Execute → Verify
//! - [`core`] - Domain types, manifest schema, descriptors, dependency graph
//! - [`forge`] - Abstraction for remote forges (GitHub v1)
//! - [`ui`] - Output utilities
//!
//! # Correctness Invariants
//!
//! Forgeform maintains the following invariants:
//!
//! 1. Invalid attribute values are unrepresentable in descriptors
//! 2. Plans are generated only from acyclic, topologically ordered configurations
//! 3. All remote mutations flow through a single executor
//! 4. Assembly, linking, and planning are pure; no network call happens
//!    before the full configuration has validated

pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod ui;
