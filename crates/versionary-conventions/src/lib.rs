//! # Versionary Conventions
//!
//! Convention builders that declare which API versions controllers and their
//! actions support, and the resolver that turns those declarations into one
//! immutable [`VersionProfile`](versionary_core::VersionProfile) per action.
//!
//! Resolution rules:
//!
//! - an action or controller marked version-neutral yields a neutral profile
//! - each version category declared on the action replaces the controller's
//!   versions for that category; undeclared categories are inherited
//! - mapped versions are always the action's own
//!
//! This crate is not meant to be used directly. Use `versionary` instead.

mod action;
mod attributes;
mod builder;
pub mod config;
mod controller;
mod registry;
mod resolver;

// Public API
pub use action::{ActionConventionBuilder, ActionConventions};
pub use attributes::VersionAttribute;
pub use builder::{ApiVersionConventionBuilder, Declarations};
pub use config::{ConfigError, ConventionOptions, ConventionsConfig};
pub use controller::ControllerConventionBuilder;
pub use registry::{ApiVersionConventions, ControllerProfiles, VersionProfiles};
pub use resolver::ProfileResolver;
