//! # Versionary Core
//!
//! Value types shared by the version convention engine: [`ApiVersion`],
//! controller/action identities, the resolved [`VersionProfile`] and the
//! error taxonomy.
//!
//! This crate is not meant to be used directly. Use `versionary` instead.

mod error;
mod identity;
mod profile;
#[doc(hidden)]
pub mod tracing_macros;
mod version;

// Public API
pub use error::{ConventionError, Result};
pub use identity::{ActionId, ControllerId};
pub use profile::{DeclaredVersions, VersionProfile};
pub use version::{ApiVersion, IntoApiVersion, VersionParseError};
