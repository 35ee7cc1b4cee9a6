//! # Versionary
//!
//! Declare which API versions your controllers and actions support, and get
//! one consistent, immutable version profile per action for your dispatch
//! layer.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use versionary::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut conventions = ApiVersionConventions::new();
//!
//!     conventions
//!         .controller("orders")
//!         .declare_supported("1.0")?
//!         .declare_supported("2.0")?
//!         .action("put(id)")
//!         .map_to_version("2.0")?;
//!
//!     conventions
//!         .controller("orders")
//!         .action("delete(id)")
//!         .mark_version_neutral();
//!
//!     let profiles = conventions.build();
//!     let put = profiles.profile("orders", "put(id)")?;
//!     assert!(put.accepts(&ApiVersion::new(2, 0)));
//!     assert!(!put.accepts(&ApiVersion::new(1, 0)));
//!     Ok(())
//! }
//! ```
//!
//! ## Resolution
//!
//! - **Neutral wins**: a version-neutral controller or action accepts any version
//! - **Override, not union**: an action that declares versions for a category
//!   replaces the controller's versions for that category
//! - **Inheritance**: categories the action leaves alone come from the controller
//! - **Mapping is per action**: controllers never carry mapped versions
//!
//! ## Optional Features
//!
//! - `tracing` (default) - debug/info logging of registration and resolution

pub use versionary_conventions::*;
pub use versionary_core::{
    ActionId, ApiVersion, ControllerId, ConventionError, DeclaredVersions, IntoApiVersion, Result,
    VersionParseError, VersionProfile,
};

#[cfg(feature = "tracing")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a `tracing` subscriber for convention logging.
///
/// Honors `RUST_LOG`, falling back to `info,versionary=debug`. Does nothing
/// if a global subscriber is already set.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,versionary=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Prelude module - import everything you need with `use versionary::prelude::*`
pub mod prelude {
    // Value types
    pub use versionary_core::{
        ActionId, ApiVersion, ControllerId, ConventionError, Result, VersionProfile,
    };

    // Builders
    pub use versionary_conventions::{
        ActionConventionBuilder, ApiVersionConventionBuilder, ControllerConventionBuilder,
        VersionAttribute,
    };

    // Resolution
    pub use versionary_conventions::{ApiVersionConventions, ProfileResolver, VersionProfiles};

    // Configuration
    pub use versionary_conventions::{ConfigError, ConventionOptions, ConventionsConfig};
}
