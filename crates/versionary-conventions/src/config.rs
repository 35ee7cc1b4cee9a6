//! Configuration for version conventions.
//!
//! Two sources are supported:
//!
//! - [`ConventionOptions`], loaded from `VERSIONARY_*` environment variables,
//!   optionally seeded from a `.env` file with [`load_dotenv`]
//! - [`ConventionsConfig`], a declarative JSON document describing
//!   controllers, actions and their versions
//!
//! # Example
//!
//! ```ignore
//! use versionary_conventions::{ApiVersionConventions, ConventionOptions, ConventionsConfig};
//!
//! let options = ConventionOptions::from_env()?;
//! let mut conventions = ApiVersionConventions::with_options(options);
//!
//! ConventionsConfig::from_json(r#"{
//!     "controllers": {
//!         "orders": {
//!             "supported": ["1.0", "2.0"],
//!             "actions": {
//!                 "put(id)": { "mapped": ["2.0"] },
//!                 "delete(id)": { "version_neutral": true }
//!             }
//!         }
//!     }
//! }"#)?
//! .apply_to(&mut conventions)?;
//! ```

use crate::builder::declare_all;
use crate::registry::ApiVersionConventions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;
use versionary_core::{
    trace_info, trace_warn, ApiVersion, ConventionError, DeclaredVersions, IntoApiVersion,
};

/// Prefix of the environment variables read by [`ConventionOptions::from_env`]
pub const ENV_PREFIX: &str = "VERSIONARY_";

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),

    /// The conventions document is not valid JSON or has the wrong shape
    #[error("Invalid conventions document: {0}")]
    Json(#[from] serde_json::Error),

    /// The conventions file could not be read
    #[error("Failed to read conventions file: {0}")]
    Io(#[from] std::io::Error),

    /// A declaration in the document was rejected
    #[error(transparent)]
    Convention(#[from] ConventionError),
}

/// Application-wide convention options.
///
/// Read from the environment with [`ConventionOptions::from_env`]:
///
/// | Variable | Default |
/// |----------|---------|
/// | `VERSIONARY_DEFAULT_API_VERSION` | `1.0` |
/// | `VERSIONARY_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED` | `false` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConventionOptions {
    /// Version used for units that declare nothing, when assumed
    pub default_api_version: ApiVersion,
    /// Treat units without any declaration as supporting the default version
    pub assume_default_version_when_unspecified: bool,
}

impl Default for ConventionOptions {
    fn default() -> Self {
        Self {
            default_api_version: ApiVersion::DEFAULT,
            assume_default_version_when_unspecified: false,
        }
    }
}

impl ConventionOptions {
    /// Create options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from `VERSIONARY_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let options = envy::prefixed(ENV_PREFIX).from_env::<Self>()?;
        trace_info!(
            default_api_version = %options.default_api_version,
            assume_default = options.assume_default_version_when_unspecified,
            "Loaded convention options from environment"
        );
        Ok(options)
    }

    /// Set the default API version
    pub fn default_api_version(mut self, version: ApiVersion) -> Self {
        self.default_api_version = version;
        self
    }

    /// Set whether undeclared units implicitly support the default version
    pub fn assume_default_version_when_unspecified(mut self, assume: bool) -> Self {
        self.assume_default_version_when_unspecified = assume;
        self
    }
}

/// Load a `.env` file from the current directory or its parents, if any.
///
/// Call before [`ConventionOptions::from_env`] to pick up `VERSIONARY_*`
/// variables kept in a `.env` file. Variables already set win.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Version entries as written in a document.
///
/// Entries stay raw until the document is applied so that `null` or
/// malformed versions are reported as [`ConventionError::InvalidArgument`]
/// with their location instead of being dropped.
pub type VersionList = Vec<Option<String>>;

/// A controller entry in a conventions document.
///
/// Unknown keys are rejected, so a misspelled category cannot silently drop
/// its versions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    pub version_neutral: bool,
    pub supported: VersionList,
    pub deprecated: VersionList,
    pub advertised: VersionList,
    pub deprecated_advertised: VersionList,
    /// Rejected when non-empty; only actions can be mapped
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mapped: VersionList,
    /// Actions keyed by identity
    pub actions: BTreeMap<String, ActionConfig>,
}

/// An action entry in a conventions document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActionConfig {
    pub version_neutral: bool,
    pub supported: VersionList,
    pub deprecated: VersionList,
    pub advertised: VersionList,
    pub deprecated_advertised: VersionList,
    pub mapped: VersionList,
}

/// Declarative conventions document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConventionsConfig {
    /// Controllers keyed by identity
    pub controllers: BTreeMap<String, ControllerConfig>,
}

impl ConventionsConfig {
    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a document from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Translates the document into builder calls on `conventions`.
    ///
    /// Every entry is validated before anything is applied, so a rejected
    /// document leaves `conventions` untouched.
    pub fn apply_to(&self, conventions: &mut ApiVersionConventions) -> Result<(), ConfigError> {
        let plan = self.plan()?;

        let mut actions = 0usize;
        for controller in &plan {
            let builder = conventions.controller(controller.id.clone());
            declare_all(builder, controller.version_neutral, &controller.versions)?;

            for action in &controller.actions {
                let mut action_builder = builder.action(action.id.clone());
                declare_all(&mut action_builder, action.version_neutral, &action.versions)?;
                for version in &action.mapped {
                    action_builder.map_to_version(version)?;
                }
                actions += 1;
            }
        }

        trace_info!(
            controllers = plan.len(),
            actions,
            "Applied conventions document"
        );
        Ok(())
    }

    fn plan(&self) -> Result<Vec<PlannedController>, ConventionError> {
        self.controllers
            .iter()
            .map(|(id, controller)| -> Result<PlannedController, ConventionError> {
                let location = format!("controllers.{}", id);
                if !controller.mapped.is_empty() {
                    trace_warn!(controller = %id, "Rejected version mapping declared on a controller");
                    return Err(ConventionError::InvalidArgument(format!(
                        "{}.mapped: controller '{}' cannot be mapped to a version; map its actions instead",
                        location, id
                    )));
                }
                let versions = declared_versions(
                    &location,
                    [
                        &controller.supported,
                        &controller.deprecated,
                        &controller.advertised,
                        &controller.deprecated_advertised,
                    ],
                )?;
                let actions = controller
                    .actions
                    .iter()
                    .map(|(action_id, action)| -> Result<PlannedAction, ConventionError> {
                        let location = format!("{}.actions.{}", location, action_id);
                        let versions = declared_versions(
                            &location,
                            [
                                &action.supported,
                                &action.deprecated,
                                &action.advertised,
                                &action.deprecated_advertised,
                            ],
                        )?;
                        Ok(PlannedAction {
                            id: action_id.clone(),
                            version_neutral: action.version_neutral,
                            versions,
                            mapped: parse_versions(&action.mapped, &location, "mapped")?,
                        })
                    })
                    .collect::<Result<Vec<_>, ConventionError>>()?;

                Ok(PlannedController {
                    id: id.clone(),
                    version_neutral: controller.version_neutral,
                    versions,
                    actions,
                })
            })
            .collect()
    }
}

/// Parses the four declaration categories, in declaration order
fn declared_versions(
    location: &str,
    [supported, deprecated, advertised, deprecated_advertised]: [&VersionList; 4],
) -> Result<DeclaredVersions, ConventionError> {
    Ok(DeclaredVersions {
        supported: parse_versions(supported, location, "supported")?,
        deprecated: parse_versions(deprecated, location, "deprecated")?,
        advertised: parse_versions(advertised, location, "advertised")?,
        deprecated_advertised: parse_versions(
            deprecated_advertised,
            location,
            "deprecated_advertised",
        )?,
    })
}

struct PlannedController {
    id: String,
    version_neutral: bool,
    versions: DeclaredVersions,
    actions: Vec<PlannedAction>,
}

struct PlannedAction {
    id: String,
    version_neutral: bool,
    versions: DeclaredVersions,
    mapped: BTreeSet<ApiVersion>,
}

fn parse_versions(
    raw: &[Option<String>],
    location: &str,
    field: &str,
) -> Result<BTreeSet<ApiVersion>, ConventionError> {
    raw.iter()
        .enumerate()
        .map(|(i, entry)| {
            entry.as_ref().into_api_version().map_err(|err| {
                trace_warn!(location, field, index = i, error = %err, "Rejected declared version");
                match err {
                    ConventionError::InvalidArgument(message) => ConventionError::InvalidArgument(
                        format!("{}.{}[{}]: {}", location, field, i, message),
                    ),
                    other => other,
                }
            })
        })
        .collect()
}
