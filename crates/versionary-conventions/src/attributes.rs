//! Declarative version attributes
//!
//! Discovery layers that read annotations off controllers and actions hand
//! them over as [`VersionAttribute`] values, which are translated into
//! builder calls.

use crate::action::ActionConventionBuilder;
use crate::builder::ApiVersionConventionBuilder;
use crate::controller::ControllerConventionBuilder;
use serde::{Deserialize, Serialize};
use versionary_core::{trace_warn, ApiVersion, ControllerId, ConventionError, Result};

/// A single version annotation on a controller or action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersionAttribute {
    /// The unit implements `version`, optionally as deprecated
    ApiVersion {
        version: ApiVersion,
        #[serde(default)]
        deprecated: bool,
    },
    /// The unit advertises `version` without implementing it
    AdvertiseApiVersion {
        version: ApiVersion,
        #[serde(default)]
        deprecated: bool,
    },
    /// The action is mapped to `version`; only valid on actions
    MapToApiVersion { version: ApiVersion },
    /// The unit matches any version
    ApiVersionNeutral,
}

impl VersionAttribute {
    /// The unit implements `version`
    pub fn supported(version: ApiVersion) -> Self {
        Self::ApiVersion {
            version,
            deprecated: false,
        }
    }

    /// The unit implements `version` but has deprecated it
    pub fn deprecated(version: ApiVersion) -> Self {
        Self::ApiVersion {
            version,
            deprecated: true,
        }
    }

    /// The unit advertises `version`
    pub fn advertised(version: ApiVersion) -> Self {
        Self::AdvertiseApiVersion {
            version,
            deprecated: false,
        }
    }

    /// The unit advertises `version` as deprecated
    pub fn deprecated_advertised(version: ApiVersion) -> Self {
        Self::AdvertiseApiVersion {
            version,
            deprecated: true,
        }
    }

    /// The action is mapped to `version`
    pub fn map_to(version: ApiVersion) -> Self {
        Self::MapToApiVersion { version }
    }

    /// The unit is version-neutral
    pub fn neutral() -> Self {
        Self::ApiVersionNeutral
    }

    /// Rejects attributes that cannot be placed on a controller
    pub(crate) fn check_controller(&self, controller: &ControllerId) -> Result<()> {
        if let Self::MapToApiVersion { version } = self {
            trace_warn!(
                controller = %controller,
                version = %version,
                "Rejected version mapping declared on a controller"
            );
            return Err(ConventionError::InvalidArgument(format!(
                "controller '{}' cannot be mapped to version {}; map its actions instead",
                controller, version
            )));
        }
        Ok(())
    }

    /// Applies the attribute to a controller builder
    pub fn apply_to_controller(&self, controller: &mut ControllerConventionBuilder) -> Result<()> {
        self.check_controller(controller.id())?;
        self.apply_shared(controller)
    }

    /// Applies the attribute to an action builder
    pub fn apply_to_action(&self, action: &mut ActionConventionBuilder<'_>) -> Result<()> {
        match self {
            Self::MapToApiVersion { version } => {
                action.map_to_version(version)?;
                Ok(())
            }
            _ => self.apply_shared(action),
        }
    }

    fn apply_shared<B: ApiVersionConventionBuilder>(&self, builder: &mut B) -> Result<()> {
        match self {
            Self::ApiVersion {
                version,
                deprecated: false,
            } => {
                builder.declare_supported(version)?;
            }
            Self::ApiVersion {
                version,
                deprecated: true,
            } => {
                builder.declare_deprecated(version)?;
            }
            Self::AdvertiseApiVersion {
                version,
                deprecated: false,
            } => {
                builder.declare_advertised(version)?;
            }
            Self::AdvertiseApiVersion {
                version,
                deprecated: true,
            } => {
                builder.declare_deprecated_advertised(version)?;
            }
            Self::ApiVersionNeutral => {
                builder.mark_version_neutral();
            }
            Self::MapToApiVersion { .. } => {
                return Err(ConventionError::InvalidArgument(
                    "version mappings only apply to actions".to_string(),
                ))
            }
        }
        Ok(())
    }
}

impl ActionConventionBuilder<'_> {
    /// Applies declarative attributes found on the action
    pub fn apply_attributes(&mut self, attributes: &[VersionAttribute]) -> Result<&mut Self> {
        for attribute in attributes {
            attribute.apply_to_action(self)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32) -> ApiVersion {
        ApiVersion::new(major, minor)
    }

    #[test]
    fn test_attributes_translate_to_declarations() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller
            .apply_attributes(&[
                VersionAttribute::supported(v(1, 0)),
                VersionAttribute::deprecated(v(0, 9)),
                VersionAttribute::advertised(v(3, 0)),
                VersionAttribute::deprecated_advertised(v(0, 8)),
            ])
            .unwrap();
        controller
            .action("put(id)")
            .apply_attributes(&[VersionAttribute::map_to(v(2, 0))])
            .unwrap();
        controller
            .action("delete(id)")
            .apply_attributes(&[VersionAttribute::neutral()])
            .unwrap();

        let versions = controller.versions();
        assert!(versions.supported.contains(&v(1, 0)));
        assert!(versions.deprecated.contains(&v(0, 9)));
        assert!(versions.advertised.contains(&v(3, 0)));
        assert!(versions.deprecated_advertised.contains(&v(0, 8)));

        let put = controller.resolve("put(id)").unwrap();
        assert!(put.mapped().contains(&v(2, 0)));
        assert!(controller.resolve("delete(id)").unwrap().is_version_neutral());
    }

    #[test]
    fn test_mapping_on_controller_is_rejected_atomically() {
        let mut controller = ControllerConventionBuilder::new("orders");
        let err = controller
            .apply_attributes(&[
                VersionAttribute::supported(v(1, 0)),
                VersionAttribute::map_to(v(2, 0)),
            ])
            .unwrap_err();

        assert!(matches!(err, ConventionError::InvalidArgument(_)));
        assert!(controller.versions().supported.is_empty());
    }

    #[test]
    fn test_attribute_serde_shape() {
        let attributes: Vec<VersionAttribute> = serde_json::from_str(
            r#"[
                {"kind": "api_version", "version": "1.0"},
                {"kind": "api_version", "version": "0.9", "deprecated": true},
                {"kind": "map_to_api_version", "version": "2.0"},
                {"kind": "api_version_neutral"}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            attributes,
            vec![
                VersionAttribute::supported(v(1, 0)),
                VersionAttribute::deprecated(v(0, 9)),
                VersionAttribute::map_to(v(2, 0)),
                VersionAttribute::neutral(),
            ]
        );
    }
}
