//! Profile resolution
//!
//! Merges a controller's declarations with one of its actions' declarations:
//!
//! - version-neutral on either level makes the profile neutral
//! - each inheritable set comes from the action when the action declared
//!   anything for it, otherwise from the controller (override, not union)
//! - mapped versions only ever come from the action

use crate::action::ActionConventions;
use crate::config::ConventionOptions;
use crate::controller::ControllerConventionBuilder;
use std::collections::BTreeSet;
use versionary_core::{
    trace_debug, ApiVersion, ConventionError, DeclaredVersions, Result, VersionProfile,
};

/// Computes effective [`VersionProfile`]s from frozen builder state.
///
/// Resolution reads builders through shared references and has no side
/// effects, so it can run concurrently across actions once configuration is
/// done. Resolving the same state twice yields equal profiles.
#[derive(Debug, Clone, Default)]
pub struct ProfileResolver {
    implicit_version: Option<ApiVersion>,
}

impl ProfileResolver {
    /// Resolver without any implicit versions
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver honoring the given options.
    ///
    /// With `assume_default_version_when_unspecified`, a unit that ends up
    /// with no declarations at all is supported at the default version.
    pub fn with_options(options: &ConventionOptions) -> Self {
        Self {
            implicit_version: options
                .assume_default_version_when_unspecified
                .then(|| options.default_api_version.clone()),
        }
    }

    /// Resolves the effective profile of `action` under `controller`.
    ///
    /// Fails with [`ConventionError::InvalidState`] when the action was never
    /// registered on the controller.
    pub fn resolve(&self, controller: &ControllerConventionBuilder, action: &str) -> Result<VersionProfile> {
        let conventions = controller
            .action_conventions(action)
            .ok_or_else(|| ConventionError::unknown_action(controller.id(), action))?;

        Ok(self.resolve_action(controller, conventions))
    }

    /// Resolves the controller's own profile; it never has mapped versions
    pub fn resolve_controller(&self, controller: &ControllerConventionBuilder) -> VersionProfile {
        let neutral = controller.is_version_neutral();
        let versions = self.implicit(neutral, &BTreeSet::new(), controller.versions().clone());
        VersionProfile::new(neutral, BTreeSet::new(), versions)
    }

    pub(crate) fn resolve_action(
        &self,
        controller: &ControllerConventionBuilder,
        action: &ActionConventions,
    ) -> VersionProfile {
        let neutral = action.is_version_neutral() || controller.is_version_neutral();
        let mapped = action.mapped().clone();
        let versions = action.versions().or_inherit(controller.versions());
        let versions = self.implicit(neutral, &mapped, versions);

        trace_debug!(
            controller = %controller.id(),
            action = %action.id(),
            neutral,
            supported = versions.supported.len(),
            deprecated = versions.deprecated.len(),
            mapped = mapped.len(),
            "Resolved action version profile"
        );

        VersionProfile::new(neutral, mapped, versions)
    }

    fn implicit(
        &self,
        neutral: bool,
        mapped: &BTreeSet<ApiVersion>,
        mut versions: DeclaredVersions,
    ) -> DeclaredVersions {
        if let Some(default) = &self.implicit_version {
            if !neutral && mapped.is_empty() && versions.is_empty() {
                versions.supported.insert(default.clone());
            }
        }
        versions
    }
}
