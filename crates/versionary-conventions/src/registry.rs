//! Application-wide convention registry and resolved profiles

use crate::config::ConventionOptions;
use crate::controller::ControllerConventionBuilder;
use crate::resolver::ProfileResolver;
use std::collections::HashMap;
use std::sync::Arc;
use versionary_core::{
    trace_debug, trace_info, ActionId, ControllerId, ConventionError, Result, VersionProfile,
};

/// Registry of controller convention builders for a whole application.
///
/// Discovery seeds it with `(controller, action)` pairs, configuration code
/// refines individual controllers, and [`build`](Self::build) freezes
/// everything into [`VersionProfiles`] for the dispatch layer.
#[derive(Debug, Clone, Default)]
pub struct ApiVersionConventions {
    options: ConventionOptions,
    controllers: Vec<ControllerConventionBuilder>,
    index: HashMap<ControllerId, usize>,
}

impl ApiVersionConventions {
    /// Create an empty registry with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given options
    pub fn with_options(options: ConventionOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Options used when building profiles
    pub fn options(&self) -> &ConventionOptions {
        &self.options
    }

    /// Gets or creates the builder for a controller
    pub fn controller(&mut self, id: impl Into<ControllerId>) -> &mut ControllerConventionBuilder {
        let id = id.into();
        let slot = match self.index.get(&id) {
            Some(&slot) => slot,
            None => {
                let slot = self.controllers.len();
                self.controllers.push(ControllerConventionBuilder::new(id.clone()));
                self.index.insert(id, slot);
                slot
            }
        };
        &mut self.controllers[slot]
    }

    /// Looks up a controller builder without creating it
    pub fn get_controller(&self, id: &str) -> Option<&ControllerConventionBuilder> {
        self.index.get(id).map(|&slot| &self.controllers[slot])
    }

    /// All controller builders, in registration order
    pub fn controllers(&self) -> impl Iterator<Item = &ControllerConventionBuilder> + '_ {
        self.controllers.iter()
    }

    /// Registers discovered `(controller, action)` pairs.
    ///
    /// Pairs that are already known are left as they are.
    pub fn seed<I, C, A>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (C, A)>,
        C: Into<ControllerId>,
        A: Into<ActionId>,
    {
        for (controller, action) in pairs {
            self.controller(controller).action(action);
        }
        self
    }

    /// Resolves every action of every controller.
    ///
    /// Builders are only read; the registry can keep being configured and
    /// built again afterwards.
    pub fn build(&self) -> VersionProfiles {
        let resolver = ProfileResolver::with_options(&self.options);
        let controllers: Vec<ControllerProfiles> = self
            .controllers
            .iter()
            .map(|controller| ControllerProfiles::resolve(controller, &resolver))
            .collect();

        let index = controllers
            .iter()
            .enumerate()
            .map(|(slot, profiles)| (profiles.id.clone(), slot))
            .collect();

        trace_info!(
            controllers = controllers.len(),
            actions = controllers.iter().map(|c| c.actions.len()).sum::<usize>(),
            "Built API version profiles"
        );

        VersionProfiles { controllers, index }
    }
}

/// Resolved profiles of one controller and its actions.
#[derive(Debug, Clone)]
pub struct ControllerProfiles {
    id: ControllerId,
    profile: Arc<VersionProfile>,
    actions: Vec<(ActionId, Arc<VersionProfile>)>,
    index: HashMap<ActionId, usize>,
}

impl ControllerProfiles {
    /// Resolves all actions of `controller`
    pub fn resolve(controller: &ControllerConventionBuilder, resolver: &ProfileResolver) -> Self {
        let actions: Vec<(ActionId, Arc<VersionProfile>)> = controller
            .actions()
            .map(|action| {
                (
                    action.id().clone(),
                    Arc::new(resolver.resolve_action(controller, action)),
                )
            })
            .collect();

        let index = actions
            .iter()
            .enumerate()
            .map(|(slot, (id, _))| (id.clone(), slot))
            .collect();

        trace_debug!(
            controller = %controller.id(),
            actions = actions.len(),
            "Resolved controller profiles"
        );

        Self {
            id: controller.id().clone(),
            profile: Arc::new(resolver.resolve_controller(controller)),
            actions,
            index,
        }
    }

    /// Identity of the controller
    pub fn id(&self) -> &ControllerId {
        &self.id
    }

    /// The controller's own profile
    pub fn controller_profile(&self) -> &Arc<VersionProfile> {
        &self.profile
    }

    /// Profile of one action, if registered
    pub fn action(&self, id: &str) -> Option<&Arc<VersionProfile>> {
        self.index.get(id).map(|&slot| &self.actions[slot].1)
    }

    /// Profile of one action, failing with `InvalidState` when unknown
    pub fn profile(&self, id: &str) -> Result<Arc<VersionProfile>> {
        self.action(id)
            .cloned()
            .ok_or_else(|| ConventionError::unknown_action(&self.id, id))
    }

    /// Identities of all actions, in registration order
    pub fn action_ids(&self) -> impl Iterator<Item = &ActionId> + '_ {
        self.actions.iter().map(|(id, _)| id)
    }

    /// Actions with their profiles, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&ActionId, &Arc<VersionProfile>)> + '_ {
        self.actions.iter().map(|(id, profile)| (id, profile))
    }

    /// Number of resolved actions
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the controller has no actions
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

/// Immutable snapshot of every resolved profile, shared with the dispatch
/// layer. Cloning is cheap for the profiles themselves.
#[derive(Debug, Clone, Default)]
pub struct VersionProfiles {
    controllers: Vec<ControllerProfiles>,
    index: HashMap<ControllerId, usize>,
}

impl VersionProfiles {
    /// Profiles of one controller, if registered
    pub fn controller(&self, id: &str) -> Option<&ControllerProfiles> {
        self.index.get(id).map(|&slot| &self.controllers[slot])
    }

    /// Profile of one action, failing with `InvalidState` when either the
    /// controller or the action is unknown
    pub fn profile(&self, controller: &str, action: &str) -> Result<Arc<VersionProfile>> {
        self.controller(controller)
            .ok_or_else(|| ConventionError::unknown_controller(controller))?
            .profile(action)
    }

    /// All controllers, in registration order
    pub fn controllers(&self) -> impl Iterator<Item = &ControllerProfiles> + '_ {
        self.controllers.iter()
    }

    /// Number of controllers
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    /// Whether no controller was registered
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ApiVersionConventionBuilder;
    use versionary_core::ApiVersion;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_profiles_are_shareable_across_threads() {
        assert_send_sync::<VersionProfiles>();
        assert_send_sync::<Arc<VersionProfile>>();
    }

    #[test]
    fn test_seed_registers_pairs_once() {
        let mut conventions = ApiVersionConventions::new();
        conventions.seed([
            ("orders", "get()"),
            ("orders", "get(id)"),
            ("customers", "get()"),
            ("orders", "get()"),
        ]);

        let orders = conventions.get_controller("orders").unwrap();
        assert_eq!(orders.action_ids().count(), 2);
        assert_eq!(conventions.controllers().count(), 2);
    }

    #[test]
    fn test_controller_is_created_once() {
        let mut conventions = ApiVersionConventions::new();
        conventions.controller("orders").declare_supported("1.0").unwrap();
        conventions.controller("orders").declare_supported("2.0").unwrap();

        assert_eq!(conventions.controllers().count(), 1);
        assert_eq!(
            conventions.get_controller("orders").unwrap().versions().supported.len(),
            2
        );
    }

    #[test]
    fn test_build_exposes_profiles_and_ids() {
        let mut conventions = ApiVersionConventions::new();
        conventions
            .controller("orders")
            .declare_supported("1.0")
            .unwrap()
            .action("get()")
            .declare_deprecated("0.9")
            .unwrap();
        conventions.seed([("orders", "post()")]);

        let profiles = conventions.build();
        let orders = profiles.controller("orders").unwrap();
        let ids: Vec<&str> = orders.action_ids().map(ActionId::as_str).collect();
        assert_eq!(ids, ["get()", "post()"]);

        let post = orders.profile("post()").unwrap();
        assert!(post.supported().contains(&ApiVersion::new(1, 0)));
        assert!(orders
            .controller_profile()
            .supported()
            .contains(&ApiVersion::new(1, 0)));
    }

    #[test]
    fn test_unknown_lookups_are_invalid_state() {
        let mut conventions = ApiVersionConventions::new();
        conventions.seed([("orders", "get()")]);
        let profiles = conventions.build();

        assert!(matches!(
            profiles.profile("orders", "delete(id)"),
            Err(ConventionError::InvalidState(_))
        ));
        assert!(matches!(
            profiles.profile("customers", "get()"),
            Err(ConventionError::InvalidState(_))
        ));
    }

    #[test]
    fn test_build_uses_registry_options() {
        let options = ConventionOptions::new().assume_default_version_when_unspecified(true);
        let mut conventions = ApiVersionConventions::with_options(options);
        conventions.seed([("orders", "get()")]);

        let profile = conventions.build().profile("orders", "get()").unwrap();
        assert!(profile.supported().contains(&ApiVersion::DEFAULT));
    }
}
