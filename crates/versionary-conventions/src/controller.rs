//! Controller-level convention builder

use crate::action::{ActionConventionBuilder, ActionConventions};
use crate::attributes::VersionAttribute;
use crate::builder::{ApiVersionConventionBuilder, Declarations};
use crate::resolver::ProfileResolver;
use std::collections::HashMap;
use versionary_core::{
    trace_debug, ActionId, ControllerId, DeclaredVersions, Result, VersionProfile,
};

/// Builder for the API versions applied to a controller and its actions.
///
/// Controller-wide declarations act as defaults for every action; an action
/// that declares its own versions for a category replaces the controller's
/// versions for that category. Action builders are created on first request
/// and cached by identity, so configuring the same action twice accumulates
/// into one set of facts.
///
/// Configuration takes `&mut self` and is meant to run on a single thread
/// during startup. Once configured, resolution only needs `&self`.
///
/// # Example
///
/// ```rust,ignore
/// use versionary::prelude::*;
///
/// let mut orders = ControllerConventionBuilder::new("orders");
/// orders
///     .declare_supported("1.0")?
///     .declare_supported("2.0")?
///     .action("delete(id)")
///     .mark_version_neutral();
///
/// let profile = orders.resolve("delete(id)")?;
/// assert!(profile.is_version_neutral());
/// ```
#[derive(Debug, Clone)]
pub struct ControllerConventionBuilder {
    id: ControllerId,
    declarations: Declarations,
    actions: Vec<ActionConventions>,
    index: HashMap<ActionId, usize>,
}

impl ControllerConventionBuilder {
    /// Create a builder for the given controller
    pub fn new(id: impl Into<ControllerId>) -> Self {
        let id = id.into();
        trace_debug!(controller = %id, "Created controller convention builder");

        Self {
            id,
            declarations: Declarations::default(),
            actions: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Identity of the controller
    pub fn id(&self) -> &ControllerId {
        &self.id
    }

    /// Gets or creates the builder for an action of this controller.
    ///
    /// Repeated calls with the same identity return a builder over the same
    /// recorded facts; nothing configured earlier is lost.
    pub fn action(&mut self, id: impl Into<ActionId>) -> ActionConventionBuilder<'_> {
        let id = id.into();
        let slot = match self.index.get(&id) {
            Some(&slot) => slot,
            None => {
                let slot = self.actions.len();
                trace_debug!(controller = %self.id, action = %id, "Registered action");
                self.actions.push(ActionConventions::new(id.clone()));
                self.index.insert(id, slot);
                slot
            }
        };

        ActionConventionBuilder::new(self, slot)
    }

    /// Whether an action with this identity has been registered
    pub fn has_action(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Identities of all registered actions, in registration order
    pub fn action_ids(&self) -> impl Iterator<Item = &ActionId> + '_ {
        self.actions.iter().map(ActionConventions::id)
    }

    /// Recorded facts of all registered actions, in registration order
    pub fn actions(&self) -> impl Iterator<Item = &ActionConventions> + '_ {
        self.actions.iter()
    }

    /// Recorded facts of one action
    pub fn action_conventions(&self, id: &str) -> Option<&ActionConventions> {
        self.index.get(id).map(|&slot| &self.actions[slot])
    }

    /// Whether the controller was marked version-neutral
    pub fn is_version_neutral(&self) -> bool {
        self.declarations.version_neutral
    }

    /// Versions declared controller-wide
    pub fn versions(&self) -> &DeclaredVersions {
        &self.declarations.versions
    }

    /// Applies declarative attributes found on the controller.
    ///
    /// The attributes are validated as a whole first; if any is rejected
    /// nothing is applied.
    pub fn apply_attributes(&mut self, attributes: &[VersionAttribute]) -> Result<&mut Self> {
        for attribute in attributes {
            attribute.check_controller(&self.id)?;
        }
        for attribute in attributes {
            attribute.apply_to_controller(self)?;
        }
        Ok(self)
    }

    /// Resolves the effective profile of one action with default options
    pub fn resolve(&self, action: &str) -> Result<VersionProfile> {
        ProfileResolver::new().resolve(self, action)
    }

    pub(crate) fn action_at(&self, slot: usize) -> &ActionConventions {
        &self.actions[slot]
    }

    pub(crate) fn action_at_mut(&mut self, slot: usize) -> &mut ActionConventions {
        &mut self.actions[slot]
    }
}

impl ApiVersionConventionBuilder for ControllerConventionBuilder {
    fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    fn declarations_mut(&mut self) -> &mut Declarations {
        &mut self.declarations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use versionary_core::{ApiVersion, ConventionError};

    #[test]
    fn test_action_is_created_once() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller.action("get(id)").declare_supported("1.0").unwrap();
        controller.action("get(id)").declare_supported("2.0").unwrap();

        assert_eq!(controller.action_ids().count(), 1);
        let action = controller.action_conventions("get(id)").unwrap();
        assert_eq!(action.versions().supported.len(), 2);
    }

    #[test]
    fn test_action_ids_keep_registration_order() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller.action("post()");
        controller.action("get()");
        controller.action("delete(id)");
        controller.action("get()");

        let ids: Vec<&str> = controller.action_ids().map(ActionId::as_str).collect();
        assert_eq!(ids, ["post()", "get()", "delete(id)"]);
    }

    #[test]
    fn test_controller_declarations_are_idempotent() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller
            .declare_supported("1.0")
            .unwrap()
            .declare_supported(ApiVersion::new(1, 0))
            .unwrap()
            .mark_version_neutral()
            .mark_version_neutral();

        assert_eq!(controller.versions().supported.len(), 1);
        assert!(controller.is_version_neutral());
    }

    #[test]
    fn test_rejected_declaration_leaves_state_unchanged() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller.declare_deprecated("0.9").unwrap();
        let before = controller.declarations().clone();

        let unset: Option<&str> = None;
        let err = controller.declare_deprecated(unset).unwrap_err();
        assert!(matches!(err, ConventionError::InvalidArgument(_)));

        let err = controller.declare_supported("latest").unwrap_err();
        assert!(matches!(err, ConventionError::InvalidArgument(_)));

        assert_eq!(controller.declarations(), &before);
    }

    #[test]
    fn test_declarations_chain_into_actions() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller
            .declare_supported("1.0")
            .unwrap()
            .action("delete(id)")
            .mark_version_neutral();

        assert!(controller.has_action("delete(id)"));
        assert!(!controller.has_action("get()"));
        assert!(controller
            .action_conventions("delete(id)")
            .unwrap()
            .is_version_neutral());
    }
}
