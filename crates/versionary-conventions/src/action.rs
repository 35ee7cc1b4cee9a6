//! Action-level convention builder

use crate::builder::{ApiVersionConventionBuilder, Declarations};
use crate::controller::ControllerConventionBuilder;
use std::collections::BTreeSet;
use versionary_core::{ActionId, ApiVersion, DeclaredVersions, IntoApiVersion, Result};

/// Version facts recorded for one action.
///
/// Owned by its [`ControllerConventionBuilder`]; configure it through an
/// [`ActionConventionBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConventions {
    id: ActionId,
    declarations: Declarations,
    mapped: BTreeSet<ApiVersion>,
}

impl ActionConventions {
    pub(crate) fn new(id: ActionId) -> Self {
        Self {
            id,
            declarations: Declarations::default(),
            mapped: BTreeSet::new(),
        }
    }

    /// Identity of the action
    pub fn id(&self) -> &ActionId {
        &self.id
    }

    /// Whether the action itself was marked version-neutral
    pub fn is_version_neutral(&self) -> bool {
        self.declarations.version_neutral
    }

    /// Versions declared directly on the action
    pub fn versions(&self) -> &DeclaredVersions {
        &self.declarations.versions
    }

    /// Versions the action is explicitly mapped to
    pub fn mapped(&self) -> &BTreeSet<ApiVersion> {
        &self.mapped
    }

    /// Neutrality and version sets declared on the action
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}

/// Builder for the API versions applied to a single controller action.
///
/// Obtained from [`ControllerConventionBuilder::action`]. The builder borrows
/// its controller for as long as it is alive; the controller keeps the
/// recorded facts, so a later request for the same action sees everything
/// configured here.
///
/// # Example
///
/// ```rust,ignore
/// let mut orders = ControllerConventionBuilder::new("orders");
/// orders.declare_supported("1.0")?.declare_supported("2.0")?;
/// orders.action("put(id)").map_to_version("2.0")?;
/// orders.action("delete(id)").mark_version_neutral();
/// ```
pub struct ActionConventionBuilder<'c> {
    controller: &'c mut ControllerConventionBuilder,
    slot: usize,
}

impl<'c> ActionConventionBuilder<'c> {
    pub(crate) fn new(controller: &'c mut ControllerConventionBuilder, slot: usize) -> Self {
        Self { controller, slot }
    }

    /// Identity of the configured action
    pub fn id(&self) -> &ActionId {
        self.controller.action_at(self.slot).id()
    }

    /// Maps the action to the given version
    pub fn map_to_version<V: IntoApiVersion>(&mut self, version: V) -> Result<&mut Self> {
        let version = version.into_api_version()?;
        self.state_mut().mapped.insert(version);
        Ok(self)
    }

    /// Gets or creates the builder for another action of the same controller
    pub fn action(self, id: impl Into<ActionId>) -> ActionConventionBuilder<'c> {
        self.controller.action(id)
    }

    /// Returns to the owning controller builder
    pub fn controller(self) -> &'c mut ControllerConventionBuilder {
        self.controller
    }

    /// Read-only view of what has been recorded for this action so far
    pub fn conventions(&self) -> &ActionConventions {
        self.controller.action_at(self.slot)
    }

    fn state_mut(&mut self) -> &mut ActionConventions {
        self.controller.action_at_mut(self.slot)
    }
}

impl ApiVersionConventionBuilder for ActionConventionBuilder<'_> {
    fn declarations(&self) -> &Declarations {
        &self.conventions().declarations
    }

    fn declarations_mut(&mut self) -> &mut Declarations {
        &mut self.state_mut().declarations
    }
}

impl std::fmt::Debug for ActionConventionBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionConventionBuilder")
            .field("controller", self.controller.id())
            .field("action", self.conventions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_to_version_is_idempotent() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller
            .action("put(id)")
            .map_to_version("2.0")
            .unwrap()
            .map_to_version((2u32, 0u32))
            .unwrap();

        let action = controller.action("put(id)");
        assert_eq!(action.conventions().mapped().len(), 1);
        assert!(action.conventions().mapped().contains(&ApiVersion::new(2, 0)));
    }

    #[test]
    fn test_map_to_unset_version_is_rejected() {
        let mut controller = ControllerConventionBuilder::new("orders");
        let mut action = controller.action("put(id)");
        action.map_to_version("2.0").unwrap();

        let unset: Option<ApiVersion> = None;
        assert!(action.map_to_version(unset).is_err());
        assert_eq!(action.conventions().mapped().len(), 1);
    }

    #[test]
    fn test_each_declaration_targets_one_set() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller
            .action("get(id)")
            .declare_supported("1.0")
            .unwrap()
            .declare_deprecated("0.9")
            .unwrap()
            .declare_advertised("3.0")
            .unwrap()
            .declare_deprecated_advertised("0.8")
            .unwrap();

        let action = controller.action_conventions("get(id)").unwrap();
        let versions = action.versions();
        assert_eq!(versions.supported.iter().collect::<Vec<_>>(), [&ApiVersion::new(1, 0)]);
        assert_eq!(versions.deprecated.iter().collect::<Vec<_>>(), [&ApiVersion::new(0, 9)]);
        assert_eq!(versions.advertised.iter().collect::<Vec<_>>(), [&ApiVersion::new(3, 0)]);
        assert_eq!(
            versions.deprecated_advertised.iter().collect::<Vec<_>>(),
            [&ApiVersion::new(0, 8)]
        );
        assert!(action.mapped().is_empty());
        assert!(!action.is_version_neutral());
    }

    #[test]
    fn test_sibling_lookup_goes_through_controller() {
        let mut controller = ControllerConventionBuilder::new("orders");
        controller
            .action("get()")
            .declare_supported("1.0")
            .unwrap();

        let sibling = controller.action("get()").action("post()");
        assert_eq!(sibling.id().as_str(), "post()");

        let again = sibling.action("get()");
        assert!(again
            .conventions()
            .versions()
            .supported
            .contains(&ApiVersion::new(1, 0)));
        assert_eq!(controller.action_ids().count(), 2);
    }
}
