//! Declarations shared by controller and action builders

use versionary_core::{DeclaredVersions, IntoApiVersion, Result};

/// Version facts accumulated by one controller or action during configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declarations {
    pub(crate) version_neutral: bool,
    pub(crate) versions: DeclaredVersions,
}

impl Declarations {
    /// Whether the unit was marked version-neutral
    pub fn is_version_neutral(&self) -> bool {
        self.version_neutral
    }

    /// The declared version sets
    pub fn versions(&self) -> &DeclaredVersions {
        &self.versions
    }

    /// Whether nothing at all was declared
    pub fn is_empty(&self) -> bool {
        !self.version_neutral && self.versions.is_empty()
    }
}

/// Fluent declaration API implemented by both controller and action builders.
///
/// Every declaration is idempotent: repeating a call with the same version
/// leaves a single entry. Invalid input is rejected before anything is
/// recorded, so a failed call never changes the builder.
pub trait ApiVersionConventionBuilder {
    /// Accumulated declarations
    fn declarations(&self) -> &Declarations;

    #[doc(hidden)]
    fn declarations_mut(&mut self) -> &mut Declarations;

    /// Marks the unit as API version-neutral
    fn mark_version_neutral(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self.declarations_mut().version_neutral = true;
        self
    }

    /// Declares a version the unit implements
    fn declare_supported<V: IntoApiVersion>(&mut self, version: V) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let version = version.into_api_version()?;
        self.declarations_mut().versions.supported.insert(version);
        Ok(self)
    }

    /// Declares a version the unit implements but has deprecated
    fn declare_deprecated<V: IntoApiVersion>(&mut self, version: V) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let version = version.into_api_version()?;
        self.declarations_mut().versions.deprecated.insert(version);
        Ok(self)
    }

    /// Declares a version the unit advertises without implementing it
    fn declare_advertised<V: IntoApiVersion>(&mut self, version: V) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let version = version.into_api_version()?;
        self.declarations_mut().versions.advertised.insert(version);
        Ok(self)
    }

    /// Declares a deprecated version the unit advertises without implementing it
    fn declare_deprecated_advertised<V: IntoApiVersion>(&mut self, version: V) -> Result<&mut Self>
    where
        Self: Sized,
    {
        let version = version.into_api_version()?;
        self.declarations_mut()
            .versions
            .deprecated_advertised
            .insert(version);
        Ok(self)
    }
}

/// Replays neutrality and declared sets onto any builder.
pub(crate) fn declare_all<B: ApiVersionConventionBuilder>(
    builder: &mut B,
    version_neutral: bool,
    versions: &DeclaredVersions,
) -> Result<()> {
    if version_neutral {
        builder.mark_version_neutral();
    }
    for version in &versions.supported {
        builder.declare_supported(version)?;
    }
    for version in &versions.deprecated {
        builder.declare_deprecated(version)?;
    }
    for version in &versions.advertised {
        builder.declare_advertised(version)?;
    }
    for version in &versions.deprecated_advertised {
        builder.declare_deprecated_advertised(version)?;
    }
    Ok(())
}
