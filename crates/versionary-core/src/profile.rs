//! Declared and resolved version facts

use crate::version::ApiVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The four inheritable declaration sets shared by controllers and actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredVersions {
    /// Versions implemented by the unit
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub supported: BTreeSet<ApiVersion>,
    /// Versions implemented by the unit but deprecated
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub deprecated: BTreeSet<ApiVersion>,
    /// Versions reported as available but implemented elsewhere
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub advertised: BTreeSet<ApiVersion>,
    /// Versions reported as available and deprecated but implemented elsewhere
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub deprecated_advertised: BTreeSet<ApiVersion>,
}

impl DeclaredVersions {
    /// Whether no version has been declared in any category
    pub fn is_empty(&self) -> bool {
        self.supported.is_empty()
            && self.deprecated.is_empty()
            && self.advertised.is_empty()
            && self.deprecated_advertised.is_empty()
    }

    /// Per-category fallback: each set of `self` wins when non-empty,
    /// otherwise the matching set of `inherited` is used.
    pub fn or_inherit(&self, inherited: &DeclaredVersions) -> DeclaredVersions {
        fn pick(own: &BTreeSet<ApiVersion>, inherited: &BTreeSet<ApiVersion>) -> BTreeSet<ApiVersion> {
            if own.is_empty() {
                inherited.clone()
            } else {
                own.clone()
            }
        }

        DeclaredVersions {
            supported: pick(&self.supported, &inherited.supported),
            deprecated: pick(&self.deprecated, &inherited.deprecated),
            advertised: pick(&self.advertised, &inherited.advertised),
            deprecated_advertised: pick(&self.deprecated_advertised, &inherited.deprecated_advertised),
        }
    }
}

/// Fully resolved, immutable version profile of one action (or controller).
///
/// A version-neutral profile keeps its raw sets; consumers must treat it as
/// matching any requested version regardless of their contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionProfile {
    version_neutral: bool,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    mapped: BTreeSet<ApiVersion>,
    #[serde(flatten)]
    versions: DeclaredVersions,
}

impl VersionProfile {
    /// Create a profile from resolved facts
    pub fn new(version_neutral: bool, mapped: BTreeSet<ApiVersion>, versions: DeclaredVersions) -> Self {
        Self {
            version_neutral,
            mapped,
            versions,
        }
    }

    /// Whether the unit matches any requested version
    pub fn is_version_neutral(&self) -> bool {
        self.version_neutral
    }

    /// Versions the action is explicitly mapped to
    pub fn mapped(&self) -> &BTreeSet<ApiVersion> {
        &self.mapped
    }

    /// Resolved supported versions
    pub fn supported(&self) -> &BTreeSet<ApiVersion> {
        &self.versions.supported
    }

    /// Resolved deprecated versions
    pub fn deprecated(&self) -> &BTreeSet<ApiVersion> {
        &self.versions.deprecated
    }

    /// Resolved advertised versions
    pub fn advertised(&self) -> &BTreeSet<ApiVersion> {
        &self.versions.advertised
    }

    /// Resolved deprecated advertised versions
    pub fn deprecated_advertised(&self) -> &BTreeSet<ApiVersion> {
        &self.versions.deprecated_advertised
    }

    /// The resolved declaration sets
    pub fn versions(&self) -> &DeclaredVersions {
        &self.versions
    }

    /// Versions this unit actually implements: supported and deprecated
    pub fn implemented(&self) -> BTreeSet<ApiVersion> {
        self.versions
            .supported
            .union(&self.versions.deprecated)
            .cloned()
            .collect()
    }

    /// Versions a request may be dispatched to this unit with.
    ///
    /// Mapped versions take precedence; without any mapping the implemented
    /// versions apply.
    pub fn declared(&self) -> BTreeSet<ApiVersion> {
        if self.mapped.is_empty() {
            self.implemented()
        } else {
            self.mapped.clone()
        }
    }

    /// Versions to report as supported: supported and advertised
    pub fn reported_supported(&self) -> BTreeSet<ApiVersion> {
        self.versions
            .supported
            .union(&self.versions.advertised)
            .cloned()
            .collect()
    }

    /// Versions to report as deprecated.
    ///
    /// A version that is also reported as supported is not reported as
    /// deprecated.
    pub fn reported_deprecated(&self) -> BTreeSet<ApiVersion> {
        let supported = self.reported_supported();
        self.versions
            .deprecated
            .iter()
            .chain(&self.versions.deprecated_advertised)
            .filter(|v| !supported.contains(*v))
            .cloned()
            .collect()
    }

    /// Whether a request for `version` may be handled by this unit
    pub fn accepts(&self, version: &ApiVersion) -> bool {
        if self.version_neutral {
            return true;
        }
        if self.mapped.is_empty() {
            self.versions.supported.contains(version) || self.versions.deprecated.contains(version)
        } else {
            self.mapped.contains(version)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(versions: &[(u32, u32)]) -> BTreeSet<ApiVersion> {
        versions.iter().map(|&(ma, mi)| ApiVersion::new(ma, mi)).collect()
    }

    #[test]
    fn test_or_inherit_is_per_category() {
        let own = DeclaredVersions {
            supported: set(&[(3, 0)]),
            ..Default::default()
        };
        let inherited = DeclaredVersions {
            supported: set(&[(1, 0), (2, 0)]),
            deprecated: set(&[(0, 9)]),
            ..Default::default()
        };

        let merged = own.or_inherit(&inherited);
        assert_eq!(merged.supported, set(&[(3, 0)]));
        assert_eq!(merged.deprecated, set(&[(0, 9)]));
        assert!(merged.advertised.is_empty());
    }

    #[test]
    fn test_derived_views() {
        let profile = VersionProfile::new(
            false,
            BTreeSet::new(),
            DeclaredVersions {
                supported: set(&[(1, 0), (2, 0)]),
                deprecated: set(&[(0, 9), (1, 0)]),
                advertised: set(&[(3, 0)]),
                deprecated_advertised: set(&[(0, 8)]),
            },
        );

        assert_eq!(profile.implemented(), set(&[(0, 9), (1, 0), (2, 0)]));
        assert_eq!(profile.declared(), profile.implemented());
        assert_eq!(profile.reported_supported(), set(&[(1, 0), (2, 0), (3, 0)]));
        assert_eq!(profile.reported_deprecated(), set(&[(0, 8), (0, 9)]));
    }

    #[test]
    fn test_mapped_versions_narrow_acceptance() {
        let profile = VersionProfile::new(
            false,
            set(&[(2, 0)]),
            DeclaredVersions {
                supported: set(&[(1, 0), (2, 0)]),
                ..Default::default()
            },
        );

        assert!(profile.accepts(&ApiVersion::new(2, 0)));
        assert!(!profile.accepts(&ApiVersion::new(1, 0)));
        assert_eq!(profile.declared(), set(&[(2, 0)]));
    }

    #[test]
    fn test_neutral_accepts_anything_and_keeps_sets() {
        let profile = VersionProfile::new(
            true,
            BTreeSet::new(),
            DeclaredVersions {
                supported: set(&[(1, 0)]),
                ..Default::default()
            },
        );

        assert!(profile.accepts(&ApiVersion::new(42, 0)));
        assert_eq!(profile.supported(), &set(&[(1, 0)]));
    }

    #[test]
    fn test_profile_serializes_flat() {
        let profile = VersionProfile::new(
            false,
            set(&[(2, 0)]),
            DeclaredVersions {
                supported: set(&[(2, 0)]),
                ..Default::default()
            },
        );

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "version_neutral": false,
                "mapped": ["2.0"],
                "supported": ["2.0"],
            })
        );
    }
}
