//! API version type and parsing
//!
//! Versions are `major.minor` with an optional status label, e.g. `1.0`,
//! `2.1-beta`.

use crate::error::{ConventionError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// API version
///
/// Supports formats like:
/// - `1`, `v1` (major only, minor defaults to 0)
/// - `1.0`, `v1.2` (major.minor)
/// - `1.0-beta`, `v2-alpha1` (with a status label)
///
/// Status labels are ASCII alphanumeric and stored lower-cased, so
/// `1.0-Beta` and `1.0-beta` are the same version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    major: u32,
    minor: u32,
    status: Option<Box<str>>,
}

impl ApiVersion {
    /// Version 1.0, used when nothing else is configured
    pub const DEFAULT: ApiVersion = ApiVersion::new(1, 0);

    /// Create a new version without a status
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            status: None,
        }
    }

    /// Create a version with only a major number
    pub const fn from_major(major: u32) -> Self {
        Self::new(major, 0)
    }

    /// Create a version carrying a status label
    pub fn with_status(
        major: u32,
        minor: u32,
        status: impl AsRef<str>,
    ) -> std::result::Result<Self, VersionParseError> {
        let status = status.as_ref();
        if status.is_empty() || !status.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(VersionParseError::InvalidStatus);
        }

        Ok(Self {
            major,
            minor,
            status: Some(status.to_ascii_lowercase().into_boxed_str()),
        })
    }

    /// Major version number
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor version number
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Status label, if any
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Whether this version carries a status label (e.g. `beta`)
    pub fn is_prerelease(&self) -> bool {
        self.status.is_some()
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(status) = &self.status {
            write!(f, "-{}", status)?;
        }
        Ok(())
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        // Remove optional 'v' prefix
        let s = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);

        let (number, status) = match s.split_once('-') {
            Some((number, status)) => (number, Some(status)),
            None => (s, None),
        };

        let parts: Vec<&str> = number.split('.').collect();
        let (major, minor) = match parts.as_slice() {
            [major] => (parse_number(major)?, 0),
            [major, minor] => (parse_number(major)?, parse_number(minor)?),
            _ => return Err(VersionParseError::InvalidFormat),
        };

        match status {
            Some(status) => ApiVersion::with_status(major, minor, status),
            None => Ok(ApiVersion::new(major, minor)),
        }
    }
}

fn parse_number(part: &str) -> std::result::Result<u32, VersionParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionParseError::InvalidNumber);
    }
    part.parse().map_err(|_| VersionParseError::InvalidNumber)
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.major.cmp(&other.major) {
            Ordering::Equal => match self.minor.cmp(&other.minor) {
                // A release sorts after any of its pre-releases
                Ordering::Equal => match (&self.status, &other.status) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a), Some(b)) => a.cmp(b),
                },
                ord => ord,
            },
            ord => ord,
        }
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for version parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionParseError {
    /// Invalid number in version string
    InvalidNumber,
    /// Invalid version format
    InvalidFormat,
    /// Status label is empty or not alphanumeric
    InvalidStatus,
    /// Empty version string
    Empty,
}

impl fmt::Display for VersionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber => write!(f, "invalid number in version"),
            Self::InvalidFormat => write!(f, "invalid version format"),
            Self::InvalidStatus => write!(f, "invalid version status"),
            Self::Empty => write!(f, "empty version string"),
        }
    }
}

impl std::error::Error for VersionParseError {}

/// Conversion into a well-formed [`ApiVersion`] for declaration calls.
///
/// Declaration methods accept anything implementing this trait so that
/// versions coming from configuration (strings, optional values) are
/// validated at the call site. `None` and malformed strings are rejected
/// with [`ConventionError::InvalidArgument`].
pub trait IntoApiVersion {
    /// Convert into a version or fail with `InvalidArgument`
    fn into_api_version(self) -> Result<ApiVersion>;
}

impl IntoApiVersion for ApiVersion {
    fn into_api_version(self) -> Result<ApiVersion> {
        Ok(self)
    }
}

impl IntoApiVersion for &ApiVersion {
    fn into_api_version(self) -> Result<ApiVersion> {
        Ok(self.clone())
    }
}

impl IntoApiVersion for (u32, u32) {
    fn into_api_version(self) -> Result<ApiVersion> {
        Ok(ApiVersion::new(self.0, self.1))
    }
}

impl IntoApiVersion for &str {
    fn into_api_version(self) -> Result<ApiVersion> {
        self.parse().map_err(|e| {
            ConventionError::InvalidArgument(format!("'{}' is not a valid API version: {}", self, e))
        })
    }
}

impl IntoApiVersion for &String {
    fn into_api_version(self) -> Result<ApiVersion> {
        self.as_str().into_api_version()
    }
}

impl IntoApiVersion for String {
    fn into_api_version(self) -> Result<ApiVersion> {
        self.as_str().into_api_version()
    }
}

impl<T: IntoApiVersion> IntoApiVersion for Option<T> {
    fn into_api_version(self) -> Result<ApiVersion> {
        match self {
            Some(version) => version.into_api_version(),
            None => Err(ConventionError::InvalidArgument(
                "API version is unset".to_string(),
            )),
        }
    }
}
