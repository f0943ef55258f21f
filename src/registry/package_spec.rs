use core::fmt::{Display, Formatter, Result as FmtResult};
use core::str::FromStr;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::{Arc, LazyLock};

/// Longest package name accepted by the npm registry.
const MAX_NAME_LEN: usize = 214;

/// Accepts plain names used by both registries, plus npm's `@scope/name` form.
static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:@[A-Za-z0-9][A-Za-z0-9._~-]*/)?[A-Za-z0-9][A-Za-z0-9._~-]*$").expect("invalid regex"));

/// The name of a package to track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageSpec {
    name: Arc<str>,
}

impl PackageSpec {
    /// Create a package spec without validating the name.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Arc::from(name.as_ref()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is a scoped npm package (`@scope/name`).
    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.name.starts_with('@')
    }
}

impl FromStr for PackageSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        let name = s.trim();
        if name.is_empty() {
            return Err("package name cannot be empty".to_string());
        }

        if name.len() > MAX_NAME_LEN {
            return Err(format!("package name '{name}' is longer than {MAX_NAME_LEN} characters"));
        }

        if !NAME_REGEX.is_match(name) {
            return Err(format!("'{name}' is not a valid package name"));
        }

        Ok(Self::new(name))
    }
}

impl Display for PackageSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.name)
    }
}

impl Serialize for PackageSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

impl<'de> Deserialize<'de> for PackageSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
