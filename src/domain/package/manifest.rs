//! `composer.json`-shaped package manifests.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::package::version::{Constraint, Version};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name under which packages declare the CMS version they work with.
pub const CORE_PACKAGE: &str = "sallycms/sallycms";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SallyExtra {
    /// SQL dump applied on install, relative to the package directory.
    #[serde(default, rename = "install-sql", alias = "install_sql", skip_serializing_if = "Option::is_none")]
    pub install_sql: Option<String>,
    #[serde(default, rename = "uninstall-sql", alias = "uninstall_sql", skip_serializing_if = "Option::is_none")]
    pub uninstall_sql: Option<String>,
    /// Directory published to the public assets directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    /// Package this one extends, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extra {
    #[serde(default)]
    pub sallycms: SallyExtra,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub require: BTreeMap<String, String>,
    #[serde(default)]
    pub extra: Extra,
}

/// One entry of the `require` map, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Another package, with its constraint.
    Package { name: String, constraint: String },
    /// The CMS core itself.
    Core { constraint: String },
    /// Platform requirements (`php`, `ext-*`, `lib-*`) are not tracked.
    Platform { name: String },
}

impl Manifest {
    pub fn from_json(raw: &str) -> DomainResult<Self> {
        let manifest: Self = serde_json::from_str(raw)
            .map_err(|err| DomainError::Validation(format!("invalid manifest: {err}")))?;
        validate_package_name(&manifest.name)?;
        Ok(manifest)
    }

    pub fn version(&self) -> Option<Version> {
        self.version
            .as_deref()
            .and_then(|raw| Version::parse(raw).ok())
    }

    pub fn author(&self) -> Option<&str> {
        self.authors.first().map(|a| a.name.as_str())
    }

    pub fn requirements(&self) -> Vec<Requirement> {
        self.require
            .iter()
            .map(|(name, constraint)| {
                if name == CORE_PACKAGE {
                    Requirement::Core {
                        constraint: constraint.clone(),
                    }
                } else if name.contains('/') {
                    Requirement::Package {
                        name: name.clone(),
                        constraint: constraint.clone(),
                    }
                } else {
                    Requirement::Platform { name: name.clone() }
                }
            })
            .collect()
    }

    /// Names of the required packages (core and platform excluded).
    pub fn package_requirements(&self) -> Vec<String> {
        self.requirements()
            .into_iter()
            .filter_map(|req| match req {
                Requirement::Package { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Whether the package declares support for `core_version`. Packages
    /// without a core requirement are considered compatible.
    pub fn is_compatible_with(&self, core_version: &Version) -> DomainResult<bool> {
        match self.require.get(CORE_PACKAGE) {
            None => Ok(true),
            Some(raw) => Ok(Constraint::parse(raw)?.matches(core_version)),
        }
    }
}

pub fn validate_package_name(name: &str) -> DomainResult<()> {
    let valid_part = |part: &str| {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.'))
    };
    match name.split_once('/') {
        Some((vendor, pkg)) if valid_part(vendor) && valid_part(pkg) => Ok(()),
        _ => Err(DomainError::Validation(format!(
            "invalid package name '{name}', expected vendor/name"
        ))),
    }
}
