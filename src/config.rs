// src/config.rs
use crate::domain::{language::ClangId, package::Version};
use std::{env, path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
    Blackhole,
}

impl FromStr for CacheBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            "blackhole" => Ok(Self::Blackhole),
            other => Err(ConfigError::Invalid(format!(
                "SLY_CACHE must be memory, redis or blackhole, got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    cache_backend: CacheBackend,
    redis_url: Option<String>,
    cache_prefix: String,
    addon_dirs: Vec<PathBuf>,
    project_config: PathBuf,
    media_dir: PathBuf,
    assets_dir: PathBuf,
    default_clang: ClangId,
    core_version: Version,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_database_url() -> String {
    "sqlite://sly.db?mode=rwc".into()
}

fn default_addon_dirs() -> Vec<PathBuf> {
    vec!["addons".into(), "vendor".into()]
}

impl AppConfig {
    /// Build configuration from environment variables, reading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(default_database_url);

        let cache_backend = lookup("SLY_CACHE")
            .map(|raw| raw.parse::<CacheBackend>())
            .transpose()?
            .unwrap_or(CacheBackend::Memory);
        let redis_url = lookup("REDIS_URL");
        if cache_backend == CacheBackend::Redis && redis_url.is_none() {
            return Err(ConfigError::Missing("REDIS_URL"));
        }

        let cache_prefix = lookup("SLY_CACHE_PREFIX").unwrap_or_else(|| "sly".into());
        if cache_prefix.is_empty() || cache_prefix.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid(
                "SLY_CACHE_PREFIX must be a non-empty word".into(),
            ));
        }

        let addon_dirs = lookup("SLY_ADDON_DIRS")
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_else(default_addon_dirs);

        let project_config = lookup("SLY_PROJECT_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| "data/config/project.json".into());
        let media_dir = lookup("SLY_MEDIA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| "data/mediapool".into());
        let assets_dir = lookup("SLY_ASSETS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| "data/dyn/public".into());

        let default_clang = match lookup("SLY_DEFAULT_CLANG") {
            None => ClangId(1),
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|id| ClangId::new(id).ok())
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("SLY_DEFAULT_CLANG must be a positive id, got '{raw}'"))
                })?,
        };

        let raw_version =
            lookup("SLY_CORE_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        let core_version = Version::parse(&raw_version)
            .map_err(|err| ConfigError::Invalid(format!("SLY_CORE_VERSION: {err}")))?;

        Ok(Self {
            database_url,
            cache_backend,
            redis_url,
            cache_prefix,
            addon_dirs,
            project_config,
            media_dir,
            assets_dir,
            default_clang,
            core_version,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn cache_backend(&self) -> CacheBackend {
        self.cache_backend
    }

    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    pub fn cache_prefix(&self) -> &str {
        &self.cache_prefix
    }

    /// Directories scanned for `<vendor>/<name>/composer.json`.
    pub fn addon_dirs(&self) -> &[PathBuf] {
        &self.addon_dirs
    }

    pub fn project_config(&self) -> &PathBuf {
        &self.project_config
    }

    pub fn media_dir(&self) -> &PathBuf {
        &self.media_dir
    }

    pub fn assets_dir(&self) -> &PathBuf {
        &self.assets_dir
    }

    pub fn default_clang(&self) -> ClangId {
        self.default_clang
    }

    pub fn core_version(&self) -> &Version {
        &self.core_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.database_url(), "sqlite://sly.db?mode=rwc");
        assert_eq!(cfg.cache_backend(), CacheBackend::Memory);
        assert_eq!(cfg.cache_prefix(), "sly");
        assert_eq!(cfg.addon_dirs(), &[PathBuf::from("addons"), PathBuf::from("vendor")]);
        assert_eq!(cfg.default_clang(), ClangId(1));
        assert_eq!(cfg.core_version().to_string(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn redis_backend_needs_a_url() {
        assert!(matches!(
            config(&[("SLY_CACHE", "redis")]),
            Err(ConfigError::Missing("REDIS_URL"))
        ));
        let cfg = config(&[("SLY_CACHE", "Redis"), ("REDIS_URL", "redis://localhost")]).unwrap();
        assert_eq!(cfg.redis_url(), Some("redis://localhost"));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(config(&[("SLY_CACHE", "apc")]), Err(ConfigError::Invalid(_))));
        assert!(matches!(config(&[("SLY_DEFAULT_CLANG", "0")]), Err(ConfigError::Invalid(_))));
        assert!(matches!(config(&[("SLY_CORE_VERSION", "next")]), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn addon_dirs_are_comma_separated() {
        let cfg = config(&[("SLY_ADDON_DIRS", " addons , , local/addons ")]).unwrap();
        assert_eq!(
            cfg.addon_dirs(),
            &[PathBuf::from("addons"), PathBuf::from("local/addons")]
        );
    }
}
