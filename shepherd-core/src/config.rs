use crate::error::{Result, ShepherdError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Variable naming the entry point to launch. No default; required.
pub const ENTRY_VAR: &str = "SHEPHERD_ENTRY";

/// Variable naming the working directory for the child. Optional.
pub const WORKDIR_VAR: &str = "SHEPHERD_WORKDIR";

/// Run-mode flag handed to the child.
pub const RUN_MODE_VAR: &str = "RUN_MODE";
pub const DEFAULT_RUN_MODE: &str = "production";

/// Network port handed to the child.
pub const PORT_VAR: &str = "PORT";
pub const DEFAULT_PORT: &str = "10000";

/// Resolved inputs used to spawn the child process.
///
/// Built once at startup from a snapshot of the process environment and never
/// mutated afterwards. The supervisor itself never touches the ambient
/// environment; only the merged copy in `env` is handed to the child.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaunchConfig {
    pub entry_point: PathBuf,
    pub env: BTreeMap<String, String>,
    pub working_directory: Option<PathBuf>,
}

impl LaunchConfig {
    pub fn new<P: AsRef<Path>>(entry_point: P) -> Self {
        Self {
            entry_point: entry_point.as_ref().to_path_buf(),
            env: BTreeMap::new(),
            working_directory: None,
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_working_directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.working_directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Build a configuration from the current process environment.
    pub fn from_env() -> Result<Self> {
        Self::resolve(std::env::vars().collect())
    }

    /// Resolve a configuration from an environment snapshot.
    ///
    /// Defaults are applied only where the corresponding variable is absent;
    /// every other variable in the snapshot passes through to the child
    /// unchanged.
    pub fn resolve(snapshot: BTreeMap<String, String>) -> Result<Self> {
        let entry_point = snapshot
            .get(ENTRY_VAR)
            .map(PathBuf::from)
            .ok_or_else(|| {
                ShepherdError::InvalidConfiguration(format!("{} is not set", ENTRY_VAR))
            })?;

        let working_directory = snapshot.get(WORKDIR_VAR).map(PathBuf::from);

        let mut env = snapshot;
        for (key, default) in [(RUN_MODE_VAR, DEFAULT_RUN_MODE), (PORT_VAR, DEFAULT_PORT)] {
            env.entry(key.to_string()).or_insert_with(|| default.to_string());
        }

        Ok(Self {
            entry_point,
            env,
            working_directory,
        })
    }

    /// Merged defaults make these lookups infallible after `resolve`.
    pub fn run_mode(&self) -> &str {
        self.env.get(RUN_MODE_VAR).map(String::as_str).unwrap_or(DEFAULT_RUN_MODE)
    }

    pub fn port(&self) -> &str {
        self.env.get(PORT_VAR).map(String::as_str).unwrap_or(DEFAULT_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_applies_defaults_when_absent() {
        let config =
            LaunchConfig::resolve(snapshot(&[(ENTRY_VAR, "/app/server.js")])).unwrap();

        assert_eq!(config.entry_point, PathBuf::from("/app/server.js"));
        assert_eq!(config.port(), "10000");
        assert_eq!(config.run_mode(), "production");
    }

    #[test]
    fn test_resolve_preserves_caller_values() {
        let config = LaunchConfig::resolve(snapshot(&[
            (ENTRY_VAR, "/app/server.js"),
            (PORT_VAR, "8080"),
            (RUN_MODE_VAR, "development"),
        ]))
        .unwrap();

        assert_eq!(config.port(), "8080");
        assert_eq!(config.run_mode(), "development");
    }

    #[test]
    fn test_resolve_passes_other_variables_through() {
        let config = LaunchConfig::resolve(snapshot(&[
            (ENTRY_VAR, "/app/server.js"),
            ("DATABASE_URL", "postgres://localhost/app"),
        ]))
        .unwrap();

        assert_eq!(
            config.env.get("DATABASE_URL").map(String::as_str),
            Some("postgres://localhost/app")
        );
    }

    #[test]
    fn test_resolve_requires_entry_point() {
        let err = LaunchConfig::resolve(snapshot(&[(PORT_VAR, "8080")])).unwrap_err();

        assert!(matches!(err, ShepherdError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_resolve_reads_working_directory() {
        let config = LaunchConfig::resolve(snapshot(&[
            (ENTRY_VAR, "/app/server.js"),
            (WORKDIR_VAR, "/srv/app"),
        ]))
        .unwrap();

        assert_eq!(config.working_directory, Some(PathBuf::from("/srv/app")));
    }
}
