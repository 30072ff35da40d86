//! Engine settings
//!
//! Process-level knobs that are not part of the validation document: where
//! the document lives, how many plugin steps may run at once, and where
//! candidate files are staged for plugins.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const MAX_CONCURRENT_STEPS: usize = 4;
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineSettings {
    /// Path of the JSON validation document, if loaded from disk.
    pub config_path: Option<PathBuf>,
    /// Upper bound on steps of one phase running at the same time.
    /// `1` runs every phase strictly in declaration order.
    pub max_concurrent_steps: usize,
    /// Root for per-validation staging directories. Defaults to the system
    /// temp dir.
    pub temp_dir: Option<PathBuf>,
    pub http_connect_timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            config_path: None,
            max_concurrent_steps: MAX_CONCURRENT_STEPS,
            temp_dir: None,
            http_connect_timeout_secs: HTTP_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl EngineSettings {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let settings = Self {
            config_path: env::var("FILEGATE_CONFIG_PATH").ok().map(PathBuf::from),
            max_concurrent_steps: parse_var(
                "FILEGATE_MAX_CONCURRENT_STEPS",
                MAX_CONCURRENT_STEPS,
            )?,
            temp_dir: env::var("FILEGATE_TEMP_DIR").ok().map(PathBuf::from),
            http_connect_timeout_secs: parse_var(
                "FILEGATE_HTTP_CONNECT_TIMEOUT_SECS",
                HTTP_CONNECT_TIMEOUT_SECS,
            )?,
        };

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_concurrent_steps == 0 {
            return Err(anyhow::anyhow!(
                "FILEGATE_MAX_CONCURRENT_STEPS must be at least 1"
            ));
        }

        if let Some(dir) = &self.temp_dir {
            if !dir.is_dir() {
                return Err(anyhow::anyhow!(
                    "FILEGATE_TEMP_DIR {} is not a directory",
                    dir.display()
                ));
            }
        }

        if self.http_connect_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "FILEGATE_HTTP_CONNECT_TIMEOUT_SECS must be at least 1"
            ));
        }

        Ok(())
    }

    pub fn with_max_concurrent_steps(mut self, limit: usize) -> Self {
        self.max_concurrent_steps = limit;
        self
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, anyhow::Error> {
    match env::var(name) {
        Ok(value) => value.trim().parse::<T>().map_err(|_| {
            anyhow::anyhow!("{} must be a positive integer, got '{}'", name, value)
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = EngineSettings::default();
        assert_eq!(settings.max_concurrent_steps, 4);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let settings = EngineSettings::default().with_max_concurrent_steps(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_temp_dir_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let settings = EngineSettings::default().with_temp_dir(dir.path());
        assert!(settings.validate().is_ok());

        let settings = EngineSettings::default().with_temp_dir(dir.path().join("missing"));
        assert!(settings.validate().is_err());
    }

    // The only test touching FILEGATE_* variables, so it cannot race others.
    #[test]
    fn test_from_env() {
        let dir = tempfile::tempdir().unwrap();
        env::set_var("FILEGATE_CONFIG_PATH", dir.path().join("filegate.json"));
        env::set_var("FILEGATE_MAX_CONCURRENT_STEPS", "2");
        env::set_var("FILEGATE_TEMP_DIR", dir.path());
        env::set_var("FILEGATE_HTTP_CONNECT_TIMEOUT_SECS", " 3 ");

        let settings = EngineSettings::from_env().unwrap();
        assert_eq!(settings.config_path, Some(dir.path().join("filegate.json")));
        assert_eq!(settings.max_concurrent_steps, 2);
        assert_eq!(settings.temp_dir.as_deref(), Some(dir.path()));
        assert_eq!(settings.http_connect_timeout_secs, 3);

        env::set_var("FILEGATE_HTTP_CONNECT_TIMEOUT_SECS", "ten");
        let err = EngineSettings::from_env().unwrap_err();
        assert!(err.to_string().contains("FILEGATE_HTTP_CONNECT_TIMEOUT_SECS"));

        env::remove_var("FILEGATE_HTTP_CONNECT_TIMEOUT_SECS");
        env::set_var("FILEGATE_MAX_CONCURRENT_STEPS", "many");
        let err = EngineSettings::from_env().unwrap_err();
        assert!(err.to_string().contains("FILEGATE_MAX_CONCURRENT_STEPS"));

        env::set_var("FILEGATE_MAX_CONCURRENT_STEPS", "0");
        assert!(EngineSettings::from_env().is_err());

        for name in [
            "FILEGATE_CONFIG_PATH",
            "FILEGATE_MAX_CONCURRENT_STEPS",
            "FILEGATE_TEMP_DIR",
        ] {
            env::remove_var(name);
        }
        let settings = EngineSettings::from_env().unwrap();
        assert_eq!(settings, EngineSettings::default());
    }
}
