//! Portal configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_STORAGE_DIR: &str = ".portal";

/// Configuration values controlling where durable slots live.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Directory holding one JSON file per storage slot.
    pub storage_dir: Option<PathBuf>,
    /// Keep slots in memory only; nothing survives the process.
    #[ortho_config(default = false)]
    pub ephemeral: bool,
}

impl PortalSettings {
    /// Return the configured storage directory, falling back to the default.
    #[must_use]
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for portal configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("portal")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("PORTAL_STORAGE_DIR", None::<String>),
            ("PORTAL_EPHEMERAL", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(!settings.ephemeral);
        assert_eq!(settings.storage_dir(), PathBuf::from(DEFAULT_STORAGE_DIR));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PORTAL_STORAGE_DIR", Some("/tmp/portal-slots".to_owned())),
            ("PORTAL_EPHEMERAL", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.ephemeral);
        assert_eq!(settings.storage_dir(), PathBuf::from("/tmp/portal-slots"));
    }
}
