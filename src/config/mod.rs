//! Configuration file support for usb-hid-client.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/usb-hid-client/config.toml`. Settings cover the gadget device
//! path, the privileged shell, provisioning details, and how keystrokes are dispatched.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

// Re-export commonly used types at module level
pub use enums::DispatchMode;
pub use types::{DeviceConfig, DispatchConfig, ProvisionConfig, ShellConfig};

use crate::provision::ProvisionOptions;
use crate::shell::SuExecutor;
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [device]
/// keyboard_path = "/dev/hidg0"
///
/// [shell]
/// program = "su"
/// timeout_secs = 10
///
/// [provision]
/// work_dir = "/data/local/tmp/usb-hid-client"
/// policy_tool = "magiskpolicy --live"
///
/// [dispatch]
/// mode = "shell"
/// backend = "hid-gadget"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Gadget device paths
    #[serde(default)]
    pub device: DeviceConfig,

    /// Privileged shell used for provisioning and shell dispatch
    #[serde(default)]
    pub shell: ShellConfig,

    /// Device creation and permission fixing
    #[serde(default)]
    pub provision: ProvisionConfig,

    /// Keystroke delivery
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `shell.timeout_secs`: 1 - 300
    /// - `provision.device_wait_ms`: 100 - 60000
    /// - `provision.device_poll_ms`: 10 - 5000
    fn validate_and_clamp(&mut self) {
        if !(1..=300).contains(&self.shell.timeout_secs) {
            log::warn!(
                "Invalid shell timeout_secs {}, clamping to 1-300 range",
                self.shell.timeout_secs
            );
            self.shell.timeout_secs = self.shell.timeout_secs.clamp(1, 300);
        }

        if !(100..=60_000).contains(&self.provision.device_wait_ms) {
            log::warn!(
                "Invalid device_wait_ms {}, clamping to 100-60000 range",
                self.provision.device_wait_ms
            );
            self.provision.device_wait_ms = self.provision.device_wait_ms.clamp(100, 60_000);
        }

        if !(10..=5000).contains(&self.provision.device_poll_ms) {
            log::warn!(
                "Invalid device_poll_ms {}, clamping to 10-5000 range",
                self.provision.device_poll_ms
            );
            self.provision.device_poll_ms = self.provision.device_poll_ms.clamp(10, 5000);
        }

        if self.shell.program.trim().is_empty() {
            log::warn!("Empty shell program, falling back to 'su'");
            self.shell.program = "su".to_string();
        }

        if self.dispatch.backend.trim().is_empty() {
            log::warn!("Empty dispatch backend, falling back to 'hid-gadget'");
            self.dispatch.backend = "hid-gadget".to_string();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/usb-hid-client/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("usb-hid-client");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Loads configuration from `config_path`, or returns defaults if it doesn't exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Writes the configuration as TOML to `config_path`, creating parent directories.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file, for editors and tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Privileged executor described by the `[shell]` section.
    pub fn executor(&self) -> SuExecutor {
        SuExecutor::new(
            self.shell.program.clone(),
            self.shell.args.clone(),
            Duration::from_secs(self.shell.timeout_secs),
        )
    }

    /// Provisioning options described by the `[provision]` section.
    pub fn provision_options(&self) -> ProvisionOptions {
        let provision = &self.provision;
        ProvisionOptions {
            work_dir: provision.work_dir.clone(),
            context_path: provision
                .context_path
                .clone()
                .unwrap_or_else(|| provision.work_dir.clone()),
            policy_tool: provision.policy_tool.clone(),
            policy_domain: provision.policy_domain.clone(),
            device_type: provision.device_type.clone(),
            device_wait_timeout: Duration::from_millis(provision.device_wait_ms),
            device_poll_interval: Duration::from_millis(provision.device_poll_ms),
        }
    }

    /// Lock file that keeps separate processes from provisioning at once.
    pub fn lock_path(&self) -> PathBuf {
        self.provision.work_dir.join("provision.lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.device.keyboard_path, PathBuf::from("/dev/hidg0"));
        assert_eq!(config.shell.program, "su");
        assert_eq!(config.dispatch.mode, DispatchMode::Shell);
        assert_eq!(config.dispatch.backend, "hid-gadget");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[dispatch]\nmode = \"device\"\n\n[provision]\nwork_dir = \"/data/local/tmp/hid\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.dispatch.mode, DispatchMode::Device);
        assert_eq!(config.dispatch.backend, "hid-gadget");

        let options = config.provision_options();
        assert_eq!(options.work_dir, PathBuf::from("/data/local/tmp/hid"));
        assert_eq!(options.context_path, PathBuf::from("/data/local/tmp/hid"));
        assert_eq!(options.policy_tool, "magiskpolicy --live");
        assert_eq!(options.device_wait_timeout, Duration::from_secs(5));
        assert_eq!(options.device_poll_interval, Duration::from_millis(200));
        assert_eq!(
            config.lock_path(),
            PathBuf::from("/data/local/tmp/hid/provision.lock")
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[shell]\nprogram = \"\"\ntimeout_secs = 0\n\n[provision]\ndevice_wait_ms = 999999\ndevice_poll_ms = 1\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.shell.timeout_secs, 1);
        assert_eq!(config.shell.program, "su");
        assert_eq!(config.provision.device_wait_ms, 60_000);
        assert_eq!(config.provision.device_poll_ms, 10);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[dispatch\nmode = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn saved_config_loads_back() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.shell.args = vec!["-M".to_string()];
        config.provision.context_path = Some(PathBuf::from("/data/data/me.example"));

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn executor_uses_shell_section() {
        let mut config = Config::default();
        config.shell.program = "/system/xbin/su".to_string();
        assert_eq!(config.executor().program(), "/system/xbin/su");
    }

    #[test]
    fn schema_names_every_section() {
        let schema = serde_json::to_value(Config::json_schema()).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for section in ["device", "shell", "provision", "dispatch"] {
            assert!(properties.contains_key(section), "{section}");
        }
    }
}
