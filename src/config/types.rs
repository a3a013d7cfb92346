//! Configuration type definitions.

use super::enums::DispatchMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Gadget device settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeviceConfig {
    /// Keyboard gadget character device
    #[serde(default = "default_keyboard_path")]
    pub keyboard_path: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            keyboard_path: default_keyboard_path(),
        }
    }
}

/// Privileged shell settings.
///
/// Every privileged operation starts `program` with `args` and feeds it
/// command lines on stdin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShellConfig {
    /// Program that provides a root shell (e.g. "su")
    #[serde(default = "default_shell_program")]
    pub program: String,

    /// Extra arguments passed to the program
    #[serde(default)]
    pub args: Vec<String>,

    /// Seconds before a privileged session is killed (valid range: 1 - 300)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_shell_program(),
            args: Vec::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Device provisioning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProvisionConfig {
    /// Directory the gadget scripts are deployed to
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Path whose security context identifies this application.
    /// Defaults to `work_dir` when unset.
    #[serde(default)]
    pub context_path: Option<PathBuf>,

    /// Command that patches the live security policy
    #[serde(default = "default_policy_tool")]
    pub policy_tool: String,

    /// Domain granted access to the device node
    #[serde(default = "default_policy_domain")]
    pub policy_domain: String,

    /// Security type used when relabeling the device node
    #[serde(default = "default_device_type")]
    pub device_type: String,

    /// How long to wait for the device to appear, in milliseconds (valid range: 100 - 60000)
    #[serde(default = "default_device_wait_ms")]
    pub device_wait_ms: u64,

    /// Interval between existence checks, in milliseconds (valid range: 10 - 5000)
    #[serde(default = "default_device_poll_ms")]
    pub device_poll_ms: u64,
}

impl Default for ProvisionConfig {
    fn default() -> Self {
        Self {
            work_dir: default_work_dir(),
            context_path: None,
            policy_tool: default_policy_tool(),
            policy_domain: default_policy_domain(),
            device_type: default_device_type(),
            device_wait_ms: default_device_wait_ms(),
            device_poll_ms: default_device_poll_ms(),
        }
    }
}

/// Keystroke dispatch settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DispatchConfig {
    /// How keys reach the gadget: through the backend in a root shell, or by
    /// writing reports to the device directly
    #[serde(default)]
    pub mode: DispatchMode,

    /// Backend program invoked as `<backend> <device> keyboard`
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: DispatchMode::default(),
            backend: default_backend(),
        }
    }
}

fn default_keyboard_path() -> PathBuf {
    PathBuf::from("/dev/hidg0")
}

fn default_shell_program() -> String {
    "su".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_work_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("usb-hid-client")
}

fn default_policy_tool() -> String {
    "magiskpolicy --live".to_string()
}

fn default_policy_domain() -> String {
    "untrusted_app".to_string()
}

fn default_device_type() -> String {
    "device".to_string()
}

fn default_device_wait_ms() -> u64 {
    5000
}

fn default_device_poll_ms() -> u64 {
    200
}

fn default_backend() -> String {
    "hid-gadget".to_string()
}
