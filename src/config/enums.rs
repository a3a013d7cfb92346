//! Configuration enum types.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Transport used to deliver keystrokes.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    /// Run the backend through the privileged shell, one invocation per key
    #[default]
    Shell,
    /// Write reports to the gadget device (requires a provisioned device)
    Device,
}
