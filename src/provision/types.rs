//! Data types for device provisioning.

use crate::shell::ShellError;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One stage of a provisioning attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    CheckRoot,
    DeployScript,
    CreateDevice,
    WaitForDevice,
    QueryContext,
    ChangeOwner,
    ChangeMode,
    GrantPolicy,
    Relabel,
    Teardown,
}

impl fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProvisionStep::CheckRoot => "root check",
            ProvisionStep::DeployScript => "script deployment",
            ProvisionStep::CreateDevice => "device creation",
            ProvisionStep::WaitForDevice => "waiting for device",
            ProvisionStep::QueryContext => "security context query",
            ProvisionStep::ChangeOwner => "chown",
            ProvisionStep::ChangeMode => "chmod",
            ProvisionStep::GrantPolicy => "policy grant",
            ProvisionStep::Relabel => "chcon",
            ProvisionStep::Teardown => "device teardown",
        };
        f.write_str(name)
    }
}

/// Where a provisioning attempt currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionState {
    Unprovisioned,
    ScriptDeployed,
    DeviceCreated,
    OwnershipFixed,
    /// Terminal success: owner, mode and label are all correct.
    ContextFixed,
    /// Terminal for this attempt; a retry starts again from `Unprovisioned`.
    Failed { step: ProvisionStep, cause: String },
}

/// A provisioned character device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub path: PathBuf,
    pub owner_uid: u32,
    /// Full label applied to the node, e.g. `u:object_r:device:s0:c512,c768`.
    pub selinux_context: String,
}

/// Errors that abort a provisioning attempt.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("root access is not available: {0}")]
    RootUnavailable(String),

    #[error("another provisioning attempt is already running")]
    InProgress,

    #[error("failed to acquire provisioning lock {}: {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deploy {script}: {source}")]
    ScriptDeployFailed {
        script: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} failed: {stderr}")]
    ExecutionFailed { step: ProvisionStep, stderr: String },

    #[error("{step} could not run: {source}")]
    Shell {
        step: ProvisionStep,
        #[source]
        source: ShellError,
    },

    #[error("context parse failed: no security level in {output:?}")]
    ContextParseFailed { output: String },

    #[error("{} did not appear within {waited:?}", .path.display())]
    DeviceTimeout { path: PathBuf, waited: Duration },
}

impl ProvisionError {
    /// The step this error belongs to, if it came from one.
    pub fn step(&self) -> Option<ProvisionStep> {
        match self {
            ProvisionError::RootUnavailable(_) => Some(ProvisionStep::CheckRoot),
            ProvisionError::InProgress | ProvisionError::Lock { .. } => None,
            ProvisionError::ScriptDeployFailed { .. } => Some(ProvisionStep::DeployScript),
            ProvisionError::ExecutionFailed { step, .. } | ProvisionError::Shell { step, .. } => {
                Some(*step)
            }
            ProvisionError::ContextParseFailed { .. } => Some(ProvisionStep::QueryContext),
            ProvisionError::DeviceTimeout { .. } => Some(ProvisionStep::WaitForDevice),
        }
    }
}

/// Runtime options derived from configuration for provisioning.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Writable directory the scripts are deployed to.
    pub work_dir: PathBuf,
    /// Path whose security context identifies the application.
    pub context_path: PathBuf,
    /// Live policy patch command, e.g. `magiskpolicy --live`.
    pub policy_tool: String,
    /// Security domain granted access to the device.
    pub policy_domain: String,
    /// Security type of the device node.
    pub device_type: String,
    pub device_wait_timeout: Duration,
    pub device_poll_interval: Duration,
}

impl ProvisionOptions {
    /// Options with stock values rooted at `work_dir`. Intended mainly for tests.
    pub fn new(work_dir: PathBuf) -> Self {
        Self {
            context_path: work_dir.clone(),
            work_dir,
            policy_tool: "magiskpolicy --live".to_string(),
            policy_domain: "untrusted_app".to_string(),
            device_type: "device".to_string(),
            device_wait_timeout: Duration::from_secs(5),
            device_poll_interval: Duration::from_millis(200),
        }
    }
}
