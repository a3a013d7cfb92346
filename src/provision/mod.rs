//! HID gadget device provisioning.
//!
//! This module makes `/dev/hidg0` usable by an unprivileged process:
//! - Deploy and run the gadget creation script
//! - Wait for the character device node to appear
//! - Discover the application's security level
//! - Fix ownership and mode, grant policy, and relabel the node

pub mod context;
pub mod deploy;
pub mod types;

mod dependencies;
mod lock;
mod provisioner;

pub use context::{SecurityContext, parse_context};
pub use dependencies::{DeviceProbe, FsDeviceProbe, ProvisionDependencies};
pub use deploy::{FsScriptDeployer, Script, ScriptDeployer};
pub use lock::ProvisionLock;
pub use provisioner::Provisioner;
pub use types::{
    DeviceDescriptor, ProvisionError, ProvisionOptions, ProvisionState, ProvisionStep,
};
