use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::provision::deploy::{FsScriptDeployer, ScriptDeployer};
use crate::shell::PrivilegedExecutor;

/// Answers whether a device node exists yet.
pub trait DeviceProbe: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
}

/// Probes the real filesystem.
pub struct FsDeviceProbe;

impl DeviceProbe for FsDeviceProbe {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Bundle of collaborators used by the provisioner. Each one can be mocked in tests.
#[derive(Clone)]
pub struct ProvisionDependencies {
    pub executor: Arc<dyn PrivilegedExecutor>,
    pub deployer: Arc<dyn ScriptDeployer>,
    pub probe: Arc<dyn DeviceProbe>,
}

impl ProvisionDependencies {
    /// Real filesystem collaborators around the given executor.
    pub fn system(executor: Arc<dyn PrivilegedExecutor>, work_dir: PathBuf) -> Self {
        Self {
            executor,
            deployer: Arc::new(FsScriptDeployer::new(work_dir)),
            probe: Arc::new(FsDeviceProbe),
        }
    }
}
