use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::provision::{
    context::{SecurityContext, parse_context},
    dependencies::ProvisionDependencies,
    deploy::{CREATE_SCRIPT, DELETE_SCRIPT, Script},
    types::{DeviceDescriptor, ProvisionError, ProvisionOptions, ProvisionState, ProvisionStep},
};
use crate::shell::CommandOutput;

/// Creates the HID gadget device and makes it usable by an unprivileged uid.
///
/// Operations that touch the device are serialized: a call made while another
/// is still running fails with [`ProvisionError::InProgress`] instead of
/// interleaving privileged writes.
pub struct Provisioner {
    deps: ProvisionDependencies,
    options: ProvisionOptions,
    in_flight: Mutex<()>,
    state: Mutex<ProvisionState>,
}

impl Provisioner {
    pub fn new(deps: ProvisionDependencies, options: ProvisionOptions) -> Self {
        Self {
            deps,
            options,
            in_flight: Mutex::new(()),
            state: Mutex::new(ProvisionState::Unprovisioned),
        }
    }

    /// Current state of the most recent attempt.
    pub async fn state(&self) -> ProvisionState {
        self.state.lock().await.clone()
    }

    /// Full provisioning run: root check, device creation, wait for the node,
    /// then ownership and label fixes.
    pub async fn provision(
        &self,
        device_path: &Path,
        app_uid: u32,
    ) -> Result<DeviceDescriptor, ProvisionError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ProvisionError::InProgress)?;
        self.set_state(ProvisionState::Unprovisioned).await;

        let result = async {
            self.check_root().await?;
            self.create_device_inner().await?;
            self.wait_for_device(device_path).await?;
            self.fix_permissions_inner(device_path, app_uid).await
        }
        .await;
        self.record(result).await
    }

    /// Deploys and runs the device creation script.
    ///
    /// Safe to call repeatedly; the script leaves an existing gadget alone.
    pub async fn create_device(&self) -> Result<(), ProvisionError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ProvisionError::InProgress)?;
        let result = self.create_device_inner().await;
        self.record(result).await
    }

    /// Gives `app_uid` exclusive access to `device_path` and relabels it with
    /// the application's security level.
    pub async fn fix_permissions(
        &self,
        device_path: &Path,
        app_uid: u32,
    ) -> Result<DeviceDescriptor, ProvisionError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ProvisionError::InProgress)?;
        let result = self.fix_permissions_inner(device_path, app_uid).await;
        self.record(result).await
    }

    /// Removes the gadget function again.
    pub async fn delete_device(&self) -> Result<(), ProvisionError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| ProvisionError::InProgress)?;
        let result = async {
            let script_path = self.deploy(&DELETE_SCRIPT)?;
            self.run_script(ProvisionStep::Teardown, &script_path)
                .await
                .map(|_| ())
        }
        .await;
        let result = self.record(result).await;
        if result.is_ok() {
            self.set_state(ProvisionState::Unprovisioned).await;
        }
        result
    }

    /// Polls until the device node exists or the configured wait runs out.
    pub async fn wait_for_device(&self, path: &Path) -> Result<(), ProvisionError> {
        let started = tokio::time::Instant::now();
        loop {
            if self.deps.probe.exists(path) {
                log::info!("{} exists", path.display());
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= self.options.device_wait_timeout {
                log::error!(
                    "Device script ran, but {} did not appear within {:?}",
                    path.display(),
                    self.options.device_wait_timeout
                );
                return Err(ProvisionError::DeviceTimeout {
                    path: path.to_path_buf(),
                    waited,
                });
            }
            log::debug!("{} doesn't exist yet, retrying", path.display());
            tokio::time::sleep(self.options.device_poll_interval).await;
        }
    }

    async fn check_root(&self) -> Result<(), ProvisionError> {
        let output = self
            .run(ProvisionStep::CheckRoot, vec!["id -u".to_string()])
            .await
            .map_err(|err| match err {
                ProvisionError::ExecutionFailed { stderr, .. } => {
                    ProvisionError::RootUnavailable(stderr)
                }
                other => other,
            })?;
        let uid = output.stdout.trim();
        if uid != "0" {
            return Err(ProvisionError::RootUnavailable(format!(
                "privileged shell runs as uid {:?}",
                uid
            )));
        }
        Ok(())
    }

    async fn create_device_inner(&self) -> Result<(), ProvisionError> {
        let script_path = self.deploy(&CREATE_SCRIPT)?;
        self.set_state(ProvisionState::ScriptDeployed).await;

        self.run_script(ProvisionStep::CreateDevice, &script_path)
            .await?;
        self.set_state(ProvisionState::DeviceCreated).await;
        Ok(())
    }

    async fn fix_permissions_inner(
        &self,
        device_path: &Path,
        app_uid: u32,
    ) -> Result<DeviceDescriptor, ProvisionError> {
        let context = self.discover_context().await?;
        let device = device_path.display().to_string();

        // Owner and mode first so the label lands on the node the app owns.
        self.run(ProvisionStep::ChangeOwner, vec![chown_command(&device, app_uid)])
            .await?;
        self.run(ProvisionStep::ChangeMode, vec![chmod_command(&device)])
            .await?;
        self.set_state(ProvisionState::OwnershipFixed).await;

        // Owner and mode stay changed if labeling fails; say so in the cause.
        let label = self
            .grant_and_relabel(&device, &context)
            .await
            .map_err(|err| match err {
                ProvisionError::ExecutionFailed { step, stderr } => {
                    ProvisionError::ExecutionFailed {
                        step,
                        stderr: format!(
                            "{stderr} ({device} is already owned by uid {app_uid} with mode 600)"
                        ),
                    }
                }
                other => other,
            })?;
        self.set_state(ProvisionState::ContextFixed).await;

        log::info!(
            "{} provisioned for uid {} with label {}",
            device,
            app_uid,
            label
        );
        Ok(DeviceDescriptor {
            path: device_path.to_path_buf(),
            owner_uid: app_uid,
            selinux_context: label,
        })
    }

    async fn grant_and_relabel(
        &self,
        device: &str,
        context: &SecurityContext,
    ) -> Result<String, ProvisionError> {
        self.run(
            ProvisionStep::GrantPolicy,
            vec![policy_command(
                &self.options.policy_tool,
                &self.options.policy_domain,
                &self.options.device_type,
            )],
        )
        .await?;

        let label = context.device_label(&self.options.device_type);
        self.run(ProvisionStep::Relabel, vec![chcon_command(device, &label)])
            .await?;
        Ok(label)
    }

    async fn discover_context(&self) -> Result<SecurityContext, ProvisionError> {
        let query = format!("stat -c %C {}", self.options.context_path.display());
        let output = self.run(ProvisionStep::QueryContext, vec![query]).await?;
        let context = parse_context(&output.stdout).inspect_err(|_| {
            log::error!("Failed to get app's security context from {:?}", output.stdout)
        })?;
        log::debug!(
            "context (before,after): ({:?},{:?})",
            output.stdout,
            context.level()
        );
        Ok(context)
    }

    fn deploy(&self, script: &Script) -> Result<PathBuf, ProvisionError> {
        self.deps
            .deployer
            .deploy(script)
            .map_err(|source| ProvisionError::ScriptDeployFailed {
                script: script.name,
                source,
            })
    }

    async fn run_script(
        &self,
        step: ProvisionStep,
        script_path: &Path,
    ) -> Result<CommandOutput, ProvisionError> {
        self.run(step, vec![format!("sh {}", script_path.display())])
            .await
    }

    /// Runs one privileged session; a non-zero exit is a failure of `step`.
    async fn run(
        &self,
        step: ProvisionStep,
        commands: Vec<String>,
    ) -> Result<CommandOutput, ProvisionError> {
        log::debug!("{}: {:?}", step, commands);
        let output = self
            .deps
            .executor
            .execute(&commands)
            .await
            .map_err(|source| ProvisionError::Shell { step, source })?;

        if !output.success() {
            return Err(ProvisionError::ExecutionFailed {
                step,
                stderr: output.failure_message(),
            });
        }
        Ok(output)
    }

    async fn set_state(&self, state: ProvisionState) {
        log::debug!("Provisioning state -> {:?}", state);
        *self.state.lock().await = state;
    }

    async fn record<T>(&self, result: Result<T, ProvisionError>) -> Result<T, ProvisionError> {
        if let Err(err) = &result {
            log::error!("Provisioning failed: {}", err);
            if let Some(step) = err.step() {
                self.set_state(ProvisionState::Failed {
                    step,
                    cause: err.to_string(),
                })
                .await;
            }
        }
        result
    }
}

fn chown_command(device: &str, uid: u32) -> String {
    format!("chown {uid}:{uid} {device}")
}

fn chmod_command(device: &str) -> String {
    format!("chmod 600 {device}")
}

fn policy_command(tool: &str, domain: &str, device_type: &str) -> String {
    format!("{tool} 'allow {domain} {device_type} chr_file {{ getattr open write }}'")
}

fn chcon_command(device: &str, label: &str) -> String {
    format!("chcon {label} {device}")
}
