use super::{DispatchError, shell_command_line};
use crate::input::KeyToken;
use crate::report::ReportWriter;
use crate::shell::PrivilegedExecutor;
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Somewhere a keystroke can be delivered.
#[async_trait]
pub trait KeySink: Send + Sync {
    async fn send_key(&self, token: &KeyToken) -> Result<(), DispatchError>;
}

/// Pipes each key through the `hid-gadget` backend in a privileged shell.
pub struct ShellKeySink {
    executor: Arc<dyn PrivilegedExecutor>,
    backend: String,
    device: PathBuf,
}

impl ShellKeySink {
    pub fn new(executor: Arc<dyn PrivilegedExecutor>, backend: String, device: PathBuf) -> Self {
        Self {
            executor,
            backend,
            device,
        }
    }

    pub fn command_line(&self, token: &KeyToken) -> String {
        shell_command_line(token, &self.backend, &self.device.display().to_string())
    }
}

#[async_trait]
impl KeySink for ShellKeySink {
    async fn send_key(&self, token: &KeyToken) -> Result<(), DispatchError> {
        let command = self.command_line(token);
        log::debug!("Dispatching: {}", command);
        let output = self.executor.execute(&[command]).await?;
        if !output.success() {
            return Err(DispatchError::Backend {
                key: token.key_name.clone(),
                stderr: output.failure_message(),
            });
        }
        Ok(())
    }
}

/// Writes reports straight to the gadget device.
///
/// Requires the device to be owned by the calling uid, which is what
/// provisioning arranges.
pub struct DeviceKeySink<W: Write + Send> {
    writer: Mutex<ReportWriter<W>>,
}

impl DeviceKeySink<std::fs::File> {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let writer = ReportWriter::open(path)?;
        log::info!("Writing reports to {}", path.display());
        Ok(Self::new(writer))
    }
}

impl<W: Write + Send> DeviceKeySink<W> {
    pub fn new(writer: ReportWriter<W>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> KeySink for DeviceKeySink<W> {
    async fn send_key(&self, token: &KeyToken) -> Result<(), DispatchError> {
        let mut writer = self.writer.lock().await;
        writer.send_token(token)?;
        Ok(())
    }
}

/// Prints the shell command line for each key instead of running it.
pub struct DryRunKeySink<W: Write + Send> {
    out: Mutex<W>,
    backend: String,
    device: String,
}

impl<W: Write + Send> DryRunKeySink<W> {
    pub fn new(out: W, backend: String, device: &Path) -> Self {
        Self {
            out: Mutex::new(out),
            backend,
            device: device.display().to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

#[async_trait]
impl<W: Write + Send> KeySink for DryRunKeySink<W> {
    async fn send_key(&self, token: &KeyToken) -> Result<(), DispatchError> {
        let line = shell_command_line(token, &self.backend, &self.device);
        let mut out = self.out.lock().await;
        writeln!(out, "{line}")?;
        Ok(())
    }
}
