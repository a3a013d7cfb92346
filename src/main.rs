use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use usb_hid_client::Config;
use usb_hid_client::config::DispatchMode;
use usb_hid_client::dispatch::{
    DeviceKeySink, DispatchSummary, Dispatcher, DryRunKeySink, KeySink, ShellKeySink,
};
use usb_hid_client::input::{InputEvent, KeyTables, Translator};
use usb_hid_client::provision::{ProvisionDependencies, ProvisionLock, Provisioner};
use usb_hid_client::report::{ReportWriter, gadget};

#[derive(Parser, Debug)]
#[command(name = "usb-hid-client")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("USB_HID_CLIENT_GIT_HASH"), ")"),
    about = "Use a rooted device as a USB keyboard"
)]
struct Cli {
    /// Config file to use instead of ~/.config/usb-hid-client/config.toml
    #[arg(long, short = 'c', global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the keyboard gadget and make it writable by a uid
    Provision {
        #[command(flatten)]
        target: DeviceTarget,
    },

    /// Create the keyboard gadget without touching its permissions
    CreateDevice,

    /// Fix owner, mode and security label of an existing gadget device
    FixPermissions {
        #[command(flatten)]
        target: DeviceTarget,
    },

    /// Remove the keyboard gadget
    Teardown,

    /// Type text on the connected host (reads stdin when TEXT is omitted)
    Type {
        text: Option<String>,

        #[command(flatten)]
        send: SendOptions,
    },

    /// Send a non-printing key by its Android key code (e.g. 131 for F1)
    Key {
        code: i32,

        #[command(flatten)]
        send: SendOptions,
    },

    /// Act as the hid-gadget backend: read key lines from stdin and write reports
    Gadget {
        device: PathBuf,

        #[arg(value_parser = ["keyboard"])]
        kind: String,
    },

    /// Write a config file populated with the defaults
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct DeviceTarget {
    /// Gadget device node (defaults to [device] keyboard_path)
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,

    /// Uid that should own the device (defaults to the calling uid)
    #[arg(long)]
    uid: Option<u32>,
}

#[derive(clap::Args, Debug)]
struct SendOptions {
    /// Print the backend command lines instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Override [dispatch] mode
    #[arg(long, value_enum)]
    mode: Option<DispatchMode>,

    /// Gadget device node (defaults to [device] keyboard_path)
    #[arg(long, value_name = "PATH")]
    device: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    if let Command::InitConfig { force } = cli.command {
        return init_config(&config_path, force);
    }

    let config = Config::load_from(&config_path)?;

    match cli.command {
        Command::Gadget { device, .. } => run_gadget(&device),
        Command::Type { text, send } => {
            let text = match text {
                Some(text) => text,
                None => {
                    // Invalid UTF-8 becomes U+FFFD and fails per character.
                    let mut bytes = Vec::new();
                    std::io::stdin()
                        .read_to_end(&mut bytes)
                        .context("Failed to read text from stdin")?;
                    String::from_utf8_lossy(&bytes).into_owned()
                }
            };
            let events: Vec<InputEvent> = text.chars().map(InputEvent::from_raw_char).collect();
            run_dispatch(&config, &send, events)
        }
        Command::Key { code, send } => {
            let tables = KeyTables::default();
            if tables.key_name(code).is_none() {
                bail!("Key code {} has no HID key", code);
            }
            run_dispatch(&config, &send, vec![InputEvent::NonPrintingKey(code)])
        }
        command => run_provisioning(&config, command),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn run_gadget(device: &Path) -> Result<()> {
    let mut writer = ReportWriter::open(device)
        .with_context(|| format!("Failed to open {}", device.display()))?;
    let stdin = std::io::stdin();
    let sent = gadget::run(stdin.lock(), &mut writer)?;
    log::info!("Sent {} key(s) to {}", sent, device.display());
    Ok(())
}

fn run_dispatch(config: &Config, send: &SendOptions, events: Vec<InputEvent>) -> Result<()> {
    let device = send
        .device
        .clone()
        .unwrap_or_else(|| config.device.keyboard_path.clone());
    let backend = config.dispatch.backend.clone();

    let sink: Box<dyn KeySink> = if send.dry_run {
        Box::new(DryRunKeySink::new(std::io::stdout(), backend, &device))
    } else {
        match send.mode.unwrap_or(config.dispatch.mode) {
            DispatchMode::Shell => Box::new(ShellKeySink::new(
                Arc::new(config.executor()),
                backend,
                device,
            )),
            DispatchMode::Device => Box::new(
                DeviceKeySink::open(&device)
                    .with_context(|| format!("Failed to open {}", device.display()))?,
            ),
        }
    };

    let tables = KeyTables::default();
    let dispatcher = Dispatcher::new(Translator::new(&tables), sink.as_ref());
    let summary = runtime()?.block_on(dispatcher.dispatch_all(events));
    report_summary(&summary)
}

fn report_summary(summary: &DispatchSummary) -> Result<()> {
    log::info!(
        "Sent {} key(s), ignored {} event(s)",
        summary.sent,
        summary.ignored
    );
    if summary.is_clean() {
        return Ok(());
    }
    for (event, err) in &summary.failures {
        eprintln!("{:?}: {}", event, err);
    }
    bail!("{} event(s) could not be sent", summary.failures.len())
}

fn run_provisioning(config: &Config, command: Command) -> Result<()> {
    let _lock = ProvisionLock::acquire(&config.lock_path())?;

    let options = config.provision_options();
    let deps = ProvisionDependencies::system(Arc::new(config.executor()), options.work_dir.clone());
    let provisioner = Provisioner::new(deps, options);
    let rt = runtime()?;

    match command {
        Command::Provision { target } => {
            let (device, uid) = resolve_target(config, target);
            let descriptor = rt.block_on(provisioner.provision(&device, uid))?;
            println!(
                "{} ready for uid {} ({})",
                descriptor.path.display(),
                descriptor.owner_uid,
                descriptor.selinux_context
            );
        }
        Command::CreateDevice => {
            rt.block_on(provisioner.create_device())?;
            println!("Gadget device created");
        }
        Command::FixPermissions { target } => {
            let (device, uid) = resolve_target(config, target);
            let descriptor = rt.block_on(provisioner.fix_permissions(&device, uid))?;
            println!(
                "{} ready for uid {} ({})",
                descriptor.path.display(),
                descriptor.owner_uid,
                descriptor.selinux_context
            );
        }
        Command::Teardown => {
            rt.block_on(provisioner.delete_device())?;
            println!("Gadget device removed");
        }
        other => bail!("{:?} is not a provisioning command", other),
    }
    Ok(())
}

fn resolve_target(config: &Config, target: DeviceTarget) -> (PathBuf, u32) {
    let device = target
        .device
        .unwrap_or_else(|| config.device.keyboard_path.clone());
    let uid = target
        .uid
        .unwrap_or_else(|| nix::unistd::getuid().as_raw());
    (device, uid)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create tokio runtime")
}
