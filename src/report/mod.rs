//! HID keyboard report encoding.
//!
//! Maps key names to USB HID usage IDs and writes boot-protocol reports to a
//! gadget character device. Used directly by the device dispatcher and by the
//! `gadget` subcommand, which speaks the `hid-gadget` line protocol.

pub mod gadget;
pub mod keyboard;
pub mod usage;

pub use keyboard::{KeyboardReport, ReportWriter};

use thiserror::Error;

/// Errors raised while building or writing reports.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no HID usage for key {0:?}")]
    UnknownKey(String),

    #[error("unknown modifier option {0:?}")]
    UnknownOption(String),

    #[error("line names no key")]
    EmptyLine,

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}
