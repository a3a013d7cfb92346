//! Sending translated keystrokes to the gadget.
//!
//! Translation produces transport-neutral [`KeyToken`]s. This module is where
//! they meet a concrete transport: either a privileged shell running the
//! `hid-gadget` backend, or the character device itself. Shell quoting is
//! applied here and nowhere else.

mod dispatcher;
mod sink;


pub use dispatcher::{DispatchSummary, Dispatcher};
pub use sink::{DeviceKeySink, DryRunKeySink, KeySink, ShellKeySink};

use crate::input::token::RESERVED_KEY_NAMES;
use crate::input::{KeyToken, TranslateError};
use crate::report::ReportError;
use crate::shell::ShellError;
use std::borrow::Cow;
use thiserror::Error;

/// Option passed to the backend when shift must be held.
pub const SHIFT_OPTION: &str = "--left-shift";

/// Errors raised while dispatching a single event.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Translate(#[from] TranslateError),

    #[error("privileged shell failed: {0}")]
    Shell(#[from] ShellError),

    #[error("backend rejected key {key:?}: {stderr}")]
    Backend { key: String, stderr: String },

    #[error("failed to write to device: {0}")]
    Io(#[from] std::io::Error),

    #[error("no HID usage for key {0:?}")]
    UnknownKey(String),
}

impl From<ReportError> for DispatchError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::UnknownKey(key) => DispatchError::UnknownKey(key),
            ReportError::Io(err) => DispatchError::Io(err),
            other => DispatchError::Backend {
                key: String::new(),
                stderr: other.to_string(),
            },
        }
    }
}

/// Makes a key name safe inside a double-quoted shell word.
///
/// Only `"`, `\` and `` ` `` get a backslash; every other name is returned
/// as is.
pub fn escape_for_dispatch(key_name: &str) -> Cow<'_, str> {
    if RESERVED_KEY_NAMES.contains(&key_name) {
        Cow::Owned(format!("\\{key_name}"))
    } else {
        Cow::Borrowed(key_name)
    }
}

/// The key name as it appears on the backend command line.
pub fn dispatch_form(token: &KeyToken) -> Cow<'_, str> {
    escape_for_dispatch(&token.key_name)
}

/// Builds `echo "<key>" [--left-shift] | <backend> <device> keyboard`.
pub fn shell_command_line(token: &KeyToken, backend: &str, device: &str) -> String {
    let key = dispatch_form(token);
    if token.shift() {
        format!("echo \"{key}\" {SHIFT_OPTION} | {backend} {device} keyboard")
    } else {
        format!("echo \"{key}\" | {backend} {device} keyboard")
    }
}
