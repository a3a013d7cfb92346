//! Boot-protocol keyboard reports and the writer that sends them.

use super::usage::{self, MOD_LEFT_SHIFT};
use super::ReportError;
use crate::input::KeyToken;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Length of a boot keyboard input report.
pub const REPORT_LEN: usize = 8;

/// An 8-byte boot keyboard report: modifier bits, a reserved byte, and up to
/// six pressed usages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardReport {
    pub modifiers: u8,
    pub keys: [u8; 6],
}

impl KeyboardReport {
    /// The all-keys-up report.
    pub const RELEASE: Self = Self {
        modifiers: 0,
        keys: [0; 6],
    };

    /// Report pressing a single usage with the given modifiers.
    pub fn press(usage: u8, modifiers: u8) -> Self {
        Self {
            modifiers,
            keys: [usage, 0, 0, 0, 0, 0],
        }
    }

    /// Report for a translated key token.
    pub fn from_token(token: &KeyToken) -> Result<Self, ReportError> {
        let key = usage::lookup(&token.key_name)
            .ok_or_else(|| ReportError::UnknownKey(token.key_name.clone()))?;
        let mut modifiers = key.modifiers;
        if token.shift() {
            modifiers |= MOD_LEFT_SHIFT;
        }
        Ok(Self::press(key.usage, modifiers))
    }

    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let k = &self.keys;
        [self.modifiers, 0, k[0], k[1], k[2], k[3], k[4], k[5]]
    }
}

/// Writes press/release report pairs to a HID gadget device (or any sink).
pub struct ReportWriter<W: Write> {
    sink: W,
}

impl ReportWriter<File> {
    /// Opens a gadget character device for writing.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().write(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Sends one keystroke: the press report followed by a release.
    pub fn send(&mut self, report: &KeyboardReport) -> std::io::Result<()> {
        self.sink.write_all(&report.to_bytes())?;
        self.sink.write_all(&KeyboardReport::RELEASE.to_bytes())?;
        self.sink.flush()?;
        log::debug!("Sent keyboard report: {:02X?}", report.to_bytes());
        Ok(())
    }

    /// Translates and sends a key token.
    pub fn send_token(&mut self, token: &KeyToken) -> Result<(), ReportError> {
        let report = KeyboardReport::from_token(token)?;
        self.send(&report)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_layout_has_reserved_second_byte() {
        let report = KeyboardReport::press(0x04, MOD_LEFT_SHIFT);
        assert_eq!(report.to_bytes(), [0x02, 0, 0x04, 0, 0, 0, 0, 0]);
        assert_eq!(KeyboardReport::RELEASE.to_bytes(), [0; 8]);
    }

    #[test]
    fn shifted_token_sets_left_shift() {
        let report = KeyboardReport::from_token(&KeyToken::shifted("1")).unwrap();
        assert_eq!(report.modifiers, MOD_LEFT_SHIFT);
        assert_eq!(report.keys[0], 0x1e);
    }

    #[test]
    fn double_quote_token_gets_implied_shift() {
        let report = KeyboardReport::from_token(&KeyToken::plain("\"")).unwrap();
        assert_eq!(report.modifiers, MOD_LEFT_SHIFT);
        assert_eq!(report.keys[0], 0x34);
    }

    #[test]
    fn unknown_key_is_an_error() {
        let err = KeyboardReport::from_token(&KeyToken::plain("hyper")).unwrap_err();
        assert!(matches!(err, ReportError::UnknownKey(name) if name == "hyper"));
    }

    #[test]
    fn writer_sends_press_then_release() {
        let mut writer = ReportWriter::new(Vec::new());
        writer.send_token(&KeyToken::plain("enter")).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), 2 * REPORT_LEN);
        assert_eq!(bytes[2], 0x28);
        assert!(bytes[REPORT_LEN..].iter().all(|b| *b == 0));
    }
}
