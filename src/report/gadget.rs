//! `hid-gadget` compatible line protocol.
//!
//! Each input line names one key followed by optional modifier flags, e.g.
//! `a --left-shift` or `enter`. This is exactly what the shell dispatcher
//! pipes into its backend, so this binary can act as that backend.

use super::keyboard::{KeyboardReport, ReportWriter};
use super::usage;
use super::ReportError;
use std::io::{BufRead, Write};

/// Parses one backend line into a report.
pub fn parse_line(line: &str) -> Result<KeyboardReport, ReportError> {
    let mut key = None;
    let mut modifiers = 0u8;

    for part in line.split_whitespace() {
        if part.starts_with("--") {
            modifiers |= usage::modifier_option(part)
                .ok_or_else(|| ReportError::UnknownOption(part.to_string()))?;
        } else if key.is_none() {
            key = Some(part);
        } else {
            return Err(ReportError::UnknownKey(part.to_string()));
        }
    }

    // A lone space survives the shell as a line of whitespace.
    let name = match key {
        Some(name) => name,
        None if line.starts_with(' ') && modifiers == 0 => " ",
        None => return Err(ReportError::EmptyLine),
    };

    let key = usage::lookup(name).ok_or_else(|| ReportError::UnknownKey(name.to_string()))?;
    Ok(KeyboardReport::press(key.usage, key.modifiers | modifiers))
}

/// Reads lines until EOF and writes one keystroke per line.
///
/// Bad lines are logged and skipped; I/O errors on either side stop the loop.
/// Returns the number of keystrokes written.
pub fn run<R: BufRead, W: Write>(
    input: R,
    writer: &mut ReportWriter<W>,
) -> Result<usize, ReportError> {
    let mut sent = 0;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            continue;
        }
        match parse_line(trimmed) {
            Ok(report) => {
                writer.send(&report)?;
                sent += 1;
            }
            Err(err) => log::warn!("Skipping line {:?}: {}", trimmed, err),
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::usage::{MOD_LEFT_CTRL, MOD_LEFT_SHIFT};

    #[test]
    fn parses_key_with_modifiers() {
        let report = parse_line("c --left-ctrl --left-shift").unwrap();
        assert_eq!(report.modifiers, MOD_LEFT_CTRL | MOD_LEFT_SHIFT);
        assert_eq!(report.keys[0], 0x06);
    }

    #[test]
    fn modifiers_may_precede_key() {
        let report = parse_line("--left-shift 2").unwrap();
        assert_eq!(report, KeyboardReport::press(0x1f, MOD_LEFT_SHIFT));
    }

    #[test]
    fn lone_space_is_the_space_key() {
        assert_eq!(parse_line(" ").unwrap().keys[0], 0x2c);
    }

    #[test]
    fn rejects_unknown_options_and_extra_keys() {
        assert!(matches!(
            parse_line("a --hyper"),
            Err(ReportError::UnknownOption(_))
        ));
        assert!(matches!(parse_line("a b"), Err(ReportError::UnknownKey(_))));
        assert!(matches!(
            parse_line("--left-shift"),
            Err(ReportError::EmptyLine)
        ));
    }

    #[test]
    fn run_skips_bad_lines_and_counts_sent_keys() {
        let input = "h --left-shift\nnot-a-key\n\ni\nenter\n";
        let mut writer = ReportWriter::new(Vec::new());
        let sent = run(input.as_bytes(), &mut writer).unwrap();
        assert_eq!(sent, 3);
        assert_eq!(writer.into_inner().len(), 3 * 2 * 8);
    }
}
