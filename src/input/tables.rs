//! Static lookup tables used by the translator.
//!
//! Both tables are plain data built once at start-up and handed to the
//! translator by reference.

use std::collections::HashMap;

// ============================================================================
// Android key codes for non-printing keys
// ============================================================================

pub const KEYCODE_TAB: i32 = 61;
pub const KEYCODE_DEL: i32 = 67;
pub const KEYCODE_ESCAPE: i32 = 111;
pub const KEYCODE_FORWARD_DEL: i32 = 112;
pub const KEYCODE_SCROLL_LOCK: i32 = 116;
pub const KEYCODE_SYSRQ: i32 = 120;
pub const KEYCODE_BREAK: i32 = 121;
pub const KEYCODE_INSERT: i32 = 124;
pub const KEYCODE_F1: i32 = 131;
pub const KEYCODE_F12: i32 = 142;
pub const KEYCODE_NUM_LOCK: i32 = 143;

/// Characters typed with shift on a US layout, paired with their unshifted key.
///
/// `"` is deliberately absent: it travels as its own (escaped) key name and
/// the report encoder supplies the shift.
pub const SHIFTED_CHARACTERS: [(char, &str); 20] = [
    ('<', ","),
    ('>', "."),
    ('?', "/"),
    (':', ";"),
    ('{', "["),
    ('}', "]"),
    ('|', "\\"),
    ('~', "`"),
    ('!', "1"),
    ('@', "2"),
    ('#', "3"),
    ('$', "4"),
    ('%', "5"),
    ('^', "6"),
    ('&', "7"),
    ('*', "8"),
    ('(', "9"),
    (')', "0"),
    ('_', "-"),
    ('+', "="),
];

/// Platform key codes for keys that produce no character.
pub const NON_PRINTING_KEYS: [(i32, &str); 21] = [
    (KEYCODE_F1, "f1"),
    (132, "f2"),
    (133, "f3"),
    (134, "f4"),
    (135, "f5"),
    (136, "f6"),
    (137, "f7"),
    (138, "f8"),
    (139, "f9"),
    (140, "f10"),
    (141, "f11"),
    (KEYCODE_F12, "f12"),
    (KEYCODE_TAB, "tab"),
    (KEYCODE_DEL, "backspace"),
    (KEYCODE_ESCAPE, "escape"),
    (KEYCODE_SYSRQ, "print"),
    (KEYCODE_SCROLL_LOCK, "scroll-lock"),
    (KEYCODE_NUM_LOCK, "num-lock"),
    (KEYCODE_BREAK, "pause"),
    (KEYCODE_INSERT, "insert"),
    (KEYCODE_FORWARD_DEL, "delete"),
];

/// The shift map and the non-printing key map.
#[derive(Debug, Clone)]
pub struct KeyTables {
    shift_map: HashMap<char, &'static str>,
    key_codes: HashMap<i32, &'static str>,
}

impl Default for KeyTables {
    fn default() -> Self {
        Self::us_layout()
    }
}

impl KeyTables {
    /// Tables for a US keyboard layout and Android key codes.
    pub fn us_layout() -> Self {
        Self {
            shift_map: SHIFTED_CHARACTERS.iter().copied().collect(),
            key_codes: NON_PRINTING_KEYS.iter().copied().collect(),
        }
    }

    /// Base key for a shifted character, if it has one.
    pub fn shifted_base(&self, c: char) -> Option<&'static str> {
        self.shift_map.get(&c).copied()
    }

    /// Key name for a non-printing key code.
    pub fn key_name(&self, code: i32) -> Option<&'static str> {
        self.key_codes.get(&code).copied()
    }

    /// Iterates over `(shifted, base)` pairs.
    #[cfg(test)]
    pub(crate) fn shift_entries(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        self.shift_map.iter().map(|(c, base)| (*c, *base))
    }

    /// Iterates over `(code, name)` pairs.
    #[cfg(test)]
    pub(crate) fn key_code_entries(&self) -> impl Iterator<Item = (i32, &'static str)> + '_ {
        self.key_codes.iter().map(|(code, name)| (*code, *name))
    }

    /// True if `name` is one of the non-printing key names.
    #[cfg(test)]
    pub(crate) fn is_named_key(&self, name: &str) -> bool {
        self.key_codes.values().any(|known| *known == name)
    }
}
