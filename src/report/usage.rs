//! HID usage IDs for the keyboard/keypad usage page (0x07).

// ============================================================================
// Modifier bits (byte 0 of a boot keyboard report)
// ============================================================================

pub const MOD_LEFT_CTRL: u8 = 0x01;
pub const MOD_LEFT_SHIFT: u8 = 0x02;
pub const MOD_LEFT_ALT: u8 = 0x04;
pub const MOD_LEFT_META: u8 = 0x08;
pub const MOD_RIGHT_CTRL: u8 = 0x10;
pub const MOD_RIGHT_SHIFT: u8 = 0x20;
pub const MOD_RIGHT_ALT: u8 = 0x40;
pub const MOD_RIGHT_META: u8 = 0x80;

// ============================================================================
// Usage IDs
// ============================================================================

pub const USAGE_A: u8 = 0x04;
pub const USAGE_1: u8 = 0x1e;
pub const USAGE_0: u8 = 0x27;
pub const USAGE_ENTER: u8 = 0x28;
pub const USAGE_ESCAPE: u8 = 0x29;
pub const USAGE_BACKSPACE: u8 = 0x2a;
pub const USAGE_TAB: u8 = 0x2b;
pub const USAGE_SPACE: u8 = 0x2c;
pub const USAGE_F1: u8 = 0x3a;

/// A usage ID together with any modifier the key implies on a US layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUsage {
    pub usage: u8,
    pub modifiers: u8,
}

impl KeyUsage {
    const fn plain(usage: u8) -> Self {
        Self {
            usage,
            modifiers: 0,
        }
    }

    const fn shifted(usage: u8) -> Self {
        Self {
            usage,
            modifiers: MOD_LEFT_SHIFT,
        }
    }
}

/// Resolves a key name to its usage ID.
///
/// Accepts single printable ASCII characters (shifted symbols and uppercase
/// letters carry an implied shift) and the named keys understood by
/// `hid-gadget` style backends. Returns `None` for anything else.
pub fn lookup(name: &str) -> Option<KeyUsage> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return char_usage(c);
    }
    named_usage(name).map(KeyUsage::plain)
}

fn char_usage(c: char) -> Option<KeyUsage> {
    let usage = match c {
        'a'..='z' => KeyUsage::plain(USAGE_A + (c as u8 - b'a')),
        'A'..='Z' => KeyUsage::shifted(USAGE_A + (c as u8 - b'A')),
        '1'..='9' => KeyUsage::plain(USAGE_1 + (c as u8 - b'1')),
        '0' => KeyUsage::plain(USAGE_0),
        ' ' => KeyUsage::plain(USAGE_SPACE),
        '-' => KeyUsage::plain(0x2d),
        '=' => KeyUsage::plain(0x2e),
        '[' => KeyUsage::plain(0x2f),
        ']' => KeyUsage::plain(0x30),
        '\\' => KeyUsage::plain(0x31),
        ';' => KeyUsage::plain(0x33),
        '\'' => KeyUsage::plain(0x34),
        '`' => KeyUsage::plain(0x35),
        ',' => KeyUsage::plain(0x36),
        '.' => KeyUsage::plain(0x37),
        '/' => KeyUsage::plain(0x38),
        '!' => KeyUsage::shifted(USAGE_1),
        '@' => KeyUsage::shifted(USAGE_1 + 1),
        '#' => KeyUsage::shifted(USAGE_1 + 2),
        '$' => KeyUsage::shifted(USAGE_1 + 3),
        '%' => KeyUsage::shifted(USAGE_1 + 4),
        '^' => KeyUsage::shifted(USAGE_1 + 5),
        '&' => KeyUsage::shifted(USAGE_1 + 6),
        '*' => KeyUsage::shifted(USAGE_1 + 7),
        '(' => KeyUsage::shifted(USAGE_1 + 8),
        ')' => KeyUsage::shifted(USAGE_0),
        '_' => KeyUsage::shifted(0x2d),
        '+' => KeyUsage::shifted(0x2e),
        '{' => KeyUsage::shifted(0x2f),
        '}' => KeyUsage::shifted(0x30),
        '|' => KeyUsage::shifted(0x31),
        ':' => KeyUsage::shifted(0x33),
        '"' => KeyUsage::shifted(0x34),
        '~' => KeyUsage::shifted(0x35),
        '<' => KeyUsage::shifted(0x36),
        '>' => KeyUsage::shifted(0x37),
        '?' => KeyUsage::shifted(0x38),
        _ => return None,
    };
    Some(usage)
}

fn named_usage(name: &str) -> Option<u8> {
    if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        return (1..=12).contains(&n).then(|| USAGE_F1 + n - 1);
    }
    let usage = match name {
        "enter" | "return" => USAGE_ENTER,
        "escape" | "esc" => USAGE_ESCAPE,
        "backspace" | "bckspc" => USAGE_BACKSPACE,
        "tab" => USAGE_TAB,
        "space" | "spacebar" => USAGE_SPACE,
        "caps-lock" => 0x39,
        "print" => 0x46,
        "scroll-lock" => 0x47,
        "pause" => 0x48,
        "insert" => 0x49,
        "home" => 0x4a,
        "pageup" => 0x4b,
        "delete" | "del" => 0x4c,
        "end" => 0x4d,
        "pagedown" => 0x4e,
        "right" => 0x4f,
        "left" => 0x50,
        "down" => 0x51,
        "up" => 0x52,
        "num-lock" => 0x53,
        _ => return None,
    };
    Some(usage)
}

/// Modifier bit for a `hid-gadget` style option such as `--left-shift`.
pub fn modifier_option(option: &str) -> Option<u8> {
    let bit = match option {
        "--left-ctrl" => MOD_LEFT_CTRL,
        "--left-shift" => MOD_LEFT_SHIFT,
        "--left-alt" => MOD_LEFT_ALT,
        "--left-meta" => MOD_LEFT_META,
        "--right-ctrl" => MOD_RIGHT_CTRL,
        "--right-shift" => MOD_RIGHT_SHIFT,
        "--right-alt" => MOD_RIGHT_ALT,
        "--right-meta" => MOD_RIGHT_META,
        _ => return None,
    };
    Some(bit)
}
