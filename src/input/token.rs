//! The canonical keystroke produced by translation.

use super::modifiers::Modifiers;

/// Key names that collide with shell double-quote syntax.
pub const RESERVED_KEY_NAMES: [&str; 3] = ["\"", "\\", "`"];

/// One keystroke: a HID key name plus the modifiers to hold while sending it.
///
/// `key_name` is always the bare HID identifier (`"a"`, `"enter"`, `"\\"`).
/// Quoting for a particular transport is applied later by the dispatcher;
/// [`KeyToken::escape`] only records that the name needs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyToken {
    pub key_name: String,
    pub modifiers: Modifiers,
    pub escape: bool,
}

impl KeyToken {
    /// Builds a token, flagging names that need escaping before dispatch.
    pub fn new(key_name: impl Into<String>, modifiers: Modifiers) -> Self {
        let key_name = key_name.into();
        debug_assert!(!key_name.is_empty(), "key tokens never have empty names");
        let escape = RESERVED_KEY_NAMES.contains(&key_name.as_str());
        Self {
            key_name,
            modifiers,
            escape,
        }
    }

    /// Token for a key pressed without modifiers.
    pub fn plain(key_name: impl Into<String>) -> Self {
        Self::new(key_name, Modifiers::NONE)
    }

    /// Token for a key pressed with shift held.
    pub fn shifted(key_name: impl Into<String>) -> Self {
        Self::new(key_name, Modifiers::SHIFT)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.shift
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_flagged() {
        for name in RESERVED_KEY_NAMES {
            assert!(KeyToken::plain(name).escape, "{name} should need escaping");
        }
        assert!(!KeyToken::plain("a").escape);
        assert!(!KeyToken::shifted("'").escape);
    }
}
