//! Input event to key token translation.

use super::events::InputEvent;
use super::tables::KeyTables;
use super::token::KeyToken;
use thiserror::Error;

/// Errors that can occur while translating a single event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("character {0:?} has no HID key")]
    UnsupportedCharacter(char),
}

/// Stateless translator from input events to key tokens.
///
/// Every call depends only on its argument and the tables, so the same
/// translator can be shared freely between callers.
#[derive(Debug, Clone, Copy)]
pub struct Translator<'a> {
    tables: &'a KeyTables,
}

impl<'a> Translator<'a> {
    pub fn new(tables: &'a KeyTables) -> Self {
        Self { tables }
    }

    /// Translates any event. Unmapped key codes produce `Ok(None)`.
    pub fn translate(&self, event: InputEvent) -> Result<Option<KeyToken>, TranslateError> {
        match event {
            InputEvent::Character(c) => self.translate_character(c).map(Some),
            InputEvent::Deletion => Ok(Some(self.translate_deletion())),
            InputEvent::NonPrintingKey(code) => Ok(self.translate_key_code(code)),
        }
    }

    /// Translates a typed character.
    ///
    /// # Rules (first match wins)
    /// 1. Uppercase ASCII letter → lowercase key with shift
    /// 2. Shifted symbol → its base key with shift
    /// 3. Newline → `enter`, tab → `tab`
    /// 4. Any other printable ASCII → the character itself
    ///
    /// `"`, `\` and `` ` `` fall under rule 4; the resulting token is flagged
    /// for escaping.
    pub fn translate_character(&self, c: char) -> Result<KeyToken, TranslateError> {
        if c.is_ascii_uppercase() {
            return Ok(KeyToken::shifted(c.to_ascii_lowercase().to_string()));
        }
        if let Some(base) = self.tables.shifted_base(c) {
            return Ok(KeyToken::shifted(base));
        }
        match c {
            '\n' => Ok(KeyToken::plain("enter")),
            '\t' => Ok(KeyToken::plain("tab")),
            ' '..='~' => Ok(KeyToken::plain(c.to_string())),
            _ => Err(TranslateError::UnsupportedCharacter(c)),
        }
    }

    /// A deletion is always a plain backspace.
    pub fn translate_deletion(&self) -> KeyToken {
        KeyToken::plain("backspace")
    }

    /// Looks up a non-printing key code. Unknown codes are not an error; the
    /// caller should just ignore the event.
    pub fn translate_key_code(&self, code: i32) -> Option<KeyToken> {
        self.tables.key_name(code).map(KeyToken::plain)
    }
}
