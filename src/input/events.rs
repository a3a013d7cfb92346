//! Input event types produced by the keyboard front-end.

/// A single captured input event.
///
/// Events come from whatever front-end feeds the translator (a text field
/// watcher, a key listener, or the CLI reading stdin) and are consumed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A typed character.
    Character(char),
    /// The user removed text (backspace).
    Deletion,
    /// A non-printing key identified by its platform key code.
    NonPrintingKey(i32),
}

impl InputEvent {
    /// Maps a raw character from a byte-oriented source to an event.
    ///
    /// BS (`\x08`) and DEL (`\x7f`) are explicit delete signals; everything
    /// else is treated as a typed character.
    pub fn from_raw_char(c: char) -> Self {
        match c {
            '\u{8}' | '\u{7f}' => InputEvent::Deletion,
            other => InputEvent::Character(other),
        }
    }
}

/// A text-field change notification: `before` characters starting at
/// `start` were replaced by `count` new characters, leaving `text`.
///
/// Text widgets only report diffs, so whether the user pressed backspace has
/// to be reconstructed from the lengths. Front-ends that see real key presses
/// should emit [`InputEvent`]s directly instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub text: String,
    pub start: usize,
    pub before: usize,
    pub count: usize,
}

impl TextChange {
    pub fn new(text: impl Into<String>, start: usize, before: usize, count: usize) -> Self {
        Self {
            text: text.into(),
            start,
            before,
            count,
        }
    }

    /// Converts the diff into at most one event.
    ///
    /// Removing at least as many characters as were added counts as a
    /// deletion. Otherwise the last character of the new text is the one
    /// that was typed. A change that neither removes nor adds anything yields
    /// no event.
    pub fn to_event(&self) -> Option<InputEvent> {
        if self.before > 0 && self.before >= self.count {
            return Some(InputEvent::Deletion);
        }
        if self.count == 0 {
            return None;
        }
        self.text.chars().last().map(InputEvent::Character)
    }
}
