//! Keyboard modifier state carried by a key token.

/// Modifier keys held while a token is sent.
///
/// Only shift is ever produced by translation; it is the one modifier needed
/// to reach the upper row of a US layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift key pressed
    pub shift: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self { shift: false };

    /// Shift held.
    pub const SHIFT: Self = Self { shift: true };
}
