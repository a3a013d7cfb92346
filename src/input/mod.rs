//! Keyboard input translation.
//!
//! This module turns captured input (typed characters, deletions and
//! non-printing key codes) into [`KeyToken`]s. Translation is stateless; the
//! lookup tables are built once and borrowed by the [`Translator`].

pub mod events;
pub mod modifiers;
pub mod tables;
pub mod token;
pub mod translate;

#[cfg(test)]
mod tests;

// Re-export commonly used types at module level
pub use events::{InputEvent, TextChange};
pub use modifiers::Modifiers;
pub use tables::KeyTables;
pub use token::KeyToken;
pub use translate::{TranslateError, Translator};
