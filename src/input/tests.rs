use super::*;

fn translator_tables() -> KeyTables {
    KeyTables::us_layout()
}

#[test]
fn uppercase_letters_become_shifted_lowercase() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    for c in 'A'..='Z' {
        let token = translator.translate_character(c).unwrap();
        assert_eq!(token.key_name, c.to_ascii_lowercase().to_string());
        assert!(token.shift(), "{c} should be sent with shift");
    }
}

#[test]
fn shift_map_entries_become_shifted_base_keys() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    let mut seen = 0;
    for (shifted, base) in tables.shift_entries() {
        let token = translator.translate_character(shifted).unwrap();
        assert_eq!(token, KeyToken::shifted(base), "mapping for {shifted:?}");
        seen += 1;
    }
    assert_eq!(seen, 20);
}

#[test]
fn newline_becomes_enter() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    assert_eq!(
        translator.translate_character('\n').unwrap(),
        KeyToken::plain("enter")
    );
}

#[test]
fn tab_character_becomes_tab_key() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    assert_eq!(
        translator.translate_character('\t').unwrap(),
        KeyToken::plain("tab")
    );
}

#[test]
fn quoting_characters_are_flagged_for_escaping() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    for c in ['"', '\\', '`'] {
        let token = translator.translate_character(c).unwrap();
        assert_eq!(token.key_name, c.to_string());
        assert!(!token.shift());
        assert!(token.escape, "{c:?} should carry the escape flag");
    }
}

#[test]
fn pipe_maps_to_shifted_backslash_with_escape_flag() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    let token = translator.translate_character('|').unwrap();
    assert_eq!(token.key_name, "\\");
    assert!(token.shift());
    assert!(token.escape);
}

#[test]
fn unshifted_printable_ascii_passes_through() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    for byte in 0x20u8..=0x7e {
        let c = byte as char;
        if c.is_ascii_uppercase() || tables.shifted_base(c).is_some() {
            continue;
        }
        let token = translator.translate_character(c).unwrap();
        assert_eq!(token.key_name, c.to_string());
        assert!(!token.shift(), "{c:?} should not need shift");
    }
}

#[test]
fn characters_outside_printable_ascii_are_rejected() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    for c in ['é', '\u{1b}', '\u{0}', '日', '\r'] {
        assert_eq!(
            translator.translate_character(c),
            Err(TranslateError::UnsupportedCharacter(c))
        );
    }
}

#[test]
fn deletion_is_always_plain_backspace() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    let first = translator.translate_deletion();
    let _ = translator.translate_character('Q');
    let second = translator.translate_deletion();
    assert_eq!(first, KeyToken::plain("backspace"));
    assert_eq!(first, second);
}

#[test]
fn known_key_codes_map_to_names() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    assert_eq!(
        translator.translate_key_code(131),
        Some(KeyToken::plain("f1"))
    );
    assert_eq!(
        translator.translate_key_code(142),
        Some(KeyToken::plain("f12"))
    );
    assert_eq!(
        translator.translate_key_code(120),
        Some(KeyToken::plain("print"))
    );
    assert_eq!(translator.translate_key_code(999_999), None);
}

#[test]
fn every_key_code_name_is_a_named_key() {
    let tables = translator_tables();
    for (code, name) in tables.key_code_entries() {
        assert!(tables.is_named_key(name), "{code} -> {name}");
        assert!(!name.is_empty());
    }
}

#[test]
fn translate_dispatches_on_event_kind() {
    let tables = translator_tables();
    let translator = Translator::new(&tables);
    assert_eq!(
        translator.translate(InputEvent::Character('a')).unwrap(),
        Some(KeyToken::plain("a"))
    );
    assert_eq!(
        translator.translate(InputEvent::Deletion).unwrap(),
        Some(KeyToken::plain("backspace"))
    );
    assert_eq!(
        translator.translate(InputEvent::NonPrintingKey(-1)).unwrap(),
        None
    );
    assert!(translator.translate(InputEvent::Character('ß')).is_err());
}
