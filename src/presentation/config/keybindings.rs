use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{de::Deserializer, Deserialize};

use crate::{core::action::Action, model::key_sequence::Match};

/// Key sequences (`"<g><g>"`, `"<Ctrl-c>"`) mapped to actions
#[derive(Clone, Debug, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct KeyBindings(pub HashMap<Vec<KeyEvent>, Action>);

impl KeyBindings {
    /// Exact binding for `keys`, or whether a longer binding starts with them
    pub fn resolve(&self, keys: &[KeyEvent]) -> Match<Action> {
        if let Some(action) = self.0.get(keys) {
            return Match::Exact(*action);
        }
        let is_prefix = self
            .0
            .keys()
            .any(|seq| seq.len() > keys.len() && seq.starts_with(keys));
        if is_prefix {
            Match::Prefix
        } else {
            Match::NoMatch
        }
    }
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let parsed_map = HashMap::<String, Action>::deserialize(deserializer)?;

        let keybindings = parsed_map
            .into_iter()
            .map(|(key_str, action)| {
                parse_key_sequence(&key_str)
                    .map(|seq| (seq, action))
                    .map_err(serde::de::Error::custom)
            })
            .collect::<Result<_, _>>()?;

        Ok(KeyBindings(keybindings))
    }
}

/// Drop the parts of a key event that bindings do not compare on
///
/// Shift is implied by the character itself (`G` vs `g`), and kind/state are ignored.
pub fn normalize(key: KeyEvent) -> KeyEvent {
    let modifiers = match key.code {
        KeyCode::Char(_) => key.modifiers - KeyModifiers::SHIFT,
        _ => key.modifiers,
    };
    KeyEvent::new(key.code, modifiers)
}

pub fn parse_key_sequence(raw: &str) -> Result<Vec<KeyEvent>, String> {
    let inner = raw
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .ok_or_else(|| format!("Unable to parse `{raw}`: expected `<key>`"))?;
    inner.split("><").map(parse_key_event).collect()
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    let (remaining, modifiers) = extract_modifiers(raw);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        let lower = current.to_ascii_lowercase();
        if lower.starts_with("ctrl-") {
            modifiers.insert(KeyModifiers::CONTROL);
            current = &current[5..];
        } else if lower.starts_with("alt-") {
            modifiers.insert(KeyModifiers::ALT);
            current = &current[4..];
        } else if lower.starts_with("shift-") {
            modifiers.insert(KeyModifiers::SHIFT);
            current = &current[6..];
        } else {
            break;
        }
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(
    raw: &str,
    mut modifiers: KeyModifiers,
) -> Result<KeyEvent, String> {
    let code = match raw.to_ascii_lowercase().as_str() {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        }
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "tab" => KeyCode::Tab,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        _ => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if modifiers.contains(KeyModifiers::SHIFT) => {
                    KeyCode::Char(c.to_ascii_uppercase())
                }
                (Some(c), None) => KeyCode::Char(c),
                _ => return Err(format!("Unable to parse `{raw}`")),
            }
        }
    };
    Ok(normalize(KeyEvent::new(code, modifiers)))
}

pub fn key_event_to_string(key: &KeyEvent) -> String {
    let code = match key.code {
        KeyCode::Char(' ') => String::from("space"),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => String::from("esc"),
        KeyCode::Enter => String::from("enter"),
        KeyCode::Backspace => String::from("backspace"),
        KeyCode::Tab => String::from("tab"),
        KeyCode::Up => String::from("up"),
        KeyCode::Down => String::from("down"),
        KeyCode::Left => String::from("left"),
        KeyCode::Right => String::from("right"),
        other => format!("{other:?}").to_lowercase(),
    };

    let mut parts = Vec::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        parts.push(String::from("ctrl"));
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        parts.push(String::from("alt"));
    }
    parts.push(code);
    parts.join("-")
}
