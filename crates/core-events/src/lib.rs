//! Normalized key events consumed by the editing engine.
//!
//! Host input layers (terminal, browser, test harness) translate their native
//! key events into a [`KeyEvent`] before handing them to the engine. Two
//! helper entry points cover the common sources:
//! * [`KeyEvent::from_label`] for browser-style labels (`"Escape"`, `"ArrowLeft"`, `"a"`).
//! * [`parse_notation`] for Vim-style key notation (`"2dd<Esc>"`, `"<C-r>"`).

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

/// Logical key, independent of host keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    /// A host key without a logical mapping (e.g. `"Shift"`, `"F5"`). Carried
    /// through so it can be absorbed by the pending chain.
    Other(String),
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const SHIFT= 0b0000_0100;
    }
}

impl KeyCode {
    /// Display label using the host naming (`"Escape"`, `"ArrowLeft"`, `"x"`).
    pub fn label(&self) -> String {
        match self {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Escape".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Up => "ArrowUp".into(),
            KeyCode::Down => "ArrowDown".into(),
            KeyCode::Left => "ArrowLeft".into(),
            KeyCode::Right => "ArrowRight".into(),
            KeyCode::Other(name) => name.clone(),
        }
    }

    fn from_host_label(label: &str) -> Self {
        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return KeyCode::Char(c);
        }
        match label {
            "Enter" => KeyCode::Enter,
            "Escape" | "Esc" => KeyCode::Esc,
            "Backspace" => KeyCode::Backspace,
            "Tab" => KeyCode::Tab,
            "ArrowUp" => KeyCode::Up,
            "ArrowDown" => KeyCode::Down,
            "ArrowLeft" => KeyCode::Left,
            "ArrowRight" => KeyCode::Right,
            other => KeyCode::Other(other.to_owned()),
        }
    }
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// Unmodified character key.
    pub fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    /// Character key with CTRL held.
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    /// Build from a browser-style key label plus modifier flags.
    pub fn from_label(label: &str, ctrl: bool, shift: bool) -> Self {
        let mut mods = KeyModifiers::empty();
        mods.set(KeyModifiers::CTRL, ctrl);
        mods.set(KeyModifiers::SHIFT, shift);
        Self::new(KeyCode::from_host_label(label), mods)
    }

    pub fn ctrl_held(&self) -> bool {
        self.mods.contains(KeyModifiers::CTRL)
    }

    pub fn shift_held(&self) -> bool {
        self.mods.contains(KeyModifiers::SHIFT)
    }
}

impl From<KeyCode> for KeyEvent {
    fn from(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl_held() {
            f.write_str("C-")?;
        }
        if self.shift_held() {
            f.write_str("S-")?;
        }
        f.write_str(&self.code.label())
    }
}

/// Key notation parse failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("unterminated key name starting at offset {offset}")]
    Unterminated { offset: usize },
    #[error("unknown key name <{0}>")]
    UnknownKey(String),
}

/// Parse Vim-style key notation into key events.
///
/// Plain characters map to themselves. Bracketed names are case-insensitive:
/// `<Esc>`, `<CR>`/`<Enter>`, `<BS>`, `<Tab>`, `<Left>`, `<Right>`, `<Up>`,
/// `<Down>`, `<Space>`, `<lt>`. Modifier prefixes `C-` and `S-` may be
/// stacked in front of any of these or of a single character (`<C-r>`).
pub fn parse_notation(input: &str) -> Result<Vec<KeyEvent>, NotationError> {
    let mut out = Vec::new();
    let mut rest = input.char_indices();
    while let Some((offset, c)) = rest.next() {
        if c != '<' {
            out.push(KeyEvent::char(c));
            continue;
        }
        let tail = &input[offset + 1..];
        let Some(close) = tail.find('>') else {
            return Err(NotationError::Unterminated { offset });
        };
        let name = &tail[..close];
        out.push(parse_bracketed(name)?);
        // skip the name and the closing '>'
        for _ in 0..name.chars().count() + 1 {
            rest.next();
        }
    }
    Ok(out)
}

fn parse_bracketed(name: &str) -> Result<KeyEvent, NotationError> {
    let mut mods = KeyModifiers::empty();
    let mut base = name;
    loop {
        let lower = base.get(..2).map(str::to_ascii_lowercase);
        match lower.as_deref() {
            Some("c-") if base.len() > 2 => mods |= KeyModifiers::CTRL,
            Some("s-") if base.len() > 2 => mods |= KeyModifiers::SHIFT,
            _ => break,
        }
        base = &base[2..];
    }
    let mut chars = base.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyEvent::new(KeyCode::Char(c), mods));
    }
    let code = match base.to_ascii_lowercase().as_str() {
        "esc" | "escape" => KeyCode::Esc,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "bs" | "backspace" => KeyCode::Backspace,
        "tab" => KeyCode::Tab,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" => KeyCode::Char(' '),
        "lt" => KeyCode::Char('<'),
        _ => return Err(NotationError::UnknownKey(name.to_owned())),
    };
    Ok(KeyEvent::new(code, mods))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::ctrl('r');
        assert_eq!(format!("{k}"), "C-r");
        assert_eq!(format!("{}", KeyEvent::from(KeyCode::Esc)), "Escape");
    }

    #[test]
    fn from_label_maps_host_names() {
        let k = KeyEvent::from_label("ArrowLeft", false, false);
        assert_eq!(k.code, KeyCode::Left);
        let k = KeyEvent::from_label("Escape", false, false);
        assert_eq!(k.code, KeyCode::Esc);
        let k = KeyEvent::from_label("v", true, false);
        assert_eq!(k.code, KeyCode::Char('v'));
        assert!(k.ctrl_held());
        assert!(!k.shift_held());
    }

    #[test]
    fn from_label_keeps_unknown_names() {
        let k = KeyEvent::from_label("Shift", false, true);
        assert_eq!(k.code, KeyCode::Other("Shift".into()));
        assert_eq!(k.code.label(), "Shift");
    }

    #[test]
    fn notation_plain_and_named() {
        let keys = parse_notation("2dd<Esc>").unwrap();
        assert_eq!(
            keys,
            vec![
                KeyEvent::char('2'),
                KeyEvent::char('d'),
                KeyEvent::char('d'),
                KeyEvent::from(KeyCode::Esc),
            ]
        );
    }

    #[test]
    fn notation_modifiers_and_literals() {
        let keys = parse_notation("<C-r><c-V><lt><Space><CR>").unwrap();
        assert_eq!(keys[0], KeyEvent::ctrl('r'));
        assert_eq!(keys[1], KeyEvent::new(KeyCode::Char('V'), KeyModifiers::CTRL));
        assert_eq!(keys[2], KeyEvent::char('<'));
        assert_eq!(keys[3], KeyEvent::char(' '));
        assert_eq!(keys[4].code, KeyCode::Enter);
    }

    #[test]
    fn notation_multibyte_after_bracket() {
        let keys = parse_notation("<BS>é").unwrap();
        assert_eq!(keys, vec![KeyEvent::from(KeyCode::Backspace), KeyEvent::char('é')]);
    }

    #[test]
    fn notation_errors() {
        assert_eq!(
            parse_notation("ab<Esc"),
            Err(NotationError::Unterminated { offset: 2 })
        );
        assert_eq!(
            parse_notation("<Hyper>"),
            Err(NotationError::UnknownKey("Hyper".into()))
        );
        assert_eq!(parse_notation(""), Ok(Vec::new()));
    }
}
