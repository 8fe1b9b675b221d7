//! Key encoding: Keystrokes to the bytes a remote terminal expects.

use crate::actor::{KeyCode, KeyInput, KeyModifiers};

/// xterm modifier parameter (`1 + shift + 2*alt + 4*ctrl`).
const fn modifier_param(mods: KeyModifiers) -> u8 {
    1 + (mods.shift as u8) + 2 * (mods.alt as u8) + 4 * (mods.control as u8)
}

/// Cursor-style key: `ESC O x` / `ESC [ x`, or `ESC [ 1 ; m x` with modifiers.
fn cursor_key(final_byte: char, mods: KeyModifiers, application_cursor: bool) -> String {
    if mods.any() {
        format!("\x1b[1;{}{final_byte}", modifier_param(mods))
    } else if application_cursor {
        format!("\x1bO{final_byte}")
    } else {
        format!("\x1b[{final_byte}")
    }
}

/// Tilde-style key: `ESC [ n ~`, or `ESC [ n ; m ~` with modifiers.
fn tilde_key(code: u8, mods: KeyModifiers) -> String {
    if mods.any() {
        format!("\x1b[{code};{}~", modifier_param(mods))
    } else {
        format!("\x1b[{code}~")
    }
}

fn control_char(c: char) -> Option<char> {
    let byte = match c {
        'a'..='z' => c as u8 - b'a' + 1,
        'A'..='Z' => c as u8 - b'A' + 1,
        '@' | ' ' | '2' => 0,
        '[' | '3' => 0x1b,
        '\\' | '4' => 0x1c,
        ']' | '5' => 0x1d,
        '^' | '6' => 0x1e,
        '_' | '7' | '/' => 0x1f,
        '?' | '8' => 0x7f,
        _ => return None,
    };
    Some(byte as char)
}

/// Encode a keystroke.
///
/// `application_cursor` selects `ESC O` forms for cursor keys, as
/// requested by full-screen programs via DECCKM. Returns `None` for keys
/// with no byte representation.
pub fn encode_key(key: &KeyInput, application_cursor: bool) -> Option<String> {
    let mods = key.modifiers;
    let mut out = match key.code {
        KeyCode::Char(c) if mods.control => control_char(c)?.to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "\r".to_string(),
        KeyCode::Backspace if mods.control => "\x08".to_string(),
        KeyCode::Backspace => "\x7f".to_string(),
        KeyCode::Tab => "\t".to_string(),
        KeyCode::BackTab => "\x1b[Z".to_string(),
        KeyCode::Esc => "\x1b".to_string(),
        KeyCode::Up => return Some(cursor_key('A', mods, application_cursor)),
        KeyCode::Down => return Some(cursor_key('B', mods, application_cursor)),
        KeyCode::Right => return Some(cursor_key('C', mods, application_cursor)),
        KeyCode::Left => return Some(cursor_key('D', mods, application_cursor)),
        KeyCode::Home => return Some(cursor_key('H', mods, application_cursor)),
        KeyCode::End => return Some(cursor_key('F', mods, application_cursor)),
        KeyCode::Insert => return Some(tilde_key(2, mods)),
        KeyCode::Delete => return Some(tilde_key(3, mods)),
        KeyCode::PageUp => return Some(tilde_key(5, mods)),
        KeyCode::PageDown => return Some(tilde_key(6, mods)),
        KeyCode::F(n @ 1..=4) => {
            let final_byte = char::from(b'P' + (n - 1));
            return Some(if mods.any() {
                format!("\x1b[1;{}{final_byte}", modifier_param(mods))
            } else {
                format!("\x1bO{final_byte}")
            });
        }
        KeyCode::F(n @ 5..=12) => {
            let code = match n {
                5 => 15,
                6 => 17,
                7 => 18,
                8 => 19,
                9 => 20,
                10 => 21,
                11 => 23,
                _ => 24,
            };
            return Some(tilde_key(code, mods));
        }
        KeyCode::F(_) => return None,
    };
    if mods.alt {
        out.insert(0, '\x1b');
    }
    Some(out)
}

/// Encode pasted text.
///
/// Line endings become carriage returns, and the text is wrapped in
/// bracketed-paste markers when the remote program asked for them.
pub fn encode_paste(text: &str, bracketed: bool) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let normalized = text.replace("\r\n", "\r").replace('\n', "\r");
    Some(if bracketed {
        format!("\x1b[200~{normalized}\x1b[201~")
    } else {
        normalized
    })
}
