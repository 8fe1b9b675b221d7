//! `TerminalGuard`: Switches the host terminal into viewer mode and back.
//!
//! Each mode is recorded as it is switched on. Dropping the guard turns
//! off exactly those modes in reverse order, including when setup fails
//! halfway through.

use crossterm::cursor;
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use log::debug;
use std::io::{self, Write};

/// Which terminal modes to switch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSetup {
    /// Raw input mode.
    pub raw_mode: bool,
    /// Alternate screen buffer.
    pub alternate_screen: bool,
    /// Mouse event reporting.
    pub mouse_capture: bool,
}

/// Owns the terminal modes entered so far.
pub struct TerminalGuard<W: Write> {
    out: W,
    raw_mode: bool,
    alternate_screen: bool,
    mouse_capture: bool,
    input_modes: bool,
}

impl TerminalGuard<io::Stdout> {
    /// Take over stdout.
    pub fn stdout(setup: TerminalSetup) -> io::Result<Self> {
        Self::enter(io::stdout(), setup)
    }
}

impl<W: Write> TerminalGuard<W> {
    /// Switch on the requested modes, then bracketed paste, focus
    /// reporting and a hidden cursor.
    pub fn enter(out: W, setup: TerminalSetup) -> io::Result<Self> {
        let mut guard = Self {
            out,
            raw_mode: false,
            alternate_screen: false,
            mouse_capture: false,
            input_modes: false,
        };
        if setup.raw_mode {
            terminal::enable_raw_mode()?;
            guard.raw_mode = true;
        }
        // Escape-sequence modes are marked before writing: a partial write
        // may already have switched them on, and switching off is harmless.
        if setup.alternate_screen {
            guard.alternate_screen = true;
            execute!(guard.out, EnterAlternateScreen)?;
        }
        if setup.mouse_capture {
            guard.mouse_capture = true;
            execute!(guard.out, EnableMouseCapture)?;
        }
        guard.input_modes = true;
        execute!(guard.out, EnableBracketedPaste, EnableFocusChange, cursor::Hide)?;
        Ok(guard)
    }

    /// Whether raw mode was switched on by this guard.
    pub const fn is_raw(&self) -> bool {
        self.raw_mode
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if self.input_modes {
            let _ = execute!(self.out, DisableFocusChange, DisableBracketedPaste, cursor::Show);
        }
        if self.mouse_capture {
            let _ = execute!(self.out, DisableMouseCapture);
        }
        if self.alternate_screen {
            let _ = execute!(self.out, LeaveAlternateScreen);
        }
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
        debug!("terminal: restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records everything written; fails the first write containing `fail_on`.
    struct FlakyWriter {
        log: Rc<RefCell<Vec<u8>>>,
        fail_on: Option<&'static str>,
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Some(pattern) = self.fail_on {
                if String::from_utf8_lossy(buf).contains(pattern) {
                    self.fail_on = None;
                    return Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
                }
            }
            self.log.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn writer(fail_on: Option<&'static str>) -> (FlakyWriter, Rc<RefCell<Vec<u8>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let writer = FlakyWriter {
            log: log.clone(),
            fail_on,
        };
        (writer, log)
    }

    fn text(log: &Rc<RefCell<Vec<u8>>>) -> String {
        String::from_utf8_lossy(&log.borrow()).into_owned()
    }

    const SCREEN_AND_MOUSE: TerminalSetup = TerminalSetup {
        raw_mode: false,
        alternate_screen: true,
        mouse_capture: true,
    };

    #[test]
    fn test_enter_and_restore() {
        let (out, log) = writer(None);
        let guard = TerminalGuard::enter(out, SCREEN_AND_MOUSE).unwrap();
        assert!(!guard.is_raw());
        let entered = text(&log);
        assert!(entered.contains("\x1b[?1049h"));
        assert!(entered.contains("\x1b[?1000h"));
        assert!(entered.ends_with("\x1b[?25l"));

        drop(guard);
        let all = text(&log);
        assert!(all.contains("\x1b[?25h"));
        assert!(all.contains("\x1b[?1000l"));
        assert!(all.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn test_failed_setup_leaves_alternate_screen() {
        let (out, log) = writer(Some("?1000h"));
        assert!(TerminalGuard::enter(out, SCREEN_AND_MOUSE).is_err());

        let all = text(&log);
        assert!(all.contains("\x1b[?1049h"));
        assert!(all.ends_with("\x1b[?1049l"));
        // Never reached, so never undone.
        assert!(!all.contains("\x1b[?2004l"));
        assert!(!all.contains("\x1b[?25h"));
    }

    #[test]
    fn test_skipped_modes_are_not_restored() {
        let setup = TerminalSetup {
            raw_mode: false,
            alternate_screen: false,
            mouse_capture: false,
        };
        let (out, log) = writer(None);
        drop(TerminalGuard::enter(out, setup).unwrap());
        let all = text(&log);
        assert!(!all.contains("?1049"));
        assert!(!all.contains("?1000"));
        assert!(all.ends_with("\x1b[?25h"));
    }
}
