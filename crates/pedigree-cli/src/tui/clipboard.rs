//! Clipboard access through the terminal.
//!
//! OSC 52 asks the terminal emulator to place text on the system clipboard,
//! which also works over SSH. Terminals that ignore the sequence cannot be
//! detected; the share notice always shows what was copied.

use std::io::{self, IsTerminal, Write};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use pedigree_core::Clipboard;

/// Terminals known not to understand OSC 52.
const UNSUPPORTED_TERMS: [&str; 2] = ["dumb", "linux"];

#[derive(Debug, Default)]
pub struct Osc52Clipboard;

/// Escape sequence that sets the clipboard to `text`.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", BASE64.encode(text))
}

impl Clipboard for Osc52Clipboard {
    fn copy(&mut self, text: &str) -> io::Result<()> {
        let term = std::env::var("TERM").unwrap_or_default();
        if UNSUPPORTED_TERMS.contains(&term.as_str()) {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("terminal '{}' has no clipboard support", term),
            ));
        }

        let mut out = io::stdout();
        if !out.is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stdout is not a terminal",
            ));
        }

        out.write_all(osc52_sequence(text).as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_encodes_text() {
        assert_eq!(
            osc52_sequence("http://localhost:3333/?id=42&shared=true"),
            "\x1b]52;c;aHR0cDovL2xvY2FsaG9zdDozMzMzLz9pZD00MiZzaGFyZWQ9dHJ1ZQ==\x07"
        );
    }
}
