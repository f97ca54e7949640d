//! Shared CLI output formatting: output mode, colors, symbols, JSON.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Global output flags, resolved once in `main`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    /// Machine-readable JSON on stdout.
    pub json: bool,
    /// Suppress non-essential output.
    pub quiet: bool,
    pub verbose: bool,
    pub no_color: bool,
}

impl OutputMode {
    /// Human-readable lines should be printed.
    pub fn human(&self) -> bool {
        !self.json && !self.quiet
    }

    pub fn styled(&self) -> Styled {
        if self.no_color || !color_enabled() {
            return Styled::plain();
        }
        Styled { use_color: true }
    }

    /// Progress bar for `len` steps; hidden unless output is for a human
    /// on a terminal.
    pub fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.human() || !std::io::stderr().is_terminal() {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template("  {spinner} [{bar:30}] {pos}/{len} {msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

/// Check if color output is enabled.
pub fn color_enabled() -> bool {
    // https://no-color.org/
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Colored string builder.
pub struct Styled {
    use_color: bool,
}

impl Styled {
    pub fn plain() -> Self {
        Self { use_color: false }
    }

    /// Green checkmark symbol.
    pub fn ok_sym(&self) -> &str {
        if self.use_color {
            "\x1b[32m\u{2713}\x1b[0m"
        } else {
            "OK"
        }
    }

    /// Yellow warning symbol.
    pub fn warn_sym(&self) -> &str {
        if self.use_color {
            "\x1b[33m\u{26a0}\x1b[0m"
        } else {
            "??"
        }
    }

    pub fn dim(&self, s: &str) -> String {
        self.wrap(DIM, s)
    }

    pub fn bold(&self, s: &str) -> String {
        self.wrap(BOLD, s)
    }

    fn wrap(&self, code: &str, s: &str) -> String {
        if self.use_color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }
}

/// Print a result line prefixed with the OK symbol.
pub fn print_ok(s: &Styled, msg: &str) {
    println!("  {} {msg}", s.ok_sym());
}

/// Print a warning line prefixed with the warning symbol.
pub fn print_warn(s: &Styled, msg: &str) {
    println!("  {} {msg}", s.warn_sym());
}

/// Print a dimmed progress/info line.
pub fn print_info(s: &Styled, msg: &str) {
    println!("  {}", s.dim(msg));
}

/// Print JSON output to stdout.
pub fn print_json(value: &serde_json::Value) {
    if let Ok(s) = serde_json::to_string_pretty(value) {
        println!("{s}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_styling() {
        let s = Styled::plain();
        assert_eq!(s.ok_sym(), "OK");
        assert_eq!(s.warn_sym(), "??");
        assert_eq!(s.bold("x"), "x");
    }

    #[test]
    fn test_no_color_flag_gives_plain_styling() {
        let mode = OutputMode {
            no_color: true,
            ..Default::default()
        };
        let s = mode.styled();
        assert_eq!(s.ok_sym(), "OK");
        assert_eq!(s.dim("x"), "x");
    }

    #[test]
    fn test_human_mode() {
        assert!(OutputMode::default().human());
        let quiet = OutputMode {
            quiet: true,
            ..Default::default()
        };
        assert!(!quiet.human());
        let json = OutputMode {
            json: true,
            ..Default::default()
        };
        assert!(!json.human());
        assert!(json.progress_bar(3).is_hidden());
    }
}
