//! Terminal output formatting for the postgen CLI.
//!
//! Status lines go to stderr with a right-aligned verb column, the way Cargo
//! prints them. Listings and other machine-readable output go to stdout.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Width for right-aligned verb column.
const VERB_WIDTH: usize = 12;

/// Colour of the verb in a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Green,
    Cyan,
    Yellow,
    Red,
}

impl Tone {
    fn code(self) -> &'static str {
        match self {
            Tone::Green => "\x1b[32m",
            Tone::Cyan => "\x1b[36m",
            Tone::Yellow => "\x1b[33m",
            Tone::Red => "\x1b[31m",
        }
    }
}

/// Terminal-aware status printer.
///
/// ANSI colour is enabled only when stderr is a terminal.
pub struct Printer {
    color: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
        }
    }

    /// A printer that never emits escape codes.
    pub fn plain() -> Self {
        Self { color: false }
    }

    /// e.g. "   Rendering professional_gradient (1080x1080)"
    pub fn status(&self, verb: &str, message: &str) {
        self.print_line(Tone::Green, verb, message);
    }

    pub fn info(&self, verb: &str, message: &str) {
        self.print_line(Tone::Cyan, verb, message);
    }

    pub fn warning(&self, verb: &str, message: &str) {
        self.print_line(Tone::Yellow, verb, message);
    }

    pub fn error(&self, verb: &str, message: &str) {
        self.print_line(Tone::Red, verb, message);
    }

    /// Print one entry of a listing to stdout.
    pub fn item(&self, name: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => println!("  {:<24} {}", name, self.dim(detail)),
            None => println!("  {}", name),
        }
    }

    pub fn dim(&self, text: &str) -> String {
        self.wrap(DIM, text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.wrap(BOLD, text)
    }

    /// Format a path for a status message (cyan on terminals).
    pub fn path(&self, path: &Path) -> String {
        self.wrap(Tone::Cyan.code(), &display_path(path))
    }

    fn wrap(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn print_line(&self, tone: Tone, verb: &str, message: &str) {
        let mut stderr = io::stderr().lock();
        let _ = if self.color {
            let code = tone.code();
            writeln!(stderr, "{BOLD}{code}{verb:>VERB_WIDTH$}{RESET} {message}")
        } else {
            writeln!(stderr, "{verb:>VERB_WIDTH$} {message}")
        };
    }
}

/// Pluralize a count: `plural(1, "post", "posts")` → "1 post".
pub fn plural(n: usize, singular: &str, pluralized: &str) -> String {
    let word = if n == 1 { singular } else { pluralized };
    format!("{} {}", n, word)
}

/// Return a path relative to the working directory when it lives below it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Some(rel) => rel.display().to_string(),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "post", "posts"), "1 post");
        assert_eq!(plural(0, "post", "posts"), "0 posts");
        assert_eq!(plural(12, "scheme", "schemes"), "12 schemes");
    }

    #[test]
    fn test_display_path_outside_cwd() {
        let p = Path::new("/nonexistent/output/post.png");
        assert_eq!(display_path(p), "/nonexistent/output/post.png");
    }

    #[test]
    fn test_display_path_inside_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(display_path(&cwd.join("output").join("a.png")), "output/a.png".replace('/', std::path::MAIN_SEPARATOR_STR));
        assert_eq!(display_path(&cwd), ".");
    }

    #[test]
    fn test_plain_printer_has_no_escapes() {
        let printer = Printer::plain();
        assert_eq!(printer.bold("x"), "x");
        assert_eq!(printer.path(Path::new("/tmp/x.png")), "/tmp/x.png");
    }
}
