//! Colored terminal output utilities.

use std::path::Path;

use console::{Style, Term};

/// Width of the label column in [`Output::field`] lines.
const LABEL_WIDTH: usize = 8;

/// Terminal output formatter.
///
/// Messages go to stderr; [`data`](Self::data) writes machine-readable
/// output to stdout.
pub(crate) struct Output {
    term: Term,
    stdout: Term,
    green: Style,
    yellow: Style,
    red: Style,
    cyan_bold: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdout: Term::stdout(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            cyan_bold: Style::new().cyan().bold(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a highlighted message (cyan bold).
    pub(crate) fn highlight(&self, msg: &str) {
        let _ = self
            .term
            .write_line(&self.cyan_bold.apply_to(msg).to_string());
    }

    /// Print a separator line.
    pub(crate) fn separator(&self) {
        let _ = self.term.write_line(&"=".repeat(70));
    }

    /// Print a `Label: value` line with the values aligned.
    pub(crate) fn field(&self, label: &str, value: impl std::fmt::Display) {
        let _ = self.term.write_line(&field_line(label, &value));
    }

    /// Print the `[i/n] path` header for one file of a batch.
    ///
    /// `index` is zero-based.
    pub(crate) fn step(&self, index: usize, total: usize, file: &Path) {
        let line = step_line(index, total, file);
        let _ = self
            .term
            .write_line(&format!("\n{}", self.cyan_bold.apply_to(line)));
    }

    /// Print an indented list item.
    pub(crate) fn item(&self, msg: &str) {
        let _ = self.term.write_line(&format!("  - {msg}"));
    }

    /// Print uncolored data to stdout.
    pub(crate) fn data(&self, text: &str) {
        let _ = self.stdout.write_line(text);
    }
}

fn field_line(label: &str, value: &dyn std::fmt::Display) -> String {
    format!("{:<width$} {value}", format!("{label}:"), width = LABEL_WIDTH)
}

fn step_line(index: usize, total: usize, file: &Path) -> String {
    let width = total.to_string().len();
    format!("[{:>width$}/{total}] {}", index + 1, file.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_field_line_aligns_values() {
        assert_eq!(field_line("ID", &42), "ID:      42");
        assert_eq!(field_line("URL", &"https://x"), "URL:     https://x");
        assert_eq!(field_line("Mermaid", &"none"), "Mermaid: none");
    }

    #[test]
    fn test_field_line_long_label_keeps_one_space() {
        assert_eq!(field_line("Attachments", &3), "Attachments: 3");
    }

    #[test]
    fn test_step_line_is_one_based_and_padded() {
        assert_eq!(step_line(0, 3, Path::new("a.md")), "[1/3] a.md");
        assert_eq!(step_line(4, 12, Path::new("docs/b.md")), "[ 5/12] docs/b.md");
    }
}
