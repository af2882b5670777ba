//! Visual theme and styling.

use console::Style;

/// Console theme for status lines, section rules and file names.
#[derive(Debug, Clone)]
pub struct VcredistTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational labels (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for section rules (dim).
    pub rule: Style,
    /// Style for installer and archive file names (bold magenta).
    pub file: Style,
}

impl Default for VcredistTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl VcredistTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            rule: Style::new().dim(),
            file: Style::new().bold().magenta(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            rule: Style::new(),
            file: Style::new(),
        }
    }

    /// Format an informational line with its `[INFO]` label.
    pub fn format_info(&self, msg: &str) -> String {
        format!("{} {}", self.info.apply_to("[INFO]    "), msg)
    }

    /// Format a success line with its `[SUCCESS]` label.
    pub fn format_success(&self, msg: &str) -> String {
        format!("{} {}", self.success.apply_to("[SUCCESS] "), msg)
    }

    /// Format a warning line with its `[WARNING]` label.
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{} {}", self.warning.apply_to("[WARNING] "), msg)
    }

    /// Format an error line with its `[ERROR]` label.
    pub fn format_error(&self, msg: &str) -> String {
        format!("{} {}", self.error.apply_to("[ERROR]   "), msg)
    }

    /// Format a section rule centered on `title`.
    pub fn format_rule(&self, title: &str, width: usize) -> String {
        let label = format!(" {} ", title);
        let remaining = width.saturating_sub(label.chars().count());
        let left = remaining / 2;
        let right = remaining - left;
        format!(
            "{}{}{}",
            self.rule.apply_to("─".repeat(left)),
            self.highlight.apply_to(label),
            self.rule.apply_to("─".repeat(right)),
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_labels() {
        let theme = VcredistTheme::plain();
        assert!(theme.format_info("Using mirror 16").starts_with("[INFO]"));
        assert!(theme.format_success("Done").starts_with("[SUCCESS]"));
        assert!(theme.format_warning("Careful").starts_with("[WARNING]"));
        assert!(theme.format_error("Broken").starts_with("[ERROR]"));
    }

    #[test]
    fn labels_align_messages() {
        let theme = VcredistTheme::plain();
        let info = theme.format_info("x");
        let error = theme.format_error("x");
        assert_eq!(info.find('x'), error.find('x'));
    }

    #[test]
    fn rule_fills_requested_width() {
        let theme = VcredistTheme::plain();
        let rule = theme.format_rule("Cleanup", 40);
        assert_eq!(rule.chars().count(), 40);
        assert!(rule.contains(" Cleanup "));
    }

    #[test]
    fn rule_wider_title_than_width_keeps_title() {
        let theme = VcredistTheme::plain();
        let rule = theme.format_rule("Installing VC++ Runtimes", 10);
        assert_eq!(rule, " Installing VC++ Runtimes ");
    }

    #[test]
    fn default_impl_matches_new() {
        let default = VcredistTheme::default();
        let new = VcredistTheme::new();
        assert_eq!(default.format_success("test"), new.format_success("test"));
    }
}
