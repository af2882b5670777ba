//! Output verbosity mode.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including per-installer arguments.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show warnings, errors and the final summary only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows detail lines (installer arguments, URLs).
    pub fn shows_details(&self) -> bool {
        matches!(self, Self::Verbose)
    }

    /// Check if this mode shows progress bars.
    pub fn shows_progress(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows informational and success lines.
    pub fn shows_status(&self) -> bool {
        !matches!(self, Self::Quiet)
    }
}
