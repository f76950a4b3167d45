//! Status and diagnostic messages
//!
//! Command results go to stdout; progress notes and warnings go to stderr so
//! that JSON/CSV output stays pipeable.

use console::style;

use crate::cli::GlobalOpts;

/// Writes user-facing messages honouring `--quiet` and `--verbose`
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    quiet: bool,
    verbose: bool,
}

impl Reporter {
    pub fn new(global: &GlobalOpts) -> Self {
        Self {
            quiet: global.quiet,
            verbose: global.verbose,
        }
    }

    /// Progress line, hidden by `--quiet`
    pub fn status(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{} {}", style("⚙").cyan(), message);
        }
    }

    /// Completion line, hidden by `--quiet`
    pub fn success(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{} {}", style("✓").green(), message);
        }
    }

    /// Extra detail, shown only with `--verbose`
    pub fn detail(&self, message: impl std::fmt::Display) {
        if self.verbose && !self.quiet {
            eprintln!("  {}", style(message).dim());
        }
    }

    /// Warning, hidden by `--quiet`
    pub fn warn(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{} {}", style("!").yellow(), message);
        }
    }
}
