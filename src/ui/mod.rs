//! Console status output
//!
//! Operations report through the [`Ui`] trait so the same code path can
//! print emoji status lines on a terminal or stay silent under test:
//! - Current phase (Backup, Prune, Reduce, Export)
//! - Progress (current/total with a label)
//! - Activity log lines

use indicatif::{ProgressBar, ProgressStyle};

/// Operation phases announced before each step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Backup,
    Prune,
    Compact,
    Reduce,
    Export,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Backup => write!(f, "Backing up database"),
            Phase::Prune => write!(f, "Pruning out-of-range records"),
            Phase::Compact => write!(f, "Compacting database"),
            Phase::Reduce => write!(f, "Reducing columns"),
            Phase::Export => write!(f, "Exporting JSON"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

impl Phase {
    fn indicator(&self) -> &'static str {
        match self {
            Phase::Backup => "💾",
            Phase::Prune => "🧹",
            Phase::Compact => "📦",
            Phase::Reduce => "✂️",
            Phase::Export => "📤",
            Phase::Complete => "✅",
        }
    }
}

/// Trait for status output - allows both console and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Prints status lines to stdout and draws a progress bar for long loops
#[derive(Default)]
pub struct ConsoleUi {
    bar: Option<ProgressBar>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn bar(&mut self, total: u64) -> &ProgressBar {
        self.bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(total);
            if let Ok(style) =
                ProgressStyle::default_bar().template("{msg:20} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                pb.set_style(style.progress_chars("=>-"));
            }
            pb
        })
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        println!("{} {}", phase.indicator(), phase);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let pb = self.bar(total);
        pb.set_length(total);
        pb.set_position(current);
        pb.set_message(label.into());
    }

    fn clear_progress(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.finish_and_clear();
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        match &self.bar {
            Some(pb) => pb.println(message),
            None => println!("{}", message),
        }
    }
}

impl Drop for ConsoleUi {
    fn drop(&mut self) {
        self.clear_progress();
    }
}

/// Silent UI implementation for testing and `--quiet`
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Prune.to_string(), "Pruning out-of-range records");
        assert_eq!(Phase::Complete.indicator(), "✅");
    }

    #[test]
    fn test_console_progress_lifecycle() {
        let mut ui = ConsoleUi::new();
        ui.set_progress(1, 3, "1.json");
        ui.set_progress(3, 3, "3.json");
        assert!(ui.bar.is_some());
        ui.clear_progress();
        assert!(ui.bar.is_none());
    }
}
