//! Styled terminal output implementing the core [`Reporter`].
//!
//! Results and diagnostics go to stdout/stderr as plain lines. Download
//! progress is redrawn in place on stderr, and only when stderr is a terminal.

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crossterm::style::Stylize;
use ghinst_core::Reporter;

use super::theme::{Theme, format_size};

/// A cloneable handle for writing user-facing messages.
#[derive(Debug, Clone)]
pub struct Output {
    quiet: bool,
    interactive: bool,
    theme: Arc<Theme>,
    /// Last drawn download percentage, used to throttle redraws.
    progress: Arc<Mutex<Option<u64>>>,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            interactive: std::io::stderr().is_terminal(),
            theme: Arc::new(Theme::default()),
            progress: Arc::new(Mutex::new(None)),
        }
    }

    /// Print a line that is never suppressed, even with `--quiet`.
    pub fn result(&self, msg: &str) {
        if self.interactive {
            println!("{} {msg}", self.theme.icons.success.with(self.theme.colors.success));
        } else {
            println!("{msg}");
        }
    }

    /// Print the asset names of a release that had no match, one per line.
    pub fn available_assets(&self, names: &[String]) {
        if names.is_empty() {
            eprintln!("{}", "release has no assets".with(self.theme.colors.header));
            return;
        }
        eprintln!("{}", "available assets:".with(self.theme.colors.header));
        for name in names {
            eprintln!("  {}", name.as_str().with(self.theme.colors.name));
        }
    }

    fn finish_progress_line(&self) {
        if let Ok(mut last) = self.progress.lock()
            && last.take().is_some()
            && self.interactive
        {
            eprintln!();
        }
    }
}

impl Reporter for Output {
    fn section(&self, title: &str) {
        if self.quiet {
            return;
        }
        self.finish_progress_line();
        println!("{}", title.with(self.theme.colors.header).bold());
    }

    fn downloading(&self, name: &str, current: u64, total: Option<u64>) {
        if self.quiet || !self.interactive {
            return;
        }
        let Ok(mut last) = self.progress.lock() else {
            return;
        };

        // Redraw once per percent when the size is known, on every chunk otherwise
        let percent = total.filter(|t| *t > 0).map(|t| current * 100 / t);
        let key = percent.unwrap_or(current);
        if percent.is_some() && *last == Some(key) {
            return;
        }
        *last = Some(key);

        let detail = match total {
            Some(t) => format!("{} / {}", format_size(current), format_size(t)),
            None => format_size(current),
        };
        let mut stderr = std::io::stderr();
        let _ = write!(
            stderr,
            "\r  {} {} {}",
            self.theme.icons.active.with(self.theme.colors.active),
            name.with(self.theme.colors.name),
            detail.with(self.theme.colors.header)
        );
        let _ = stderr.flush();
    }

    fn extracting(&self, name: &str) {
        if self.quiet {
            return;
        }
        self.finish_progress_line();
        println!(
            "  {} extracting {}",
            self.theme.icons.active.with(self.theme.colors.active),
            name.with(self.theme.colors.name)
        );
    }

    fn installing(&self, name: &str, dest: &Path) {
        if self.quiet {
            return;
        }
        println!(
            "  {} installing {} to {}",
            self.theme.icons.active.with(self.theme.colors.active),
            name.with(self.theme.colors.name),
            dest.display().to_string().with(self.theme.colors.header)
        );
    }

    fn removed(&self, path: &Path) {
        if self.quiet {
            return;
        }
        println!(
            "  {} removed {}",
            self.theme.icons.removed.with(self.theme.colors.warning),
            path.display()
        );
    }

    fn info(&self, msg: &str) {
        if self.quiet {
            return;
        }
        println!("{} {msg}", self.theme.icons.info.with(self.theme.colors.header));
    }

    fn success(&self, msg: &str) {
        if self.quiet {
            return;
        }
        self.finish_progress_line();
        println!("{} {msg}", self.theme.icons.success.with(self.theme.colors.success));
    }

    fn warning(&self, msg: &str) {
        self.finish_progress_line();
        eprintln!("{} {msg}", self.theme.icons.warning.with(self.theme.colors.warning));
    }
}
