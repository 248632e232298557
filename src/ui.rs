//! Stderr progress reporting for the command-line driver.
//!
//! Pretty mode draws an `indicatif` spinner per stage; plain mode prints one
//! line per stage. Auto picks pretty only when stderr is a terminal.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub enum UiMode {
    Auto,
    Plain,
    Pretty,
}

#[derive(Clone, Debug)]
pub struct Ui {
    mode: UiMode,
    is_tty: bool,
}

impl Ui {
    pub fn from_flag(flag: &str, is_tty: bool) -> Self {
        let mode = match flag {
            "plain" => UiMode::Plain,
            "pretty" => UiMode::Pretty,
            _ => UiMode::Auto,
        };
        Self { mode, is_tty }
    }

    fn use_pretty(&self) -> bool {
        match self.mode {
            UiMode::Pretty => true,
            UiMode::Plain => false,
            UiMode::Auto => self.is_tty,
        }
    }

    /// Start a named stage. The returned guard reports elapsed time when the
    /// stage finishes or is dropped.
    pub fn stage(&self, name: &str) -> StageGuard {
        if self.use_pretty() {
            let spinner = ProgressBar::new_spinner();
            spinner.set_draw_target(ProgressDrawTarget::stderr());
            spinner.enable_steady_tick(Duration::from_millis(120));
            let style = ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            spinner.set_style(style);
            spinner.set_message(name.to_string());
            StageGuard {
                name: name.to_string(),
                started: Instant::now(),
                spinner: Some(spinner),
                finished: false,
            }
        } else {
            eprintln!("==> {}", name);
            StageGuard {
                name: name.to_string(),
                started: Instant::now(),
                spinner: None,
                finished: false,
            }
        }
    }
}

pub struct StageGuard {
    name: String,
    started: Instant,
    spinner: Option<ProgressBar>,
    finished: bool,
}

impl StageGuard {
    fn report(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let elapsed = self.started.elapsed();
        match self.spinner.take() {
            Some(spinner) => {
                spinner.finish_and_clear();
                eprintln!("{} done in {:.1}s", self.name, elapsed.as_secs_f64());
            }
            None => {
                eprintln!("==> {} done in {:.1}s", self.name, elapsed.as_secs_f64());
            }
        }
    }
}

impl Drop for StageGuard {
    fn drop(&mut self) {
        self.report();
    }
}
