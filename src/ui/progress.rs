use crate::ui;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use terminal_size::{Width, terminal_size};

const FRAME_DELAY: Duration = Duration::from_millis(150);

const FRAMES: &[&str] = &[
    "🎣--~       ",
    "🎣---~      ",
    "🎣----~     ",
    "🎣-----~    ",
    "🎣------~   ",
    "🎣-------~  ",
    "🎣--------~ ",
    "🎣--------~🐟",
    "🎣-------🐟 ",
    "🎣------🐟  ",
    "🎣-----🐟   ",
    "🎣----🐟    ",
    "🎣---🐟     ",
    "🎣--🐟      ",
    "🎣-🐟       ",
    "🎣🐟        ",
];

/// Spinner for operations of unknown duration.
///
/// Draws on its own thread so the caller can block on a subprocess.
pub struct Spinner {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Start drawing immediately
    pub fn start(message: &str) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let text = message.to_string();

        let handle = thread::spawn(move || {
            let mut frame = 0usize;
            while flag.load(Ordering::Relaxed) {
                eprint!("\r{} {}", text, FRAMES[frame % FRAMES.len()].cyan());
                io::stderr().flush().unwrap_or(());
                frame += 1;
                thread::sleep(FRAME_DELAY);
            }
        });

        Self {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the spinner and replace its line with the result
    pub fn finish(mut self, success: bool, result_message: &str) {
        self.stop();
        if success {
            ui::success(result_message);
        } else {
            ui::error(result_message);
        }
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        eprint!("\r{:width$}\r", "", width = line_width());
        io::stderr().flush().unwrap_or(());
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

fn line_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(100)
}

/// How progress of a single fetch is presented
pub enum Progress {
    /// Animated spinner (interactive terminal)
    Spinner(Spinner),
    /// One line, completed with Done/Failed (piped output)
    Plain,
    /// Step-by-step diagnostics are printed by the caller
    Verbose,
    Quiet,
}

impl Progress {
    pub fn begin(message: &str) -> Self {
        if ui::is_quiet() {
            Self::Quiet
        } else if ui::is_verbose() {
            eprintln!("{}", message);
            Self::Verbose
        } else if ui::stderr_is_tty() {
            Self::Spinner(Spinner::start(message))
        } else {
            eprint!("{} ...", message);
            io::stderr().flush().unwrap_or(());
            Self::Plain
        }
    }

    pub fn finish(self, success: bool, result_message: &str) {
        match self {
            Self::Spinner(spinner) => spinner.finish(success, result_message),
            Self::Plain => {
                let status = if success { "Done." } else { "Failed." };
                eprintln!(" {} {}", status, result_message);
            }
            Self::Verbose => {
                if success {
                    ui::success(result_message);
                } else {
                    ui::error(result_message);
                }
            }
            Self::Quiet => {}
        }
    }
}
