use std::{io::Write, time::Duration};

use ansi_term::Colour::{Cyan, Green};
use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::utils::{
    clock::Clock,
    percentage::{completion_percentage, Percentage},
};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Focus,
    Break,
}

impl FocusMode {
    pub fn label(&self) -> &'static str {
        match self {
            FocusMode::Focus => "focus",
            FocusMode::Break => "break",
        }
    }
}

/// What a single tick did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    /// The countdown hit zero; the session swapped modes and re-armed.
    SwitchedTo(FocusMode),
}

/// Focus/break countdown. Pure state machine, driven once per second by
/// [run_focus_session]. Counting and rendering stay separate so the countdown can be
/// tested without a runtime.
pub struct FocusSession {
    mode: FocusMode,
    remaining_secs: u64,
    focus_secs: u64,
    break_secs: u64,
}

impl FocusSession {
    pub fn new(focus_minutes: u64, break_minutes: u64) -> Self {
        let focus_secs = focus_minutes * 60;
        Self {
            mode: FocusMode::Focus,
            remaining_secs: focus_secs,
            focus_secs,
            break_secs: break_minutes * 60,
        }
    }

    pub fn mode(&self) -> FocusMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn tick(&mut self) -> Tick {
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return Tick::Running;
        }

        self.mode = match self.mode {
            FocusMode::Focus => FocusMode::Break,
            FocusMode::Break => FocusMode::Focus,
        };
        self.remaining_secs = match self.mode {
            FocusMode::Focus => self.focus_secs,
            FocusMode::Break => self.break_secs,
        };
        Tick::SwitchedTo(self.mode)
    }

    /// Elapsed share of the current countdown.
    pub fn progress(&self) -> Percentage {
        let total = match self.mode {
            FocusMode::Focus => self.focus_secs,
            FocusMode::Break => self.break_secs,
        };
        completion_percentage((total - self.remaining_secs) as usize, total as usize)
    }

    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}

fn paint_mode(mode: FocusMode) -> String {
    match mode {
        FocusMode::Focus => Cyan.bold().paint("focus").to_string(),
        FocusMode::Break => Green.bold().paint("break").to_string(),
    }
}

/// Executes the countdown event loop. Cycles focus and break until cancelled.
pub async fn run_focus_session(
    mut session: FocusSession,
    time_provider: Box<dyn Clock>,
    shutdown: CancellationToken,
) -> Result<()> {
    info!(
        "Starting a {} countdown of {}",
        session.mode().label(),
        session.format_remaining()
    );
    let mut tick_point = time_provider.instant();
    loop {
        tick_point += TICK_INTERVAL;

        tokio::select! {
            _ = shutdown.cancelled() => {
                println!();
                return Ok(())
            }
            _ = time_provider.sleep_until(tick_point) => ()
        }

        match session.tick() {
            Tick::Running => {
                print!(
                    "\r{} {} ({:>3}%) ",
                    paint_mode(session.mode()),
                    session.format_remaining(),
                    session.progress().rounded()
                );
                std::io::stdout().flush()?;
            }
            Tick::SwitchedTo(FocusMode::Break) => {
                info!("Focus countdown completed");
                println!("\nFocus time completed! Time for a break.");
            }
            Tick::SwitchedTo(FocusMode::Focus) => {
                info!("Break countdown completed");
                println!("\nBreak time completed! Ready to focus again?");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FocusMode, FocusSession, Tick};

    #[test]
    fn test_countdown_and_switch() {
        let mut session = FocusSession::new(1, 1);
        assert_eq!(session.mode(), FocusMode::Focus);
        assert_eq!(session.format_remaining(), "01:00");

        for _ in 0..59 {
            assert_eq!(session.tick(), Tick::Running);
        }
        assert_eq!(session.remaining_secs(), 1);
        assert_eq!(session.tick(), Tick::SwitchedTo(FocusMode::Break));
        assert_eq!(session.remaining_secs(), 60);
    }

    #[test]
    fn test_full_cycle_returns_to_focus() {
        let mut session = FocusSession::new(1, 1);
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.mode(), FocusMode::Break);
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.mode(), FocusMode::Focus);
        assert_eq!(session.format_remaining(), "01:00");
    }

    #[test]
    fn test_progress_is_elapsed_share() {
        let mut session = FocusSession::new(2, 1);
        assert_eq!(session.progress().rounded(), 0);
        for _ in 0..30 {
            session.tick();
        }
        assert_eq!(session.progress().rounded(), 25);
        for _ in 0..60 {
            session.tick();
        }
        assert_eq!(session.progress().rounded(), 75);
    }
}
