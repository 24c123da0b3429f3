//! Countdown state machine for timed auto-advance.
//!
//! The countdown never schedules anything itself. The shell owns one periodic
//! tick source and forwards each tick with the [`ScheduleToken`] it was armed
//! with; ticks from a cancelled schedule carry an outdated token and are
//! discarded, so two schedules can never drive the countdown at once.

use crate::config::MIN_COUNTDOWN_SECS;
use crate::error::{AppError, Result};
use log::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Identifies the live tick schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleToken(u64);

/// Where the countdown takes its durations from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountdownPlan {
    /// The same duration after every expiry.
    Fixed(u64),
    /// Durations used in turn, looping back to the first after the last.
    Schedule { items: Vec<u64>, index: usize },
}

impl CountdownPlan {
    fn current(&self) -> u64 {
        match self {
            CountdownPlan::Fixed(total) => *total,
            CountdownPlan::Schedule { items, index } => items[*index],
        }
    }

    fn advance(&mut self) {
        if let CountdownPlan::Schedule { items, index } = self {
            *index = (*index + 1) % items.len();
        }
    }
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Token belongs to a cancelled schedule.
    Stale,
    /// Countdown is not running.
    Inactive,
    /// One second elapsed; this many remain.
    Running { remaining: u64 },
    /// Reached zero and restarted with `next_total` seconds.
    Expired { next_total: u64 },
}

#[derive(Debug)]
pub struct Countdown {
    state: TimerState,
    remaining: u64,
    plan: Option<CountdownPlan>,
    token: ScheduleToken,
}

impl Countdown {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
            remaining: 0,
            plan: None,
            token: ScheduleToken(0),
        }
    }

    /// Starts (or restarts) with a fixed duration.
    ///
    /// Any running countdown is stopped first, even when `total_seconds` is
    /// rejected.
    pub fn start(&mut self, total_seconds: u64) -> Result<ScheduleToken> {
        self.stop();
        validate_duration(total_seconds)?;
        Ok(self.begin(CountdownPlan::Fixed(total_seconds)))
    }

    /// Starts (or restarts) cycling through `items`.
    pub fn start_schedule(&mut self, items: Vec<u64>) -> Result<ScheduleToken> {
        self.stop();
        if items.is_empty() {
            return Err(AppError::EmptySchedule);
        }
        for total in &items {
            validate_duration(*total)?;
        }
        Ok(self.begin(CountdownPlan::Schedule { items, index: 0 }))
    }

    fn begin(&mut self, plan: CountdownPlan) -> ScheduleToken {
        self.remaining = plan.current();
        info!("Countdown started: {} ({:?})", format_hms(self.remaining), plan);
        self.plan = Some(plan);
        self.state = TimerState::Running;
        self.renew_token()
    }

    /// Back to idle; ticks with any earlier token become stale.
    pub fn stop(&mut self) {
        if self.state != TimerState::Idle {
            info!("Countdown stopped at {}", format_hms(self.remaining));
        }
        self.state = TimerState::Idle;
        self.remaining = 0;
        self.plan = None;
        self.renew_token();
    }

    /// Delivers one elapsed second.
    pub fn tick(&mut self, token: ScheduleToken) -> TickOutcome {
        if token != self.token {
            return TickOutcome::Stale;
        }
        if self.state != TimerState::Running {
            return TickOutcome::Inactive;
        }
        let Some(plan) = self.plan.as_mut() else {
            return TickOutcome::Inactive;
        };

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return TickOutcome::Running {
                remaining: self.remaining,
            };
        }

        plan.advance();
        self.remaining = plan.current();
        debug!("Countdown expired, restarting at {}", format_hms(self.remaining));
        TickOutcome::Expired {
            next_total: self.remaining,
        }
    }

    /// Freezes the remaining time. Only valid while running.
    pub fn pause(&mut self) -> bool {
        if self.state != TimerState::Running {
            warn!("Pause ignored: countdown is {:?}", self.state);
            return false;
        }
        self.state = TimerState::Paused;
        self.renew_token();
        info!("Countdown paused at {}", format_hms(self.remaining));
        true
    }

    /// Continues from the frozen remaining time. Only valid while paused with
    /// time left.
    pub fn resume(&mut self) -> Option<ScheduleToken> {
        if self.state != TimerState::Paused || self.remaining == 0 {
            warn!(
                "Resume ignored: countdown is {:?} with {}s remaining",
                self.state, self.remaining
            );
            return None;
        }
        self.state = TimerState::Running;
        info!("Countdown resumed at {}", format_hms(self.remaining));
        Some(self.renew_token())
    }

    fn renew_token(&mut self) -> ScheduleToken {
        self.token = ScheduleToken(self.token.0 + 1);
        self.token
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Duration currently counted down, if started.
    pub fn total(&self) -> Option<u64> {
        self.plan.as_ref().map(CountdownPlan::current)
    }

    pub fn plan(&self) -> Option<&CountdownPlan> {
        self.plan.as_ref()
    }

    pub fn token(&self) -> ScheduleToken {
        self.token
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_duration(total_seconds: u64) -> Result<()> {
    if total_seconds <= MIN_COUNTDOWN_SECS {
        return Err(AppError::DurationTooShort(total_seconds));
    }
    Ok(())
}

/// Parses a list of durations separated by commas or whitespace.
///
/// Each entry is plain seconds (`90`), `MM:SS` or `HH:MM:SS`. Blank input
/// gives an empty list; durations are not range checked here.
pub fn parse_schedule(text: &str) -> Result<Vec<u64>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|entry| !entry.is_empty())
        .map(parse_duration)
        .collect()
}

fn parse_duration(entry: &str) -> Result<u64> {
    let invalid = || AppError::InvalidScheduleEntry(entry.to_string());
    let parts = entry
        .split(':')
        .map(|part| part.parse::<u64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>>>()?;
    if parts.len() > 3 || parts[1..].iter().any(|part| *part >= 60) {
        return Err(invalid());
    }
    parts
        .iter()
        .try_fold(0u64, |total, part| total.checked_mul(60)?.checked_add(*part))
        .ok_or_else(invalid)
}

/// `HH:MM:SS`, zero padded.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_durations_up_to_ten_seconds() {
        let mut countdown = Countdown::new();
        assert!(matches!(countdown.start(5), Err(AppError::DurationTooShort(5))));
        assert!(matches!(countdown.start(10), Err(AppError::DurationTooShort(10))));
        assert_eq!(countdown.state(), TimerState::Idle);
        assert!(countdown.start(11).is_ok());
        assert_eq!(countdown.state(), TimerState::Running);
    }

    #[test]
    fn expires_after_total_ticks_and_restarts() {
        let mut countdown = Countdown::new();
        let token = countdown.start(11).unwrap();

        for expected in (1..=10).rev() {
            assert_eq!(
                countdown.tick(token),
                TickOutcome::Running {
                    remaining: expected
                }
            );
        }
        assert_eq!(countdown.tick(token), TickOutcome::Expired { next_total: 11 });
        assert_eq!(countdown.remaining(), 11);
        assert_eq!(countdown.state(), TimerState::Running);
        assert_eq!(countdown.tick(token), TickOutcome::Running { remaining: 10 });
    }

    #[test]
    fn restart_invalidates_previous_schedule() {
        let mut countdown = Countdown::new();
        let first = countdown.start(30).unwrap();
        countdown.tick(first);
        let second = countdown.start(20).unwrap();

        assert_eq!(countdown.tick(first), TickOutcome::Stale);
        assert_eq!(countdown.remaining(), 20);
        assert_eq!(countdown.tick(second), TickOutcome::Running { remaining: 19 });
    }

    #[test]
    fn rejected_restart_stops_running_countdown() {
        let mut countdown = Countdown::new();
        let token = countdown.start(60).unwrap();
        countdown.tick(token);

        assert!(matches!(countdown.start(10), Err(AppError::DurationTooShort(10))));
        assert_eq!(countdown.state(), TimerState::Idle);
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.total(), None);
        assert_eq!(countdown.tick(token), TickOutcome::Stale);

        let paused = countdown.start(30).unwrap();
        assert!(countdown.pause());
        assert!(countdown.start_schedule(Vec::new()).is_err());
        assert_eq!(countdown.state(), TimerState::Idle);
        assert_eq!(countdown.resume(), None);
        assert_eq!(countdown.tick(paused), TickOutcome::Stale);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let mut countdown = Countdown::new();
        let token = countdown.start(15).unwrap();
        countdown.tick(token);
        countdown.tick(token);

        assert!(countdown.pause());
        assert_eq!(countdown.state(), TimerState::Paused);
        assert_eq!(countdown.tick(token), TickOutcome::Stale);
        assert_eq!(countdown.remaining(), 13);

        let resumed = countdown.resume().unwrap();
        assert_ne!(resumed, token);
        assert_eq!(countdown.tick(resumed), TickOutcome::Running { remaining: 12 });
    }

    #[test]
    fn pause_and_resume_outside_valid_states_are_noops() {
        let mut countdown = Countdown::new();
        assert!(!countdown.pause());
        assert_eq!(countdown.resume(), None);

        let token = countdown.start(12).unwrap();
        assert_eq!(countdown.resume(), None);
        assert_eq!(countdown.token(), token);
        assert!(countdown.pause());
        assert!(!countdown.pause());
    }

    #[test]
    fn idle_countdown_ignores_current_token() {
        let mut countdown = Countdown::new();
        assert_eq!(countdown.tick(countdown.token()), TickOutcome::Inactive);
    }

    #[test]
    fn schedule_cycles_through_items_and_loops() {
        let mut countdown = Countdown::new();
        let token = countdown.start_schedule(vec![11, 12]).unwrap();
        assert_eq!(countdown.total(), Some(11));

        let mut expiries = Vec::new();
        for _ in 0..(11 + 12 + 11) {
            if let TickOutcome::Expired { next_total } = countdown.tick(token) {
                expiries.push(next_total);
            }
        }
        assert_eq!(expiries, vec![12, 11, 12]);
    }

    #[test]
    fn schedule_validation() {
        let mut countdown = Countdown::new();
        assert!(matches!(
            countdown.start_schedule(Vec::new()),
            Err(AppError::EmptySchedule)
        ));
        assert!(matches!(
            countdown.start_schedule(vec![60, 9]),
            Err(AppError::DurationTooShort(9))
        ));
        assert_eq!(countdown.state(), TimerState::Idle);
    }

    #[test]
    fn parses_schedule_entries() {
        assert_eq!(parse_schedule("60, 2:30 1:00:05").unwrap(), vec![60, 150, 3605]);
        assert_eq!(parse_schedule(" ,\t").unwrap(), Vec::<u64>::new());
        assert_eq!(parse_schedule("0:45,,90").unwrap(), vec![45, 90]);
    }

    #[test]
    fn rejects_malformed_schedule_entries() {
        for text in ["1m", "1:60", "1:2:3:4", "-5", ":30", "99999999999999999:00"] {
            assert!(
                matches!(parse_schedule(text), Err(AppError::InvalidScheduleEntry(_))),
                "{text}"
            );
        }
    }

    #[test]
    fn formats_hours_minutes_seconds() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(600), "00:10:00");
        assert_eq!(format_hms(3 * 3600 + 25 * 60 + 9), "03:25:09");
    }
}
