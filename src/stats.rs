use chrono::{DateTime, Local};
use std::fmt;
use std::time::{Duration, SystemTime};

/// Characters per standardized word
const CHARS_PER_WORD: f64 = 5.0;

/// Counters accumulated while a round is being typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundStats {
    /// Set by the first typing keystroke, so idle time before it is not counted
    pub started_at: Option<SystemTime>,
    pub chars_typed: usize,
    pub errors: usize,
}

impl RoundStats {
    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start_if_idle(&mut self, now: SystemTime) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn correct_chars(&self) -> usize {
        self.chars_typed.saturating_sub(self.errors)
    }
}

/// A statistic that is either not yet available or has a value
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Metric {
    #[default]
    Unset,
    Computed(f64),
}

impl Metric {
    pub fn value(&self) -> Option<f64> {
        match self {
            Metric::Unset => None,
            Metric::Computed(v) => Some(*v),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Unset => write!(f, "0"),
            Metric::Computed(v) => write!(f, "{:.0}", v),
        }
    }
}

/// Direction of a metric compared to the previous round
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Trend {
    #[strum(serialize = "↑")]
    Up,
    #[strum(serialize = "↓")]
    Down,
    #[strum(serialize = "=")]
    Same,
}

impl Trend {
    fn between(previous: f64, latest: f64) -> Self {
        // compare at display precision
        let (previous, latest) = (previous.round(), latest.round());
        if latest > previous {
            Trend::Up
        } else if latest < previous {
            Trend::Down
        } else {
            Trend::Same
        }
    }
}

/// Finalized figures of one round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub wpm: f64,
    pub accuracy: f64,
    pub chars_typed: usize,
    pub errors: usize,
    pub correct_chars: usize,
    pub duration: Duration,
    pub finished_at: DateTime<Local>,
}

impl RoundSummary {
    pub fn from_round(round: &RoundStats, duration: Duration) -> Self {
        let correct_chars = round.correct_chars();
        Self {
            wpm: compute_wpm(correct_chars, duration),
            accuracy: compute_accuracy(correct_chars, round.chars_typed),
            chars_typed: round.chars_typed,
            errors: round.errors,
            correct_chars,
            duration,
            finished_at: Local::now(),
        }
    }
}

/// Standardized words per minute: correct characters / 5 per elapsed minute
pub fn compute_wpm(correct_chars: usize, duration: Duration) -> f64 {
    let minutes = duration.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0.0;
    }
    let wpm = (correct_chars as f64 / CHARS_PER_WORD) / minutes;
    if wpm.is_finite() {
        wpm
    } else {
        0.0
    }
}

/// Percentage of typed characters that were correct, within [0, 100]
pub fn compute_accuracy(correct_chars: usize, chars_typed: usize) -> f64 {
    if chars_typed == 0 {
        return 0.0;
    }
    (100.0 * correct_chars as f64 / chars_typed as f64).clamp(0.0, 100.0)
}

/// Finalized results of the latest round and the one before it
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    latest: Option<RoundSummary>,
    previous: Option<RoundSummary>,
    rounds_completed: usize,
}

impl Statistics {
    /// Close a round. Rounds in which nothing was typed leave the figures untouched.
    pub fn finalize(&mut self, round: &RoundStats, now: SystemTime) -> Option<&RoundSummary> {
        let started_at = round.started_at?;
        let duration = now.duration_since(started_at).unwrap_or_default();
        let summary = RoundSummary::from_round(round, duration);

        log::debug!(
            "round finalized: {:.1} wpm, {:.1}% acc, {} chars, {} errors, {:.1}s",
            summary.wpm,
            summary.accuracy,
            summary.chars_typed,
            summary.errors,
            summary.duration.as_secs_f64()
        );

        self.previous = self.latest.replace(summary);
        self.rounds_completed += 1;
        self.latest.as_ref()
    }

    pub fn latest(&self) -> Option<&RoundSummary> {
        self.latest.as_ref()
    }

    pub fn previous(&self) -> Option<&RoundSummary> {
        self.previous.as_ref()
    }

    pub fn rounds_completed(&self) -> usize {
        self.rounds_completed
    }

    pub fn wpm(&self) -> Metric {
        self.latest
            .as_ref()
            .map_or(Metric::Unset, |s| Metric::Computed(s.wpm))
    }

    pub fn accuracy(&self) -> Metric {
        self.latest
            .as_ref()
            .map_or(Metric::Unset, |s| Metric::Computed(s.accuracy))
    }

    pub fn wpm_trend(&self) -> Option<Trend> {
        self.trend(|s| s.wpm)
    }

    pub fn accuracy_trend(&self) -> Option<Trend> {
        self.trend(|s| s.accuracy)
    }

    fn trend(&self, field: impl Fn(&RoundSummary) -> f64) -> Option<Trend> {
        match (&self.previous, &self.latest) {
            (Some(previous), Some(latest)) => Some(Trend::between(field(previous), field(latest))),
            _ => None,
        }
    }
}
