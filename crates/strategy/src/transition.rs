use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::conditions::{evaluate, ConditionSet, Polarity};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::error::Result;
use crate::pipeline::EnrichedCandle;

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Bullish,
    Bearish,
    None,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Bullish => write!(f, "BULLISH_SIGNAL"),
            SignalKind::Bearish => write!(f, "BEARISH_SIGNAL"),
            SignalKind::None => write!(f, "NO_SIGNAL"),
        }
    }
}

/// Per-polarity state on one candle.
///
/// `Armed` waits for the predicate set to hold; `Engaged` means it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryState {
    Armed,
    Engaged,
}

impl From<&ConditionSet> for EntryState {
    fn from(set: &ConditionSet) -> Self {
        if set.all_met() {
            EntryState::Engaged
        } else {
            EntryState::Armed
        }
    }
}

/// Condition breakdown of one polarity across the two-candle window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolarityTransition {
    pub polarity: Polarity,
    pub previous: ConditionSet,
    pub current: ConditionSet,
}

impl PolarityTransition {
    pub fn previous_state(&self) -> EntryState {
        EntryState::from(&self.previous)
    }

    pub fn current_state(&self) -> EntryState {
        EntryState::from(&self.current)
    }

    /// Only the `Armed -> Engaged` edge fires.
    pub fn fired(&self) -> bool {
        self.previous_state() == EntryState::Armed && self.current_state() == EntryState::Engaged
    }
}

/// The signal decided for the current candle, with its full explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalEvent {
    pub kind: SignalKind,
    pub timestamp: DateTime<Utc>,
    pub candle: EnrichedCandle,
    pub bullish: PolarityTransition,
    pub bearish: PolarityTransition,
}

impl SignalEvent {
    pub fn is_signal(&self) -> bool {
        self.kind != SignalKind::None
    }

    /// Breakdown for the polarity that fired, if any.
    pub fn fired_transition(&self) -> Option<&PolarityTransition> {
        match self.kind {
            SignalKind::Bullish => Some(&self.bullish),
            SignalKind::Bearish => Some(&self.bearish),
            SignalKind::None => None,
        }
    }
}

/// Decide whether the step from `previous` to `current` fires a signal.
///
/// Holds no state between calls; the caller supplies the two most recent
/// enriched candles each cycle.
pub fn detect(
    previous: &EnrichedCandle,
    current: &EnrichedCandle,
    diagnostics: &mut Diagnostics,
) -> Result<SignalEvent> {
    let bullish = transition(previous, current, Polarity::Bullish)?;
    let bearish = transition(previous, current, Polarity::Bearish)?;

    let kind = resolve(bullish.fired(), bearish.fired(), diagnostics);

    for t in [&bullish, &bearish] {
        match (t.fired(), t.current_state()) {
            (true, _) => {}
            (false, EntryState::Engaged) => {
                debug!(polarity = %t.polarity, "Conditions still met, no new transition")
            }
            (false, EntryState::Armed) => {
                debug!(polarity = %t.polarity, "Conditions not fully met")
            }
        }
    }
    if kind != SignalKind::None {
        info!(
            signal = %kind,
            timestamp = %current.timestamp(),
            close = current.candle.close,
            "Entry transition detected"
        );
    }

    Ok(SignalEvent {
        kind,
        timestamp: current.timestamp(),
        candle: *current,
        bullish,
        bearish,
    })
}

fn transition(
    previous: &EnrichedCandle,
    current: &EnrichedCandle,
    polarity: Polarity,
) -> Result<PolarityTransition> {
    Ok(PolarityTransition {
        polarity,
        previous: evaluate(previous, polarity)?,
        current: evaluate(current, polarity)?,
    })
}

/// Pick the signal for a cycle. Simultaneous firing resolves to `None`.
pub fn resolve(
    bullish_fires: bool,
    bearish_fires: bool,
    diagnostics: &mut Diagnostics,
) -> SignalKind {
    match (bullish_fires, bearish_fires) {
        (true, true) => {
            diagnostics.record(Diagnostic::warning(
                DiagnosticKind::SignalConflict,
                "bullish and bearish entries fired on the same candle; no signal emitted",
            ));
            SignalKind::None
        }
        (true, false) => SignalKind::Bullish,
        (false, true) => SignalKind::Bearish,
        (false, false) => SignalKind::None,
    }
}
