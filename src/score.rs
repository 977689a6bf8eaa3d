//! Inbound score messages and the last score seen.

use serde::Deserialize;

/// Message type tag the host uses for score results.
pub const SCORE_MESSAGE_TYPE: &str = "H5P_SCORE_RESULT";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEvent {
    pub score: f64,
    pub max_score: f64,
}

impl ScoreEvent {
    pub const fn new(score: f64, max_score: f64) -> Self {
        Self { score, max_score }
    }

    /// A perfect, non-zero score.
    pub fn is_qualifying(&self) -> bool {
        self.score == self.max_score && self.score > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreState {
    pub final_score: f64,
    pub max_score: f64,
}

impl ScoreState {
    pub fn apply(&mut self, event: ScoreEvent) {
        self.final_score = event.score;
        self.max_score = event.max_score;
    }

    /// Score as a percentage of the maximum; 0 until a maximum is known.
    pub fn percentage(&self) -> f64 {
        if self.max_score > 0.0 {
            self.final_score / self.max_score * 100.0
        } else {
            0.0
        }
    }

    pub fn label(&self) -> String {
        format!("Score: {}/{}", self.final_score, self.max_score)
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: Option<String>,
    score: Option<serde_json::Value>,
    #[serde(rename = "maxScore")]
    max_score: Option<serde_json::Value>,
}

/// Extracts a score event from one JSON message.
///
/// Anything that is not a `H5P_SCORE_RESULT` object with numeric `score`
/// and `maxScore` yields `None`.
pub fn parse_message(raw: &str) -> Option<ScoreEvent> {
    let envelope: Envelope = match serde_json::from_str(raw) {
        Ok(envelope) => envelope,
        Err(err) => {
            log::trace!("Ignoring non-score message ({err}): {raw}");
            return None;
        }
    };

    if envelope.kind.as_deref() != Some(SCORE_MESSAGE_TYPE) {
        log::trace!("Ignoring message of type {:?}", envelope.kind);
        return None;
    }

    let score = envelope.score.as_ref().and_then(serde_json::Value::as_f64);
    let max_score = envelope.max_score.as_ref().and_then(serde_json::Value::as_f64);
    match (score, max_score) {
        (Some(score), Some(max_score)) => Some(ScoreEvent::new(score, max_score)),
        _ => {
            log::trace!("Ignoring score message without numeric fields: {raw}");
            None
        }
    }
}
