use crate::config::EngagementWeights;
use crate::models::EngagementSignals;

/// Engagement Scorer - 互動訊號加權
///
/// Score = Σ weight(signal) over the signals that are set. With non-negative
/// weights the score is never negative and never drops when a signal is added.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngagementScorer {
    weights: EngagementWeights,
}

impl EngagementScorer {
    pub fn new(weights: EngagementWeights) -> Self {
        Self { weights }
    }

    pub fn score(&self, signals: &EngagementSignals) -> f64 {
        let w = &self.weights;
        [
            (signals.view, w.view),
            (signals.like, w.like),
            (signals.comment, w.comment),
            (signals.share, w.share),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, weight)| weight)
        .sum()
    }
}
