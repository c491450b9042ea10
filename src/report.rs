// =============================================================================
// Pipeline Report — the final artifact of one scanner run
// =============================================================================
//
// Plain structured data handed to the notification collaborator. No pipeline
// state is attached; the report is complete on its own.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::signals::{ConfirmationResult, PotentialSignal};

/// How far the run got before producing its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// The full pipeline ran; the partitions reflect real analysis.
    Completed,
    /// The universe source produced nothing to analyze.
    UniverseUnavailable,
    /// The historical batch came back empty; no analysis was possible.
    NoHistoricalData,
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => write!(f, "completed"),
            Self::UniverseUnavailable => write!(f, "universe unavailable — nothing to analyze"),
            Self::NoHistoricalData => write!(f, "no historical data — analysis skipped"),
        }
    }
}

/// Result of one scanner invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Unique identifier for this run (UUID v4).
    pub run_id: String,
    /// When the report was built (UTC).
    pub generated_at: DateTime<Utc>,
    pub status: RunStatus,
    /// Signals confirmed by intraday price action, in detection order.
    pub confirmed: Vec<PotentialSignal>,
    /// Potential signals that failed intraday confirmation ("radar").
    pub radar: Vec<PotentialSignal>,
}

impl PipelineReport {
    pub fn new(status: RunStatus, result: ConfirmationResult) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            status,
            confirmed: result.confirmed,
            radar: result.radar,
        }
    }

    /// A report with empty partitions; used for the degraded run outcomes.
    pub fn empty(status: RunStatus) -> Self {
        Self::new(status, ConfirmationResult::default())
    }

    /// Render the human-readable text payload for the notifier.
    ///
    /// Plain decimal formatting only; currency symbols and localisation are
    /// the notification channel's concern.
    pub fn render_text(&self) -> String {
        let mut out = format!(
            "BDR Scout — {}\n",
            self.generated_at.format("%d/%m %H:%M:%S")
        );

        if self.status != RunStatus::Completed {
            out.push_str(&format!("Run outcome: {}\n", self.status));
            return out;
        }

        if self.confirmed.is_empty() && self.radar.is_empty() {
            out.push_str("No crossover signals today.\n");
            return out;
        }

        if !self.confirmed.is_empty() {
            out.push_str(&format!("Confirmed ({}):\n", self.confirmed.len()));
            for s in &self.confirmed {
                out.push_str(&render_signal(s));
            }
        }

        if !self.radar.is_empty() {
            out.push_str(&format!("Radar ({}):\n", self.radar.len()));
            for s in &self.radar {
                out.push_str(&render_signal(s));
            }
        }

        out
    }
}

fn render_signal(s: &PotentialSignal) -> String {
    format!(
        "  {} — entry {:.2} | stop {:.2} | signal {}\n",
        s.symbol, s.entry_price_ref, s.stop_loss_ref, s.signal_date
    )
}
