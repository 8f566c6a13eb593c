//! Sentiment time series derived from scored messages

use crate::sentiment;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Display format for point timestamps
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// One scored message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsPoint {
    pub timestamp: String,
    pub sentiment_score: i64,
    pub source_text: String,
}

/// Aggregate view of the series for dashboards
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SentimentSummary {
    pub count: usize,
    pub total: i64,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentSummary {
    /// Mean score, or `None` for an empty series
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total as f64 / self.count as f64)
    }

    /// Fold one point into the summary
    pub fn add(&mut self, score: i64) {
        self.count += 1;
        self.total += score;
        match score.signum() {
            1 => self.positive += 1,
            -1 => self.negative += 1,
            _ => self.neutral += 1,
        }
    }
}

/// Ordered series of analytics points; never reordered or trimmed
#[derive(Debug, Default, Clone)]
pub struct AnalyticsSeries {
    points: Vec<AnalyticsPoint>,
}

impl AnalyticsSeries {
    /// Score `text` and append a point stamped with the current local time
    pub fn record(&mut self, text: &str) -> AnalyticsPoint {
        self.record_at(text, Local::now())
    }

    pub fn record_at(&mut self, text: &str, at: DateTime<Local>) -> AnalyticsPoint {
        let point = AnalyticsPoint {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            sentiment_score: sentiment::score(text),
            source_text: text.to_string(),
        };
        self.points.push(point.clone());
        point
    }

    pub fn series(&self) -> &[AnalyticsPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn summary(&self) -> SentimentSummary {
        let mut summary = SentimentSummary::default();
        for point in &self.points {
            summary.add(point.sentiment_score);
        }
        summary
    }
}
