use {
    crate::{
        domain::{MarketRequest, WaveCandidate},
        models::AnalysisOutcome,
        utils::{epoch_ms_to_utc, format_duration},
    },
    anyhow::Result,
    clap::ValueEnum,
    serde::Serialize,
    tabled::{Table, Tabled, settings::Style},
};

pub const NO_PATTERN_MESSAGE: &str = "No valid Elliott Wave patterns found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "Wave")]
    wave: String,
    #[tabled(rename = "Price Range")]
    price_range: String,
    #[tabled(rename = "Start Date")]
    start: String,
    #[tabled(rename = "End Date")]
    end: String,
    #[tabled(rename = "Duration")]
    duration: String,
}

/// Outcome of one request, ready to print.
#[derive(Debug, Serialize)]
pub struct WaveReport<'a> {
    pub symbol: &'a str,
    pub period: String,
    pub interval: &'static str,
    #[serde(flatten)]
    pub outcome: &'a AnalysisOutcome,
}

impl<'a> WaveReport<'a> {
    pub fn new(request: &'a MarketRequest, outcome: &'a AnalysisOutcome) -> Self {
        Self {
            symbol: &request.symbol,
            period: request.period.to_string(),
            interval: request.interval_str(),
            outcome,
        }
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    pub fn to_text(&self) -> String {
        match self.outcome {
            AnalysisOutcome::NoCandidateFound => NO_PATTERN_MESSAGE.to_string(),
            AnalysisOutcome::Identified { candidate, label } => {
                let mut table = Table::new(segment_rows(candidate));
                table.with(Style::rounded());
                format!(
                    "Latest Elliott Wave Identified for {} (period={}, interval={}):\n{}\nPattern Classification: {}",
                    self.symbol, self.period, self.interval, table, label
                )
            }
        }
    }
}

fn segment_rows(candidate: &WaveCandidate) -> Vec<SegmentRow> {
    candidate
        .segments()
        .map(|(name, segment)| SegmentRow {
            wave: name.to_string(),
            price_range: format!(
                "${:.2} - ${:.2}",
                segment.start_price(),
                segment.end_price()
            ),
            start: epoch_ms_to_utc(segment.start_ts),
            end: epoch_ms_to_utc(segment.end_ts),
            duration: format_duration(segment.duration_ms),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{SwingKind, SwingPoint, WaveLabel},
        utils::TimeUtils,
    };

    fn point(day: i64, price: f64, kind: SwingKind) -> SwingPoint {
        SwingPoint {
            timestamp_ms: day * TimeUtils::MS_IN_D,
            price,
            kind,
        }
    }

    fn identified() -> AnalysisOutcome {
        AnalysisOutcome::Identified {
            candidate: WaveCandidate::from_points(
                &point(1, 100.0, SwingKind::Low),
                &point(3, 200.0, SwingKind::High),
                &point(6, 150.0, SwingKind::Low),
                &point(10, 400.0, SwingKind::High),
            ),
            label: WaveLabel::Impulsive,
        }
    }

    #[test]
    fn text_report_lists_every_segment_and_the_label() {
        let request = MarketRequest::parse("btcusdt", "1y", "1d").unwrap();
        let outcome = identified();
        let text = WaveReport::new(&request, &outcome).to_text();

        assert!(text.contains("Wave_1"));
        assert!(text.contains("Wave_3"));
        assert!(text.contains("$100.00 - $200.00"));
        assert!(text.contains("$150.00 - $400.00"));
        assert!(text.contains("1970-01-02"));
        assert!(text.contains("1970-01-11"));
        assert!(text.contains("4d"));
        assert!(text.ends_with("Pattern Classification: Impulsive"));
    }

    #[test]
    fn sentinel_renders_the_fixed_message() {
        let request = MarketRequest::parse("btcusdt", "1y", "1d").unwrap();
        let outcome = AnalysisOutcome::NoCandidateFound;
        let report = WaveReport::new(&request, &outcome);
        assert_eq!(report.render(OutputFormat::Text).unwrap(), NO_PATTERN_MESSAGE);
    }

    #[test]
    fn json_report_is_tagged_by_outcome() {
        let request = MarketRequest::parse("btcusdt", "1y", "1d").unwrap();
        let outcome = identified();
        let json = WaveReport::new(&request, &outcome)
            .render(OutputFormat::Json)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["symbol"], "BTCUSDT");
        assert_eq!(value["outcome"], "identified");
        assert_eq!(value["label"], "Impulsive");
        assert_eq!(value["candidate"]["wave_2"]["price_range"][1], 150.0);
    }
}
