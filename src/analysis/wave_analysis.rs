use crate::{
    analysis::{AnalysisError, SwingDetector, WaveCandidateSearch, WaveClassifier},
    config::WaveConfig,
    domain::WaveCandidate,
    models::{AnalysisOutcome, PriceSeries},
};

/// Runs swing detection, candidate search, selection and classification.
/// Holds configuration only; every call works on fresh values.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaveAnalyzer {
    search: WaveCandidateSearch,
    classifier: WaveClassifier,
}

impl WaveAnalyzer {
    pub fn new(config: &WaveConfig) -> Self {
        Self {
            search: WaveCandidateSearch::new(config.search.retracement),
            classifier: WaveClassifier::new(config.classify.retracement),
        }
    }

    pub fn analyze(&self, series: &PriceSeries) -> Result<AnalysisOutcome, AnalysisError> {
        let candidates = self.candidates(series);

        let Some(latest) = select_latest(&candidates) else {
            log::info!("No valid Elliott Wave patterns found.");
            return Ok(AnalysisOutcome::NoCandidateFound);
        };

        let label = self.classifier.classify(latest)?;
        log::info!(
            "Latest wave starts {} ({} candidates), classified {}",
            latest.wave_1.start_ts,
            candidates.len(),
            label
        );

        Ok(AnalysisOutcome::Identified {
            candidate: *latest,
            label,
        })
    }

    /// Every accepted candidate, in discovery order.
    pub fn candidates(&self, series: &PriceSeries) -> Vec<WaveCandidate> {
        let swings = crate::trace_time!("Swing detection", 5_000, {
            SwingDetector::detect(series)
        });
        log::debug!(
            "{} points -> {} swing highs, {} swing lows",
            series.len(),
            swings.highs.len(),
            swings.lows.len()
        );

        crate::trace_time!("Wave candidate search", 20_000, {
            self.search.find_candidates(&swings)
        })
    }
}

/// The last candidate in discovery order.
pub fn select_latest(candidates: &[WaveCandidate]) -> Option<&WaveCandidate> {
    candidates.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WaveLabel;

    fn series(closes: &[f64]) -> PriceSeries {
        let pairs: Vec<(i64, f64)> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| (i as i64, c))
            .collect();
        PriceSeries::from_pairs(&pairs).unwrap()
    }

    #[test]
    fn monotonic_input_reports_no_candidate() {
        let outcome = WaveAnalyzer::default()
            .analyze(&series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]))
            .unwrap();
        assert_eq!(outcome, AnalysisOutcome::NoCandidateFound);
    }

    #[test]
    fn impulsive_leg_is_identified_and_labelled() {
        // lows 100 (t1), 150 (t3); highs 200 (t2), 400 (t4)
        let outcome = WaveAnalyzer::default()
            .analyze(&series(&[120.0, 100.0, 200.0, 150.0, 400.0, 300.0]))
            .unwrap();
        let candidate = outcome.candidate().unwrap();
        assert_eq!(candidate.wave_1.price_range, (100.0, 200.0));
        assert_eq!(candidate.wave_3.price_range, (150.0, 400.0));
        assert_eq!(outcome.label(), Some(WaveLabel::Impulsive));
    }

    #[test]
    fn latest_is_the_last_discovered() {
        let outcome = WaveAnalyzer::default()
            .analyze(&series(&[
                120.0, 100.0, 200.0, 150.0, 400.0, 275.0, 900.0, 800.0,
            ]))
            .unwrap();
        assert_eq!(outcome.candidate().unwrap().wave_1.start_ts, 3);
    }

    #[test]
    fn select_latest_of_nothing_is_none() {
        assert!(select_latest(&[]).is_none());
    }
}
