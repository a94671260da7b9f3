use crate::{
    config::{FibBand, WAVE},
    domain::{SwingPoint, SwingSet, WaveCandidate},
};

/// Enumerates low/high/low/high sequences that look like Waves 1-3.
#[derive(Debug, Clone, Copy)]
pub struct WaveCandidateSearch {
    band: FibBand,
}

impl Default for WaveCandidateSearch {
    fn default() -> Self {
        Self::new(WAVE.search.retracement)
    }
}

impl WaveCandidateSearch {
    pub fn new(band: FibBand) -> Self {
        Self { band }
    }

    /// Candidates in discovery order (ascending `i`, then `j`).
    ///
    /// For each low `i` and each `j > i`:
    /// - Wave 1 runs `lows[i] -> highs[j - 1]`
    /// - Wave 2 runs `highs[j - 1] -> lows[j]`
    /// - Wave 3 runs `lows[j] -> highs[j]`
    ///
    /// `j` indexes both sequences, so it is bounded by the shorter of the two.
    /// A pair is kept when the four points are in strict chronological order
    /// and Wave 2 retraces a share of Wave 1 that falls inside the search band.
    pub fn find_candidates(&self, swings: &SwingSet) -> Vec<WaveCandidate> {
        let (lows, highs) = (&swings.lows, &swings.highs);
        let j_end = highs.len().min(lows.len());
        let mut candidates = Vec::new();

        for i in 0..lows.len().saturating_sub(1) {
            for j in (i + 1)..j_end {
                let wave_1_low = &lows[i];
                let wave_1_high = &highs[j - 1];
                let wave_2_low = &lows[j];
                let wave_3_high = &highs[j];

                if !Self::is_chronological(&[wave_1_low, wave_1_high, wave_2_low, wave_3_high]) {
                    continue;
                }

                let ratio = Self::retracement_ratio(wave_1_low, wave_1_high, wave_2_low);
                if !self.band.contains(ratio) {
                    continue;
                }

                log::debug!(
                    "Candidate i={} j={}: retracement {:.3} from {} to {}",
                    i,
                    j,
                    ratio,
                    wave_1_low.timestamp_ms,
                    wave_3_high.timestamp_ms
                );
                candidates.push(WaveCandidate::from_points(
                    wave_1_low,
                    wave_1_high,
                    wave_2_low,
                    wave_3_high,
                ));
            }
        }

        candidates
    }

    /// `|(wave_2_low - wave_1_high) / (wave_1_high - wave_1_low)|`.
    /// A flat Wave 1 gives an infinite or NaN ratio, which no band contains.
    pub fn retracement_ratio(
        wave_1_low: &SwingPoint,
        wave_1_high: &SwingPoint,
        wave_2_low: &SwingPoint,
    ) -> f64 {
        let wave_1_length = wave_1_high.price - wave_1_low.price;
        ((wave_2_low.price - wave_1_high.price) / wave_1_length).abs()
    }

    fn is_chronological(points: &[&SwingPoint]) -> bool {
        points
            .windows(2)
            .all(|w| w[0].timestamp_ms < w[1].timestamp_ms)
    }
}
