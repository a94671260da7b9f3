use {
    crate::{
        config::WAVE,
        domain::{SwingKind, SwingPoint, SwingSet},
        models::PriceSeries,
    },
    itertools::Itertools,
};

/// Finds strict local maxima/minima of the close series.
pub struct SwingDetector;

impl SwingDetector {
    /// A point is a swing high when its close is strictly above both neighbours,
    /// a swing low when strictly below both. The first and last points have only
    /// one neighbour and are never swings; plateaus produce nothing.
    pub fn detect(series: &PriceSeries) -> SwingSet {
        let mut swings = SwingSet::default();
        if series.len() < WAVE.min_series_len {
            return swings;
        }

        let timestamps = series.timestamps();
        for (i, (prev, cur, next)) in series.close_prices().iter().tuple_windows().enumerate() {
            let idx = i + 1;
            let kind = if cur > prev && cur > next {
                SwingKind::High
            } else if cur < prev && cur < next {
                SwingKind::Low
            } else {
                continue;
            };

            let point = SwingPoint {
                timestamp_ms: timestamps[idx],
                price: *cur,
                kind,
            };
            match kind {
                SwingKind::High => swings.highs.push(point),
                SwingKind::Low => swings.lows.push(point),
            }
        }

        // Scan order is already chronological, this only pins the guarantee.
        swings.highs.sort_by_key(|p| p.timestamp_ms);
        swings.lows.sort_by_key(|p| p.timestamp_ms);
        swings
    }
}
