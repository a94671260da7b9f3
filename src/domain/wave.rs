use {
    crate::domain::SwingPoint,
    serde::{Deserialize, Serialize},
    strum::IntoEnumIterator,
    strum_macros::{Display, EnumIter},
};

/// One directional leg between two swing points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveSegment {
    /// (start_price, end_price)
    pub price_range: (f64, f64),
    pub start_ts: i64,
    pub end_ts: i64,
    pub duration_ms: i64,
}

impl WaveSegment {
    pub fn between(start: &SwingPoint, end: &SwingPoint) -> Self {
        Self {
            price_range: (start.price, end.price),
            start_ts: start.timestamp_ms,
            end_ts: end.timestamp_ms,
            duration_ms: end.timestamp_ms - start.timestamp_ms,
        }
    }

    pub fn start_price(&self) -> f64 {
        self.price_range.0
    }

    pub fn end_price(&self) -> f64 {
        self.price_range.1
    }

    /// Absolute price distance covered by the leg.
    pub fn length(&self) -> f64 {
        (self.end_price() - self.start_price()).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
pub enum WaveName {
    #[strum(to_string = "Wave_1")]
    Wave1,
    #[strum(to_string = "Wave_2")]
    Wave2,
    #[strum(to_string = "Wave_3")]
    Wave3,
}

/// Three contiguous legs: impulse up, retracement, continuation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveCandidate {
    pub wave_1: WaveSegment,
    pub wave_2: WaveSegment,
    pub wave_3: WaveSegment,
}

impl WaveCandidate {
    pub fn from_points(
        wave_1_low: &SwingPoint,
        wave_1_high: &SwingPoint,
        wave_2_low: &SwingPoint,
        wave_3_high: &SwingPoint,
    ) -> Self {
        Self {
            wave_1: WaveSegment::between(wave_1_low, wave_1_high),
            wave_2: WaveSegment::between(wave_1_high, wave_2_low),
            wave_3: WaveSegment::between(wave_2_low, wave_3_high),
        }
    }

    pub fn segment(&self, name: WaveName) -> &WaveSegment {
        match name {
            WaveName::Wave1 => &self.wave_1,
            WaveName::Wave2 => &self.wave_2,
            WaveName::Wave3 => &self.wave_3,
        }
    }

    /// Segments in order, labelled.
    pub fn segments(&self) -> impl Iterator<Item = (WaveName, &WaveSegment)> + '_ {
        WaveName::iter().map(|name| (name, self.segment(name)))
    }
}

/// Closed set of classification labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum WaveLabel {
    Impulsive,
    Corrective,
    #[strum(to_string = "Insufficient Data")]
    InsufficientData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SwingKind;

    fn point(ts: i64, price: f64, kind: SwingKind) -> SwingPoint {
        SwingPoint {
            timestamp_ms: ts,
            price,
            kind,
        }
    }

    #[test]
    fn candidate_segments_chain_end_to_start() {
        let c = WaveCandidate::from_points(
            &point(1, 100.0, SwingKind::Low),
            &point(3, 200.0, SwingKind::High),
            &point(6, 150.0, SwingKind::Low),
            &point(10, 400.0, SwingKind::High),
        );

        assert_eq!(c.wave_1.end_ts, c.wave_2.start_ts);
        assert_eq!(c.wave_2.end_ts, c.wave_3.start_ts);
        assert_eq!(c.wave_1.price_range, (100.0, 200.0));
        assert_eq!(c.wave_2.price_range, (200.0, 150.0));
        assert_eq!(c.wave_3.duration_ms, 4);
        assert_eq!(c.wave_2.length(), 50.0);
        assert_eq!(c.segment(WaveName::Wave3).end_price(), 400.0);

        let names: Vec<WaveName> = c.segments().map(|(name, _)| name).collect();
        assert_eq!(names, [WaveName::Wave1, WaveName::Wave2, WaveName::Wave3]);
    }

    #[test]
    fn labels_render_as_report_text() {
        let text: Vec<String> = [
            WaveLabel::Impulsive,
            WaveLabel::Corrective,
            WaveLabel::InsufficientData,
        ]
        .iter()
        .map(|l| l.to_string())
        .collect();
        assert_eq!(text, ["Impulsive", "Corrective", "Insufficient Data"]);
        assert_eq!(WaveName::Wave2.to_string(), "Wave_2");
    }
}
