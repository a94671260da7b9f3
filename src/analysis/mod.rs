// Swing extraction, wave candidate search and classification
mod error;
mod swing_detector;
mod wave_analysis;
mod wave_classifier;
mod wave_search;

pub use {
    error::AnalysisError,
    swing_detector::SwingDetector,
    wave_analysis::{WaveAnalyzer, select_latest},
    wave_classifier::WaveClassifier,
    wave_search::WaveCandidateSearch,
};
