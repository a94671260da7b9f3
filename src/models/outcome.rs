use {
    crate::domain::{WaveCandidate, WaveLabel},
    serde::{Deserialize, Serialize},
};

/// The only artifact handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Identified {
        candidate: WaveCandidate,
        label: WaveLabel,
    },
    NoCandidateFound,
}

impl AnalysisOutcome {
    pub fn candidate(&self) -> Option<&WaveCandidate> {
        match self {
            Self::Identified { candidate, .. } => Some(candidate),
            Self::NoCandidateFound => None,
        }
    }

    pub fn label(&self) -> Option<WaveLabel> {
        match self {
            Self::Identified { label, .. } => Some(*label),
            Self::NoCandidateFound => None,
        }
    }
}
