// Rendering of analysis outcomes for the terminal
mod wave_report;

pub use wave_report::{NO_PATTERN_MESSAGE, OutputFormat, WaveReport};
