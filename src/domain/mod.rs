// Domain types and value objects
mod candle;
mod market_request;
mod swing;
mod wave;

pub use candle::Candle;
pub use market_request::{LookbackPeriod, MarketRequest};
pub use swing::{SwingKind, SwingPoint, SwingSet};
pub use wave::{WaveCandidate, WaveLabel, WaveName, WaveSegment};
