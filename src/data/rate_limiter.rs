use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

/// Per-minute request weight budget shared by every REST call.
#[derive(Clone)]
pub struct GlobalRateLimiter {
    inner: Arc<Mutex<WeightWindow>>,
}

struct WeightWindow {
    used_weight: u32,
    // Minutes since the epoch that `used_weight` belongs to
    minute_idx: u64,
    limit: u32,
}

impl GlobalRateLimiter {
    pub fn new(limit: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(WeightWindow {
                used_weight: 0,
                minute_idx: current_minute_idx(),
                limit,
            })),
        }
    }

    /// Waits until `cost` fits in the current minute's budget, then spends it.
    pub async fn acquire(&self, cost: u32, symbol: &str) {
        loop {
            let wait = {
                let mut window = self.inner.lock().await;
                let now_idx = current_minute_idx();
                if now_idx > window.minute_idx {
                    window.used_weight = 0;
                    window.minute_idx = now_idx;
                }

                if window.used_weight + cost <= window.limit {
                    window.used_weight += cost;
                    return;
                }

                log::warn!(
                    "Rate limit saturated for [{}]. Used: {}/{}. Waiting for next minute...",
                    symbol,
                    window.used_weight,
                    window.limit
                );
                until_next_minute()
            };

            tokio::time::sleep(wait).await;
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

fn current_minute_idx() -> u64 {
    now_secs() / 60
}

// Small buffer so we land inside the next minute
fn until_next_minute() -> Duration {
    Duration::from_secs(60 - now_secs() % 60) + Duration::from_millis(100)
}
