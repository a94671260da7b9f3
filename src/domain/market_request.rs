use {
    crate::utils::TimeUtils,
    anyhow::{Result, anyhow},
    chrono::{DateTime, Datelike, TimeZone, Utc},
    serde::{Deserialize, Serialize},
};

/// How far back the history window reaches.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackPeriod {
    Days(u32),
    Weeks(u32),
    Months(u32),
    Years(u32),
    YearToDate,
    Max,
}

impl LookbackPeriod {
    /// Accepts `5d`, `2wk`, `3mo`, `1y`, `ytd` and `max` (already lower-cased).
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        match text {
            "ytd" => return Ok(Self::YearToDate),
            "max" => return Ok(Self::Max),
            _ => {}
        }

        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| anyhow!("Period '{}' has no unit (expected d, wk, mo or y)", text))?;
        let (count, unit) = text.split_at(split);
        let count: u32 = count
            .parse()
            .map_err(|_| anyhow!("Period '{}' must start with a number", text))?;
        if count == 0 {
            return Err(anyhow!("Period '{}' must be at least 1", text));
        }

        match unit {
            "d" => Ok(Self::Days(count)),
            "wk" => Ok(Self::Weeks(count)),
            "mo" => Ok(Self::Months(count)),
            "y" => Ok(Self::Years(count)),
            _ => Err(anyhow!("Unknown period unit '{}' in '{}'", unit, text)),
        }
    }

    /// First timestamp (ms) inside the window ending at `now_ms`. `None` means no lower bound,
    /// which is also what a window reaching past the representable range gets.
    pub fn start_time_ms(&self, now_ms: i64) -> Option<i64> {
        let back = |count: u32, unit_ms: i64| {
            i64::from(count)
                .checked_mul(unit_ms)
                .and_then(|span| now_ms.checked_sub(span))
        };

        match *self {
            Self::Days(n) => back(n, TimeUtils::MS_IN_D),
            Self::Weeks(n) => back(n, TimeUtils::MS_IN_W),
            Self::Months(n) => back(n, TimeUtils::MS_IN_1_M),
            Self::Years(n) => back(n, TimeUtils::MS_IN_Y),
            Self::YearToDate => {
                let now: DateTime<Utc> = DateTime::from_timestamp_millis(now_ms)?;
                Utc.with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                    .single()
                    .map(|dt| dt.timestamp_millis())
            }
            Self::Max => None,
        }
    }
}

impl std::fmt::Display for LookbackPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Days(n) => write!(f, "{}d", n),
            Self::Weeks(n) => write!(f, "{}wk", n),
            Self::Months(n) => write!(f, "{}mo", n),
            Self::Years(n) => write!(f, "{}y", n),
            Self::YearToDate => write!(f, "ytd"),
            Self::Max => write!(f, "max"),
        }
    }
}

/// What to fetch: one symbol, one lookback window, one candle width.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MarketRequest {
    pub symbol: String,
    pub period: LookbackPeriod,
    pub interval_ms: i64,
}

impl MarketRequest {
    /// Builds a request from raw user input. Symbol is upper-cased, period and interval lower-cased.
    pub fn parse(symbol: &str, period: &str, interval: &str) -> Result<Self> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(anyhow!("Symbol must not be empty"));
        }

        let period = LookbackPeriod::parse(&period.to_lowercase())?;
        let interval = interval.trim().to_lowercase();
        let interval_ms = TimeUtils::interval_from_str(&interval)
            .ok_or_else(|| anyhow!("Unsupported interval '{}'", interval))?;

        Ok(Self {
            symbol,
            period,
            interval_ms,
        })
    }

    pub fn interval_str(&self) -> &'static str {
        TimeUtils::interval_to_string(self.interval_ms)
    }
}

impl std::fmt::Display for MarketRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} with period='{}' and interval='{}'",
            self.symbol,
            self.period,
            self.interval_str()
        )
    }
}
