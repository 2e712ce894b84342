//local shortcuts

//third-party shortcuts

//standard shortcuts
use std::time::{Duration, Instant};

//-------------------------------------------------------------------------------------------------------------------

/// Configuration for the per-session rate limiter. Defaults to 10 messages per 100 milliseconds.
#[derive(Debug, Copy, Clone)]
pub struct RateLimitConfig
{
    /// Length of a counting window. Defaults to 100 milliseconds.
    pub period: Duration,
    /// Max number of envelopes accepted in one window. Defaults to 10 envelopes.
    pub max_count: u32,
}

impl Default for RateLimitConfig
{
    fn default() -> RateLimitConfig
    {
        RateLimitConfig{
            period    : Duration::from_millis(100u64),
            max_count : 10u32,
        }
    }
}

//-------------------------------------------------------------------------------------------------------------------

/// Counts envelopes received from one session in fixed windows.
/// - A window opens with the first envelope after the previous window expired.
#[derive(Debug)]
pub struct RateLimitTracker
{
    config: RateLimitConfig,
    /// start of the current window
    window_start: Instant,
    /// envelopes seen in the current window
    count: u32,
}

impl RateLimitTracker
{
    /// Make a new rate limit tracker.
    pub fn new(config: RateLimitConfig) -> RateLimitTracker
    {
        RateLimitTracker{ config, window_start: Instant::now(), count: 0u32 }
    }

    /// Count one envelope.
    /// - Returns `false` if the envelope exceeds the window's budget.
    pub fn try_count_msg(&mut self) -> bool
    {
        let now = Instant::now();
        if now.saturating_duration_since(self.window_start) >= self.config.period
        {
            self.window_start = now;
            self.count = 0;
        }

        self.count = self.count.saturating_add(1);
        self.count <= self.config.max_count
    }
}

//-------------------------------------------------------------------------------------------------------------------
