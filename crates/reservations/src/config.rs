//! Reservation timing configuration loaded from environment variables.

/// Hold TTL and sweep timing knobs.
///
/// The sweep interval should be materially shorter than the minimum TTL so
/// a stale client-visible "held" state is bounded by roughly one interval.
#[derive(Debug, Clone)]
pub struct ReservationConfig {
    /// Hold TTL applied when the caller does not override it (seconds).
    pub default_ttl_secs: i64,
    /// Lower clamp for caller-supplied TTLs (seconds).
    pub min_ttl_secs: i64,
    /// Upper clamp for caller-supplied TTLs (seconds).
    pub max_ttl_secs: i64,
    /// Period of the expiry sweep loop (seconds).
    pub sweep_interval_secs: u64,
}

impl ReservationConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default |
    /// |-----------------------|---------|
    /// | `HOLD_TTL_SECS`       | `600`   |
    /// | `HOLD_TTL_MIN_SECS`   | `60`    |
    /// | `HOLD_TTL_MAX_SECS`   | `1800`  |
    /// | `SWEEP_INTERVAL_SECS` | `60`    |
    pub fn from_env() -> Self {
        Self {
            default_ttl_secs: env_i64("HOLD_TTL_SECS", 600),
            min_ttl_secs: env_i64("HOLD_TTL_MIN_SECS", 60),
            max_ttl_secs: env_i64("HOLD_TTL_MAX_SECS", 1800),
            sweep_interval_secs: env_i64("SWEEP_INTERVAL_SECS", 60) as u64,
        }
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            default_ttl_secs: 600,
            min_ttl_secs: 60,
            max_ttl_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

fn env_i64(var: &str, default: i64) -> i64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_keep_sweep_shorter_than_min_ttl() {
        let config = ReservationConfig::default();
        assert!((config.sweep_interval_secs as i64) < config.min_ttl_secs + 1);
        assert!(config.min_ttl_secs <= config.default_ttl_secs);
        assert!(config.default_ttl_secs <= config.max_ttl_secs);
    }
}
