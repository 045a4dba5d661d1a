//! Engine configuration - every tunable outside the mode table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{COMBO_TIMEOUT_MS, COUNTDOWN_TICK_MS, FAST_FALL_INTERVAL_MS};

/// Number of fall-speed bands
pub const FALL_TIER_COUNT: usize = 4;

/// One fall-speed band: applies from `min_level` until the next band starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallTier {
    pub min_level: u32,
    pub interval_ms: u64,
}

/// Default fall-speed bands (milliseconds per row)
///
/// | Levels | Interval |
/// |--------|----------|
/// | 1-2 | 500ms |
/// | 3-5 | 350ms |
/// | 6-9 | 200ms |
/// | 10+ | 100ms |
pub const DEFAULT_FALL_TIERS: [FallTier; FALL_TIER_COUNT] = [
    FallTier { min_level: 1, interval_ms: 500 },
    FallTier { min_level: 3, interval_ms: 350 },
    FallTier { min_level: 6, interval_ms: 200 },
    FallTier { min_level: 10, interval_ms: 100 },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("combo timeout must be greater than zero")]
    ZeroComboTimeout,
    #[error("{0} interval must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("fall tiers must start at level 1 and be strictly increasing in level")]
    UnorderedFallTiers,
    #[error("fall tier intervals must not increase with level")]
    SlowerFallTier,
    #[error("power-up percentage out of range: {0}")]
    PercentOutOfRange(u32),
    #[error("danger rows ({0}) exceed board height")]
    DangerRowsOutOfRange(u8),
}

/// Tunables for a session
///
/// Deserializes with defaults for missing fields, so a config file only needs
/// to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the tile generator
    pub seed: u32,
    /// Combo resets once this long passes without a clear
    pub combo_timeout_ms: u64,
    pub fall_tiers: [FallTier; FALL_TIER_COUNT],
    pub fast_fall_interval_ms: u64,
    pub countdown_interval_ms: u64,
    /// Power-up odds at level 1
    pub powerup_base_percent: u32,
    pub powerup_percent_per_level: u32,
    pub powerup_max_percent: u32,
    /// A fruitless lock inside the top `danger_rows` rows counts as a mistake
    pub danger_rows: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            combo_timeout_ms: COMBO_TIMEOUT_MS,
            fall_tiers: DEFAULT_FALL_TIERS,
            fast_fall_interval_ms: FAST_FALL_INTERVAL_MS,
            countdown_interval_ms: COUNTDOWN_TICK_MS,
            powerup_base_percent: 15,
            powerup_percent_per_level: 1,
            powerup_max_percent: 25,
            danger_rows: 3,
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combo_timeout_ms == 0 {
            return Err(ConfigError::ZeroComboTimeout);
        }
        if self.fast_fall_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("fast fall"));
        }
        if self.countdown_interval_ms == 0 {
            return Err(ConfigError::ZeroInterval("countdown"));
        }
        if self.fall_tiers.iter().any(|t| t.interval_ms == 0) {
            return Err(ConfigError::ZeroInterval("fall tier"));
        }
        if self.fall_tiers[0].min_level != 1
            || self
                .fall_tiers
                .windows(2)
                .any(|w| w[1].min_level <= w[0].min_level)
        {
            return Err(ConfigError::UnorderedFallTiers);
        }
        if self
            .fall_tiers
            .windows(2)
            .any(|w| w[1].interval_ms > w[0].interval_ms)
        {
            return Err(ConfigError::SlowerFallTier);
        }
        for pct in [
            self.powerup_base_percent,
            self.powerup_max_percent,
            self.powerup_percent_per_level,
        ] {
            if pct > 100 {
                return Err(ConfigError::PercentOutOfRange(pct));
            }
        }
        if self.danger_rows > crate::types::BOARD_ROWS {
            return Err(ConfigError::DangerRowsOutOfRange(self.danger_rows));
        }
        Ok(())
    }

    /// Fall interval for `level`: the band with the highest `min_level <= level`
    pub fn fall_interval_ms(&self, level: u32) -> u64 {
        self.fall_tiers
            .iter()
            .rev()
            .find(|t| t.min_level <= level)
            .unwrap_or(&self.fall_tiers[0])
            .interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_fall_interval_bands() {
        let config = EngineConfig::default();
        assert_eq!(config.fall_interval_ms(0), 500);
        assert_eq!(config.fall_interval_ms(1), 500);
        assert_eq!(config.fall_interval_ms(2), 500);
        assert_eq!(config.fall_interval_ms(3), 350);
        assert_eq!(config.fall_interval_ms(5), 350);
        assert_eq!(config.fall_interval_ms(6), 200);
        assert_eq!(config.fall_interval_ms(9), 200);
        assert_eq!(config.fall_interval_ms(10), 100);
        assert_eq!(config.fall_interval_ms(99), 100);
    }

    #[test]
    fn test_rejects_bad_tiers() {
        let mut config = EngineConfig::default();
        config.fall_tiers[2].min_level = 3;
        assert_eq!(config.validate(), Err(ConfigError::UnorderedFallTiers));

        let mut config = EngineConfig::default();
        config.fall_tiers[3].interval_ms = 900;
        assert_eq!(config.validate(), Err(ConfigError::SlowerFallTier));

        let mut config = EngineConfig::default();
        config.fall_tiers[1].interval_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval("fall tier")));
    }

    #[test]
    fn test_rejects_bad_scalars() {
        let config = EngineConfig {
            combo_timeout_ms: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroComboTimeout));

        let config = EngineConfig {
            powerup_max_percent: 101,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::PercentOutOfRange(101)));

        let config = EngineConfig {
            danger_rows: 11,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::DangerRowsOutOfRange(11)));
    }
}
