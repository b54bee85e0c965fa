use serde::{Deserialize, Serialize};

use crate::error::{ChunkerError, Result};

/// Configuration for chunking behavior
///
/// All four bounds are word-count tokens (see [`crate::estimate_tokens`]).
/// A config is immutable for the duration of a chunking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens (soft limit for sliding windows)
    pub target_tokens: usize,

    /// Maximum chunk size in tokens (hard limit)
    pub max_tokens: usize,

    /// Minimum chunk size in tokens (smaller chunks become merge candidates)
    pub min_tokens: usize,

    /// Word overlap between consecutive sliding windows
    pub overlap_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_tokens: 450,
            max_tokens: 800,
            min_tokens: 50,
            overlap_tokens: 50,
        }
    }
}

impl ChunkingConfig {
    /// Validate configuration
    ///
    /// Required: every bound positive, `min_tokens <= target_tokens <=
    /// max_tokens`, and `overlap_tokens < target_tokens` so the sliding
    /// window always advances.
    pub fn validate(&self) -> Result<()> {
        if self.target_tokens == 0
            || self.max_tokens == 0
            || self.min_tokens == 0
            || self.overlap_tokens == 0
        {
            return Err(ChunkerError::invalid_config(
                "all token bounds must be > 0",
            ));
        }

        if self.min_tokens > self.target_tokens {
            return Err(ChunkerError::invalid_config(format!(
                "min_tokens ({}) cannot exceed target_tokens ({})",
                self.min_tokens, self.target_tokens
            )));
        }

        if self.target_tokens > self.max_tokens {
            return Err(ChunkerError::invalid_config(format!(
                "target_tokens ({}) cannot exceed max_tokens ({})",
                self.target_tokens, self.max_tokens
            )));
        }

        if self.overlap_tokens >= self.target_tokens {
            return Err(ChunkerError::invalid_config(format!(
                "overlap_tokens ({}) must be smaller than target_tokens ({})",
                self.overlap_tokens, self.target_tokens
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(ChunkingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_bounds_rejected() {
        for field in 0..4 {
            let mut config = ChunkingConfig::default();
            match field {
                0 => config.target_tokens = 0,
                1 => config.max_tokens = 0,
                2 => config.min_tokens = 0,
                _ => config.overlap_tokens = 0,
            }
            assert!(config.validate().is_err(), "field {field} accepted zero");
        }
    }

    #[test]
    fn test_min_above_target_rejected() {
        let config = ChunkingConfig {
            min_tokens: 500,
            target_tokens: 450,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_target_above_max_rejected() {
        let config = ChunkingConfig {
            target_tokens: 900,
            max_tokens: 800,
            min_tokens: 50,
            overlap_tokens: 50,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overlap_must_stay_below_target() {
        let config = ChunkingConfig {
            overlap_tokens: 450,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ChunkingConfig {
            overlap_tokens: 449,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
