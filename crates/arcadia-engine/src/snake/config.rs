use serde::{Deserialize, Serialize};

use crate::SnakeSetupError;

/// Board geometry and stall cutoff of the snake game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    pub width: i32,
    pub height: i32,
    pub block_size: i32,
    /// A game ends once its frame counter exceeds `stall_factor × length`.
    pub stall_factor: u32,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            block_size: 60,
            stall_factor: 100,
        }
    }
}

impl SnakeConfig {
    /// Number of cell columns on the board.
    #[must_use]
    pub fn columns(&self) -> i32 {
        (self.width - self.block_size) / self.block_size + 1
    }

    /// Number of cell rows on the board.
    #[must_use]
    pub fn rows(&self) -> i32 {
        (self.height - self.block_size) / self.block_size + 1
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::try_from(self.columns() * self.rows()).unwrap_or(0)
    }

    /// Checks that the board holds at least one whole block.
    pub fn validate(&self) -> Result<(), SnakeSetupError> {
        let Self {
            width,
            height,
            block_size,
            ..
        } = *self;
        if block_size <= 0 || width < block_size || height < block_size {
            return Err(SnakeSetupError::InvalidBoard {
                width,
                height,
                block_size,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_board_dimensions() {
        let config = SnakeConfig::default();
        assert_eq!(config.columns(), 16);
        assert_eq!(config.rows(), 13);
        assert_eq!(config.cell_count(), 208);
    }

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config: SnakeConfig = serde_json::from_str(r#"{ "width": 600 }"#).unwrap();
        assert_eq!(config.width, 600);
        assert_eq!(config.block_size, 60);
        assert_eq!(config.columns(), 10);
    }

    #[test]
    fn test_degenerate_boards_are_rejected() {
        SnakeConfig::default().validate().unwrap();
        for (width, height, block_size) in [(1000, 800, 0), (1000, 800, -60), (50, 800, 60)] {
            let config = SnakeConfig {
                width,
                height,
                block_size,
                ..SnakeConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(SnakeSetupError::InvalidBoard {
                    width,
                    height,
                    block_size
                })
            );
        }
    }
}
