//! Board configuration and construction-time validation
//!
//! Out-of-range dimensions are the only hard failure in the rules engine; every
//! in-game operation is total.

use std::env;
use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use crate::types::{
    DEFAULT_COLORS, DEFAULT_COLUMNS, DEFAULT_ROWS, MAX_COLORS, MAX_COLUMNS, MAX_ROWS, MIN_COLORS,
    MIN_COLUMNS, MIN_ROWS, PULSE_DELAY_MS,
};

/// Range error raised when constructing a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    RowsOutOfRange(i32),
    ColumnsOutOfRange(i32),
    ColorsOutOfRange(u8),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::RowsOutOfRange(_) => "rows_out_of_range",
            ConfigError::ColumnsOutOfRange(_) => "columns_out_of_range",
            ConfigError::ColorsOutOfRange(_) => "colors_out_of_range",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ConfigError::RowsOutOfRange(v) => {
                format!("rows must be within {}..={}, got {}", MIN_ROWS, MAX_ROWS, v)
            }
            ConfigError::ColumnsOutOfRange(v) => format!(
                "columns must be within {}..={}, got {}",
                MIN_COLUMNS, MAX_COLUMNS, v
            ),
            ConfigError::ColorsOutOfRange(v) => format!(
                "colors must be within {}..={}, got {}",
                MIN_COLORS, MAX_COLORS, v
            ),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ConfigError {}

/// Board dimensions and presentation flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub rows: i32,
    pub columns: i32,
    pub colors: u8,
    /// Pulse matched cells before removing them
    pub show_animation: bool,
    /// Wait between pulse toggles; zero emits the pulse events without waiting
    pub pulse_delay: Duration,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            colors: DEFAULT_COLORS,
            show_animation: true,
            pulse_delay: Duration::from_millis(PULSE_DELAY_MS),
        }
    }
}

impl BoardConfig {
    pub fn new(rows: i32, columns: i32, colors: u8, show_animation: bool) -> Self {
        Self {
            rows,
            columns,
            colors,
            show_animation,
            ..Self::default()
        }
    }

    pub fn rows_range() -> RangeInclusive<i32> {
        MIN_ROWS..=MAX_ROWS
    }

    pub fn columns_range() -> RangeInclusive<i32> {
        MIN_COLUMNS..=MAX_COLUMNS
    }

    pub fn colors_range() -> RangeInclusive<u8> {
        MIN_COLORS..=MAX_COLORS
    }

    /// Check every dimension against its allowed range (rows first)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !Self::rows_range().contains(&self.rows) {
            return Err(ConfigError::RowsOutOfRange(self.rows));
        }
        if !Self::columns_range().contains(&self.columns) {
            return Err(ConfigError::ColumnsOutOfRange(self.columns));
        }
        if !Self::colors_range().contains(&self.colors) {
            return Err(ConfigError::ColorsOutOfRange(self.colors));
        }
        Ok(())
    }

    /// Create from environment variables
    ///
    /// - `COLUMNS_ROWS`, `COLUMNS_COLUMNS`, `COLUMNS_COLORS`
    /// - `COLUMNS_ANIMATION`: "1"/"true" or "0"/"false"
    /// - `COLUMNS_PULSE_MS`
    ///
    /// Missing or unparseable values fall back to defaults; range checks happen
    /// in [`validate`](Self::validate).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rows = env::var("COLUMNS_ROWS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.rows);
        let columns = env::var("COLUMNS_COLUMNS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.columns);
        let colors = env::var("COLUMNS_COLORS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.colors);
        let show_animation = env::var("COLUMNS_ANIMATION")
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.show_animation);
        let pulse_delay = env::var("COLUMNS_PULSE_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.pulse_delay);

        Self {
            rows,
            columns,
            colors,
            show_animation,
            pulse_delay,
        }
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BoardConfig::default();
        assert_eq!(config.rows, 13);
        assert_eq!(config.columns, 6);
        assert_eq!(config.colors, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rows_are_checked_before_columns() {
        let err = BoardConfig::new(6, 2, 5, false).validate().unwrap_err();
        assert_eq!(err, ConfigError::RowsOutOfRange(6));
        assert_eq!(err.code(), "rows_out_of_range");
    }

    #[test]
    fn message_names_the_range() {
        let err = ConfigError::ColorsOutOfRange(11);
        assert_eq!(err.to_string(), "colors must be within 2..=10, got 11");
    }

    #[test]
    fn flags_parse_loosely() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
