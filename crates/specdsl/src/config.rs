//! Executor configuration.

use serde::{Deserialize, Serialize};

/// Default upper bound for a requested page size.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 2000;

/// Where nulls sort when an order leaves null placement to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NullPlacement {
    /// Nulls compare greater than every value: last ascending, first
    /// descending.
    #[default]
    High,
    /// Nulls compare less than every value: first ascending, last
    /// descending.
    Low,
}

/// Settings for the in-memory [`Repository`](crate::Repository).
///
/// ```
/// use specdsl::{NullPlacement, RepositoryConfig};
///
/// let config: RepositoryConfig = serde_json::from_str(r#"{"max_page_size": 50}"#)?;
/// assert_eq!(config.max_page_size, 50);
/// assert_eq!(config.native_nulls, NullPlacement::High);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Page requests larger than this are clamped to it.
    pub max_page_size: usize,
    /// Placement of nulls under [`NullHandling::Native`](crate::NullHandling::Native).
    pub native_nulls: NullPlacement,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        RepositoryConfig {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            native_nulls: NullPlacement::High,
        }
    }
}

impl RepositoryConfig {
    /// Returns this config with another page size cap.
    pub fn with_max_page_size(mut self, max_page_size: usize) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    /// Returns this config with another native null placement.
    pub fn with_native_nulls(mut self, native_nulls: NullPlacement) -> Self {
        self.native_nulls = native_nulls;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_keys() {
        let config: RepositoryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, RepositoryConfig::default());

        let config: RepositoryConfig = serde_json::from_str(r#"{"native_nulls":"low"}"#).unwrap();
        assert_eq!(config.native_nulls, NullPlacement::Low);
        assert_eq!(config.max_page_size, DEFAULT_MAX_PAGE_SIZE);
    }

    #[test]
    fn builders() {
        let config = RepositoryConfig::default()
            .with_max_page_size(10)
            .with_native_nulls(NullPlacement::Low);
        assert_eq!(config.max_page_size, 10);
        assert_eq!(config.native_nulls, NullPlacement::Low);
    }
}
