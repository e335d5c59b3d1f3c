//! Builder policy configuration.
//!
//! Policies can be set in code or loaded from a TOML fragment:
//!
//! ```toml
//! order_conflict = "reject"
//! range_check = "deferred"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// OrderConflict
///
/// What `order_by` does with a column that is already ordered.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderConflict {
    /// The later direction replaces the earlier entry in place.
    #[default]
    Replace,

    /// The second `order_by` on one column fails the build.
    Reject,
}

///
/// RangeCheck
///
/// When range emptiness (`> 10` together with `< 5`) is detected.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeCheck {
    /// Checked when a conjunction scope is frozen: at `build()` for the root
    /// scope and when `either` captures a branch.
    #[default]
    AtBuild,

    /// Not checked; an empty range simply yields an empty result at execution.
    Deferred,
}

///
/// QueryConfig
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueryConfig {
    pub order_conflict: OrderConflict,
    pub range_check: RangeCheck,
}

impl QueryConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            order_conflict: OrderConflict::Replace,
            range_check: RangeCheck::AtBuild,
        }
    }

    #[must_use]
    pub const fn with_order_conflict(mut self, policy: OrderConflict) -> Self {
        self.order_conflict = policy;
        self
    }

    #[must_use]
    pub const fn with_range_check(mut self, policy: RangeCheck) -> Self {
        self.range_check = policy;
        self
    }

    /// Parse a config from TOML; absent keys keep their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid query config: {0}")]
    Parse(#[from] toml::de::Error),
}
