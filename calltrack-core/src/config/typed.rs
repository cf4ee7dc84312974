use super::{CalltrackConfig, ConfigError};

/// Trait for strongly-typed configuration sections.
///
/// ```ignore
/// pub struct PoolSettings {
///     pub size: u32,
/// }
///
/// impl ConfigProperties for PoolSettings {
///     fn prefix() -> &'static str {
///         "datasource.pool"
///     }
///
///     fn from_config(config: &CalltrackConfig) -> Result<Self, ConfigError> {
///         Ok(Self {
///             size: config.get_or("datasource.pool.size", 10),
///         })
///     }
/// }
/// ```
pub trait ConfigProperties: Sized {
    /// The configuration key prefix (e.g., `"datasource"`).
    fn prefix() -> &'static str;

    /// Construct from a `CalltrackConfig` instance.
    fn from_config(config: &CalltrackConfig) -> Result<Self, ConfigError>;
}
