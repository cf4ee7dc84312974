//! # calltrack-core
//!
//! Ambient runtime pieces shared by the calltrack crates: the layered
//! [`CalltrackConfig`] source and [`init_tracing`].

pub mod config;
pub mod tracing_setup;

pub use config::{
    CalltrackConfig, ConfigError, ConfigProperties, ConfigValue, DefaultSecretResolver,
    FromConfigValue, SecretResolver,
};
pub use tracing_setup::init_tracing;
