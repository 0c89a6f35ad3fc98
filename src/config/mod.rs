//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → PassthroughConfig (validated, immutable)
//!     → CLI flags override individual fields in main.rs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts
//! - All fields have defaults, so no config file is needed at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    Engine, LogFormat, ObservabilityConfig, PassthroughConfig, ServerConfig, TimeoutConfig,
    UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};
