//! Configuration module for crawldex
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use crawldex::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawldex.toml")).unwrap();
//! println!("Text extraction via: {}", config.extractor.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ExtractorConfig, FetcherConfig, ServerConfig, StorageConfig, TaskConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
