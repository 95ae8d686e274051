//! Configuration module for Image-Seine
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus reading the plain-text keyword list that drives a run.
//!
//! # Example
//!
//! ```no_run
//! use image_seine::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Max images per keyword: {}", config.crawl.max_per_keyword);
//! ```

mod keywords;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, OutputConfig, SearchConfig};

// Re-export loader functions
pub use keywords::read_keywords;
pub use parser::{load_config, load_config_or_default};
