use serde::Deserialize;

/// Main configuration structure for Image-Seine
///
/// Every field carries a default so the harvester runs usefully with no
/// config file at all; a TOML file only needs to name what it overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawl: CrawlConfig,
    pub search: SearchConfig,
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawl: CrawlConfig::default(),
            search: SearchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Maximum images accepted per keyword
    #[serde(rename = "max-per-keyword")]
    pub max_per_keyword: u32,

    /// Lower bound of the random inter-page delay (seconds, inclusive)
    #[serde(rename = "delay-min-secs")]
    pub delay_min_secs: f64,

    /// Upper bound of the random inter-page delay (seconds, inclusive)
    #[serde(rename = "delay-max-secs")]
    pub delay_max_secs: f64,

    /// Per-request timeout (seconds), applied to page and image fetches
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_per_keyword: 5,
            delay_min_secs: 1.0,
            delay_max_secs: 3.0,
            timeout_secs: 10,
        }
    }
}

/// Search endpoint configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the image search endpoint
    pub endpoint: String,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://www.bing.com/images/search".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/123.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory for downloaded images (one subdirectory per keyword)
    #[serde(rename = "image-root")]
    pub image_root: String,

    /// Path of the metadata CSV file
    #[serde(rename = "metadata-path")]
    pub metadata_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_root: "images".to_string(),
            metadata_path: "metadata.csv".to_string(),
        }
    }
}
