//! Crawl coordinator - per-keyword orchestration
//!
//! Drives the crawl for each keyword as an explicit state machine:
//! fetch a results page, parse it, consume candidates in page order until
//! the quota is hit or the page is exhausted, then paginate with a random
//! politeness delay. The dedup store and metadata sink are owned here and
//! shared across every keyword in the run.

use crate::config::Config;
use crate::crawler::fetcher::{build_http_client, download_image, fetch_search_page};
use crate::crawler::parser::{parse_results, Candidate};
use crate::dedup::{hash_file, DedupStore};
use crate::output::{AcceptedImage, MetadataSink};
use crate::url::{guess_extension, source_domain};
use crate::SeineError;
use rand::Rng;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result of crawling one keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOutcome {
    /// Images accepted for this keyword
    pub accepted: u32,

    /// True when a page fetch failure ended the keyword early
    pub aborted: bool,
}

/// Totals for a whole run
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Keywords processed (including aborted ones)
    pub keywords: u32,

    /// Keywords that ended early on a page fetch failure
    pub keywords_aborted: u32,

    /// Images accepted across all keywords
    pub images_accepted: u64,
}

/// Phases of the per-keyword crawl loop
///
/// `Done` and the abort path are terminal; everything else advances the
/// loop. Pagination is entered after every non-empty page, including the
/// page on which the quota was reached, so the politeness delay always
/// runs before the loop re-checks its exit condition.
enum KeywordPhase {
    FetchingPage,
    ParsingPage(String),
    ConsumingCandidates(Vec<Candidate>),
    Paginating { candidates_seen: usize },
    Done,
}

/// Main crawl coordinator
///
/// Holds the single HTTP client, dedup store, and metadata sink for the
/// run. Keywords are processed strictly sequentially.
pub struct Coordinator {
    config: Config,
    client: Client,
    dedup: DedupStore,
    sink: MetadataSink,
}

impl Coordinator {
    /// Creates a coordinator, opening the metadata sink and image root
    ///
    /// # Arguments
    ///
    /// * `config` - The run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SeineError)` - Output paths could not be prepared or the
    ///   HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, SeineError> {
        std::fs::create_dir_all(&config.output.image_root)?;
        let sink = MetadataSink::create(Path::new(&config.output.metadata_path))?;
        let client = build_http_client(&config.search, config.crawl.timeout_secs)?;

        Ok(Self {
            config,
            client,
            dedup: DedupStore::new(),
            sink,
        })
    }

    /// Crawls every keyword in order, sharing dedup state across them
    ///
    /// A page fetch failure aborts only the keyword that hit it; metadata
    /// sink and filesystem errors terminate the run.
    pub async fn run(&mut self, keywords: &[String]) -> Result<RunSummary, SeineError> {
        let mut summary = RunSummary::default();

        for keyword in keywords {
            tracing::info!("Starting keyword: {}", keyword);
            let outcome = self.crawl_keyword(keyword).await?;

            summary.keywords += 1;
            summary.images_accepted += u64::from(outcome.accepted);
            if outcome.aborted {
                summary.keywords_aborted += 1;
                tracing::warn!(
                    "Keyword '{}' aborted after {} images",
                    keyword,
                    outcome.accepted
                );
            } else {
                tracing::info!(
                    "Keyword '{}' complete: {} images accepted",
                    keyword,
                    outcome.accepted
                );
            }
        }

        Ok(summary)
    }

    /// Runs the state machine for one keyword
    async fn crawl_keyword(&mut self, keyword: &str) -> Result<KeywordOutcome, SeineError> {
        let dir = self.keyword_dir(keyword);
        std::fs::create_dir_all(&dir)?;

        let max = self.config.crawl.max_per_keyword;
        let mut accepted: u32 = 0;
        let mut offset: usize = 0;
        let mut phase = KeywordPhase::FetchingPage;

        loop {
            phase = match phase {
                KeywordPhase::FetchingPage => {
                    match fetch_search_page(&self.client, &self.config.search, keyword, offset)
                        .await
                    {
                        Ok(html) => KeywordPhase::ParsingPage(html),
                        Err(e) => {
                            tracing::warn!(
                                "Page fetch failed for '{}' at offset {}: {}",
                                keyword,
                                offset,
                                e
                            );
                            return Ok(KeywordOutcome {
                                accepted,
                                aborted: true,
                            });
                        }
                    }
                }

                KeywordPhase::ParsingPage(html) => {
                    KeywordPhase::ConsumingCandidates(parse_results(&html))
                }

                KeywordPhase::ConsumingCandidates(candidates) => {
                    if candidates.is_empty() {
                        tracing::info!("No more results for '{}'", keyword);
                        KeywordPhase::Done
                    } else {
                        let candidates_seen = candidates.len();
                        for candidate in &candidates {
                            if accepted >= max {
                                break;
                            }
                            if self
                                .try_accept(keyword, &dir, candidate, accepted, max)
                                .await?
                            {
                                accepted += 1;
                            }
                        }
                        KeywordPhase::Paginating { candidates_seen }
                    }
                }

                KeywordPhase::Paginating { candidates_seen } => {
                    // Offset advances by candidates seen, not accepted
                    offset += candidates_seen;
                    self.pause_between_pages().await;
                    if accepted >= max {
                        KeywordPhase::Done
                    } else {
                        KeywordPhase::FetchingPage
                    }
                }

                KeywordPhase::Done => {
                    return Ok(KeywordOutcome {
                        accepted,
                        aborted: false,
                    });
                }
            };
        }
    }

    /// Attempts to download, dedup, and record one candidate
    ///
    /// Returns `Ok(true)` when the candidate was accepted and its metadata
    /// written. Download, hash, and duplicate failures all return
    /// `Ok(false)` after removing whatever landed on disk, so the sequence
    /// number is reused by the next candidate and filenames stay gapless.
    /// Only fatal errors (metadata sink, filesystem) propagate.
    async fn try_accept(
        &mut self,
        keyword: &str,
        dir: &Path,
        candidate: &Candidate,
        accepted: u32,
        max: u32,
    ) -> Result<bool, SeineError> {
        let ext = guess_extension(&candidate.image_url);
        let dest = dir.join(image_filename(keyword, accepted + 1, ext));

        if let Err(e) = download_image(&self.client, &candidate.image_url, &dest).await {
            let _ = std::fs::remove_file(&dest);
            if e.is_fatal() {
                return Err(e);
            }
            tracing::warn!("Download failed: {} | {}", candidate.image_url, e);
            return Ok(false);
        }

        let digest = match hash_file(&dest) {
            Ok(digest) => digest,
            Err(e) => {
                tracing::warn!("Could not hash {}: {}", dest.display(), e);
                let _ = std::fs::remove_file(&dest);
                return Ok(false);
            }
        };

        if !self.dedup.check_and_insert(&digest) {
            tracing::info!("Duplicate content removed: {}", dest.display());
            let _ = std::fs::remove_file(&dest);
            return Ok(false);
        }

        let record = AcceptedImage {
            keyword: keyword.to_string(),
            local_path: dest.display().to_string(),
            image_url: candidate.image_url.clone(),
            source_page: candidate.source_page_url.clone().unwrap_or_default(),
            source_domain: source_domain(candidate.source_page_url.as_deref()),
        };
        self.sink.append(&record)?;

        tracing::info!("{}/{} saved: {}", accepted + 1, max, dest.display());
        Ok(true)
    }

    /// Sleeps a random duration inside the configured inclusive range
    async fn pause_between_pages(&self) {
        let secs = {
            let mut rng = rand::thread_rng();
            rng.gen_range(self.config.crawl.delay_min_secs..=self.config.crawl.delay_max_secs)
        };
        tokio::time::sleep(Duration::from_secs_f64(secs)).await;
    }

    /// Directory for one keyword's images: spaces become underscores
    fn keyword_dir(&self, keyword: &str) -> PathBuf {
        Path::new(&self.config.output.image_root).join(keyword.replace(' ', "_"))
    }
}

/// Builds the stored filename: sanitized keyword, zero-padded sequence
/// number, guessed extension
fn image_filename(keyword: &str, seq: u32, ext: &str) -> String {
    format!("{}_{:04}.{}", sanitize_keyword(keyword), seq, ext)
}

/// Replaces every character outside alphanumerics, `_`, and `-` with `_`
fn sanitize_keyword(keyword: &str) -> String {
    keyword
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
