use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::tools::{ContentExtractor, SearchGateway};

/// Thresholds and pacing for one collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Stop once this many words are collected; also the hard cap afterwards
    pub word_target: usize,
    /// Upper bound on search passes
    pub max_attempts: usize,
    /// Minimum spacing between search calls; the first call never waits
    pub inter_request_delay: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            word_target: 10_000,
            max_attempts: 10,
            inter_request_delay: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fragment {
    source: String,
    text: String,
    words: usize,
}

/// Text collected for one topic, in collection order, tagged with its sources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccumulatedContent {
    fragments: Vec<Fragment>,
}

impl AccumulatedContent {
    /// Append a fragment extracted from `source`
    pub fn push(&mut self, source: impl Into<String>, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.fragments.push(Fragment {
            source: source.into(),
            words: text.split_whitespace().count(),
            text: text.to_string(),
        });
    }

    pub fn word_count(&self) -> usize {
        self.fragments.iter().map(|f| f.words).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// Contributing source URLs, in collection order
    pub fn sources(&self) -> Vec<String> {
        self.fragments.iter().map(|f| f.source.clone()).collect()
    }

    /// All fragments joined by blank lines
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Keep only the first `cap` words. Fragments cut away entirely are dropped
    /// together with their source.
    pub fn truncate_words(&mut self, cap: usize) {
        let mut remaining = cap;
        let mut keep = 0;

        for fragment in &mut self.fragments {
            if remaining == 0 {
                break;
            }
            if fragment.words > remaining {
                if let Some(cut) = nth_word_start(&fragment.text, remaining) {
                    fragment.text.truncate(cut);
                    let trimmed = fragment.text.trim_end().len();
                    fragment.text.truncate(trimmed);
                }
                fragment.words = remaining;
            }
            remaining -= fragment.words;
            keep += 1;
        }

        self.fragments.truncate(keep);
    }
}

/// Byte offset where word number `n` (0-based) starts, if the text has that many words
fn nth_word_start(text: &str, n: usize) -> Option<usize> {
    let mut count = 0;
    let mut in_word = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            in_word = false;
        } else if !in_word {
            in_word = true;
            if count == n {
                return Some(idx);
            }
            count += 1;
        }
    }
    None
}

/// Strip the fragment part so `page#a` and `page#b` count as one source
fn normalize_url(url: &str) -> &str {
    let url = url.trim();
    url.split_once('#').map_or(url, |(base, _)| base)
}

/// Repeated search + extraction for one topic.
///
/// Search pacing spans every `collect` call on the same collector, so the
/// topics of one submission share a single search rate.
pub struct ResearchCollector {
    search: Arc<dyn SearchGateway>,
    extractor: Arc<dyn ContentExtractor>,
    settings: CollectorSettings,
    last_search: Mutex<Option<Instant>>,
}

impl ResearchCollector {
    pub fn new(
        search: Arc<dyn SearchGateway>,
        extractor: Arc<dyn ContentExtractor>,
        settings: CollectorSettings,
    ) -> Self {
        Self {
            search,
            extractor,
            settings,
            last_search: Mutex::new(None),
        }
    }

    /// Wait out the rest of `inter_request_delay` since the previous search
    async fn pace(&self) {
        let delay = self.settings.inter_request_delay;
        let last = *self.last_search.lock();
        let wait = last.map(|at| delay.saturating_sub(at.elapsed()));
        if let Some(wait) = wait.filter(|w| !w.is_zero()) {
            tokio::time::sleep(wait).await;
        }
        *self.last_search.lock() = Some(Instant::now());
    }

    /// Collect page text for `query` until the word target is met, the attempt
    /// bound is reached, or a whole pass adds nothing new.
    ///
    /// Never fails: a query with no usable results yields empty content.
    pub async fn collect(&self, query: &str) -> AccumulatedContent {
        let mut content = AccumulatedContent::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut attempts = 0;

        while content.word_count() < self.settings.word_target
            && attempts < self.settings.max_attempts
        {
            self.pace().await;
            let urls = self.search.search(query).await;
            let fragments_before = content.fragment_count();

            for url in urls {
                let url = normalize_url(&url).to_string();
                if url.is_empty() || !seen.insert(url.clone()) {
                    continue;
                }

                let text = self.extractor.extract(&url).await;
                if text.trim().is_empty() {
                    debug!(url = %url, "No usable text");
                    continue;
                }
                content.push(url, &text);
            }

            attempts += 1;
            debug!(
                query,
                attempt = attempts,
                words = content.word_count(),
                sources = content.fragment_count(),
                "Collection pass finished"
            );

            if content.fragment_count() == fragments_before {
                info!(query, attempt = attempts, "Search exhausted, stopping collection");
                break;
            }
        }

        content.truncate_words(self.settings.word_target);

        info!(
            query,
            attempts,
            words = content.word_count(),
            sources = content.fragment_count(),
            "Collection finished"
        );
        content
    }
}
