//! Web access for the research pipeline
//!
//! # Module Structure
//!
//! - [`search`](crate::tools::search) - Search gateways (JSON-over-HTTP providers, DuckDuckGo)
//! - [`extract`](crate::tools::extract) - Page fetching and HTML-to-text reduction
//!
//! Both sides follow the same contract: upstream failures degrade to empty
//! values instead of errors.
//!
//! ```ignore
//! let gateway = search::create_gateway(&pipeline_config);
//! let extractor = extract::HtmlExtractor::new(Duration::from_secs(10), 2000);
//!
//! for url in gateway.search("thermodynamics").await {
//!     let text = extractor.extract(&url).await;
//! }
//! ```

/// Page fetching and text extraction.
pub mod extract;
/// Search provider gateways.
pub mod search;

pub use extract::{ContentExtractor, HtmlExtractor};
pub use search::{DuckDuckGoGateway, HttpSearchGateway, SearchGateway};
