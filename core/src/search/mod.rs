//! Search Explainer: relevance scoring, citation generation, and
//! context grouping for retrieved chunks.

pub mod citations;
pub mod explainer;
pub mod types;

pub use explainer::{explained_search, matched_concepts};
pub use types::{Citation, CitationStyle, ExplainedResult, ExplainedSearch, ResultContext, SearchConfig};
