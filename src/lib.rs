//! # osview
//!
//! Readable terminal reports for OpenSearch/Elasticsearch index mapping
//! exports: field trees, type summaries, analyzer tables, field search and
//! index-to-index comparison.
//!
//! ## Quick Example
//!
//! ```
//! use osview::prelude::*;
//!
//! let set = IndexSet::from_json_str(
//!     r#"{"idx":{"mappings":{"properties":{"a":{"type":"text"},"b":{"type":"keyword"}}}}}"#,
//! )?;
//! let fields = set.get("idx")?.fields();
//! assert_eq!(fields.len(), 2);
//!
//! let summary = summarize_types(&fields, SummaryScope::All, EXAMPLE_LIMIT);
//! assert_eq!(summary.get("text").unwrap().percentage, 50.0);
//! # Ok::<(), osview::error::ViewerError>(())
//! ```
//!
//! ## Pipeline
//!
//! | Stage      | Module      | Output                    |
//! |------------|-------------|---------------------------|
//! | Load       | `document`  | `IndexSet`                |
//! | Walk       | `walker`    | `Vec<FieldNode>`          |
//! | Summarize  | `summary`   | `TypeSummary`, analyzers  |
//! | Search     | `search`    | `Vec<SearchHit>`          |
//! | Compare    | `compare`   | `ComparisonResult`        |
//! | Export     | `export`    | `IndexExport` JSON        |
//! | Render     | `render`    | terminal text             |

pub mod compare;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod field;
pub mod render;
pub mod search;
pub mod summary;
pub mod walker;

pub mod prelude {
    pub use crate::compare::{CompareOptions, ComparisonResult, compare_indexes};
    pub use crate::config::ViewerConfig;
    pub use crate::document::{IndexDocument, IndexSet, IndexSettings};
    pub use crate::error::*;
    pub use crate::export::{IndexExport, write_exports};
    pub use crate::field::{FieldFlags, FieldNode};
    pub use crate::search::{FieldPattern, SearchHit, search_fields};
    pub use crate::summary::{
        AnalyzerSummary, EXAMPLE_LIMIT, SummaryScope, TypeSummary, summarize_analyzers,
        summarize_types,
    };
    pub use crate::walker::walk;
}

/// Load an export file.
///
/// # Example
///
/// ```no_run
/// let set = osview::load("indexes.json").unwrap();
/// for name in set.names() {
///     println!("{}", name);
/// }
/// ```
pub fn load(path: impl AsRef<std::path::Path>) -> error::ViewerResult<document::IndexSet> {
    document::IndexSet::load(path)
}
