//! Onset: Temporal Expression Extraction for Clinical Text
//!
//! A Rust engine that recognizes temporal expressions ("3 days ago",
//! "13NOV2011", "2 and 5 Dec 2019") in clinical narrative text, classifies
//! each into a semantic category, and resolves as many as possible to an
//! absolute or partial calendar date. The resulting spans feed downstream
//! clinical-concept extraction.

pub mod config;
pub mod error;
pub mod extraction;
pub mod segment;

pub use config::{Config, OutputConfig};
pub use error::{ConfigError, OnsetError, Result};
pub use extraction::{
    age_in_years, evaluate, AnnotationMetadata, Category, DateResolution, DocumentAnnotation,
    ExtractionConfig, PartialDate, PatternLibrary, Relation, ResolverPolicy, Role, RollingContext,
    Sentence, TemporalAnnotator, TimeExpression, Token,
};
pub use segment::{normalize_quotes, segment};
