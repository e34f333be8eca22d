//! Memory Lens: a local AI journal.
//!
//! Every entry is tagged with an emotion label and a short summary when it is
//! written, then stored in a single JSON file. Views over the journal combine
//! keyword, emotion and date filters with aggregate insights: emotion
//! frequencies, the happiest day, the most active hour, a weekly digest, a
//! date × emotion heatmap and an emotional trajectory.
//!
//! # Architecture
//!
//! - **Storage**: one pretty-printed JSON array, rewritten atomically on every append
//! - **Models**: local ONNX Runtime models for emotion classification,
//!   summarization, keyword extraction (sentence embeddings) and named entities
//! - **Exports**: Markdown, paginated PDF and PNG image cards
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`journal`]: Entry store, annotation pipeline, aggregator and filters
//! - [`nlp`]: Collaborator traits and their local ONNX implementations
//! - [`export`]: Markdown, PDF and image card renderers

pub mod config;
pub mod error;
pub mod export;
pub mod journal;
pub mod nlp;
