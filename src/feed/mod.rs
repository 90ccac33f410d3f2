//! Local feed search and version aggregation
//!
//! This module discovers packages in a directory of `.nupkg` archives,
//! extracts their `.nuspec` manifests and merges records that share a
//! package id.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Lister    │────▶│   Matcher   │────▶│   Archive   │────▶│ Aggregator  │
//! │  (readdir)  │     │ (glob/text) │     │ + Manifest  │     │ (dedup id)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                          one task per file         │
//!                                                                    ▼
//!                                                             ┌─────────────┐
//!                                                             │  LocalFeed  │
//!                                                             │ (search,    │
//!                                                             │  versions)  │
//!                                                             └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`lister`]: Lists the entries of a feed directory
//! - [`matcher`]: Glob matching with substring fallback
//! - [`archive`]: Reads the manifest entry out of a `.nupkg` zip
//! - [`manifest`]: Typed XML tree and the field mapping table
//! - [`aggregator`]: Merges records by package id
//! - [`source`]: `PackageFeed` trait
//! - [`local`]: Directory-backed `PackageFeed`
//! - [`sources`]: Search across all configured sources
//! - [`error`]: Error types for feed and archive operations
//! - [`types`]: Result and metadata types

pub mod aggregator;
pub mod archive;
pub mod error;
pub mod lister;
pub mod local;
pub mod manifest;
pub mod matcher;
pub mod source;
pub mod sources;
pub mod types;
