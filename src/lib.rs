//! # Recipe Index
//!
//! Converts a directory tree of structured Markdown recipes into JSON
//! records and publishes them to a document-search index in one batch.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌───────────────┐   ┌───────────┐
//! │ connector_fs│──▶│   markdown   │──▶│    recipe     │──▶│  publish  │
//! │ walk + read │   │ parse blocks │   │ group+extract │   │ HTTP POST │
//! └─────────────┘   └──────────────┘   │  + assemble   │   └───────────┘
//!                                      └──────┬────────┘
//!                                             ▼
//!                                         identity
//! ```
//!
//! ## Recipe convention
//!
//! The first section of a document gives the title (its heading) and the
//! summary (its paragraphs). Later sections are routed by heading keyword:
//! `操作` → directions, `必备原料和工具` → ingredients, `附加内容` → notes.
//! The keywords are configurable under `[markers]`.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Block tree and record types |
//! | [`connector_fs`] | Recipe discovery and UTF-8 loading |
//! | [`markdown`] | CommonMark → block tree |
//! | [`recipe`] | Section grouping, field extraction, record assembly |
//! | [`identity`] | Random or title-derived record ids |
//! | [`publish`] | Search index client |
//! | [`ingest`] | Pipeline orchestration |

pub mod config;
pub mod connector_fs;
pub mod identity;
pub mod ingest;
pub mod markdown;
pub mod models;
pub mod publish;
pub mod recipe;
