//! Record identifiers.
//!
//! Two schemes, chosen once per run:
//!
//! - [`IdMode::Random`]: a fresh UUID v4 for every record.
//! - [`IdMode::Deterministic`]: the lowercase hex SHA-256 of the title's
//!   UTF-8 bytes, so re-ingesting the same recipe replaces its document in
//!   the index instead of adding a copy. Records without a title get no id.

use clap::ValueEnum;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::RecipeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IdMode {
    Random,
    #[default]
    Deterministic,
}

/// 64 lowercase hex digits of the SHA-256 of `title`.
pub fn title_digest(title: &str) -> String {
    hex::encode(Sha256::digest(title.as_bytes()))
}

pub fn assign_id(record: &mut RecipeRecord, mode: IdMode) {
    record.id = match mode {
        IdMode::Random => Some(Uuid::new_v4().to_string()),
        IdMode::Deterministic => record
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(title_digest),
    };
}
