//! Ingestion pipeline orchestration.
//!
//! Walks the recipe root, turns every Markdown file into a [`RecipeRecord`],
//! and publishes the batch in a single request:
//!
//! ```text
//! scan_markdown → read_text → recipe_from_markdown → assign_id → collect → publish
//! ```
//!
//! Files are processed one at a time in traversal order. Any read error
//! aborts the run before anything is sent.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::connector_fs::{read_text, scan_markdown};
use crate::identity::{assign_id, IdMode};
use crate::models::RecipeRecord;
use crate::publish::{IndexClient, PublishResponse};
use crate::recipe::recipe_from_markdown;

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Overrides `source.root`.
    pub root: Option<PathBuf>,
    /// Print records and skip the POST.
    pub dry_run: bool,
    /// Print records before publishing.
    pub print_records: bool,
}

/// Build the record for one file.
pub fn load_record(path: &Path, config: &Config, mode: IdMode) -> Result<RecipeRecord> {
    let text = read_text(path)?;
    let mut record = recipe_from_markdown(&text, &config.markers);
    assign_id(&mut record, mode);

    tracing::debug!(
        path = %path.display(),
        title = record.title.as_deref().unwrap_or(""),
        "parsed recipe"
    );
    if mode == IdMode::Deterministic && record.id.is_none() {
        tracing::warn!(path = %path.display(), "recipe has no title; published without an id");
    }

    Ok(record)
}

/// Build one record per recipe file under `root`, in traversal order.
pub fn build_records(config: &Config, root: &Path) -> Result<Vec<RecipeRecord>> {
    let mode = config.ids.mode;
    let records = scan_markdown(root, &config.source)?
        .map(|path| path.and_then(|path| load_record(&path, config, mode)))
        .collect::<Result<Vec<_>>>()?;

    if mode == IdMode::Deterministic {
        warn_duplicate_ids(&records);
    }

    Ok(records)
}

fn warn_duplicate_ids(records: &[RecipeRecord]) {
    let mut seen = HashSet::new();
    for id in records.iter().filter_map(|r| r.id.as_deref()) {
        if !seen.insert(id) {
            tracing::warn!(id, "duplicate recipe title; the index keeps only one");
        }
    }
}

/// Run the full pipeline and print the index response to stdout.
pub async fn run_ingest(config: &Config, options: &IngestOptions) -> Result<Option<PublishResponse>> {
    let root = options
        .root
        .clone()
        .unwrap_or_else(|| config.source.root.clone());

    let records = build_records(config, &root)?;
    tracing::info!(root = %root.display(), records = records.len(), "scan complete");

    if options.dry_run || options.print_records {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    if options.dry_run {
        return Ok(None);
    }

    let client = IndexClient::new(&config.index)?;
    tracing::info!(endpoint = %client.endpoint(), "publishing batch");
    let response = client.publish(&records).await?;
    tracing::info!(status = response.status, "index responded");

    println!("{}", serde_json::to_string_pretty(&response.body)?);
    Ok(Some(response))
}

/// Print the record for a single file.
pub fn run_inspect(config: &Config, path: &Path) -> Result<()> {
    let record = load_record(path, config, config.ids.mode)
        .with_context(|| format!("Failed to build recipe from {}", path.display()))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::title_digest;
    use std::fs;
    use tempfile::TempDir;

    fn write_recipes(root: &Path) {
        fs::create_dir_all(root.join("staple")).unwrap();
        fs::write(
            root.join("staple/egg-fried-rice.md"),
            "# Egg Fried Rice\n\nQuick and easy.\n\n## 必备原料和工具\n- eggs\n- rice\n\n## 操作\n1. beat eggs\n2. fry rice",
        )
        .unwrap();
        fs::write(root.join("tea.md"), "# Tea\n\n## 操作\n- boil\n").unwrap();
        fs::write(root.join("README.txt"), "not a recipe").unwrap();
    }

    #[test]
    fn test_build_records_one_per_file() {
        let tmp = TempDir::new().unwrap();
        write_recipes(tmp.path());

        let records = build_records(&Config::default(), tmp.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("Egg Fried Rice"));
        assert_eq!(records[0].id, Some(title_digest("Egg Fried Rice")));
        assert_eq!(records[1].title.as_deref(), Some("Tea"));
        assert_eq!(records[1].ingredients, None);
    }

    #[test]
    fn test_random_mode_ids() {
        let tmp = TempDir::new().unwrap();
        write_recipes(tmp.path());

        let mut config = Config::default();
        config.ids.mode = IdMode::Random;
        let records = build_records(&config, tmp.path()).unwrap();
        assert_ne!(records[0].id, records[1].id);
        assert!(records.iter().all(|r| r.id.is_some()));
    }

    #[test]
    fn test_untitled_record_has_no_id() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("loose.md"), "just some text\n").unwrap();

        let records = build_records(&Config::default(), tmp.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, None);
        assert_eq!(records[0].summary, Some(vec!["just some text".to_string()]));
    }

    #[test]
    fn test_empty_tree_yields_no_records() {
        let tmp = TempDir::new().unwrap();
        assert!(build_records(&Config::default(), tmp.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_does_not_publish() {
        let tmp = TempDir::new().unwrap();
        write_recipes(tmp.path());

        let mut config = Config::default();
        // Nothing listens here; a POST would fail.
        config.index.url = "http://127.0.0.1:9".to_string();
        let options = IngestOptions {
            root: Some(tmp.path().to_path_buf()),
            dry_run: true,
            print_records: false,
        };
        assert!(run_ingest(&config, &options).await.unwrap().is_none());
    }
}
