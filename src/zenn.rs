//! Zenn article rendering and export.
//!
//! Each snapshot record becomes one Markdown file: a front-matter header
//! followed by the post body verbatim. Filenames carry an 8-digit date
//! prefix so a lexical sort of the output directory is chronological.

use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use crate::qiita::Post;
use crate::snapshot::Snapshot;

static CREATED_AT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)-(\d+)-(\d+)T").expect("valid regex"));

/// Derive the sortable date prefix from a post's `created_at`.
///
/// `2024-03-07T12:00:00Z` becomes `20240307`. The digit groups are
/// concatenated as-is, with no re-parsing of the timestamp.
///
/// # Errors
///
/// Returns an error if `created_at` does not start with `YYYY-MM-DDT`.
pub fn date_prefix(created_at: &str) -> Result<String> {
    let caps = CREATED_AT_RE
        .captures(created_at)
        .with_context(|| format!("created_at {created_at:?} does not start with YYYY-MM-DDT"))?;
    Ok(format!("{}{}{}", &caps[1], &caps[2], &caps[3]))
}

/// Output filename for a post: `<datePrefix>__-<id>.md`.
///
/// # Errors
///
/// Returns an error if the date prefix cannot be derived.
pub fn article_file_name(post: &Post) -> Result<String> {
    let prefix = date_prefix(&post.created_at)?;
    Ok(format!("{prefix}__-{}.md", post.id))
}

/// Render one post as a Zenn article.
///
/// Title and topics are JSON-encoded into the front matter; topics are the
/// lowercased tag names in original order, duplicates kept. `published` is
/// always `false` regardless of the post's state on Qiita - exported
/// articles start as drafts.
///
/// # Errors
///
/// Returns an error if the title or topics cannot be JSON-encoded.
pub fn render_article(post: &Post) -> Result<String> {
    let topics: Vec<String> = post.tags.iter().map(|t| t.name.to_lowercase()).collect();
    let title = serde_json::to_string(&post.title).context("Failed to encode title")?;
    let topics = serde_json::to_string(&topics).context("Failed to encode topics")?;

    Ok(format!(
        "---\n\
         title: {title}\n\
         emoji: \"\u{1f50e}\"\n\
         type: \"idea\"\n\
         topics: {topics}\n\
         published: false\n\
         ---\n\
         \n\
         {}",
        post.body
    ))
}

/// Write one article file per snapshot record into `articles_dir`.
///
/// Records are processed strictly in snapshot order, one awaited write at a
/// time. The first record that fails to render aborts the run: earlier
/// files are already on disk, later records are never touched. Existing
/// files are overwritten unconditionally, so a rerun on an unchanged
/// snapshot is byte-identical.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, a record's
/// `created_at` does not match the expected shape, or a write fails.
pub async fn export_articles(snapshot: &Snapshot, articles_dir: &Path) -> Result<usize> {
    tokio::fs::create_dir_all(articles_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create articles directory: {}",
                articles_dir.display()
            )
        })?;

    let mut written = 0usize;
    for post in &snapshot.list {
        let file_name = article_file_name(post)?;
        let text = render_article(post)?;
        let path = articles_dir.join(&file_name);

        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("Failed to write article: {}", path.display()))?;

        debug!(file = %file_name, "Wrote article");
        written += 1;
    }

    info!(written, "Export complete");
    Ok(written)
}
