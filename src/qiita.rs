//! Qiita items API client.
//!
//! Fetches every page of a user's public item listing. The listing endpoint
//! pages from 1 and signals the end of data with an empty array.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::config::Config;

/// One tagging on a post. Only `name` matters for export; any other
/// attributes the API sends are carried through the snapshot untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A post as returned by the items listing endpoint.
///
/// Fields we never look at are preserved in `extra` so the snapshot stays
/// faithful to what the API returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub created_at: String,
    pub title: String,
    pub body: String,
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Accept both string and numeric ids; the filename only needs the digits.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(i64),
        Str(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}

/// Build the HTTP client used for listing fetches.
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch every page of the user's item listing, in page order.
///
/// Stops at the first empty page. A body that is not a JSON array of posts
/// is treated as a malformed response and fails the run rather than being
/// read as the end of the listing.
///
/// # Errors
///
/// Returns an error on transport failures, non-2xx statuses, or a response
/// body that does not decode as a post array.
pub async fn fetch_all_posts(client: &reqwest::Client, config: &Config) -> Result<Vec<Post>> {
    let mut list = Vec::new();
    let mut page = 1u32;

    loop {
        let url = config.items_url(page);
        debug!(page, url = %url, "Fetching listing page");

        let response = client
            .get(&url)
            .header("User-Agent", "qiita-zenn-export/0.1")
            .send()
            .await
            .with_context(|| format!("Failed to fetch listing page {page}"))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "listing fetch failed with status {} on page {page}",
                response.status()
            );
        }

        let posts: Vec<Post> = response.json().await.with_context(|| {
            format!("Malformed listing response on page {page} (expected a JSON array of posts)")
        })?;

        if posts.is_empty() {
            debug!(page, "Empty page, listing exhausted");
            break;
        }

        info!(page, count = posts.len(), "Fetched listing page");
        list.extend(posts);
        page += 1;
    }

    Ok(list)
}
