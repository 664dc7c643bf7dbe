//! Qiita to Zenn article exporter.
//!
//! Pages through a Qiita user's public items API, persists the full listing
//! as a local JSON snapshot, then renders each post as a Zenn-style Markdown
//! article with a front-matter header.

pub mod config;
pub mod qiita;
pub mod snapshot;
pub mod zenn;
