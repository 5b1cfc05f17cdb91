//! Work download logic.

use std::path::PathBuf;

use base64::prelude::{Engine as _, BASE64_STANDARD};
use url::Url;

use crate::api::{check_logged_in, PixivApi};
use crate::config::{Config, Naming};
use crate::download::metadata::write_metadata;
use crate::download::pages::{fetch_pages, resolve_pages};
use crate::download::state::DownloadState;
use crate::error::{Error, Result};
use crate::fs::{metadata_path, plan_page_targets};
use crate::output::create_page_bar;
use crate::work::{parse_artist, parse_work, ParsedWork, Work};

/// Everything needed to download one work.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub work_id: String,
    pub destination: PathBuf,
    pub naming: Naming,
    pub metadata: bool,
    pub concurrency: usize,
    pub show_progress: bool,
}

impl DownloadRequest {
    /// Build a request from the download section of the config.
    pub fn from_config(config: &Config, work_id: String) -> Self {
        Self {
            work_id,
            destination: config.download.path.clone(),
            naming: config.download.naming.clone(),
            metadata: config.download.metadata,
            concurrency: config.download.concurrency,
            show_progress: true,
        }
    }
}

/// Download every page of a work, and optionally its metadata.
///
/// Fails before touching the work page when the session is logged out.
pub async fn download_work(api: &PixivApi, request: &DownloadRequest) -> Result<DownloadState> {
    tracing::info!("Downloading work: {}", request.work_id);

    if !check_logged_in(api).await? {
        return Err(Error::Session("not logged in".to_string()));
    }

    let (page_url, html) = api.get_work_page(&request.work_id).await?;

    let artist = parse_artist(&html)?;
    let mut work = extract_work(api, &request.work_id, &html, &page_url).await?;
    resolve_pages(api, &mut work, request.concurrency).await?;

    let mut state = DownloadState::new(work.id.clone());
    state.work_name = Some(work.name.clone());
    state.artist_name = Some(artist.nickname.clone());
    state.page_count = work.page_count;

    if request.metadata {
        let path = metadata_path(&request.destination, &request.naming, &artist, &work)?;
        write_metadata(&path, &artist, &work).await?;
        state.metadata_path = Some(path);
    }

    let targets = plan_page_targets(&request.destination, &request.naming, &artist, &work)?;
    tracing::info!(
        "Fetching {} page(s) of {} work {}",
        targets.len(),
        work.work_type,
        work.id
    );

    let bar = request
        .show_progress
        .then(|| create_page_bar(&work.id, targets.len() as u64));
    let outcomes = fetch_pages(api, &targets, request.concurrency, bar.as_ref()).await;
    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    for outcome in outcomes? {
        state.record(outcome);
    }

    tracing::info!(
        "Work {} complete: {} downloaded, {} skipped",
        state.work_id,
        state.downloaded_count,
        state.skipped_count
    );

    Ok(state)
}

/// Parse the work page and embed its thumbnail.
async fn extract_work(api: &PixivApi, work_id: &str, html: &str, page_url: &Url) -> Result<Work> {
    let ParsedWork {
        mut work,
        thumbnail_url,
    } = parse_work(work_id, html, page_url)?;

    let thumbnail = api.fetch_bytes(&thumbnail_url).await?;
    work.thumbnail = BASE64_STANDARD.encode(thumbnail);

    Ok(work)
}
