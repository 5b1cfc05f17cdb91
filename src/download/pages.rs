//! Page resolution and page downloads.
//!
//! Both loops run through an ordered buffered stream: up to `concurrency`
//! requests are in flight, results come back in page order, and the first
//! failing page (in page order) aborts the rest. Pages already written stay on
//! disk.

use std::path::{Path, PathBuf};

use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

use crate::api::PixivApi;
use crate::download::state::PageOutcome;
use crate::error::{Error, Result};
use crate::fs::PageTarget;
use crate::work::parser::image_filename;
use crate::work::Work;

/// Resolve the image URL of every page of a multi-page work.
///
/// Single-page works were resolved from the work page already.
pub async fn resolve_pages(api: &PixivApi, work: &mut Work, concurrency: usize) -> Result<()> {
    if !work.is_multi_page() {
        return Ok(());
    }

    tracing::info!("Resolving {} pages of work {}", work.page_count, work.id);

    let work_id = work.id.clone();
    let urls: Vec<String> = stream::iter(0..work.page_count)
        .map(|page| api.resolve_manga_page_url(&work_id, page))
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    for (page, url) in work.pages.iter_mut().zip(urls) {
        let filename = image_filename(&url)?;
        tracing::debug!("Page[{}]: {} -> {}", page.page, url, filename);
        page.resolve(url, filename);
    }

    Ok(())
}

/// Fetch and write every planned page.
pub async fn fetch_pages(
    api: &PixivApi,
    targets: &[PageTarget],
    concurrency: usize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<PageOutcome>> {
    stream::iter(targets)
        .map(|target| async move {
            let outcome = fetch_page(api, target).await?;
            if let Some(pb) = progress {
                pb.inc(1);
            }
            Ok::<_, Error>(outcome)
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

async fn fetch_page(api: &PixivApi, target: &PageTarget) -> Result<PageOutcome> {
    if fs::try_exists(&target.path).await? {
        return Ok(PageOutcome::Skipped {
            path: target.path.clone(),
        });
    }

    let bytes = api.fetch_bytes(&target.url).await?;
    write_atomically(&target.path, &bytes).await?;
    tracing::debug!(
        "Wrote page {} ({} bytes) to {}",
        target.page,
        bytes.len(),
        target.path.display()
    );

    Ok(PageOutcome::Written {
        path: target.path.clone(),
        bytes: bytes.len() as u64,
    })
}

/// Temporary sibling of a page file, removed on drop unless persisted.
///
/// Page futures are dropped mid-write when another page fails first.
struct PartFile {
    path: PathBuf,
    persisted: bool,
}

impl PartFile {
    fn new(dir: &Path, name: &str) -> Self {
        Self {
            path: dir.join(format!(".{}.{}.part", name, uuid::Uuid::new_v4())),
            persisted: false,
        }
    }

    async fn persist(mut self, target: &Path) -> std::io::Result<()> {
        fs::rename(&self.path, target).await?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Write through a temporary sibling so the final name only ever holds a
/// complete file.
pub(crate) async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::InvalidFilename(format!("No parent for {}", path.display())))?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::InvalidFilename(format!("No file name in {}", path.display())))?;

    fs::create_dir_all(parent).await?;
    let part = PartFile::new(parent, name);

    let mut file = File::create(&part.path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    part.persist(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomically_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("0.png");

        write_atomically(&path, b"png").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"png");
        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_unpersisted_part_file_is_removed() {
        let dir = tempfile::tempdir().unwrap();

        let part = PartFile::new(dir.path(), "0.png");
        let part_path = part.path.clone();
        std::fs::write(&part_path, b"half").unwrap();
        drop(part);
        assert!(!part_path.exists());

        let part = PartFile::new(dir.path(), "1.png");
        let part_path = part.path.clone();
        std::fs::write(&part_path, b"full").unwrap();
        part.persist(&dir.path().join("1.png")).await.unwrap();
        assert!(!part_path.exists());
        assert_eq!(std::fs::read(dir.path().join("1.png")).unwrap(), b"full");
    }
}
