//! Target paths for pages and metadata.

use std::path::{Path, PathBuf};

use crate::config::Naming;
use crate::error::{Error, Result};
use crate::fs::naming::{render_template, NamingContext};
use crate::work::{Artist, Page, Work};

/// Where one page goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub page: usize,
    pub url: String,
    pub path: PathBuf,
}

/// Plan the output path of every page of a work.
///
/// Fails if any page is still unresolved.
pub fn plan_page_targets(
    destination: &Path,
    naming: &Naming,
    artist: &Artist,
    work: &Work,
) -> Result<Vec<PageTarget>> {
    let folder = work_folder(destination, naming, artist, work)?;

    work.pages
        .iter()
        .map(|page| -> Result<PageTarget> {
            let (url, filename) = resolved_parts(work, page)?;

            let path = if work.is_multi_page() {
                let ctx = NamingContext {
                    artist,
                    work,
                    page: Some(page.page),
                };
                named_path(&folder, &naming.multiple_file, &ctx, filename)?
            } else {
                let ctx = NamingContext {
                    artist,
                    work,
                    page: None,
                };
                named_path(destination, &naming.single_file, &ctx, filename)?
            };

            Ok(PageTarget {
                page: page.page,
                url: url.to_string(),
                path,
            })
        })
        .collect()
}

/// Folder holding the pages of a multi-page work; the destination itself for
/// single-page works or an empty folder template.
pub fn work_folder(
    destination: &Path,
    naming: &Naming,
    artist: &Artist,
    work: &Work,
) -> Result<PathBuf> {
    if !work.is_multi_page() {
        return Ok(destination.to_path_buf());
    }

    let ctx = NamingContext {
        artist,
        work,
        page: None,
    };
    Ok(destination.join(render_template(&naming.folder, &ctx)?))
}

/// Path of the JSON metadata sidecar.
pub fn metadata_path(
    destination: &Path,
    naming: &Naming,
    artist: &Artist,
    work: &Work,
) -> Result<PathBuf> {
    if work.is_multi_page() {
        let folder = work_folder(destination, naming, artist, work)?;
        return Ok(folder.join(format!("{}.json", work.id)));
    }

    let ctx = NamingContext {
        artist,
        work,
        page: None,
    };
    let rendered = render_template(&naming.single_file, &ctx)?;
    if rendered.as_os_str().is_empty() {
        Ok(destination.join(format!("{}.json", work.id)))
    } else {
        Ok(destination.join(with_extension(rendered, "json")))
    }
}

fn resolved_parts<'a>(work: &Work, page: &'a Page) -> Result<(&'a str, &'a str)> {
    match (page.image_url.as_deref(), page.filename.as_deref()) {
        (Some(url), Some(filename)) => Ok((url, filename)),
        _ => Err(Error::Unsupported(format!(
            "page {} of {} work {} has no resolvable image",
            page.page, work.work_type, work.id
        ))),
    }
}

/// Render a file template under `dir`, keeping the extension of `filename`.
/// An empty template keeps `filename` as is.
fn named_path(
    dir: &Path,
    template: &str,
    ctx: &NamingContext<'_>,
    filename: &str,
) -> Result<PathBuf> {
    let rendered = render_template(template, ctx)?;
    if rendered.as_os_str().is_empty() {
        return Ok(dir.join(filename));
    }

    match Path::new(filename).extension().and_then(|e| e.to_str()) {
        Some(ext) => Ok(dir.join(with_extension(rendered, ext))),
        None => Ok(dir.join(rendered)),
    }
}

/// Append an extension without touching dots already in the name.
fn with_extension(path: PathBuf, ext: &str) -> PathBuf {
    let mut name = path.into_os_string();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::WorkType;
    use chrono::DateTime;

    fn artist() -> Artist {
        Artist {
            id: "4242".to_string(),
            username: "painter".to_string(),
            nickname: "Painter".to_string(),
        }
    }

    fn work(page_count: usize) -> Work {
        let pages = (0..page_count)
            .map(|page| {
                let mut p = Page {
                    page,
                    ..Default::default()
                };
                p.resolve(
                    format!("https://i.pximg.net/img/123_p{}.png", page),
                    format!("123_p{}.png", page),
                );
                p
            })
            .collect();

        Work {
            id: "123".to_string(),
            name: "Vol. 2".to_string(),
            created_at: DateTime::parse_from_rfc3339("2018-03-01T12:34:00+09:00").unwrap(),
            page_count,
            tools: vec![],
            series: None,
            caption: None,
            tags: vec![],
            work_type: if page_count > 1 {
                WorkType::Manga
            } else {
                WorkType::Illustration
            },
            pages,
            thumbnail: String::new(),
        }
    }

    #[test]
    fn test_single_page_default_naming() {
        let targets =
            plan_page_targets(Path::new("/dl"), &Naming::default(), &artist(), &work(1)).unwrap();

        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets[0].path,
            PathBuf::from("/dl/Painter/(123) Vol. 2.png")
        );
    }

    #[test]
    fn test_multi_page_default_naming() {
        let targets =
            plan_page_targets(Path::new("/dl"), &Naming::default(), &artist(), &work(3)).unwrap();

        let paths: Vec<PathBuf> = targets.into_iter().map(|t| t.path).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/dl/Painter/(123) Vol. 2/0.png"),
                PathBuf::from("/dl/Painter/(123) Vol. 2/1.png"),
                PathBuf::from("/dl/Painter/(123) Vol. 2/2.png"),
            ]
        );
    }

    #[test]
    fn test_original_filenames() {
        let naming = Naming::original_filenames();
        let targets = plan_page_targets(Path::new("/dl"), &naming, &artist(), &work(2)).unwrap();

        assert_eq!(targets[0].path, PathBuf::from("/dl/123_p0.png"));
        assert_eq!(targets[1].path, PathBuf::from("/dl/123_p1.png"));
        assert_eq!(targets[1].url, "https://i.pximg.net/img/123_p1.png");
    }

    #[test]
    fn test_unresolved_page_is_unsupported() {
        let mut work = work(1);
        work.work_type = WorkType::Ugoira;
        work.pages[0].image_url = None;
        work.pages[0].filename = None;

        let err = plan_page_targets(Path::new("/dl"), &Naming::default(), &artist(), &work)
            .unwrap_err();
        assert!(matches!(err, Error::Unsupported(msg) if msg.contains("ugoira")));
    }

    #[test]
    fn test_metadata_path() {
        let naming = Naming::default();
        assert_eq!(
            metadata_path(Path::new("/dl"), &naming, &artist(), &work(1)).unwrap(),
            PathBuf::from("/dl/Painter/(123) Vol. 2.json")
        );
        assert_eq!(
            metadata_path(Path::new("/dl"), &naming, &artist(), &work(2)).unwrap(),
            PathBuf::from("/dl/Painter/(123) Vol. 2/123.json")
        );
        assert_eq!(
            metadata_path(
                Path::new("/dl"),
                &Naming::original_filenames(),
                &artist(),
                &work(1)
            )
            .unwrap(),
            PathBuf::from("/dl/123.json")
        );
    }
}
