//! Work page markup extraction.
//!
//! The work page is plain server-rendered HTML. Every field is located with a
//! fixed pattern; a required pattern that does not match is an
//! [`Error::Extraction`], never a partially filled record.

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use url::Url;

use crate::error::{Error, Result};
use crate::fs::naming::sanitize_path_component;
use crate::work::item::{Artist, Page, Work, WorkType};

/// Format of the creation time shown in the first meta row.
const TIMESTAMP_FORMAT: &str = "%Y年%m月%d日 %H:%M %z";

/// The site shows times in JST without saying so.
const JST_SUFFIX: &str = " +0900";

/// Separator between width and height in the second meta row.
const DIMENSION_SEPARATOR: char = '×';

/// Class marker of animated works.
const UGOIRA_MARKER: &str = "ugoku-illust";

/// Class marker of multi-page works.
const MANGA_MARKER: &str = "manga";

/// A work record plus what is still needed to complete it.
#[derive(Debug, Clone)]
pub struct ParsedWork {
    /// The work, with an empty thumbnail.
    pub work: Work,

    /// Where the thumbnail bytes live.
    pub thumbnail_url: String,
}

/// Shape of the second meta row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLayout {
    /// A single image with known dimensions.
    Single { width: u32, height: u32 },
    /// Several images; dimensions unknown.
    Multi(usize),
}

impl PageLayout {
    /// Number of pages described by this layout.
    pub fn page_count(&self) -> usize {
        match self {
            PageLayout::Single { .. } => 1,
            PageLayout::Multi(count) => *count,
        }
    }
}

/// Parse the artist block of a work page.
pub fn parse_artist(html: &str) -> Result<Artist> {
    let id = capture(
        r#"href="/member\.php\?id=(\d+)" class="tab-profile""#,
        html,
        "artist id",
    )?;
    let username = capture(
        r#"href="/stacc/([^"]+)" class="tab-feed""#,
        html,
        "artist username",
    )?;
    let nickname = capture(
        r#"<span class="user-name">([^<]+)</span>"#,
        html,
        "artist nickname",
    )?;

    let artist = Artist {
        id,
        username: unescape_html(&username),
        nickname: unescape_html(&nickname),
    };
    tracing::debug!("Artist: {:?}", artist);

    Ok(artist)
}

/// Parse the work record of a work page.
///
/// `page_url` is the URL the markup was fetched from; relative image URLs are
/// resolved against it. For single-page works the image URL is resolved here,
/// except for ugoira, which stay unresolved.
pub fn parse_work(work_id: &str, html: &str, page_url: &Url) -> Result<ParsedWork> {
    let name = unescape_html(&capture(
        r#"<h1 class="title">([^<]+)</h1>"#,
        html,
        "work title",
    )?);
    tracing::debug!("Name: {}", name);

    let meta = capture(
        r#"(?s)<ul class="meta">(.+?)</ul>(?:<div class="_illust-series-title">.+?</div>)?<h1 class="title">"#,
        html,
        "meta block",
    )?;

    let rows = Regex::new(r#"(?s)<li>(?:<ul class="tools">(.+?)</ul>)?(.+?)?</li>"#)
        .unwrap()
        .captures_iter(&meta)
        .map(|c| {
            (
                c.get(1).map(|m| m.as_str().to_string()),
                c.get(2).map(|m| m.as_str().trim().to_string()),
            )
        })
        .collect::<Vec<_>>();

    let created_at = rows
        .first()
        .and_then(|(_, text)| text.as_deref())
        .ok_or_else(|| Error::extraction("timestamp"))
        .and_then(parse_timestamp)?;
    tracing::debug!("Time: {}", created_at);

    let layout = rows
        .get(1)
        .and_then(|(_, text)| text.as_deref())
        .ok_or_else(|| Error::extraction("unrecognized meta format"))
        .and_then(parse_layout)?;
    tracing::debug!("Layout: {:?}", layout);

    let tools = match rows.get(2) {
        Some((Some(list), _)) => Regex::new(r"<li>([^<]+)</li>")
            .unwrap()
            .captures_iter(list)
            .map(|c| unescape_html(c[1].trim()))
            .collect(),
        _ => Vec::new(),
    };
    tracing::debug!("Tools: {:?}", tools);

    let series = optional_capture(
        r#"<a class="_illust-series-title-text" href="[^"]+">([^<]+)</a>"#,
        html,
    )
    .map(|s| unescape_html(&s));
    tracing::debug!("Series: {:?}", series);

    let caption = optional_capture(r#"(?s)<p class="caption">(.+?)</p>"#, html)
        .map(|s| unescape_html(&s));
    tracing::debug!("Caption: {:?}", caption);

    let tags = parse_tags(html)?;
    tracing::debug!("Tags: {:?}", tags);

    let work_type = classify_work_type(&capture(
        r#"class="([^"]*)"><div class="_layout-thumbnail">"#,
        html,
        "work type marker",
    )?);
    tracing::debug!("Type: {}", work_type);

    let thumbnail_url = resolve_url(
        page_url,
        &capture(
            r#"class="bookmark_modal_thumbnail" data-src="([^"]+)""#,
            html,
            "thumbnail",
        )?,
    )?;

    let page_count = layout.page_count();
    let mut pages: Vec<Page> = (0..page_count)
        .map(|page| Page {
            page,
            ..Default::default()
        })
        .collect();

    if let PageLayout::Single { width, height } = layout {
        pages[0].width = width;
        pages[0].height = height;
    }

    // A lone page, with or without dimensions, is shown at full size on the work page.
    if let [first] = pages.as_mut_slice() {
        if work_type == WorkType::Ugoira {
            tracing::debug!("Leaving ugoira image unresolved");
        } else {
            let image_url = parse_original_image_url(html, page_url)?;
            let filename = image_filename(&image_url)?;
            tracing::debug!("Page[0]: {} -> {}", image_url, filename);
            first.resolve(image_url, filename);
        }
    }

    Ok(ParsedWork {
        work: Work {
            id: work_id.to_string(),
            name,
            created_at,
            page_count,
            tools,
            series,
            caption,
            tags,
            work_type,
            pages,
            thumbnail: String::new(),
        },
        thumbnail_url,
    })
}

/// Parse the creation time of the first meta row.
pub fn parse_timestamp(row: &str) -> Result<DateTime<FixedOffset>> {
    let stamped = format!("{}{}", row.trim(), JST_SUFFIX);
    DateTime::parse_from_str(&stamped, TIMESTAMP_FORMAT)
        .map_err(|e| Error::extraction(format!("timestamp '{}': {}", row, e)))
}

/// Parse the second meta row: either `W×H` or a `NP` page count.
pub fn parse_layout(row: &str) -> Result<PageLayout> {
    let row = row.trim();

    if let Some((width, height)) = row.split_once(DIMENSION_SEPARATOR) {
        let parse = |s: &str| {
            s.trim()
                .parse::<u32>()
                .map_err(|_| Error::extraction(format!("dimensions '{}'", row)))
        };
        return Ok(PageLayout::Single {
            width: parse(width)?,
            height: parse(height)?,
        });
    }

    if let Some(caps) = Regex::new(r"(\d+)\s*P$").unwrap().captures(row) {
        let count = caps[1]
            .parse::<usize>()
            .map_err(|_| Error::extraction(format!("page count '{}'", row)))?;
        if count == 0 {
            return Err(Error::extraction(format!("page count '{}'", row)));
        }
        return Ok(PageLayout::Multi(count));
    }

    Err(Error::extraction(format!(
        "unrecognized meta format '{}'",
        row
    )))
}

/// Decide the work type from the class list next to the thumbnail.
///
/// The ugoira marker wins over the manga marker.
pub fn classify_work_type(class_attr: &str) -> WorkType {
    if class_attr.contains(UGOIRA_MARKER) {
        WorkType::Ugoira
    } else if class_attr.contains(MANGA_MARKER) {
        WorkType::Manga
    } else {
        WorkType::Illustration
    }
}

/// Find the original image of a single-page work.
pub fn parse_original_image_url(html: &str, page_url: &Url) -> Result<String> {
    let raw = capture(
        r#"data-src="([^"]+)" class="original-image""#,
        html,
        "original image",
    )?;
    resolve_url(page_url, &raw)
}

/// Find the image on a multi-page view page.
pub fn parse_manga_image_url(html: &str, page_url: &Url) -> Result<String> {
    let raw = capture(r#"<img[^>]*?\ssrc="([^"]+)""#, html, "manga page image")?;
    resolve_url(page_url, &raw)
}

/// Derive a local filename from the last path segment of an image URL.
///
/// A single segment cannot hold a separator, so only `.` and `..` are refused.
pub fn image_filename(image_url: &str) -> Result<String> {
    let url = Url::parse(image_url)?;
    let basename = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| Error::extraction(format!("no filename in '{}'", image_url)))?;

    sanitize_path_component(basename)
}

fn parse_tags(html: &str) -> Result<Vec<String>> {
    let container = capture(
        r#"(?s)<span class="tags-container">(.*?)</span><script id="template-work-tags""#,
        html,
        "tags container",
    )?;

    Ok(Regex::new(r#"class="text">([^<]+)</a>"#)
        .unwrap()
        .captures_iter(&container)
        .map(|c| unescape_html(&c[1]))
        .collect())
}

/// First capture group of a required pattern.
fn capture(pattern: &str, haystack: &str, what: &str) -> Result<String> {
    optional_capture(pattern, haystack).ok_or_else(|| Error::extraction(what))
}

/// First capture group of an optional pattern.
fn optional_capture(pattern: &str, haystack: &str) -> Option<String> {
    Regex::new(pattern)
        .unwrap()
        .captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn resolve_url(base: &Url, raw: &str) -> Result<String> {
    Ok(base.join(&unescape_html(raw))?.to_string())
}

/// Decode the handful of entities the site emits in text.
fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
