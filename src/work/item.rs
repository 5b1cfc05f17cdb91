//! Work and artist records extracted from a work page.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work, decided once from the page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    /// Static illustration.
    #[default]
    Illustration,
    /// Frame-based animation ("ugoku illust").
    Ugoira,
    /// Multi-page comic.
    Manga,
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkType::Illustration => write!(f, "illustration"),
            WorkType::Ugoira => write!(f, "ugoira"),
            WorkType::Manga => write!(f, "manga"),
        }
    }
}

/// The account that published a work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    /// Numeric member ID.
    pub id: String,

    /// URL handle.
    pub username: String,

    /// Display name.
    pub nickname: String,
}

/// One image of a work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Zero-based page index.
    pub page: usize,

    /// Width in pixels; only known for single-page works.
    pub width: u32,

    /// Height in pixels; only known for single-page works.
    pub height: u32,

    /// Resolved image URL. `None` while unresolved.
    pub image_url: Option<String>,

    /// Basename of the image URL.
    pub filename: Option<String>,
}

impl Page {
    /// Set the image URL and derive the filename from it.
    pub fn resolve(&mut self, image_url: String, filename: String) {
        self.image_url = Some(image_url);
        self.filename = Some(filename);
    }

    /// Whether the image location is known.
    pub fn is_resolved(&self) -> bool {
        self.image_url.is_some()
    }
}

/// A single posted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    pub id: String,
    pub name: String,

    /// Creation time, in Japan Standard Time.
    pub created_at: DateTime<FixedOffset>,

    /// Declared page count; always equals `pages.len()`.
    pub page_count: usize,

    #[serde(default)]
    pub tools: Vec<String>,

    pub series: Option<String>,
    pub caption: Option<String>,

    /// Tags in page order, duplicates kept.
    #[serde(default)]
    pub tags: Vec<String>,

    pub work_type: WorkType,
    pub pages: Vec<Page>,

    /// Base64-encoded thumbnail bytes.
    #[serde(default)]
    pub thumbnail: String,
}

impl Work {
    /// Whether the work spans several pages.
    pub fn is_multi_page(&self) -> bool {
        self.page_count > 1
    }
}
