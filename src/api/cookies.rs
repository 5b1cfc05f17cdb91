//! Session cookie persistence.
//!
//! The jar only exposes the `Cookie` header it would send to a URL, so the
//! file stores those `name=value` pairs per origin and restores them as
//! host-only cookies.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// On-disk format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCookies {
    /// Origin URL to `name=value` pairs.
    #[serde(default)]
    cookies: BTreeMap<String, Vec<String>>,
}

/// A cookie file on disk.
#[derive(Debug, Clone)]
pub struct CookieFile {
    path: PathBuf,
}

impl CookieFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Restore saved cookies into the jar. A missing file restores nothing.
    pub fn load_into(&self, jar: &Jar, urls: &[Url]) -> Result<usize> {
        if !self.path.exists() {
            tracing::debug!("No cookie file at {}", self.path.display());
            return Ok(0);
        }

        let content = fs::read_to_string(&self.path)?;
        let stored: StoredCookies = serde_json::from_str(&content)?;

        let mut restored = 0;
        for url in urls {
            let Some(pairs) = stored.cookies.get(url.as_str()) else {
                continue;
            };
            for pair in pairs {
                jar.add_cookie_str(pair, url);
                restored += 1;
            }
        }

        tracing::debug!(
            "Restored {} cookies from {}",
            restored,
            self.path.display()
        );
        Ok(restored)
    }

    /// Write the cookies the jar holds for each URL.
    pub fn save_from(&self, jar: &Jar, urls: &[Url]) -> Result<()> {
        let mut stored = StoredCookies::default();

        for url in urls {
            let Some(header) = jar.cookies(url) else {
                continue;
            };
            let Ok(header) = header.to_str() else {
                tracing::warn!("Skipping non-ASCII cookies for {}", url);
                continue;
            };
            let pairs: Vec<String> = header
                .split("; ")
                .filter(|pair| !pair.is_empty())
                .map(str::to_string)
                .collect();
            stored.cookies.insert(url.to_string(), pairs);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;

        tracing::debug!("Saved cookies to {}", self.path.display());
        Ok(())
    }

    /// Remove the cookie file.
    pub fn delete(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
