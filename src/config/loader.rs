//! Configuration structures and loading logic.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub login: LoginConfig,

    #[serde(default)]
    pub logout: LogoutConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

/// HTTP transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Browser user agent string sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where the session cookies are persisted between runs.
    #[serde(default)]
    pub cookie_file: Option<PathBuf>,

    /// Site root, used for the home, work and manga pages.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Accounts root, used for the login form.
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
}

/// Login command defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginConfig {
    /// pixiv ID or e-mail address. The password is never stored.
    #[serde(default)]
    pub username: Option<String>,
}

/// Logout command defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutConfig {
    /// Remove the cookie file instead of saving the logged-out jar.
    #[serde(default)]
    pub delete_cookie: bool,
}

/// Download command defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Destination directory.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Whether to write a JSON sidecar with the work metadata.
    #[serde(default)]
    pub metadata: bool,

    /// Number of pages resolved and fetched at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub naming: Naming,
}

/// Output naming templates.
///
/// See [`crate::fs::naming`] for the placeholder syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naming {
    /// File path for single-page works, without extension.
    #[serde(default = "default_work_template")]
    pub single_file: String,

    /// File name of each page of a multi-page work, without extension.
    #[serde(default = "default_page_template")]
    pub multiple_file: String,

    /// Folder holding the pages of a multi-page work.
    #[serde(default = "default_work_template")]
    pub folder: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            cookie_file: None,
            base_url: default_base_url(),
            accounts_url: default_accounts_url(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            metadata: false,
            concurrency: default_concurrency(),
            naming: Naming::default(),
        }
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            single_file: default_work_template(),
            multiple_file: default_page_template(),
            folder: default_work_template(),
        }
    }
}

impl Naming {
    /// Templates that keep the platform's own file names, flat in the destination.
    pub fn original_filenames() -> Self {
        Self {
            single_file: String::new(),
            multiple_file: String::new(),
            folder: String::new(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:58.0.2) Gecko/20100101 Firefox/58.0.2"
        .to_string()
}

fn default_base_url() -> String {
    "https://www.pixiv.net/".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.pixiv.net/".to_string()
}

fn default_work_template() -> String {
    "<artist.name>/(<work.id>) <work.name>".to_string()
}

fn default_page_template() -> String {
    "<work.page>".to_string()
}

fn default_path() -> PathBuf {
    PathBuf::from("./")
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!("Configuration file not found: {}", path.display()))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the configuration, writing the defaults first if the file is missing.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path)?, false));
        }

        let config = Config::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the effective cookie file path.
    pub fn cookie_file(&self) -> PathBuf {
        self.client.cookie_file.clone().unwrap_or_else(|| {
            directories::ProjectDirs::from("net", "pixiv", "pixiv-downloader")
                .map(|dirs| dirs.data_dir().join("cookies.json"))
                .unwrap_or_else(|| PathBuf::from(".cookie"))
        })
    }
}
