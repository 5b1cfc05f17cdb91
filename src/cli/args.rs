//! Command-line argument definitions using clap.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// pixiv work downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "pixiv-downloader",
    version,
    about = "Download illustrations and manga from pixiv",
    long_about = "A CLI tool to log in to pixiv and download the pages of a work.\n\n\
                  The session is kept in a cookie file between runs."
)]
pub struct Args {
    /// Path to configuration file. Created with defaults if missing.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: PathBuf,

    /// Where the session cookies are kept.
    #[arg(long = "cookie-file", global = true)]
    pub cookie_file: Option<PathBuf>,

    /// Browser user agent string.
    #[arg(long = "user-agent", env = "PIXIV_USER_AGENT", global = true)]
    pub user_agent: Option<String>,

    /// Hide the banner and progress bars.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and save the session cookies.
    Login(LoginArgs),

    /// Log out of the saved session.
    Logout(LogoutArgs),

    /// Download a work.
    Download(DownloadArgs),
}

#[derive(ClapArgs, Debug)]
pub struct LoginArgs {
    /// pixiv ID or e-mail address.
    #[arg(short, long)]
    pub username: Option<String>,

    /// Account password.
    #[arg(short, long, env = "PIXIV_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(ClapArgs, Debug)]
pub struct LogoutArgs {
    /// Delete the cookie file after logging out.
    #[arg(short, long = "delete-cookie")]
    pub delete_cookie: bool,
}

#[derive(ClapArgs, Debug)]
pub struct DownloadArgs {
    /// Work ID or work page URL.
    #[arg(short = 'i', long = "id-or-list")]
    pub id_or_list: String,

    /// Destination directory.
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Also write a JSON metadata file.
    #[arg(long)]
    pub metadata: bool,

    /// Number of pages fetched at once.
    #[arg(long)]
    pub concurrency: Option<usize>,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(cookie_file) = &self.cookie_file {
            config.client.cookie_file = Some(cookie_file.clone());
        }

        if let Some(user_agent) = &self.user_agent {
            config.client.user_agent = user_agent.clone();
        }

        match &self.command {
            Command::Login(login) => {
                if let Some(username) = &login.username {
                    config.login.username = Some(username.clone());
                }
            }
            Command::Logout(logout) => {
                // Boolean flags only override when set
                if logout.delete_cookie {
                    config.logout.delete_cookie = true;
                }
            }
            Command::Download(download) => {
                if let Some(path) = &download.path {
                    config.download.path = path.clone();
                }
                if download.metadata {
                    config.download.metadata = true;
                }
                if let Some(concurrency) = download.concurrency {
                    config.download.concurrency = concurrency;
                }
            }
        }
    }
}
