//! Pixiv Downloader - CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use pixiv_downloader::{
    api::{login, logout, CookieFile, PixivApi},
    cli::{Args, Command},
    config::{parse_work_id, validate_config, Config},
    download::{download_work, DownloadRequest},
    error::{exit_codes, Error, Result},
    output::{
        create_session_spinner, print_banner, print_download_summary, print_error, print_info,
        print_success, print_warning, print_work_stats,
    },
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(e) => {
            print_error(&format!("{}", e));
            match e {
                Error::Transport { .. } | Error::Http(_) | Error::Session(_) => {
                    ExitCode::from(exit_codes::SESSION_ERROR as u8)
                }
                Error::Config(_)
                | Error::ConfigValidation { .. }
                | Error::MissingConfig(_)
                | Error::TomlParse(_)
                | Error::TomlSerialize(_) => ExitCode::from(exit_codes::CONFIG_ERROR as u8),
                Error::Extraction(_) | Error::Unsupported(_) | Error::InvalidFilename(_) => {
                    ExitCode::from(exit_codes::DOWNLOAD_ERROR as u8)
                }
                _ => ExitCode::from(exit_codes::UNEXPECTED_ERROR as u8),
            }
        }
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_env_filter(filter).with_target(false).init();

    if !args.quiet {
        print_banner();
    }

    // Load configuration
    let (mut config, created) = Config::load_or_create(&args.config)?;
    if created {
        print_warning(&format!(
            "Configuration file not found, wrote defaults to {}",
            args.config.display()
        ));
        print_info("Edit it to change the download path and naming templates");
    }

    // Merge CLI arguments into config
    args.merge_into_config(&mut config);

    // Validate configuration
    validate_config(&config)?;

    // Restore the saved session
    let api = PixivApi::new(&config.client)?;
    let cookies = CookieFile::new(config.cookie_file());
    let restored = cookies.load_into(api.jar(), &api.cookie_urls())?;
    tracing::debug!(
        "Restored {} cookie(s) from {}",
        restored,
        cookies.path().display()
    );

    match &args.command {
        Command::Login(login_args) => {
            let username = config
                .login
                .username
                .clone()
                .ok_or_else(|| Error::MissingConfig("login.username".to_string()))?;

            let spinner = (!args.quiet)
                .then(|| create_session_spinner(&format!("Logging in as {}", username)));
            let result = login(&api, &username, &login_args.password).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            result?;
            cookies.save_from(api.jar(), &api.cookie_urls())?;
            print_success(&format!(
                "Logged in; session saved to {}",
                cookies.path().display()
            ));
        }
        Command::Logout(_) => {
            let spinner = (!args.quiet).then(|| create_session_spinner("Logging out"));
            let result = logout(&api).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            result?;

            if config.logout.delete_cookie {
                cookies.delete()?;
                print_success("Logged out; cookie file deleted");
            } else {
                cookies.save_from(api.jar(), &api.cookie_urls())?;
                print_success("Logged out");
            }
        }
        Command::Download(download_args) => {
            let work_id = parse_work_id(&download_args.id_or_list)?;

            let mut request = DownloadRequest::from_config(&config, work_id);
            request.show_progress = !args.quiet;

            if !args.quiet {
                print_download_summary(
                    &request.work_id,
                    &request.destination.display().to_string(),
                    request.concurrency,
                    request.metadata,
                );
            }

            let state = download_work(&api, &request).await?;

            // Keep refreshed session cookies
            cookies.save_from(api.jar(), &api.cookie_urls())?;

            if !args.quiet {
                print_work_stats(&state);
            }
            print_success(&format!("Work {} downloaded", state.work_id));
        }
    }

    Ok(())
}
