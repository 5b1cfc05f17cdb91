//! pixiv HTTP client.

use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::{header, Client, Response, StatusCode};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::work::parser::parse_manga_image_url;

/// Login page, relative to the accounts root. The form posts back to it.
const LOGIN_PATH: &str = "login?lang=ja&source=pc&view_type=page&ref=wwwtop_accounts_index";

/// Logout endpoint, relative to the site root.
const LOGOUT_PATH: &str = "logout.php?return_to=%2F";

/// pixiv client holding the session cookie jar.
///
/// Every request carries the configured `User-Agent` and a `Referer` pointing
/// at the home page. The jar is shared by all requests and locks internally.
pub struct PixivApi {
    client: Client,
    jar: Arc<Jar>,
    base_url: Url,
    accounts_url: Url,
}

impl PixivApi {
    /// Create a new client from the transport configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let accounts_url = Url::parse(&config.accounts_url)?;
        let jar = Arc::new(Jar::default());

        let mut headers = header::HeaderMap::new();
        let referer = header::HeaderValue::from_str(base_url.as_str())
            .map_err(|e| Error::Config(format!("Invalid referer: {}", e)))?;
        headers.insert(header::REFERER, referer);

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            jar,
            base_url,
            accounts_url,
        })
    }

    /// The shared cookie jar.
    pub fn jar(&self) -> &Arc<Jar> {
        &self.jar
    }

    /// Origins whose cookies make up the session.
    pub fn cookie_urls(&self) -> Vec<Url> {
        vec![self.base_url.clone(), self.accounts_url.clone()]
    }

    pub fn home_url(&self) -> Url {
        self.base_url.clone()
    }

    pub fn login_url(&self) -> Result<Url> {
        Ok(self.accounts_url.join(LOGIN_PATH)?)
    }

    pub fn logout_url(&self) -> Result<Url> {
        Ok(self.base_url.join(LOGOUT_PATH)?)
    }

    /// Medium view of a work.
    pub fn work_url(&self, work_id: &str) -> Result<Url> {
        Ok(self.base_url.join(&format!(
            "member_illust.php?mode=medium&illust_id={}",
            work_id
        ))?)
    }

    /// Full-size view of one page of a multi-page work.
    pub fn manga_page_url(&self, work_id: &str, page: usize) -> Result<Url> {
        Ok(self.base_url.join(&format!(
            "member_illust.php?mode=manga_big&illust_id={}&page={}",
            work_id, page
        ))?)
    }

    /// Make a GET request. Any status is returned as-is.
    pub async fn get(&self, url: &str) -> Result<Response> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?;
        tracing::debug!("Response status: {}", response.status());

        Ok(response)
    }

    /// Make a GET request and read the body, failing on anything but 200.
    pub async fn get_text(&self, url: &str, stage: &str) -> Result<String> {
        let response = self.get(url).await?;
        let response = ensure_ok(response, stage)?;
        Ok(response.text().await?)
    }

    /// Submit a URL-encoded form, failing on anything but 200.
    pub async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        stage: &str,
    ) -> Result<String> {
        tracing::debug!("POST {}", url);

        let response = self.client.post(url).form(form).send().await?;
        tracing::debug!("Response status: {}", response.status());

        let response = ensure_ok(response, stage)?;
        Ok(response.text().await?)
    }

    /// Fetch the medium view page of a work.
    pub async fn get_work_page(&self, work_id: &str) -> Result<(Url, String)> {
        let url = self.work_url(work_id)?;
        let body = self
            .get_text(url.as_str(), &format!("getting work {}", work_id))
            .await?;
        Ok((url, body))
    }

    /// Resolve the image URL of one page of a multi-page work.
    ///
    /// The site has no bulk listing, so this costs one request per page.
    pub async fn resolve_manga_page_url(&self, work_id: &str, page: usize) -> Result<String> {
        let url = self.manga_page_url(work_id, page)?;
        let body = self
            .get_text(url.as_str(), &format!("getting manga page {}", page))
            .await?;
        parse_manga_image_url(&body, &url)
    }

    /// Download the full body behind a URL.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let response = ensure_ok(response, &format!("downloading {}", url))?;
        let bytes = response.bytes().await?;
        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

/// Reject every status except 200.
fn ensure_ok(response: Response, stage: &str) -> Result<Response> {
    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!("Unexpected status {} while {}", status, stage);
        return Err(Error::transport(stage, status));
    }
    Ok(response)
}
