//! Login state of the pixiv session.
//!
//! The state is never cached: every operation that depends on it reads the
//! home page again. Persisting the session is left to the cookie file.

use std::fmt;

use regex::Regex;

use crate::api::client::PixivApi;
use crate::error::{Error, Result};

/// Marker present on the home page only for logged-in visitors.
const LOGGED_IN_MARKER: &str = r#"class="user""#;

/// Login state as seen on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Not checked yet.
    #[default]
    Unknown,
    LoggedOut,
    LoggedIn,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unknown => write!(f, "unknown"),
            SessionState::LoggedOut => write!(f, "logged out"),
            SessionState::LoggedIn => write!(f, "logged in"),
        }
    }
}

impl From<bool> for SessionState {
    fn from(logged_in: bool) -> Self {
        if logged_in {
            SessionState::LoggedIn
        } else {
            SessionState::LoggedOut
        }
    }
}

/// Whether a home page body belongs to a logged-in visitor.
pub fn is_logged_in_page(body: &str) -> bool {
    body.contains(LOGGED_IN_MARKER)
}

/// Read the session state from the home page.
pub async fn check_session(api: &PixivApi) -> Result<SessionState> {
    let body = api
        .get_text(api.home_url().as_str(), "checking the session")
        .await?;
    let state = SessionState::from(is_logged_in_page(&body));
    tracing::debug!("Session state: {}", state);
    Ok(state)
}

/// Whether the session is logged in.
pub async fn check_logged_in(api: &PixivApi) -> Result<bool> {
    Ok(check_session(api).await? == SessionState::LoggedIn)
}

/// Log in with a pixiv ID and password.
///
/// The caller persists the cookie jar afterwards.
pub async fn login(api: &PixivApi, username: &str, password: &str) -> Result<()> {
    if check_logged_in(api).await? {
        return Err(Error::Session("already logged in".into()));
    }

    let login_url = api.login_url()?;
    let login_page = api
        .get_text(login_url.as_str(), "getting post key")
        .await?;
    let post_key = extract_post_key(&login_page)?;

    let home_url = api.home_url();
    tracing::info!("Logging in as {}", username);
    api.post_form(
        login_url.as_str(),
        &[
            ("pixiv_id", username),
            ("password", password),
            ("post_key", post_key.as_str()),
            ("source", "pc"),
            ("return_to", home_url.as_str()),
            ("ref", "wwwtop_accounts_index"),
        ],
        "logging in",
    )
    .await?;

    if !check_logged_in(api).await? {
        return Err(Error::Session(
            "login failed, please check username and password".into(),
        ));
    }

    Ok(())
}

/// Log out of the current session.
///
/// The caller deletes or re-saves the cookie file afterwards.
pub async fn logout(api: &PixivApi) -> Result<()> {
    if !check_logged_in(api).await? {
        return Err(Error::Session("not logged in".into()));
    }

    let logout_url = api.logout_url()?;
    api.get_text(logout_url.as_str(), "logging out").await?;

    if check_logged_in(api).await? {
        return Err(Error::Session("logout failed".into()));
    }

    Ok(())
}

/// Pull the per-session anti-forgery token out of the login page.
pub fn extract_post_key(html: &str) -> Result<String> {
    Regex::new(r#"<input[^>]*?name="post_key"[^>]*?value="([^"]*)"[^>]*>"#)
        .unwrap()
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::extraction("post_key"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::mock_config;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LOGGED_IN_HOME: &str =
        r#"<html><body><div class="user"><a href="/member.php?id=1">me</a></div></body></html>"#;
    const LOGGED_OUT_HOME: &str =
        r#"<html><body><a class="signup" href="/signup.php">Sign up</a></body></html>"#;
    const LOGIN_PAGE: &str = r#"<form><input type="hidden" name="post_key" value="f00dcafe"><input type="text" name="pixiv_id"></form>"#;

    async fn mount_home(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    /// Home page answering `first` once, then `then` for every later request.
    async fn mount_home_transition(server: &MockServer, first: &str, then: &str) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(first))
            .up_to_n_times(1)
            .with_priority(1)
            .mount(server)
            .await;
        mount_home(server, then).await;
    }

    async fn api(server: &MockServer) -> PixivApi {
        PixivApi::new(&mock_config(server)).unwrap()
    }

    #[test]
    fn test_marker_detection() {
        assert!(is_logged_in_page(LOGGED_IN_HOME));
        assert!(!is_logged_in_page(LOGGED_OUT_HOME));
        assert!(!is_logged_in_page(""));
    }

    #[test]
    fn test_extract_post_key() {
        assert_eq!(extract_post_key(LOGIN_PAGE).unwrap(), "f00dcafe");
        assert!(matches!(
            extract_post_key("<form></form>"),
            Err(Error::Extraction(_))
        ));
    }

    #[tokio::test]
    async fn test_check_logged_in_follows_marker() {
        let server = MockServer::start().await;
        mount_home(&server, LOGGED_IN_HOME).await;
        assert!(check_logged_in(&api(&server).await).await.unwrap());

        let server = MockServer::start().await;
        mount_home(&server, LOGGED_OUT_HOME).await;
        let api = api(&server).await;
        assert!(!check_logged_in(&api).await.unwrap());
        assert_eq!(check_session(&api).await.unwrap(), SessionState::LoggedOut);
    }

    #[tokio::test]
    async fn test_check_logged_in_non_200_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503).set_body_string(LOGGED_IN_HOME))
            .mount(&server)
            .await;

        let err = check_logged_in(&api(&server).await).await.unwrap_err();
        assert!(matches!(err, Error::Transport { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        mount_home_transition(&server, LOGGED_OUT_HOME, LOGGED_IN_HOME).await;

        Mock::given(method("GET"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts/login"))
            .and(body_string_contains("post_key=f00dcafe"))
            .and(body_string_contains("pixiv_id=someone"))
            .and(body_string_contains("source=pc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        login(&api(&server).await, "someone", "hunter2")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_login_refused_when_logged_in() {
        let server = MockServer::start().await;
        mount_home(&server, LOGGED_IN_HOME).await;
        Mock::given(method("GET"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .expect(0)
            .mount(&server)
            .await;

        let err = login(&api(&server).await, "someone", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Session(msg) if msg == "already logged in"));
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let server = MockServer::start().await;
        mount_home(&server, LOGGED_OUT_HOME).await;
        Mock::given(method("GET"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/accounts/login"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = login(&api(&server).await, "someone", "wrong")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Session(msg) if msg.starts_with("login failed")));
    }

    #[tokio::test]
    async fn test_logout_refused_when_logged_out() {
        let server = MockServer::start().await;
        mount_home(&server, LOGGED_OUT_HOME).await;
        Mock::given(method("GET"))
            .and(path("/logout.php"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = logout(&api(&server).await).await.unwrap_err();
        assert!(matches!(err, Error::Session(msg) if msg == "not logged in"));
    }

    #[tokio::test]
    async fn test_logout_success() {
        let server = MockServer::start().await;
        mount_home_transition(&server, LOGGED_IN_HOME, LOGGED_OUT_HOME).await;
        Mock::given(method("GET"))
            .and(path("/logout.php"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        logout(&api(&server).await).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_non_200() {
        let server = MockServer::start().await;
        mount_home(&server, LOGGED_IN_HOME).await;
        Mock::given(method("GET"))
            .and(path("/logout.php"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = logout(&api(&server).await).await.unwrap_err();
        assert!(matches!(err, Error::Transport { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_logout_still_logged_in() {
        let server = MockServer::start().await;
        mount_home(&server, LOGGED_IN_HOME).await;
        Mock::given(method("GET"))
            .and(path("/logout.php"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let err = logout(&api(&server).await).await.unwrap_err();
        assert!(matches!(err, Error::Session(msg) if msg == "logout failed"));
    }
}
