use reqwest::{
    blocking::{Client, Response},
    header::{COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT},
};

use crate::{Res, config, warning};

/// Headers sent with every API and download request.
///
/// Built once at startup and extended with the session cookie after a VIP
/// login. The same value is handed to the downloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    pub user_agent: String,
    pub referer: String,
    pub cookie: Option<String>,
}

impl RequestConfig {
    /// Headers without a session cookie.
    ///
    /// # Example
    ///
    /// ```
    /// let request = RequestConfig::new("Mozilla/5.0", "http://www.xiami.com/song/play");
    /// assert!(request.cookie.is_none());
    /// ```
    pub fn new(user_agent: impl Into<String>, referer: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            referer: referer.into(),
            cookie: None,
        }
    }

    /// Default headers for the given API base URL.
    pub fn for_base_url(base_url: &str) -> Self {
        Self::new(config::user_agent(), format!("{base_url}/song/play"))
    }

    /// Same headers plus a `Cookie` value, e.g. the VIP session.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    /// Header name/value pairs, in a stable order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("User-Agent", self.user_agent.clone()),
            ("Referer", self.referer.clone()),
        ];
        if let Some(cookie) = &self.cookie {
            pairs.push(("Cookie", cookie.clone()));
        }
        pairs
    }

    /// Headers for a `reqwest` request.
    ///
    /// # Errors
    ///
    /// Fails when a value contains bytes not allowed in an HTTP header.
    pub fn header_map(&self) -> Res<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&self.user_agent)?);
        headers.insert(REFERER, HeaderValue::from_str(&self.referer)?);
        if let Some(cookie) = &self.cookie {
            headers.insert(COOKIE, HeaderValue::from_str(cookie)?);
        }
        Ok(headers)
    }
}

/// Blocking client bound to one API base URL and one request configuration.
pub struct XiamiClient {
    http: Client,
    base_url: String,
    request: RequestConfig,
}

impl XiamiClient {
    /// Client for `base_url`; a trailing `/` is dropped.
    ///
    /// # Arguments
    ///
    /// * `base_url` - API root, e.g. `http://www.xiami.com`
    /// * `request` - headers sent with every request
    pub fn new(base_url: impl Into<String>, request: RequestConfig) -> Res<Self> {
        let base_url: String = base_url.into();
        Ok(Self {
            http: Client::builder().build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            request,
        })
    }

    /// Client for the configured base URL with default headers.
    pub fn from_config() -> Res<Self> {
        let base_url = config::api_url();
        let request = RequestConfig::for_base_url(&base_url);
        Self::new(base_url, request)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request(&self) -> &RequestConfig {
        &self.request
    }

    /// Attaches a session cookie to all following requests.
    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.request.cookie = Some(cookie.into());
    }

    /// GET with the configured headers. Non-2xx responses are errors.
    pub fn get(&self, url: &str) -> Res<Response> {
        let response = self
            .http
            .get(url)
            .headers(self.request.header_map()?)
            .send()?
            .error_for_status()?;
        Ok(response)
    }

    /// Response body as text, or an empty string if the request failed.
    pub fn get_text(&self, url: &str) -> String {
        match self.get(url).and_then(|r| Ok(r.text()?)) {
            Ok(text) => text,
            Err(e) => {
                warning!("Request to {} failed: {}", url, e);
                String::new()
            }
        }
    }

    /// Response body as bytes, or an empty vector if the request failed.
    pub fn get_bytes(&self, url: &str) -> Vec<u8> {
        match self.get(url).and_then(|r| Ok(r.bytes()?.to_vec())) {
            Ok(bytes) => bytes,
            Err(e) => {
                warning!("Request to {} failed: {}", url, e);
                Vec::new()
            }
        }
    }
}
