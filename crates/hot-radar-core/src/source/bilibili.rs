use crate::config::SourceConfig;
use crate::error::Error;
use crate::model::RawItem;
use crate::source::ItemSource;
use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const BODY_SNIPPET_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<ApiData>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiData {
    #[serde(default)]
    list: Vec<RawItem>,
}

/// Decode one listing page. A non-zero `code` is an API-level error.
pub fn parse_page(body: &str) -> Result<Vec<RawItem>, Error> {
    let response: ApiResponse = serde_json::from_str(body)?;
    if response.code != 0 {
        return Err(Error::Api {
            code: response.code,
            message: if response.message.is_empty() {
                "unknown API error".to_string()
            } else {
                response.message
            },
        });
    }
    Ok(response.data.map(|d| d.list).unwrap_or_default())
}

/// Build the `Cookie` header value. A bare token is sent as `SESSDATA`.
pub fn session_cookie(token: &str) -> String {
    if token.contains('=') {
        token.to_string()
    } else {
        format!("SESSDATA={}", token)
    }
}

/// Popular-video listing over HTTP.
pub struct BilibiliSource {
    client: Client,
    endpoint: String,
    page_size: u32,
}

impl BilibiliSource {
    pub fn new(config: &SourceConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert(header::ORIGIN, HeaderValue::from_static("https://www.bilibili.com"));
        headers.insert(header::REFERER, header_value("referer", &config.referer)?);

        if let Some(token) = config.session_token.as_deref().filter(|t| !t.is_empty()) {
            let mut cookie = header_value("session_token", &session_cookie(token))?;
            cookie.set_sensitive(true);
            headers.insert(header::COOKIE, cookie);
            debug!("Session cookie attached to listing requests");
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            page_size: config.page_size,
        })
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::Other(format!("invalid header value for {}: {}", name, e)))
}

impl ItemSource for BilibiliSource {
    fn fetch_page(&self, page: u32) -> Result<Vec<RawItem>, Error> {
        debug!("GET {} pn={} ps={}", self.endpoint, page, self.page_size);
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("pn", page), ("ps", self.page_size)])
            .send()?
            .error_for_status()?
            .text()?;

        parse_page(&body).inspect_err(|e| {
            if matches!(e, Error::Json(_)) {
                let snippet: String = body.chars().take(BODY_SNIPPET_CHARS).collect();
                debug!("Undecodable body on page {}: {}...", page, snippet);
            }
        })
    }
}
