use std::time::Duration;

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, COOKIE, DNT, REFERER,
    UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{Client, Url};

use crate::cookies::{cookie_header, Cookie};
use crate::{Error, Result, PER_PAGE};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";

/// Fetches the pages of one user's review list.
/// Holds a single `Client` for the whole run.
pub struct PageFetcher {
    client: Client,
    base_url: String,
    user_id: String,
}

impl PageFetcher {
    pub fn new(
        base_url: &str,
        user_id: &str,
        cookies: Option<&[Cookie]>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let host = Url::parse(&base_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .ok_or_else(|| Error::InvalidBaseUrl(base_url.clone()))?;

        let mut headers = browser_headers(&base_url)?;
        if let Some(cookie) = cookies.and_then(|cookies| cookie_header(cookies, &host)) {
            headers.insert(COOKIE, HeaderValue::from_str(&cookie)?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            user_id: user_id.to_string(),
        })
    }

    pub fn page_url(&self, page_num: u32) -> String {
        format!(
            "{}/review/list/{}?page={page_num}&per_page={PER_PAGE}&ref=nav_mybooks&utf8=%E2%9C%93",
            self.base_url, self.user_id
        )
    }

    /// Requests a page and returns the HTML.
    /// Transport errors and non-success statuses both fail with the page number attached.
    pub async fn fetch_page(&self, page_num: u32) -> Result<String> {
        let fetch_err = |source: reqwest::Error| Error::Fetch {
            page: page_num,
            source,
        };

        let res = self
            .client
            .get(self.page_url(page_num))
            .send()
            .await
            .map_err(fetch_err)?;

        let status = res.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                page: page_num,
                status,
            });
        }

        let html = res.text().await.map_err(fetch_err)?;
        Ok(html)
    }
}

/// Headers a desktop Chrome sends when navigating within the site.
fn browser_headers(base_url: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(REFERER, HeaderValue::from_str(&format!("{base_url}/"))?);
    headers.insert(DNT, HeaderValue::from_static("1"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let sec_fetch = [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "same-origin"),
        ("sec-fetch-user", "?1"),
    ];
    for (name, value) in sec_fetch {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    Ok(headers)
}
