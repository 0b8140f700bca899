use std::io::ErrorKind;
use std::path::Path;

use reqwest::header::HeaderValue;
use serde::Deserialize;

use crate::{warn_time, Result};

/// A cookie as browser cookie-export extensions write it. Other keys are ignored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default, rename = "hostOnly")]
    pub host_only: bool,
}

impl Cookie {
    /// Whether the cookie would be sent to `host`.
    /// Host-only cookies need an exact match, domain cookies match the domain and any subdomain.
    /// A cookie without a domain is taken to belong to the target site.
    pub fn applies_to(&self, host: &str) -> bool {
        let domain = match self.domain.as_deref() {
            None | Some("") => return true,
            Some(domain) => domain.to_ascii_lowercase(),
        };
        let host = host.to_ascii_lowercase();

        if self.host_only {
            return domain.trim_start_matches('.') == host;
        }
        let domain = domain.trim_start_matches('.');
        host == domain || host.ends_with(&format!(".{domain}"))
    }
}

/// Reads the cookie file. A missing file is `Ok(None)`.
pub fn read_cookie_file(path: &Path) -> Result<Option<Vec<Cookie>>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let cookies: Vec<Cookie> = serde_json::from_str(&contents)?;
    Ok(Some(cookies))
}

/// Like `read_cookie_file`, but a file that can't be used only produces a warning.
pub fn load_cookies(path: &Path) -> Option<Vec<Cookie>> {
    match read_cookie_file(path) {
        Ok(cookies) => cookies,
        Err(crate::Error::CookieJson(_)) => {
            warn_time!(
                "{} exists but is not valid JSON. Proceeding without cookies.",
                path.display()
            );
            None
        }
        Err(e) => {
            warn_time!("Couldn't read {}: {}. Proceeding without cookies.", path.display(), e);
            None
        }
    }
}

/// Renders the `Cookie` header value for `host`, `None` if no cookie applies.
/// A cookie that can't go into a header is dropped with a warning.
pub fn cookie_header(cookies: &[Cookie], host: &str) -> Option<String> {
    let pairs: Vec<String> = cookies
        .iter()
        .filter(|c| c.applies_to(host))
        .filter_map(|c| {
            let pair = format!("{}={}", c.name, c.value);
            if HeaderValue::from_str(&pair).is_err() {
                warn_time!("Skipping cookie {:?}: not a valid header value.", c.name);
                return None;
            }
            Some(pair)
        })
        .collect();

    if pairs.is_empty() {
        None
    } else {
        Some(pairs.join("; "))
    }
}
