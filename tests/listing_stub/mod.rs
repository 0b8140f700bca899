use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

/// A request as the stub saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub url: String,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

/// Fake review list for one user. Page `n` is `pages[n - 1]`, anything else is a 404.
pub struct ListingStub {
    pub base_url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListingStub {
    pub fn spawn(user_id: &str, pages: Vec<String>) -> Self {
        Self::spawn_failing(user_id, pages, None)
    }

    #[allow(dead_code)]
    /// Same as `spawn`, but `failing_page` answers with a 503.
    pub fn spawn_failing(user_id: &str, pages: Vec<String>, failing_page: Option<u32>) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start listing stub server");
        let base_url = format!("http://{}", server.server_addr());
        let prefix = format!("/review/list/{user_id}?");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn({
            let seen = Arc::clone(&seen);
            move || loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let header = |name: &str| {
                    request
                        .headers()
                        .iter()
                        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
                        .map(|h| h.value.as_str().to_string())
                };
                let url = request.url().to_string();
                seen.lock().unwrap().push(SeenRequest {
                    url: url.clone(),
                    cookie: header("Cookie"),
                    user_agent: header("User-Agent"),
                });

                let page_num = url
                    .strip_prefix(&prefix)
                    .and_then(|query| {
                        query
                            .split('&')
                            .find_map(|kv| kv.strip_prefix("page="))
                            .and_then(|n| n.parse::<u32>().ok())
                    });

                let response = match page_num {
                    Some(n) if Some(n) == failing_page => {
                        tiny_http::Response::from_string("unavailable").with_status_code(503)
                    }
                    Some(n) if n >= 1 && (n as usize) <= pages.len() => {
                        let html_header = tiny_http::Header::from_bytes(
                            &b"Content-Type"[..],
                            &b"text/html; charset=utf-8"[..],
                        )
                        .expect("content-type header");
                        tiny_http::Response::from_string(pages[n as usize - 1].clone())
                            .with_header(html_header)
                    }
                    _ => tiny_http::Response::from_string("not found").with_status_code(404),
                };
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            seen,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for ListingStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// One `tr.bookalike.review` row as the site renders it.
pub fn review_row(id: &str, title: &str, author: &str, date_read: &str) -> String {
    format!(
        r#"<tr id="review_{id}" class="bookalike review">
  <td class="field cover"><div class="js-tooltipTrigger tooltipTrigger" data-resource-id="{id}"></div></td>
  <td class="field title"><label>title</label><div class="value"><a href="/book/show/{id}">{title}</a></div></td>
  <td class="field author"><label>author</label><div class="value"><a href="/author/show/1">{author}</a></div></td>
  <td class="field num_pages"><label>num pages</label><div class="value"><nobr>281 <span class="greyText">pp</span></nobr></div></td>
  <td class="field avg_rating"><div class="value">4.27</div></td>
  <td class="field date_started"><div class="value"><span class="date_started_value">Jan 5, 2023</span></div></td>
  <td class="field date_read"><div class="value"><span class="date_read_value">{date_read}</span></div></td>
</tr>"#
    )
}

/// A listing page. With `total_pages` set a pagination control is rendered, "next" link last.
pub fn listing_page(total_pages: Option<u32>, rows: &[String]) -> String {
    let pagination = total_pages
        .map(|total| {
            let links: String = (1..=total)
                .map(|n| format!(r#"<a href="?page={n}">{n}</a> "#))
                .collect();
            format!(r#"<div id="reviewPagination">{links}<a class="next_page" href="?page=2">next »</a></div>"#)
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html>
  <head><title>Books on shelf</title></head>
  <body>
    {pagination}
    <table id="books"><tbody id="booksBody">{}</tbody></table>
  </body>
</html>"#,
        rows.concat()
    )
}
