use crate::error::{Result, ScanError};
use crate::extract::LinkExtractor;
use futures::stream::{self, LocalBoxStream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_USER_AGENT: &str = "Burrow/0.1 (https://github.com/trapdoorsec/burrow)";

/// Thin wrapper over a pooled HTTP client that only accepts `200 OK` pages.
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Page> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().to_string();
        if final_url != url {
            debug!("{} redirected to {}", url, final_url);
        }

        Ok(Page {
            url: final_url,
            response,
        })
    }
}

/// A successfully fetched page whose body has not been read yet.
///
/// Dropping the page, or the stream returned by [`Page::into_hrefs`],
/// releases the underlying connection.
pub struct Page {
    url: String,
    response: Response,
}

impl Page {
    /// The URL the body was served from, after any redirects.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Reads the whole body and returns its hrefs in document order.
    ///
    /// The body is still tokenized chunk by chunk; only the hrefs are kept.
    /// The response is finished before this returns, so the client's request
    /// deadline never runs while other pages are being fetched.
    pub async fn read_hrefs(self) -> Vec<String> {
        self.into_hrefs().collect().await
    }

    /// Lazily reads the body and yields raw anchor hrefs in document order.
    ///
    /// A read error ends the stream early; hrefs already yielded stand.
    pub fn into_hrefs(self) -> LocalBoxStream<'static, String> {
        let state = HrefReader {
            url: self.url,
            response: self.response,
            extractor: LinkExtractor::new(),
            pending: VecDeque::new(),
            done: false,
        };

        stream::unfold(state, |mut reader| async move {
            loop {
                if let Some(href) = reader.pending.pop_front() {
                    return Some((href, reader));
                }
                if reader.done {
                    return None;
                }
                reader.read_chunk().await;
            }
        })
        .boxed_local()
    }
}

struct HrefReader {
    url: String,
    response: Response,
    extractor: LinkExtractor,
    pending: VecDeque<String>,
    done: bool,
}

impl HrefReader {
    async fn read_chunk(&mut self) {
        match self.response.chunk().await {
            Ok(Some(bytes)) => {
                let hrefs = self.extractor.feed(&bytes);
                self.pending.extend(hrefs);
            }
            Ok(None) => {
                let hrefs = self.extractor.finish();
                self.pending.extend(hrefs);
                self.done = true;
            }
            Err(e) => {
                warn!("Stopped reading {} early: {}", self.url, e);
                self.done = true;
            }
        }
    }
}
