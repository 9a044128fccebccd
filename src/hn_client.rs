use reqwest::blocking::Client;
use std::time::Duration;

use crate::config::Settings;
use crate::error::{FetchError, Result};
use crate::models::Page;

/// Anything that can answer a search request with one page of hits.
pub trait SearchBackend: Send + Sync + 'static {
    fn search(&self, query: &str, page: u32) -> Result<Page>;
}

pub struct HackerNewsClient {
    client: Client,
    base_url: String,
    hits_per_page: u32,
}

impl HackerNewsClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        // reqwest's blocking client defaults to 30s; no timeout unless configured
        builder = match settings.request_timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)),
            None => builder.timeout(None),
        };

        Ok(Self {
            client: builder.build()?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            hits_per_page: settings.hits_per_page,
        })
    }

    /// The query is percent-encoded but otherwise sent as typed, empty included.
    pub fn search_url(&self, query: &str, page: u32) -> String {
        format!(
            "{}/search?query={}&page={}&hitsPerPage={}",
            self.base_url,
            urlencoding::encode(query),
            page,
            self.hits_per_page
        )
    }
}

impl SearchBackend for HackerNewsClient {
    fn search(&self, query: &str, page: u32) -> Result<Page> {
        let url = self.search_url(query, page);
        tracing::debug!(%url, "requesting search page");

        let response = self.client.get(&url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        let result: Page =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;

        tracing::debug!(
            query,
            page = result.page,
            hits = result.hits.len(),
            "search page received"
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::SearchBackend;
    use crate::error::{FetchError, Result};
    use crate::models::{Hit, Page};

    /// Canned responses keyed by `(query, page)`; anything else fails with a 500.
    #[derive(Default)]
    pub struct StubBackend {
        responses: HashMap<(String, u32), Vec<Hit>>,
        pub calls: Mutex<Vec<(String, u32)>>,
    }

    impl StubBackend {
        pub fn with_page(mut self, query: &str, page: u32, hits: Vec<Hit>) -> Self {
            self.responses.insert((query.to_string(), page), hits);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().map(|c| c.len()).unwrap_or(0)
        }
    }

    impl SearchBackend for StubBackend {
        fn search(&self, query: &str, page: u32) -> Result<Page> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push((query.to_string(), page));
            }
            match self.responses.get(&(query.to_string(), page)) {
                Some(hits) => Ok(Page {
                    hits: hits.clone(),
                    page,
                }),
                None => Err(FetchError::Status(500)),
            }
        }
    }
}
