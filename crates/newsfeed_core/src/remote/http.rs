//! HTTP news source backed by `reqwest`.

use crate::config::NewsConfig;
use crate::remote::{NewsResponse, NewsSource, RemoteError};
use async_trait::async_trait;
use log::{error, info};
use reqwest::{Client, Url};
use std::time::Instant;

/// Fetches the listing with one GET against the configured endpoint.
#[derive(Debug, Clone)]
pub struct HttpNewsSource {
    client: Client,
    url: Url,
}

impl HttpNewsSource {
    /// Builds a source from config.
    ///
    /// # Errors
    /// - `InvalidEndpoint` when `base_url + path` is not a valid URL.
    /// - `Request` when the HTTP client cannot be constructed.
    pub fn from_config(config: &NewsConfig) -> Result<Self, RemoteError> {
        let url = endpoint_url(config)?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            url,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl NewsSource for HttpNewsSource {
    async fn fetch_articles(&self) -> Result<NewsResponse, RemoteError> {
        let started_at = Instant::now();
        info!(
            "event=remote_fetch module=remote status=start host={}",
            self.url.host_str().unwrap_or("unknown")
        );

        let result = async {
            self.client
                .get(self.url.clone())
                .send()
                .await?
                .error_for_status()?
                .json::<NewsResponse>()
                .await
        }
        .await;

        match result {
            Ok(response) => {
                info!(
                    "event=remote_fetch module=remote status=ok duration_ms={} count={}",
                    started_at.elapsed().as_millis(),
                    response.articles.as_ref().map_or(0, Vec::len)
                );
                Ok(response)
            }
            Err(err) => {
                // The URL carries the api key.
                let err = err.without_url();
                error!(
                    "event=remote_fetch module=remote status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn endpoint_url(config: &NewsConfig) -> Result<Url, RemoteError> {
    let raw = format!("{}{}", config.base_url.trim_end_matches('/'), config.path);
    let mut url = Url::parse(&raw).map_err(|_| RemoteError::InvalidEndpoint(raw.clone()))?;
    {
        let mut query = url.query_pairs_mut();
        if !config.query.is_empty() {
            query.append_pair("q", &config.query);
        }
        if !config.api_key.is_empty() {
            query.append_pair("apiKey", &config.api_key);
        }
    }
    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
