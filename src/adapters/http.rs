use crate::config::client_config::{ClientConfig, HostConfig};
use crate::core::routes::CompiledRequest;
use crate::domain::ports::HttpTransport;
use crate::utils::error::{Result, RsWikiError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default [`HttpTransport`] backed by a pooled `reqwest` client.
#[derive(Debug)]
pub struct HttpService {
    client: Client,
    hosts: HostConfig,
    closed: AtomicBool,
}

impl HttpService {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let user_agent = config.user_agent();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&user_agent).map_err(|e| RsWikiError::InvalidConfigValue {
                field: "user_agent".to_string(),
                value: user_agent.clone(),
                reason: e.to_string(),
            })?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            hosts: config.hosts.clone(),
            closed: AtomicBool::new(false),
        })
    }

    pub fn url_for(&self, request: &CompiledRequest) -> String {
        format!("{}{}", self.hosts.base_url(request.host()), request.path())
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[async_trait]
impl HttpTransport for HttpService {
    async fn fetch(&self, request: &CompiledRequest) -> Result<Value> {
        if self.is_closed() {
            return Err(RsWikiError::TransportClosed);
        }

        let pretty = request.pretty_with_base(self.hosts.base_url(request.host()));
        tracing::debug!("Making API request to: {}", pretty);

        let response = self
            .client
            .get(self.url_for(request))
            .query(&request.query_pairs())
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {} for {}", status, pretty);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RsWikiError::Http {
                request: pretty,
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::AcqRel) {
            tracing::debug!("HTTP transport closed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::routes::{REALTIME_PRICE, VOS_HISTORY};
    use httpmock::prelude::*;
    use serde_json::json;

    fn service_for(server: &MockServer) -> HttpService {
        let config = ClientConfig::new("rswiki-tests", "tests@example.org")
            .with_hosts(HostConfig::all(server.base_url()));
        HttpService::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_user_agent() {
        let server = MockServer::start_async().await;
        let api_mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/osrs/latest")
                    .query_param("id", "4151")
                    .header("user-agent", "rswiki-tests - tests@example.org");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({"data": {}}));
            })
            .await;

        let service = service_for(&server);
        let request = REALTIME_PRICE
            .compile(&[&"osrs"])
            .unwrap()
            .with_param("id", 4151u64);
        let body = service.fetch(&request).await.unwrap();

        api_mock.assert_async().await;
        assert_eq!(body, json!({"data": {}}));
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/runescape/vos/history");
                then.status(500).body("upstream exploded");
            })
            .await;

        let service = service_for(&server);
        let request = VOS_HISTORY.compile(&[]).unwrap().with_param("page", 3u32);
        let err = service.fetch(&request).await.unwrap_err();

        match err {
            RsWikiError::Http {
                request,
                status,
                body,
            } => {
                assert_eq!(status, 500);
                assert!(request.ends_with("/runescape/vos/history?page=3"));
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_after_close_fails() {
        let server = MockServer::start_async().await;
        let service = service_for(&server);

        service.close().await.unwrap();
        service.close().await.unwrap();
        assert!(service.is_closed());

        let request = VOS_HISTORY.compile(&[]).unwrap();
        assert!(matches!(
            service.fetch(&request).await,
            Err(RsWikiError::TransportClosed)
        ));
    }
}
