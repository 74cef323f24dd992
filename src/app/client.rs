//! The client facade: one method per logical operation.
//!
//! Each call validates its arguments, compiles a route and runs a single
//! request through the injected [`HttpTransport`]. The raw JSON then goes
//! through the matching decoder. Nothing is cached or retried, and concurrent
//! calls share only the transport.
//!
//! ```rust,ignore
//! use rswiki_client::{Client, ClientConfig, ItemQuery, WgGameType};
//!
//! let client = Client::new(ClientConfig::new("price-bot", "@me"))?;
//! let prices = client
//!     .get_latest_exchange_price(WgGameType::Rs, &[ItemQuery::from(4151u64)], None)
//!     .await?;
//! client.close().await?;
//! ```

use crate::adapters::http::HttpService;
use crate::app::query::{ItemLookup, ItemQuery, TmsSearchOptions};
use crate::app::services::{MediaWikiService, RealtimeService, WeirdGloopService};
use crate::config::client_config::ClientConfig;
use crate::core::outcome::ApiResult;
use crate::domain::enums::{
    Locale, MwGameType, RtGameType, RtTimeFilter, TimeSeriesFilter, TimeSeriesGameType,
    WgGameType, WgTimeFilter,
};
use crate::domain::model::{
    CompressedExchangePrice, ExchangePrice, ItemMapping, LatestExchangeUpdate,
    PaginatedSocialFeed, RealtimePrice, SocialFeedItem, TimeFilteredPrice, TimeSeriesPrice,
    TmsItem, TmsSearch, TmsSearchFull, Vos, VosHistory,
};
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;

#[derive(Clone)]
pub struct Client {
    http: Arc<dyn HttpTransport>,
    weird_gloop: WeirdGloopService,
    realtime: RealtimeService,
    media_wiki: MediaWikiService,
}

impl Client {
    /// Builds a client on the default reqwest transport.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpService::new(&config)?;
        Ok(Self::with_transport(Arc::new(http)))
    }

    pub fn with_transport(http: Arc<dyn HttpTransport>) -> Self {
        Self {
            weird_gloop: WeirdGloopService::new(Arc::clone(&http)),
            realtime: RealtimeService::new(Arc::clone(&http)),
            media_wiki: MediaWikiService::new(Arc::clone(&http)),
            http,
        }
    }

    pub fn weird_gloop(&self) -> &WeirdGloopService {
        &self.weird_gloop
    }

    pub fn realtime(&self) -> &RealtimeService {
        &self.realtime
    }

    /// Releases the transport. Further calls fail with `TransportClosed`.
    pub async fn close(&self) -> Result<()> {
        self.http.close().await
    }

    /// Current Voice of Seren districts.
    pub async fn get_vos(&self) -> Result<Vos> {
        self.weird_gloop.get_vos().await
    }

    /// Past Voice of Seren rotations, about 10 per page. A page past the end is an API error.
    pub async fn get_vos_history(&self, page: NonZeroU32) -> Result<ApiResult<VosHistory>> {
        self.weird_gloop.get_vos_history(page).await
    }

    pub async fn get_latest_exchange_update(&self) -> Result<LatestExchangeUpdate> {
        self.weird_gloop.get_latest_exchange_update().await
    }

    pub async fn get_social_feed(&self, page: NonZeroU32) -> Result<ApiResult<PaginatedSocialFeed>> {
        self.weird_gloop.get_social_feed(page).await
    }

    pub async fn get_latest_social_feed(&self) -> Result<SocialFeedItem> {
        self.weird_gloop.get_latest_social_feed().await
    }

    /// Latest exchange price for a batch of ids and/or names.
    ///
    /// Ids and names are sent together; the API then answers for the ids only.
    pub async fn get_latest_exchange_price(
        &self,
        game: WgGameType,
        ids_or_names: &[ItemQuery],
        locale: Option<Locale>,
    ) -> Result<ApiResult<Vec<ExchangePrice>>> {
        self.weird_gloop
            .get_latest_exchange_price(game, ids_or_names, locale)
            .await
    }

    pub async fn get_historical_exchange_price(
        &self,
        game: WgGameType,
        time_filter: WgTimeFilter,
        lookup: &ItemLookup,
    ) -> Result<ApiResult<Vec<ExchangePrice>>> {
        self.weird_gloop
            .get_historical_exchange_price(game, time_filter, lookup)
            .await
    }

    pub async fn get_compressed_historical_exchange_price(
        &self,
        game: WgGameType,
        time_filter: WgTimeFilter,
        lookup: &ItemLookup,
    ) -> Result<ApiResult<Vec<CompressedExchangePrice>>> {
        self.weird_gloop
            .get_compressed_historical_exchange_price(game, time_filter, lookup)
            .await
    }

    pub async fn get_current_tms(&self) -> Result<Vec<TmsItem>> {
        self.weird_gloop.get_current_tms().await
    }

    pub async fn get_next_tms(&self) -> Result<Vec<TmsItem>> {
        self.weird_gloop.get_next_tms().await
    }

    /// The endpoint matches names case-sensitively.
    pub async fn search_tms_by_name(
        &self,
        names: &[&str],
        options: &TmsSearchOptions,
    ) -> Result<ApiResult<Vec<TmsSearch>>> {
        self.weird_gloop.search_tms_by_name(names, options).await
    }

    pub async fn search_tms_by_id(
        &self,
        ids: &[u64],
        options: &TmsSearchOptions,
    ) -> Result<ApiResult<Vec<TmsSearch>>> {
        self.weird_gloop.search_tms_by_id(ids, options).await
    }

    pub async fn search_tms_by_id_full(
        &self,
        ids: &[u64],
        options: &TmsSearchOptions,
    ) -> Result<ApiResult<Vec<TmsSearchFull>>> {
        self.weird_gloop.search_tms_by_id_full(ids, options).await
    }

    pub async fn get_realtime_price(
        &self,
        game: RtGameType,
        id: Option<u64>,
    ) -> Result<ApiResult<Vec<RealtimePrice>>> {
        self.realtime.get_realtime_price(game, id).await
    }

    pub async fn get_realtime_mapping(
        &self,
        game: RtGameType,
    ) -> Result<ApiResult<Vec<ItemMapping>>> {
        self.realtime.get_mapping(game).await
    }

    pub async fn get_time_filtered_price(
        &self,
        game: RtGameType,
        time_filter: RtTimeFilter,
        timestamp: Option<i64>,
    ) -> Result<ApiResult<TimeFilteredPrice>> {
        self.realtime
            .get_time_filtered_price(game, time_filter, timestamp)
            .await
    }

    pub async fn get_time_series(
        &self,
        game: TimeSeriesGameType,
        id: u64,
        timestep: TimeSeriesFilter,
    ) -> Result<ApiResult<Vec<TimeSeriesPrice>>> {
        self.realtime.get_time_series(game, id, timestep).await
    }

    pub async fn browse_wiki(&self, subject: &str, game: MwGameType) -> Result<Value> {
        self.media_wiki.browse(subject, game).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::routes::CompiledRequest;
    use crate::utils::error::RsWikiError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    /// Records every request and answers with a canned body.
    struct MockTransport {
        body: Value,
        calls: AtomicUsize,
        last: Mutex<Option<CompiledRequest>>,
    }

    impl MockTransport {
        fn new(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }

        async fn last_request(&self) -> CompiledRequest {
            self.last.lock().await.clone().expect("no request was made")
        }
    }

    #[async_trait]
    impl HttpTransport for MockTransport {
        async fn fetch(&self, request: &CompiledRequest) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().await = Some(request.clone());
            Ok(self.body.clone())
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_conflicting_window_fails_before_network() {
        let transport = MockTransport::new(json!([]));
        let client = Client::with_transport(transport.clone());
        let options = TmsSearchOptions {
            end_at: chrono::NaiveDate::from_ymd_opt(2023, 7, 5),
            count: Some(2),
            ..TmsSearchOptions::default()
        };

        let result = client.search_tms_by_id(&[42274], &options).await;

        assert!(matches!(
            result,
            Err(RsWikiError::ConflictingArgument { .. })
        ));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_identifier_fails_before_network() {
        let transport = MockTransport::new(json!({}));
        let client = Client::with_transport(transport.clone());

        let historical = client
            .get_historical_exchange_price(WgGameType::Rs, WgTimeFilter::All, &ItemLookup::default())
            .await;
        let latest = client
            .get_latest_exchange_price(WgGameType::Rs, &[], None)
            .await;

        assert!(matches!(historical, Err(RsWikiError::MissingArgument { .. })));
        assert!(matches!(latest, Err(RsWikiError::MissingArgument { .. })));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_mixed_batch_sends_ids_and_names() {
        let transport = MockTransport::new(json!({
            "4151": {"id": "4151", "price": 1200, "volume": 10, "timestamp": "2023-07-22T04:26:40.000Z"}
        }));
        let client = Client::with_transport(transport.clone());

        let prices = client
            .get_latest_exchange_price(
                WgGameType::Rs,
                &[ItemQuery::from(4151u64), ItemQuery::from("Coal")],
                Some(Locale::Pt),
            )
            .await
            .unwrap()
            .unwrap()
            .unwrap();

        let request = transport.last_request().await;
        assert_eq!(request.path(), "/exchange/history/rs/latest");
        assert_eq!(request.query_string(), "?id=4151&name=Coal&lang=pt");
        assert_eq!(prices[0].id, 4151);
    }

    #[tokio::test]
    async fn test_time_filtered_timestamp_is_floored() {
        let transport = MockTransport::new(json!({"data": {}, "timestamp": 1690000200}));
        let client = Client::with_transport(transport.clone());

        let result = client
            .get_time_filtered_price(RtGameType::Osrs, RtTimeFilter::FiveMins, Some(1690000399))
            .await
            .unwrap();

        assert!(result.is_ok());
        let request = transport.last_request().await;
        assert_eq!(request.path(), "/osrs/5m");
        assert_eq!(request.query_string(), "?timestamp=1690000200");
    }

    #[tokio::test]
    async fn test_page_out_of_range_is_returned_not_raised() {
        let transport = MockTransport::new(json!({"success": false, "error": "Page out of range"}));
        let client = Client::with_transport(transport.clone());
        let page = NonZeroU32::new(99999).unwrap();

        let history = client.get_vos_history(page).await.unwrap();
        assert!(history.is_err());
        let request = transport.last_request().await;
        assert_eq!(request.path(), "/runescape/vos/history");

        let feed = client.get_social_feed(page).await.unwrap();
        let error = feed.unwrap_err().unwrap();
        assert_eq!(error.success, Some(false));
        assert_eq!(error.error, "Page out of range");
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_locale_omitted_when_absent() {
        let transport = MockTransport::new(json!({"Coal": []}));
        let client = Client::with_transport(transport.clone());

        client
            .get_historical_exchange_price(
                WgGameType::Osrs,
                WgTimeFilter::Last90Days,
                &ItemLookup::by_name("Coal"),
            )
            .await
            .unwrap();

        let request = transport.last_request().await;
        assert!(request.param("lang").is_none());
    }
}
