use crate::app::query::{partition_queries, ItemLookup, ItemQuery, TmsSearchOptions};
use crate::core::decode;
use crate::core::outcome::ApiResult;
use crate::core::routes::{self, CompiledRequest};
use crate::domain::enums::{Locale, WgGameType, WgTimeFilter};
use crate::domain::model::{
    CompressedExchangePrice, ExchangePrice, LatestExchangeUpdate, PaginatedSocialFeed,
    SocialFeedItem, TmsItem, TmsSearch, TmsSearchFull, Vos, VosHistory,
};
use crate::domain::ports::HttpTransport;
use crate::utils::error::{Result, RsWikiError};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;

const FULL_LOCALE: &str = "full";

/// Operations against the Weird Gloop API (exchange, social, VoS, TMS).
#[derive(Clone)]
pub struct WeirdGloopService {
    http: Arc<dyn HttpTransport>,
}

impl WeirdGloopService {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    async fn fetch(&self, request: CompiledRequest) -> Result<Value> {
        self.http.fetch(&request).await
    }

    pub async fn get_vos(&self) -> Result<Vos> {
        let data = self.fetch(routes::VOS.compile(&[])?).await?;
        Vos::from_raw(&data)
    }

    pub async fn get_vos_history(&self, page: NonZeroU32) -> Result<ApiResult<VosHistory>> {
        let request = routes::VOS_HISTORY.compile(&[])?.with_param("page", page.get());
        let data = self.fetch(request).await?;
        decode::decode_vos_history(&data)
    }

    pub async fn get_latest_exchange_update(&self) -> Result<LatestExchangeUpdate> {
        let data = self.fetch(routes::LATEST_EXCHANGE_UPDATE.compile(&[])?).await?;
        LatestExchangeUpdate::from_raw(&data)
    }

    pub async fn get_social_feed(&self, page: NonZeroU32) -> Result<ApiResult<PaginatedSocialFeed>> {
        let request = routes::SOCIAL_FEED.compile(&[])?.with_param("page", page.get());
        let data = self.fetch(request).await?;
        decode::decode_social_feed(&data)
    }

    pub async fn get_latest_social_feed(&self) -> Result<SocialFeedItem> {
        let data = self.fetch(routes::LATEST_SOCIAL_FEED.compile(&[])?).await?;
        SocialFeedItem::from_raw(&data)
    }

    pub async fn get_latest_exchange_price(
        &self,
        game: WgGameType,
        ids_or_names: &[ItemQuery],
        locale: Option<Locale>,
    ) -> Result<ApiResult<Vec<ExchangePrice>>> {
        let (ids, names) = partition_queries(ids_or_names);
        if ids.is_none() && names.is_none() {
            return Err(RsWikiError::missing("ids_or_names"));
        }

        let mut request = routes::LATEST_EXCHANGE_PRICE.compile(&[&game])?;
        if let Some(ids) = ids {
            request = request.with_param("id", ids);
        }
        if let Some(names) = names {
            request = request.with_param("name", names);
        }
        let request = with_locale(request, locale);

        let data = self.fetch(request).await?;
        decode::decode_latest_prices(&data)
    }

    pub async fn get_historical_exchange_price(
        &self,
        game: WgGameType,
        time_filter: WgTimeFilter,
        lookup: &ItemLookup,
    ) -> Result<ApiResult<Vec<ExchangePrice>>> {
        let request = historical_request(game, time_filter, lookup)?;
        let data = self.fetch(request).await?;
        decode::decode_historical_prices(&data)
    }

    pub async fn get_compressed_historical_exchange_price(
        &self,
        game: WgGameType,
        time_filter: WgTimeFilter,
        lookup: &ItemLookup,
    ) -> Result<ApiResult<Vec<CompressedExchangePrice>>> {
        let request = historical_request(game, time_filter, lookup)?.with_param("compress", "true");
        let data = self.fetch(request).await?;
        decode::decode_compressed_history(&data)
    }

    pub async fn get_current_tms(&self) -> Result<Vec<TmsItem>> {
        let request = routes::TMS_CURRENT.compile(&[])?.with_param("lang", FULL_LOCALE);
        let data = self.fetch(request).await?;
        decode::decode_tms_items(&data)
    }

    pub async fn get_next_tms(&self) -> Result<Vec<TmsItem>> {
        let request = routes::TMS_NEXT.compile(&[])?.with_param("lang", FULL_LOCALE);
        let data = self.fetch(request).await?;
        decode::decode_tms_items(&data)
    }

    pub async fn search_tms_by_name(
        &self,
        names: &[&str],
        options: &TmsSearchOptions,
    ) -> Result<ApiResult<Vec<TmsSearch>>> {
        if names.is_empty() {
            return Err(RsWikiError::missing("names"));
        }
        let request = tms_search_request("name", names.join("|"), options)?;
        let request = with_locale(request, options.locale);
        let data = self.fetch(request).await?;
        decode::decode_tms_search(&data)
    }

    pub async fn search_tms_by_id(
        &self,
        ids: &[u64],
        options: &TmsSearchOptions,
    ) -> Result<ApiResult<Vec<TmsSearch>>> {
        let request = tms_search_request("id", join_ids(ids)?, options)?;
        let request = with_locale(request, options.locale);
        let data = self.fetch(request).await?;
        decode::decode_tms_search(&data)
    }

    pub async fn search_tms_by_id_full(
        &self,
        ids: &[u64],
        options: &TmsSearchOptions,
    ) -> Result<ApiResult<Vec<TmsSearchFull>>> {
        // The full variant always answers in every locale.
        if options.locale.is_some() {
            return Err(RsWikiError::conflicting(["locale", "lang=full"]));
        }
        let request =
            tms_search_request("id", join_ids(ids)?, options)?.with_param("lang", FULL_LOCALE);
        let data = self.fetch(request).await?;
        decode::decode_tms_search_full(&data)
    }
}

fn with_locale(request: CompiledRequest, locale: Option<Locale>) -> CompiledRequest {
    match locale {
        Some(locale) => request.with_param("lang", locale.as_str()),
        None => request,
    }
}

fn historical_request(
    game: WgGameType,
    time_filter: WgTimeFilter,
    lookup: &ItemLookup,
) -> Result<CompiledRequest> {
    lookup.validate()?;

    let mut request = routes::HISTORICAL_EXCHANGE_PRICE.compile(&[&game, &time_filter])?;
    if let Some(id) = lookup.id {
        request = request.with_param("id", id);
    }
    if let Some(name) = &lookup.name {
        request = request.with_param("name", name.as_str());
    }
    Ok(with_locale(request, lookup.locale))
}

fn join_ids(ids: &[u64]) -> Result<String> {
    if ids.is_empty() {
        return Err(RsWikiError::missing("ids"));
    }
    Ok(ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join("|"))
}

fn tms_search_request(
    key: &str,
    value: String,
    options: &TmsSearchOptions,
) -> Result<CompiledRequest> {
    options.validate()?;

    let mut request = routes::TMS_SEARCH.compile(&[])?.with_param(key, value);
    if let Some(start) = options.start_at {
        request = request.with_param("start", start.format("%Y-%m-%d").to_string());
    }
    if let Some(end) = options.end_at {
        request = request.with_param("end", end.format("%Y-%m-%d").to_string());
    }
    if let Some(count) = options.count {
        request = request.with_param("number", count);
    }
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use tokio::sync::Mutex;

    struct CannedTransport {
        body: Value,
        last: Mutex<Option<CompiledRequest>>,
    }

    impl CannedTransport {
        fn new(body: Value) -> Arc<Self> {
            Arc::new(Self {
                body,
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn fetch(&self, request: &CompiledRequest) -> Result<Value> {
            *self.last.lock().await = Some(request.clone());
            Ok(self.body.clone())
        }

        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_historical_request_requires_identifier() {
        let err = historical_request(WgGameType::Rs, WgTimeFilter::All, &ItemLookup::default())
            .unwrap_err();
        assert!(matches!(err, RsWikiError::MissingArgument { .. }));
    }

    #[test]
    fn test_historical_request_params() {
        let request = historical_request(
            WgGameType::Osrs,
            WgTimeFilter::Sample,
            &ItemLookup::by_name("Abyssal whip").locale(Locale::En),
        )
        .unwrap();
        assert_eq!(request.path(), "/exchange/history/osrs/sample");
        assert_eq!(request.query_string(), "?name=Abyssal whip&lang=en");
    }

    #[test]
    fn test_tms_search_request_window() {
        let options = TmsSearchOptions {
            start_at: NaiveDate::from_ymd_opt(2023, 7, 1),
            count: Some(5),
            ..TmsSearchOptions::default()
        };
        let request = tms_search_request("id", "42274".to_string(), &options).unwrap();
        assert_eq!(request.query_string(), "?id=42274&start=2023-07-01&number=5");
    }

    #[tokio::test]
    async fn test_search_by_id_sends_locale() {
        let transport = CannedTransport::new(json!([]));
        let service = WeirdGloopService::new(transport.clone());
        let options = TmsSearchOptions {
            locale: Some(Locale::Pt),
            ..TmsSearchOptions::default()
        };

        service.search_tms_by_id(&[42274], &options).await.unwrap();

        let request = transport.last.lock().await.clone().unwrap();
        assert_eq!(request.query_string(), "?id=42274&lang=pt");
    }

    #[tokio::test]
    async fn test_search_by_id_full_rejects_locale() {
        let transport = CannedTransport::new(json!([]));
        let service = WeirdGloopService::new(transport.clone());
        let options = TmsSearchOptions {
            locale: Some(Locale::En),
            ..TmsSearchOptions::default()
        };

        let err = service
            .search_tms_by_id_full(&[42274], &options)
            .await
            .unwrap_err();

        assert!(matches!(err, RsWikiError::ConflictingArgument { .. }));
        assert!(transport.last.lock().await.is_none());
    }

    #[tokio::test]
    async fn test_page_out_of_range_is_an_api_error() {
        let transport = CannedTransport::new(json!({"success": false, "error": "Page out of range"}));
        let service = WeirdGloopService::new(transport.clone());
        let page = NonZeroU32::new(99999).unwrap();

        let history = service.get_vos_history(page).await.unwrap();
        let feed = service.get_social_feed(page).await.unwrap();

        assert_eq!(history.unwrap_err().unwrap().error, "Page out of range");
        assert_eq!(feed.unwrap_err().unwrap().error, "Page out of range");
        let request = transport.last.lock().await.clone().unwrap();
        assert_eq!(request.query_string(), "?page=99999");
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[42274, 34918]).unwrap(), "42274|34918");
        assert!(join_ids(&[]).is_err());
    }
}
