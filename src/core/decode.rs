//! Response decoders for the endpoints that can answer with an error payload.
//!
//! Each decoder inspects the raw JSON for an error marker first and returns it
//! as [`ApiResult::Err`]. Otherwise it decodes the success shape in full. A
//! success shape that does not match fails the call with a decode error, so
//! callers never see a partially filled model.

use crate::core::outcome::ApiResult;
use crate::domain::model::shared::{decode_id_keyed, expect_array, expect_object};
use crate::domain::model::{
    CompressedExchangePrice, ErrorResponse, ExchangePrice, ItemMapping, PaginatedSocialFeed,
    RealtimePrice, TimeFilteredPrice, TimeSeriesPrice, TmsItem, TmsSearch, TmsSearchFull,
    VosHistory,
};
use crate::utils::error::Result;
use serde_json::Value;

macro_rules! bail_on_error {
    ($data:expr) => {
        if let Some(error) = ErrorResponse::detect($data) {
            tracing::debug!(error = %error, "upstream returned an error payload");
            return Ok(ApiResult::Err(error));
        }
    };
}

/// Returns the value under `key`, or the whole payload as an error when the key is absent.
fn required_key<'a>(data: &'a Value, key: &str) -> std::result::Result<&'a Value, ErrorResponse> {
    data.get(key).ok_or_else(|| {
        ErrorResponse::from_message(format!("response is missing the '{}' field", key))
    })
}

/// A page past the end comes back as an error payload rather than an empty page.
pub fn decode_vos_history(data: &Value) -> Result<ApiResult<VosHistory>> {
    bail_on_error!(data);
    Ok(ApiResult::Ok(VosHistory::from_raw(data)?))
}

pub fn decode_social_feed(data: &Value) -> Result<ApiResult<PaginatedSocialFeed>> {
    bail_on_error!(data);
    Ok(ApiResult::Ok(PaginatedSocialFeed::from_raw(data)?))
}

/// `{"<id or name>": {price record}, ...}` as returned by the latest price endpoint.
pub fn decode_latest_prices(data: &Value) -> Result<ApiResult<Vec<ExchangePrice>>> {
    bail_on_error!(data);

    let prices = expect_object(data, "latest prices")?
        .iter()
        .map(|(identifier, record)| ExchangePrice::from_entry(identifier, record))
        .collect::<Result<_>>()?;
    Ok(ApiResult::Ok(prices))
}

/// `{"<id or name>": [{price record}, ...]}` as returned by the history endpoint.
pub fn decode_historical_prices(data: &Value) -> Result<ApiResult<Vec<ExchangePrice>>> {
    bail_on_error!(data);

    let mut prices = Vec::new();
    for (identifier, records) in expect_object(data, "historical prices")? {
        for record in expect_array(records, "price history")? {
            prices.push(ExchangePrice::from_entry(identifier, record)?);
        }
    }
    Ok(ApiResult::Ok(prices))
}

/// `{"<id or name>": [[epoch_millis, price], ...]}` as returned with `compress=true`.
pub fn decode_compressed_history(data: &Value) -> Result<ApiResult<Vec<CompressedExchangePrice>>> {
    bail_on_error!(data);

    let mut prices = Vec::new();
    for (identifier, pairs) in expect_object(data, "compressed history")? {
        for pair in expect_array(pairs, "compressed price history")? {
            prices.push(CompressedExchangePrice::from_pair(identifier, pair)?);
        }
    }
    Ok(ApiResult::Ok(prices))
}

pub fn decode_tms_items(data: &Value) -> Result<Vec<TmsItem>> {
    expect_array(data, "tms items")?
        .iter()
        .map(TmsItem::from_raw)
        .collect()
}

pub fn decode_tms_search(data: &Value) -> Result<ApiResult<Vec<TmsSearch>>> {
    bail_on_error!(data);

    let days = expect_array(data, "tms search")?
        .iter()
        .map(TmsSearch::from_raw)
        .collect::<Result<_>>()?;
    Ok(ApiResult::Ok(days))
}

pub fn decode_tms_search_full(data: &Value) -> Result<ApiResult<Vec<TmsSearchFull>>> {
    bail_on_error!(data);

    let days = expect_array(data, "tms search")?
        .iter()
        .map(TmsSearchFull::from_raw)
        .collect::<Result<_>>()?;
    Ok(ApiResult::Ok(days))
}

/// `{"data": {"<id>": {...}}}`. An empty map means nothing matched the requested id.
pub fn decode_realtime_prices(
    data: &Value,
    requested_id: Option<u64>,
) -> Result<ApiResult<Vec<RealtimePrice>>> {
    bail_on_error!(data);

    let items = match required_key(data, "data") {
        Ok(items) => items,
        Err(error) => return Ok(ApiResult::Err(error)),
    };

    if expect_object(items, "realtime prices")?.is_empty() {
        let message = match requested_id {
            Some(id) => format!("No items found for id: {}", id),
            None => "No items found".to_string(),
        };
        return Ok(ApiResult::Err(ErrorResponse::from_message(message)));
    }

    Ok(ApiResult::Ok(decode_id_keyed(items, RealtimePrice::from_entry)?))
}

pub fn decode_item_mappings(data: &Value) -> Result<ApiResult<Vec<ItemMapping>>> {
    bail_on_error!(data);

    let mappings = expect_array(data, "item mapping")?
        .iter()
        .map(ItemMapping::from_raw)
        .collect::<Result<_>>()?;
    Ok(ApiResult::Ok(mappings))
}

pub fn decode_time_filtered(data: &Value) -> Result<ApiResult<TimeFilteredPrice>> {
    bail_on_error!(data);

    if let Err(error) = required_key(data, "data") {
        return Ok(ApiResult::Err(error));
    }
    Ok(ApiResult::Ok(TimeFilteredPrice::from_raw(data)?))
}

/// `{"data": [{...}], "itemId": 4151}`; the id is stamped onto every point.
pub fn decode_time_series(
    data: &Value,
    requested_id: u64,
) -> Result<ApiResult<Vec<TimeSeriesPrice>>> {
    bail_on_error!(data);

    let points = match required_key(data, "data") {
        Ok(points) => points,
        Err(error) => return Ok(ApiResult::Err(error)),
    };
    let id = data
        .get("itemId")
        .and_then(Value::as_u64)
        .unwrap_or(requested_id);

    let series = expect_array(points, "time series")?
        .iter()
        .map(|point| TimeSeriesPrice::from_entry(id, point))
        .collect::<Result<_>>()?;
    Ok(ApiResult::Ok(series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::{from_epoch, EpochUnit};
    use crate::utils::error::RsWikiError;
    use serde_json::json;

    #[test]
    fn test_error_payload_is_returned_as_data() {
        let raw = json!({"error": "no items found"});

        let latest = decode_latest_prices(&raw).unwrap();
        assert!(!latest.is_ok());
        assert_eq!(latest.unwrap_err().unwrap().error, "no items found");

        assert!(decode_historical_prices(&raw).unwrap().is_err());
        assert!(decode_compressed_history(&raw).unwrap().is_err());
        assert!(decode_realtime_prices(&raw, Some(1)).unwrap().is_err());
        assert!(decode_time_filtered(&raw).unwrap().is_err());
        assert!(decode_time_series(&raw, 1).unwrap().is_err());
    }

    #[test]
    fn test_page_out_of_range_is_returned_as_data() {
        let raw = json!({"success": false, "error": "Page out of range"});

        let history = decode_vos_history(&raw).unwrap();
        assert_eq!(history.unwrap_err().unwrap().error, "Page out of range");
        let feed = decode_social_feed(&raw).unwrap();
        assert_eq!(feed.unwrap_err().unwrap().success, Some(false));
    }

    #[test]
    fn test_vos_history_page_decodes() {
        let raw = json!({
            "pagination": {"has_more": false, "total_pages": 1, "total_items": 1},
            "data": [{"timestamp": "2023-07-22T03:00:00.000Z", "district1": "Crwys", "district2": "Amlodd"}]
        });
        let history = decode_vos_history(&raw).unwrap().unwrap().unwrap();
        assert_eq!(history.data.len(), 1);
        assert!(!history.pagination.has_more);
    }

    #[test]
    fn test_tms_search_error_with_success_marker() {
        let raw = json!({"success": false, "error": "Item not found"});
        let error = decode_tms_search(&raw).unwrap().unwrap_err().unwrap();
        assert_eq!(error.success, Some(false));
        assert_eq!(error.error, "Item not found");
    }

    #[test]
    fn test_id_keyed_latest_price() {
        let raw = json!({"4151": {"price": 1200, "timestamp": 1690000000, "volume": 10}});
        let prices = decode_latest_prices(&raw).unwrap().unwrap().unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].id, 4151);
        assert_eq!(prices[0].price, 1200);
        assert_eq!(prices[0].volume, Some(10));
    }

    #[test]
    fn test_compressed_pair() {
        let raw = json!({"4151": [1690000000000i64, 1200]});
        let price = CompressedExchangePrice::from_raw(&raw).unwrap();
        assert_eq!(price.identifier, "4151");
        assert_eq!(
            price.timestamp,
            from_epoch(1690000000000, EpochUnit::Millis).unwrap()
        );
        assert_eq!(price.price, 1200);
    }

    #[test]
    fn test_compressed_history_flattens_points() {
        let raw = json!({"4151": [[1690000000000i64, 1200], [1690086400000i64, 1250]]});
        let prices = decode_compressed_history(&raw).unwrap().unwrap().unwrap();
        assert_eq!(prices.len(), 2);
        assert!(prices.iter().all(|p| p.identifier == "4151"));
        assert_eq!(prices[1].price, 1250);
    }

    #[test]
    fn test_historical_prices_keep_identifier() {
        let raw = json!({"Abyssal whip": [
            {"id": "4151", "price": 1200, "volume": null, "timestamp": 1690000000000i64},
            {"id": "4151", "price": 1210, "volume": 5, "timestamp": 1690086400000i64}
        ]});
        let prices = decode_historical_prices(&raw).unwrap().unwrap().unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices[0].identifier, "Abyssal whip");
        assert_eq!(prices[0].id, 4151);
    }

    #[test]
    fn test_realtime_empty_data_is_api_error() {
        let raw = json!({"data": {}});
        let error = decode_realtime_prices(&raw, Some(99999))
            .unwrap()
            .unwrap_err()
            .unwrap();
        assert_eq!(error.error, "No items found for id: 99999");
    }

    #[test]
    fn test_realtime_missing_data_key_is_api_error() {
        let raw = json!({"unexpected": true});
        assert!(decode_realtime_prices(&raw, None).unwrap().is_err());
    }

    #[test]
    fn test_realtime_prices_stamp_ids() {
        let raw = json!({"data": {
            "2": {"high": 170, "highTime": 1690000000, "low": 165, "lowTime": 1690000060},
            "4151": {"high": 1500000, "highTime": 1690000000, "low": 1490000, "lowTime": 1690000030}
        }});
        let prices = decode_realtime_prices(&raw, None).unwrap().unwrap().unwrap();
        let ids: Vec<u64> = prices.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4151]);
    }

    #[test]
    fn test_time_series_uses_item_id() {
        let raw = json!({
            "data": [{"timestamp": 1690000200, "avgHighPrice": 1500000, "avgLowPrice": 1490000,
                      "highPriceVolume": 4, "lowPriceVolume": 9}],
            "itemId": 4151
        });
        let series = decode_time_series(&raw, 1).unwrap().unwrap().unwrap();
        assert_eq!(series[0].id, 4151);
        assert_eq!(series[0].low_price_volume, 9);
    }

    #[test]
    fn test_malformed_success_shape_is_fatal() {
        let raw = json!({"4151": {"price": "not a number", "timestamp": 1690000000}});
        let result = decode_latest_prices(&raw);
        assert!(matches!(result, Err(RsWikiError::Serialization(_))));
    }

    #[test]
    fn test_tms_items() {
        let raw = json!([{"id": "42274", "en": "Slayer VIP Coupon", "pt": "Cupom VIP"}]);
        let items = decode_tms_items(&raw).unwrap();
        assert_eq!(items[0].id, 42274);
    }
}
