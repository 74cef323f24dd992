use super::shared::{decode_id_keyed, field};
use crate::core::time::{optional_timestamp, timestamp_from_value, EpochUnit};
use crate::utils::error::Result;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Latest instant-buy and instant-sell prices for an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealtimePrice {
    pub id: u64,
    pub high: Option<i64>,
    pub high_time: Option<NaiveDateTime>,
    pub low: Option<i64>,
    pub low_time: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
struct RawRealtimePrice {
    #[serde(default)]
    high: Option<i64>,
    #[serde(rename = "highTime", default)]
    high_time: Option<Value>,
    #[serde(default)]
    low: Option<i64>,
    #[serde(rename = "lowTime", default)]
    low_time: Option<Value>,
}

impl RealtimePrice {
    pub fn from_entry(id: u64, data: &Value) -> Result<Self> {
        let raw = RawRealtimePrice::deserialize(data)?;
        Ok(Self {
            id,
            high: raw.high,
            high_time: optional_timestamp(raw.high_time.as_ref(), EpochUnit::Seconds)?,
            low: raw.low,
            low_time: optional_timestamp(raw.low_time.as_ref(), EpochUnit::Seconds)?,
        })
    }
}

/// Static item metadata from the realtime mapping endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMapping {
    pub id: u64,
    pub name: String,
    pub examine: String,
    pub members: bool,
    pub low_alch: Option<i64>,
    pub high_alch: Option<i64>,
    /// Grand exchange buy limit.
    pub limit: Option<i64>,
    pub value: Option<i64>,
    pub icon: String,
}

#[derive(Deserialize)]
struct RawItemMapping {
    id: u64,
    name: String,
    #[serde(default)]
    examine: String,
    #[serde(default)]
    members: bool,
    #[serde(rename = "lowalch", default)]
    low_alch: Option<i64>,
    #[serde(rename = "highalch", default)]
    high_alch: Option<i64>,
    #[serde(default)]
    limit: Option<i64>,
    #[serde(default)]
    value: Option<i64>,
    #[serde(default)]
    icon: String,
}

impl ItemMapping {
    pub fn from_raw(data: &Value) -> Result<Self> {
        let raw = RawItemMapping::deserialize(data)?;
        Ok(Self {
            id: raw.id,
            name: raw.name,
            examine: raw.examine,
            members: raw.members,
            low_alch: raw.low_alch,
            high_alch: raw.high_alch,
            limit: raw.limit,
            value: raw.value,
            icon: raw.icon,
        })
    }
}

#[derive(Deserialize)]
struct RawAverage {
    #[serde(rename = "avgHighPrice", default)]
    avg_high_price: Option<i64>,
    #[serde(rename = "highPriceVolume", default)]
    high_price_volume: i64,
    #[serde(rename = "avgLowPrice", default)]
    avg_low_price: Option<i64>,
    #[serde(rename = "lowPriceVolume", default)]
    low_price_volume: i64,
}

/// Average prices and traded volume over one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AveragePrice {
    pub id: u64,
    pub avg_high_price: Option<i64>,
    pub avg_low_price: Option<i64>,
    pub high_price_volume: i64,
    pub low_price_volume: i64,
}

impl AveragePrice {
    pub fn from_entry(id: u64, data: &Value) -> Result<Self> {
        let raw = RawAverage::deserialize(data)?;
        Ok(Self {
            id,
            avg_high_price: raw.avg_high_price,
            avg_low_price: raw.avg_low_price,
            high_price_volume: raw.high_price_volume,
            low_price_volume: raw.low_price_volume,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeFilteredPrice {
    /// Start of the averaged bucket.
    pub timestamp: NaiveDateTime,
    pub data: Vec<AveragePrice>,
}

impl TimeFilteredPrice {
    pub fn from_raw(data: &Value) -> Result<Self> {
        Ok(Self {
            timestamp: timestamp_from_value(field(data, "timestamp")?, EpochUnit::Seconds)?,
            data: decode_id_keyed(field(data, "data")?, AveragePrice::from_entry)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesPrice {
    pub id: u64,
    pub timestamp: NaiveDateTime,
    pub avg_high_price: Option<i64>,
    pub avg_low_price: Option<i64>,
    pub high_price_volume: i64,
    pub low_price_volume: i64,
}

impl TimeSeriesPrice {
    pub fn from_entry(id: u64, data: &Value) -> Result<Self> {
        let average = AveragePrice::from_entry(id, data)?;
        Ok(Self {
            id,
            timestamp: timestamp_from_value(field(data, "timestamp")?, EpochUnit::Seconds)?,
            avg_high_price: average.avg_high_price,
            avg_low_price: average.avg_low_price,
            high_price_volume: average.high_price_volume,
            low_price_volume: average.low_price_volume,
        })
    }
}

/// Rounds an epoch-seconds timestamp down to its 5 minute bucket.
pub fn floor_to_bucket(epoch_seconds: i64) -> i64 {
    epoch_seconds - epoch_seconds.rem_euclid(300)
}
