use super::shared::{expect_array, expect_object, field, id_from_value, PaginationMeta};
use crate::core::time::{optional_timestamp, parse_localized_date, timestamp_from_value, EpochUnit};
use crate::domain::enums::VosDistrict;
use crate::utils::error::{Result, RsWikiError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The two active Voice of Seren districts and when they became active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vos {
    pub timestamp: NaiveDateTime,
    pub district1: VosDistrict,
    pub district2: VosDistrict,
}

#[derive(Deserialize)]
struct RawVos {
    timestamp: Value,
    district1: String,
    district2: String,
}

impl Vos {
    pub fn from_raw(data: &Value) -> Result<Self> {
        let raw = RawVos::deserialize(data)?;
        Ok(Self {
            timestamp: timestamp_from_value(&raw.timestamp, EpochUnit::Millis)?,
            district1: raw.district1.parse()?,
            district2: raw.district2.parse()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VosHistory {
    pub pagination: PaginationMeta,
    pub data: Vec<Vos>,
}

impl VosHistory {
    pub fn from_raw(data: &Value) -> Result<Self> {
        Ok(Self {
            pagination: PaginationMeta::from_raw(field(data, "pagination")?)?,
            data: expect_array(field(data, "data")?, "vos history data")?
                .iter()
                .map(Vos::from_raw)
                .collect::<Result<_>>()?,
        })
    }
}

/// Latest grand exchange update per game type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestExchangeUpdate {
    pub rs: NaiveDateTime,
    pub osrs: NaiveDateTime,
    pub rs_fsw_2022: NaiveDateTime,
    pub osrs_fsw_2022: NaiveDateTime,
}

impl LatestExchangeUpdate {
    pub fn from_raw(data: &Value) -> Result<Self> {
        let read = |key: &str| timestamp_from_value(field(data, key)?, EpochUnit::Millis);
        Ok(Self {
            rs: read("rs")?,
            osrs: read("osrs")?,
            rs_fsw_2022: read("rs-fsw-2022")?,
            osrs_fsw_2022: read("osrs-fsw-2022")?,
        })
    }
}

/// A RuneScape related social media post or news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialFeedItem {
    pub id: u64,
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub author: Option<String>,
    pub curator: String,
    pub source: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub expiry_date: Option<NaiveDateTime>,
    pub date_published: Option<NaiveDateTime>,
    pub date_added: NaiveDateTime,
}

// Known keys only; anything else the feed adds is ignored.
#[derive(Deserialize)]
struct RawSocialFeedItem {
    id: Value,
    url: String,
    title: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    curator: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(rename = "expiryDate", default)]
    expiry_date: Option<Value>,
    #[serde(rename = "datePublished", default)]
    date_published: Option<Value>,
    #[serde(rename = "dateAdded")]
    date_added: Value,
}

impl SocialFeedItem {
    pub fn from_raw(data: &Value) -> Result<Self> {
        let raw = RawSocialFeedItem::deserialize(data)?;
        Ok(Self {
            id: id_from_value(&raw.id)?,
            url: raw.url,
            title: raw.title,
            excerpt: raw.excerpt.unwrap_or_default(),
            author: raw.author,
            curator: raw.curator.unwrap_or_default(),
            source: raw.source,
            image: raw.image,
            icon: raw.icon,
            expiry_date: optional_timestamp(raw.expiry_date.as_ref(), EpochUnit::Millis)?,
            date_published: optional_timestamp(raw.date_published.as_ref(), EpochUnit::Millis)?,
            date_added: timestamp_from_value(&raw.date_added, EpochUnit::Millis)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginatedSocialFeed {
    pub pagination: PaginationMeta,
    pub data: Vec<SocialFeedItem>,
}

impl PaginatedSocialFeed {
    pub fn from_raw(data: &Value) -> Result<Self> {
        Ok(Self {
            pagination: PaginationMeta::from_raw(field(data, "pagination")?)?,
            data: expect_array(field(data, "data")?, "social feed data")?
                .iter()
                .map(SocialFeedItem::from_raw)
                .collect::<Result<_>>()?,
        })
    }
}

/// Grand exchange price point for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangePrice {
    pub id: u64,
    /// The map key the price was returned under: the id or the searched name.
    pub identifier: String,
    pub price: i64,
    pub volume: Option<i64>,
    pub timestamp: NaiveDateTime,
}

#[derive(Deserialize)]
struct RawExchangePrice {
    #[serde(default)]
    id: Option<Value>,
    price: i64,
    #[serde(default)]
    volume: Option<i64>,
    timestamp: Value,
}

impl ExchangePrice {
    /// Decodes one record of an identifier-keyed map. A numeric key is the
    /// item id; a name key falls back to the record's own `id` field.
    pub fn from_entry(identifier: &str, data: &Value) -> Result<Self> {
        let raw = RawExchangePrice::deserialize(data)?;
        let id = match identifier.parse::<u64>() {
            Ok(id) => id,
            Err(_) => match raw.id.as_ref() {
                Some(value) => id_from_value(value)?,
                None => {
                    return Err(RsWikiError::decode(format!(
                        "price for '{}' carries no item id",
                        identifier
                    )))
                }
            },
        };

        Ok(Self {
            id,
            identifier: identifier.to_string(),
            price: raw.price,
            volume: raw.volume,
            timestamp: timestamp_from_value(&raw.timestamp, EpochUnit::Millis)?,
        })
    }
}

/// A price point sent as `{identifier: [epoch_millis, price]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompressedExchangePrice {
    pub identifier: String,
    pub timestamp: NaiveDateTime,
    pub price: i64,
}

impl CompressedExchangePrice {
    /// Expects a single key. If several are present the last one in map
    /// order wins.
    pub fn from_raw(data: &Value) -> Result<Self> {
        let mut decoded = None;
        for (identifier, pair) in expect_object(data, "compressed price")? {
            decoded = Some(Self::from_pair(identifier, pair)?);
        }
        decoded.ok_or_else(|| RsWikiError::decode("compressed price object is empty"))
    }

    pub fn from_pair(identifier: &str, pair: &Value) -> Result<Self> {
        match expect_array(pair, "compressed price pair")?.as_slice() {
            [timestamp, price] => Ok(Self {
                identifier: identifier.to_string(),
                timestamp: timestamp_from_value(timestamp, EpochUnit::Millis)?,
                price: price.as_i64().ok_or_else(|| {
                    RsWikiError::decode(format!("compressed price {} is not an integer", price))
                })?,
            }),
            other => Err(RsWikiError::decode(format!(
                "compressed price pair must have 2 elements, found {}",
                other.len()
            ))),
        }
    }
}

/// A Travelling Merchant Shop item with English and Portuguese names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TmsItem {
    pub id: u64,
    pub en: String,
    pub pt: String,
}

#[derive(Deserialize)]
struct RawTmsItem {
    id: Value,
    en: String,
    pt: String,
}

impl TmsItem {
    pub fn from_raw(data: &Value) -> Result<Self> {
        let raw = RawTmsItem::deserialize(data)?;
        Ok(Self {
            id: id_from_value(&raw.id)?,
            en: raw.en,
            pt: raw.pt,
        })
    }
}

/// A day on which the searched items were stocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TmsSearch {
    pub date: NaiveDate,
    /// Item names, or ids rendered as strings when searching by id.
    pub items: Vec<String>,
}

impl TmsSearch {
    pub fn from_raw(data: &Value) -> Result<Self> {
        let items = expect_array(field(data, "items")?, "tms items")?
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(RsWikiError::decode(format!(
                    "unexpected tms item {}",
                    other
                ))),
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            date: tms_date(data)?,
            items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TmsSearchFull {
    pub date: NaiveDate,
    pub items: Vec<TmsItem>,
}

impl TmsSearchFull {
    pub fn from_raw(data: &Value) -> Result<Self> {
        Ok(Self {
            date: tms_date(data)?,
            items: expect_array(field(data, "items")?, "tms items")?
                .iter()
                .map(TmsItem::from_raw)
                .collect::<Result<_>>()?,
        })
    }
}

fn tms_date(data: &Value) -> Result<NaiveDate> {
    let raw = field(data, "date")?
        .as_str()
        .ok_or_else(|| RsWikiError::decode("tms date must be a string"))?;
    parse_localized_date(raw)
}
