// Typed response models. Each is built only through its `from_raw`/`from_entry`
// constructor, which owns the normalization of its own fields.

pub mod realtime;
pub mod shared;
pub mod weird_gloop;

pub use realtime::{AveragePrice, ItemMapping, RealtimePrice, TimeFilteredPrice, TimeSeriesPrice};
pub use shared::{ErrorResponse, PaginationMeta};
pub use weird_gloop::{
    CompressedExchangePrice, ExchangePrice, LatestExchangeUpdate, PaginatedSocialFeed,
    SocialFeedItem, TmsItem, TmsSearch, TmsSearchFull, Vos, VosHistory,
};
