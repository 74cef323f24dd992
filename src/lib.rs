pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::HttpService;
pub use app::client::Client;
pub use app::query::{ItemLookup, ItemQuery, TmsSearchOptions};
pub use config::{ClientConfig, HostConfig};
pub use crate::core::{ApiResult, CompiledRequest, HttpTransport, Route};
pub use domain::enums::{
    Host, Locale, MwGameType, RtGameType, RtTimeFilter, TimeSeriesFilter, TimeSeriesGameType,
    VosDistrict, WgGameType, WgTimeFilter,
};
pub use domain::model::ErrorResponse;
pub use utils::error::{ErrorCategory, Result, RsWikiError};
