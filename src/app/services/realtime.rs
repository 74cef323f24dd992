use crate::core::decode;
use crate::core::outcome::ApiResult;
use crate::core::routes;
use crate::domain::enums::{RtGameType, RtTimeFilter, TimeSeriesFilter, TimeSeriesGameType};
use crate::domain::model::realtime::floor_to_bucket;
use crate::domain::model::{ItemMapping, RealtimePrice, TimeFilteredPrice, TimeSeriesPrice};
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use std::sync::Arc;

/// Operations against the realtime prices API.
#[derive(Clone)]
pub struct RealtimeService {
    http: Arc<dyn HttpTransport>,
}

impl RealtimeService {
    pub fn new(http: Arc<dyn HttpTransport>) -> Self {
        Self { http }
    }

    /// Latest prices for one item, or for every item when `id` is `None`.
    pub async fn get_realtime_price(
        &self,
        game: RtGameType,
        id: Option<u64>,
    ) -> Result<ApiResult<Vec<RealtimePrice>>> {
        let mut request = routes::REALTIME_PRICE.compile(&[&game])?;
        if let Some(id) = id {
            request = request.with_param("id", id);
        }
        let data = self.http.fetch(&request).await?;
        decode::decode_realtime_prices(&data, id)
    }

    pub async fn get_mapping(&self, game: RtGameType) -> Result<ApiResult<Vec<ItemMapping>>> {
        let request = routes::REALTIME_MAPPING.compile(&[&game])?;
        let data = self.http.fetch(&request).await?;
        decode::decode_item_mappings(&data)
    }

    /// Averages for one bucket. `timestamp` is epoch seconds, floored to 5 minutes.
    pub async fn get_time_filtered_price(
        &self,
        game: RtGameType,
        time_filter: RtTimeFilter,
        timestamp: Option<i64>,
    ) -> Result<ApiResult<TimeFilteredPrice>> {
        let mut request = routes::REALTIME_AVERAGE.compile(&[&game, &time_filter])?;
        if let Some(timestamp) = timestamp {
            request = request.with_param("timestamp", floor_to_bucket(timestamp));
        }
        let data = self.http.fetch(&request).await?;
        decode::decode_time_filtered(&data)
    }

    pub async fn get_time_series(
        &self,
        game: TimeSeriesGameType,
        id: u64,
        timestep: TimeSeriesFilter,
    ) -> Result<ApiResult<Vec<TimeSeriesPrice>>> {
        let request = routes::REALTIME_TIMESERIES
            .compile(&[&game])?
            .with_param("id", id)
            .with_param("timestep", timestep.as_str());
        let data = self.http.fetch(&request).await?;
        decode::decode_time_series(&data, id)
    }
}
