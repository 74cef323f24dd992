use crate::app::query::{ItemLookup, ItemQuery, TmsSearchOptions};
use crate::config::client_config::ClientConfig;
use crate::domain::enums::{
    Locale, MwGameType, RtGameType, RtTimeFilter, TimeSeriesFilter, TimeSeriesGameType,
    WgGameType, WgTimeFilter,
};
use crate::utils::error::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Parser)]
#[command(name = "rswiki")]
#[command(about = "Query the RuneScape wiki price, news and rotation APIs")]
pub struct CliConfig {
    #[arg(long, help = "TOML client configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Project name sent in the User-Agent")]
    pub project_name: Option<String>,

    #[arg(long, help = "Contact info sent in the User-Agent")]
    pub contact_info: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Current Voice of Seren districts
    Vos,
    /// Voice of Seren history
    VosHistory {
        #[arg(long, default_value = "1")]
        page: NonZeroU32,
    },
    /// Latest grand exchange update times
    ExchangeUpdate,
    /// Social feed page
    Social {
        #[arg(long, default_value = "1")]
        page: NonZeroU32,
    },
    /// Latest social feed item
    LatestSocial,
    /// Latest exchange price by id or name
    Price {
        #[arg(long, default_value = "rs")]
        game: WgGameType,
        #[arg(long)]
        locale: Option<Locale>,
        /// Item ids (all digits) or names
        #[arg(required = true, value_parser = ItemQuery::from_str)]
        items: Vec<ItemQuery>,
    },
    /// Historical exchange price for one item
    History {
        #[arg(long, default_value = "rs")]
        game: WgGameType,
        #[arg(long, default_value = "last90d")]
        filter: WgTimeFilter,
        #[arg(long)]
        id: Option<u64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        locale: Option<Locale>,
        #[arg(long)]
        compress: bool,
    },
    /// Travelling Merchant stock for today, or tomorrow with --next
    Tms {
        #[arg(long)]
        next: bool,
    },
    /// Search Travelling Merchant history by name or id
    TmsSearch {
        #[arg(long = "name")]
        names: Vec<String>,
        #[arg(long = "id")]
        ids: Vec<u64>,
        #[arg(long)]
        full: bool,
        #[arg(long)]
        locale: Option<Locale>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long)]
        count: Option<u32>,
    },
    /// Realtime latest prices
    Realtime {
        #[arg(long, default_value = "osrs")]
        game: RtGameType,
        #[arg(long)]
        id: Option<u64>,
    },
    /// Realtime item mapping
    Mapping {
        #[arg(long, default_value = "osrs")]
        game: RtGameType,
    },
    /// Realtime averages for a 5m or 1h bucket
    Average {
        #[arg(long, default_value = "osrs")]
        game: RtGameType,
        #[arg(long, default_value = "5m")]
        filter: RtTimeFilter,
        #[arg(long)]
        timestamp: Option<i64>,
    },
    /// Realtime time series for one item
    TimeSeries {
        #[arg(long, default_value = "osrs")]
        game: TimeSeriesGameType,
        #[arg(long, default_value = "5m")]
        timestep: TimeSeriesFilter,
        id: u64,
    },
    /// Semantic MediaWiki browse of a wiki page
    Browse {
        #[arg(long, default_value = "rs")]
        game: MwGameType,
        subject: String,
    },
}

impl CliConfig {
    /// File configuration (or the environment), with flags taking precedence.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::from_env()?,
        };
        if let Some(name) = &self.project_name {
            config.project_name = Some(name.clone());
        }
        if let Some(contact) = &self.contact_info {
            config.contact_info = Some(contact.clone());
        }
        Ok(config)
    }
}

pub fn history_lookup(id: Option<u64>, name: Option<String>, locale: Option<Locale>) -> ItemLookup {
    ItemLookup { id, name, locale }
}

pub fn search_options(
    locale: Option<Locale>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    count: Option<u32>,
) -> TmsSearchOptions {
    TmsSearchOptions {
        locale,
        start_at: start,
        end_at: end,
        count,
    }
}
