use anyhow::Context;
use clap::Parser;
use rswiki_client::config::cli::{history_lookup, search_options, CliConfig, Command};
use rswiki_client::utils::logger;
use rswiki_client::{ApiResult, Client, ErrorCategory, RsWikiError};
use serde::Serialize;
use serde_json::Value;

const EXIT_API_ERROR: i32 = 1;
const EXIT_ARGUMENT: i32 = 2;
const EXIT_TRANSPORT: i32 = 3;
const EXIT_OTHER: i32 = 4;

enum Output {
    Success(Value),
    ApiError(Value),
}

fn plain<T: Serialize>(value: T) -> anyhow::Result<Output> {
    Ok(Output::Success(serde_json::to_value(value)?))
}

fn api<T: Serialize>(result: ApiResult<T>) -> anyhow::Result<Output> {
    Ok(match result {
        ApiResult::Ok(value) => Output::Success(serde_json::to_value(value)?),
        ApiResult::Err(error) => Output::ApiError(serde_json::to_value(error)?),
    })
}

async fn run(client: &Client, command: Command) -> anyhow::Result<Output> {
    match command {
        Command::Vos => plain(client.get_vos().await?),
        Command::VosHistory { page } => api(client.get_vos_history(page).await?),
        Command::ExchangeUpdate => plain(client.get_latest_exchange_update().await?),
        Command::Social { page } => api(client.get_social_feed(page).await?),
        Command::LatestSocial => plain(client.get_latest_social_feed().await?),
        Command::Price {
            game,
            locale,
            items,
        } => api(
            client
                .get_latest_exchange_price(game, &items, locale)
                .await?,
        ),
        Command::History {
            game,
            filter,
            id,
            name,
            locale,
            compress,
        } => {
            let lookup = history_lookup(id, name, locale);
            if compress {
                api(client
                    .get_compressed_historical_exchange_price(game, filter, &lookup)
                    .await?)
            } else {
                api(client
                    .get_historical_exchange_price(game, filter, &lookup)
                    .await?)
            }
        }
        Command::Tms { next } => {
            if next {
                plain(client.get_next_tms().await?)
            } else {
                plain(client.get_current_tms().await?)
            }
        }
        Command::TmsSearch {
            names,
            ids,
            full,
            locale,
            start,
            end,
            count,
        } => {
            let options = search_options(locale, start, end, count);
            if !names.is_empty() {
                let names: Vec<&str> = names.iter().map(String::as_str).collect();
                api(client.search_tms_by_name(&names, &options).await?)
            } else if full {
                api(client.search_tms_by_id_full(&ids, &options).await?)
            } else {
                api(client.search_tms_by_id(&ids, &options).await?)
            }
        }
        Command::Realtime { game, id } => api(client.get_realtime_price(game, id).await?),
        Command::Mapping { game } => api(client.get_realtime_mapping(game).await?),
        Command::Average {
            game,
            filter,
            timestamp,
        } => api(
            client
                .get_time_filtered_price(game, filter, timestamp)
                .await?,
        ),
        Command::TimeSeries { game, timestep, id } => {
            api(client.get_time_series(game, id, timestep).await?)
        }
        Command::Browse { game, subject } => plain(client.browse_wiki(&subject, game).await?),
    }
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<RsWikiError>().map(RsWikiError::category) {
        Some(ErrorCategory::Argument) | Some(ErrorCategory::Configuration) => EXIT_ARGUMENT,
        Some(ErrorCategory::Transport) => EXIT_TRANSPORT,
        _ => EXIT_OTHER,
    }
}

/// Loads the configuration, builds the client and runs one command.
/// `Client::new` validates the configuration.
async fn execute(cli: CliConfig) -> anyhow::Result<Output> {
    let config = cli
        .client_config()
        .context("failed to load client configuration")?;
    let client = Client::new(config)?;
    let outcome = run(&client, cli.command).await;
    client.close().await?;
    outcome
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = execute(cli).await;

    match outcome {
        Ok(Output::Success(value)) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Ok(Output::ApiError(value)) => {
            tracing::warn!("API returned an error payload");
            eprintln!("{}", serde_json::to_string_pretty(&value)?);
            std::process::exit(EXIT_API_ERROR);
        }
        Err(e) => {
            tracing::error!("Request failed: {:#}", e);
            eprintln!("{:#}", e);
            std::process::exit(exit_code_for(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rswiki_client::ClientConfig;

    #[test]
    fn test_invalid_config_maps_to_argument_exit() {
        let config = ClientConfig {
            timeout_seconds: 0,
            ..ClientConfig::new("rswiki-tests", "tests@example.org")
        };
        let error = anyhow::Error::from(Client::new(config).err().unwrap());
        assert_eq!(exit_code_for(&error), EXIT_ARGUMENT);
    }

    #[test]
    fn test_wrapped_config_error_keeps_its_exit_code() {
        let error = anyhow::Error::from(RsWikiError::Config {
            message: "bad file".to_string(),
        })
        .context("failed to load client configuration");
        assert_eq!(exit_code_for(&error), EXIT_ARGUMENT);
        assert_eq!(
            exit_code_for(&anyhow::Error::from(RsWikiError::TransportClosed)),
            EXIT_TRANSPORT
        );
    }
}
