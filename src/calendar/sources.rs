use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::calendar::calendar_source::CalendarSource;
use crate::calendar::forex_factory::ForexFactorySource;
use crate::calendar::http::build_client;
use crate::calendar::trading_economics::TradingEconomicsSource;
use crate::config::bridge_config::BridgeConfig;

pub type DynamicCalendarSource = Arc<dyn CalendarSource>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    #[clap(name = "trading-economics")]
    TradingEconomics,
    #[clap(name = "forex-factory")]
    ForexFactory,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TradingEconomics => write!(f, "trading-economics"),
            Self::ForexFactory => write!(f, "forex-factory"),
        }
    }
}

pub fn calendar_source(kind: SourceKind, config: &BridgeConfig) -> Result<DynamicCalendarSource> {
    tracing::info!(source = %kind, "creating calendar source");

    let http = build_client(config.upstream_timeout).context("failed to build HTTP client")?;

    let source: DynamicCalendarSource = match kind {
        SourceKind::TradingEconomics => {
            if config.te_api_key.is_none() {
                tracing::warn!("TE_API_KEY not set; status requests will fail until it is configured");
            }

            Arc::new(TradingEconomicsSource::new(
                http,
                TradingEconomicsSource::DEFAULT_URL,
                config.te_api_key.clone(),
            ))
        }
        SourceKind::ForexFactory => {
            Arc::new(ForexFactorySource::new(http, config.feed_url.as_str()))
        }
    };

    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_each_kind() {
        let config = BridgeConfig::from_lookup(|_| None).unwrap();

        let source = calendar_source(SourceKind::TradingEconomics, &config).unwrap();
        assert_eq!(source.name(), "trading-economics");

        let source = calendar_source(SourceKind::ForexFactory, &config).unwrap();
        assert_eq!(source.name(), "forex-factory");
    }

    #[test]
    fn display_matches_cli_names() {
        for kind in SourceKind::value_variants() {
            let name = kind.to_possible_value().unwrap();
            assert_eq!(name.get_name(), kind.to_string());
        }
    }
}
