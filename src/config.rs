use crate::auction::{Amount, ItemTemplate};
use anyhow::{bail, format_err, Context, Result};
use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};
use tracing::info;

const DEFAULT_ITEMS: &str = "MacBook Pro=50000;iPhone 15=30000";

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// How long each item stays open after a reset
    pub round_duration: Duration,
    /// How often all items are reset
    pub reset_interval: Duration,
    /// Step suggested to viewers for quick bids
    pub bid_increment: Amount,
    pub items: Vec<ItemTemplate>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let round_secs: u64 = try_load("BIDHOUSE_ROUND_SECS", "300")?;
        let reset_secs: u64 = try_load("BIDHOUSE_RESET_INTERVAL_SECS", &round_secs.to_string())?;
        if reset_secs == 0 {
            bail!("BIDHOUSE_RESET_INTERVAL_SECS must be positive");
        }

        Ok(Self {
            listen_addr: try_load("BIDHOUSE_LISTEN_ADDR", "0.0.0.0:5000")?,
            round_duration: Duration::from_secs(round_secs),
            reset_interval: Duration::from_secs(reset_secs),
            bid_increment: try_load("BIDHOUSE_BID_INCREMENT", "1000")?,
            items: parse_items(&try_load::<String>("BIDHOUSE_ITEMS", DEFAULT_ITEMS)?)?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    });
    raw.parse()
        .map_err(|e| format_err!("invalid {key} value {raw:?}: {e}"))
}

/// Parse `Title=opening;Title=opening`, numbering items from "1"
pub fn parse_items(spec: &str) -> Result<Vec<ItemTemplate>> {
    let items = spec
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(i, entry)| -> Result<ItemTemplate> {
            let (title, opening) = entry
                .rsplit_once('=')
                .ok_or_else(|| format_err!("item {entry:?} is not `title=opening_bid`"))?;
            let title = title.trim();
            if title.is_empty() {
                bail!("item {entry:?} has an empty title");
            }
            Ok(ItemTemplate {
                id: (i + 1).to_string(),
                title: title.to_owned(),
                opening_bid: opening
                    .trim()
                    .parse()
                    .with_context(|| format!("bad opening bid for {title:?}"))?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if items.is_empty() {
        bail!("no auction items configured");
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_matches_the_two_stock_items() -> Result<()> {
        let items = parse_items(DEFAULT_ITEMS)?;
        assert_eq!(
            items,
            vec![
                ItemTemplate {
                    id: "1".to_owned(),
                    title: "MacBook Pro".to_owned(),
                    opening_bid: 50000,
                },
                ItemTemplate {
                    id: "2".to_owned(),
                    title: "iPhone 15".to_owned(),
                    opening_bid: 30000,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn titles_may_contain_equal_signs() -> Result<()> {
        let items = parse_items(" a=b = 10 ; ")?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "a=b");
        assert_eq!(items[0].opening_bid, 10);
        Ok(())
    }

    #[test]
    fn rejects_malformed_catalogs() {
        assert!(parse_items("").is_err());
        assert!(parse_items("no opening bid").is_err());
        assert!(parse_items("=100").is_err());
        assert!(parse_items("Lamp=cheap").is_err());
        assert!(parse_items("Lamp=-5").is_err());
    }
}
