mod auction;
mod broadcast;
mod clock;
mod config;
mod event;
mod service;
mod store;
#[cfg(test)]
mod time_sync;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::Config::load()?;
    info!(?config, "starting");

    let clock = clock::SystemClock::new_shared();
    let store = store::InMemoryAuctionStore::new_shared(clock.clone());
    store
        .reset_all(&config.items, config.round_duration)
        .context("failed to open the first round")?;

    let registry = broadcast::ViewerRegistry::new_shared();
    let gate = broadcast::PublishGate::new();
    let handler = service::BidHandler::new(store.clone(), registry.clone(), gate.clone());

    let svc_ctr = service::ServiceControl::new();

    ctrlc::set_handler({
        let svc_ctr = svc_ctr.clone();
        move || {
            eprintln!("Stopping all services...");
            svc_ctr.stop_all();
        }
    })?;

    let ui = service::Ui::new(
        service::AppState {
            store: store.clone(),
            registry: registry.clone(),
            handler,
            clock,
            bid_increment: config.bid_increment,
        },
        config.listen_addr,
    )?;

    for handle in vec![
        svc_ctr.spawn_loop(service::RoundScheduler::new(
            store,
            registry,
            gate,
            config.items.clone(),
            config.round_duration,
            config.reset_interval,
        )),
        svc_ctr.spawn_loop(ui),
    ] {
        handle.join()?
    }

    Ok(())
}

#[cfg(test)]
mod tests;
