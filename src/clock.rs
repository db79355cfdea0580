use crate::auction::Millis;
use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

/// Source of "now" for deadlines and the bootstrap `serverTime`
pub trait Clock {
    fn now(&self) -> Result<Millis>;
}

pub type SharedClock = Arc<dyn Clock + Send + Sync + 'static>;

#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new_shared() -> SharedClock {
        Arc::new(Self)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Result<Millis> {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock is set before the unix epoch")?;
        Ok(Millis::try_from(since_epoch.as_millis())?)
    }
}
