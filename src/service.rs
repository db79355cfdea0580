pub mod bid_handler;
pub mod scheduler;
pub mod ui;

pub use self::{bid_handler::*, scheduler::*, ui::*};
use anyhow::{bail, format_err, Result};
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};
use tracing::error;

/// A service that is a loop that does something
pub trait LoopService: Send {
    fn name(&self) -> &'static str;

    fn run_iteration(&mut self) -> Result<()>;
}

/// Service execution control instance
///
/// All services are basically a loop, and we would like to be able to
/// gracefully terminate them, and handle and top-level error of any
/// of them by gracefully stopping everything else.
#[derive(Clone, Default)]
pub struct ServiceControl {
    stop_all: Arc<AtomicBool>,
}

impl ServiceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_all(&self) {
        self.stop_all.store(true, Ordering::SeqCst);
    }

    pub fn spawn_loop(&self, mut service: impl LoopService + 'static) -> JoinHandle {
        let name = service.name();
        self.spawn_loop_raw(name, move || service.run_iteration())
    }

    /// Start a new service as a loop, with a certain body
    ///
    /// This will take care of checking termination condition and
    /// handling any errors returned by `f`
    fn spawn_loop_raw<F>(&self, name: &'static str, mut f: F) -> JoinHandle
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));

        JoinHandle::new(
            stop.clone(),
            thread::Builder::new()
                .name(name.to_owned())
                .spawn({
                    let stop_all = self.stop_all.clone();
                    move || match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        while !stop.load(Ordering::SeqCst) && !stop_all.load(Ordering::SeqCst) {
                            if let Err(e) = f() {
                                error!(service = name, error = %e, "service failed, stopping all");
                                stop_all.store(true, Ordering::SeqCst);
                                return Err(e);
                            }
                        }
                        Ok(())
                    })) {
                        Err(_e) => {
                            stop_all.store(true, Ordering::SeqCst);
                            bail!("service {name} panicked");
                        }
                        Ok(res) => res,
                    }
                }),
        )
    }
}

/// Simple thread join wrapper that joins the thread on drop
pub struct JoinHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<Result<()>>>,
    spawn_error: Option<std::io::Error>,
}

impl JoinHandle {
    fn new(stop: Arc<AtomicBool>, handle: std::io::Result<thread::JoinHandle<Result<()>>>) -> Self {
        let (thread, spawn_error) = match handle {
            Ok(h) => (Some(h), None),
            Err(e) => (None, Some(e)),
        };
        JoinHandle {
            stop,
            thread,
            spawn_error,
        }
    }

    fn join_mut(&mut self) -> Result<()> {
        if let Some(e) = self.spawn_error.take() {
            return Err(format_err!("failed to spawn service thread: {e}"));
        }
        if let Some(h) = self.thread.take() {
            h.join().map_err(|e| format_err!("join failed: {:?}", e))?
        } else {
            Ok(())
        }
    }

    pub fn join(mut self) -> Result<()> {
        self.join_mut()
    }
}

impl Drop for JoinHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Err(e) = self.join_mut() {
            error!(error = %e, "service ended with an error");
        }
    }
}
