//! Shutdown coordination
//!
//! Process signals become a broadcast that the binary listens on to start
//! draining the dispatch pool. The first signal asks for a drain; any
//! further signal exits at once with status 130.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit status used when a repeated signal aborts the drain
pub const FORCED_EXIT_STATUS: i32 = 130;

/// What to do about a received signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    Drain,
    ForceExit,
}

#[derive(Clone)]
pub struct ShutdownCoordinator {
    tx: broadcast::Sender<()>,
    signals: Arc<AtomicUsize>,
}

impl ShutdownCoordinator {
    pub fn new() -> (Self, broadcast::Receiver<()>) {
        let (tx, rx) = broadcast::channel(4);
        let coordinator = Self {
            tx,
            signals: Arc::new(AtomicUsize::new(0)),
        };
        (coordinator, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Ask listeners to drain
    pub fn trigger_shutdown(&self) {
        if self.tx.send(()).is_err() {
            log::trace!("Shutdown requested with no listeners");
        }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.signals.load(Ordering::Acquire) > 0
    }

    /// Record a signal and decide how to react
    pub fn on_signal(&self) -> SignalAction {
        let previous = self.signals.fetch_add(1, Ordering::AcqRel);
        self.trigger_shutdown();
        if previous == 0 {
            SignalAction::Drain
        } else {
            SignalAction::ForceExit
        }
    }

    /// Listen for SIGINT, SIGTERM and SIGHUP (Ctrl-C elsewhere)
    ///
    /// Must be called from within a tokio runtime.
    pub fn install_signal_handlers(&self) {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            // Default SIGPIPE so `reporank ... | head` ends quietly
            unsafe {
                libc::signal(libc::SIGPIPE, libc::SIG_DFL);
            }

            for kind in [
                SignalKind::interrupt(),
                SignalKind::terminate(),
                SignalKind::hangup(),
            ] {
                let coordinator = self.clone();
                match signal(kind) {
                    Ok(mut stream) => {
                        tokio::spawn(async move {
                            while stream.recv().await.is_some() {
                                coordinator.react();
                            }
                        });
                    }
                    Err(e) => log::warn!("Cannot listen for signal {:?}: {}", kind, e),
                }
            }
        }

        #[cfg(not(unix))]
        {
            let coordinator = self.clone();
            tokio::spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    coordinator.react();
                }
            });
        }
    }

    fn react(&self) {
        match self.on_signal() {
            SignalAction::Drain => log::info!(
                "Shutdown requested; waiting for admitted analyses (signal again to abort)"
            ),
            SignalAction::ForceExit => {
                log::warn!("Repeated shutdown signal; exiting without draining");
                std::process::exit(FORCED_EXIT_STATUS);
            }
        }
    }
}
