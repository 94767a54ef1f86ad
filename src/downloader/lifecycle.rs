//! Shutdown coordination.

use std::sync::atomic::Ordering;

use crate::error::Result;
use crate::types::Event;

use super::SmartDownloader;

impl SmartDownloader {
    /// Gracefully shut down the controller
    ///
    /// 1. Stops accepting commands (later calls fail with `ShuttingDown`)
    /// 2. Cancels the running simulated download, if any
    /// 3. Emits [`Event::Shutdown`]
    ///
    /// An analysis already in flight still resolves. Calling this twice is
    /// harmless.
    pub async fn shutdown(&self) -> Result<()> {
        // Flipped under the session lock: a select either finished before
        // this point (and is cancelled below) or sees the flag.
        let was_accepting = {
            let _session = self.lock_session();
            self.accepting_new.swap(false, Ordering::SeqCst)
        };
        if !was_accepting {
            tracing::debug!("shutdown already in progress");
            return Ok(());
        }
        tracing::info!("Initiating graceful shutdown");

        if self.simulator.cancel() {
            tracing::info!("Cancelled running download");
        }

        self.emit_event(Event::Shutdown);
        tracing::info!("Graceful shutdown complete");
        Ok(())
    }

    /// True once [`shutdown`](Self::shutdown) has been called
    pub fn is_shutting_down(&self) -> bool {
        !self.accepting_new.load(Ordering::SeqCst)
    }
}
