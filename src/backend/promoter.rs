//! Built-in promoters

use crate::backend::traits::Promoter;
use crate::model::api::Record;
use tokio::sync::broadcast;

/// Logs a one-line summary of every finalized Record
#[derive(Debug, Default, Clone)]
pub struct LogPromoter;

#[async_trait::async_trait]
impl Promoter for LogPromoter {
    async fn process(&self, record: Record) {
        log::info!("{}", record.summary());
    }
}

/// Broadcasts finalized Records to any number of subscribers
///
/// Records published while nobody is subscribed are dropped; slow
/// subscribers may observe `RecvError::Lagged`.
#[derive(Debug, Clone)]
pub struct ChannelPromoter {
    tx: broadcast::Sender<Record>,
}

impl ChannelPromoter {
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<Record>) {
        let (tx, rx) = broadcast::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Record> {
        self.tx.subscribe()
    }
}

#[async_trait::async_trait]
impl Promoter for ChannelPromoter {
    async fn process(&self, record: Record) {
        if self.tx.send(record).is_err() {
            log::trace!("Promoted record had no subscribers");
        }
    }
}
