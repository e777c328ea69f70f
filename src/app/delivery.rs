//! Asynchronous delivery
//!
//! Submits identifiers with `submit_async` and hands each Record to the
//! caller as the promoter broadcasts it. Promotions are read between
//! submissions so cache hits cannot overrun the channel. Records the
//! receiver still misses (lag, or a closed channel) are fetched from the
//! pool directly, where they coalesce onto the running job or come back
//! from the cache.

use crate::model::api::{Record, RepoId};
use crate::pool::api::{DispatchPool, PoolError};
use std::collections::BTreeMap;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Keys still waiting for a Record
struct Pending {
    ids: BTreeMap<String, (String, RepoId)>,
    missed: bool,
}

impl Pending {
    fn deliver(&mut self, record: Record, on_record: &mut impl FnMut(&Record)) {
        if self.ids.remove(&record.repo().cache_key()).is_some() {
            on_record(&record);
        }
    }

    fn drain_buffered(
        &mut self,
        promoted: &mut broadcast::Receiver<Record>,
        on_record: &mut impl FnMut(&Record),
    ) {
        loop {
            match promoted.try_recv() {
                Ok(record) => self.deliver(record, on_record),
                Err(TryRecvError::Lagged(count)) => {
                    log::warn!("Missed {} promoted record(s)", count);
                    self.missed = true;
                }
                Err(TryRecvError::Closed) => {
                    self.missed = true;
                    break;
                }
                Err(TryRecvError::Empty) => break,
            }
        }
    }
}

/// Submit every identifier and report each Record once; returns the number rejected
pub async fn submit_all_async<R, J>(
    pool: &DispatchPool,
    ids: Vec<(String, RepoId)>,
    mut promoted: broadcast::Receiver<Record>,
    mut on_record: R,
    mut on_reject: J,
) -> usize
where
    R: FnMut(&Record),
    J: FnMut(&str, &PoolError),
{
    let mut rejected = 0;
    let mut pending = Pending {
        ids: BTreeMap::new(),
        missed: false,
    };

    for (spec, id) in ids {
        let key = id.cache_key();
        match pool.submit_async(id.clone()).await {
            Ok(()) => {
                pending.ids.insert(key, (spec, id));
            }
            Err(e) => {
                on_reject(&spec, &e);
                rejected += 1;
            }
        }
        pending.drain_buffered(&mut promoted, &mut on_record);
    }

    while !pending.ids.is_empty() && !pending.missed {
        match promoted.recv().await {
            Ok(record) => pending.deliver(record, &mut on_record),
            Err(RecvError::Lagged(count)) => {
                log::warn!("Missed {} promoted record(s)", count);
                pending.missed = true;
            }
            Err(RecvError::Closed) => pending.missed = true,
        }
    }

    if pending.ids.is_empty() {
        return rejected;
    }
    pending.drain_buffered(&mut promoted, &mut on_record);
    log::debug!(
        "Fetching {} record(s) missed by the promoter from the pool",
        pending.ids.len()
    );
    for (spec, id) in std::mem::take(&mut pending.ids).into_values() {
        match pool.submit(id).await {
            Ok(record) => on_record(&record),
            Err(e) => {
                on_reject(&spec, &e);
                rejected += 1;
            }
        }
    }
    rejected
}
