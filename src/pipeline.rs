//! Snapshot pipeline: load → transform → publish.
//!
//! Each refresh takes a sequence number before it starts loading. Refreshes can overlap,
//! since member resolution awaits the database, so a slow refresh may finish after a newer
//! one. [`Publisher::publish`] drops any result older than the one already published.

use crate::{
    core::{
        Session, item,
        normalizer::{normalize_snapshot, to_record},
        table::{TableRow, ViewParams, build_table},
        totals::{ProfitTotals, YearSelection, compute_totals},
    },
    errors::Result,
};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tokio::sync::watch;
use tracing::{debug, warn};

/// A published value and the sequence number of the refresh that produced it.
#[derive(Debug)]
pub struct Published<T> {
    /// Sequence number taken by [`Publisher::begin`]
    pub seq: u64,
    /// The computed value
    pub value: T,
}

/// Latest-value channel that ignores out-of-order results.
#[derive(Debug)]
pub struct Publisher<T> {
    next_seq: AtomicU64,
    sender: watch::Sender<Option<Arc<Published<T>>>>,
}

impl<T> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Publisher<T> {
    /// Creates a publisher with nothing published yet.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            next_seq: AtomicU64::new(0),
            sender,
        }
    }

    /// Reserves the sequence number of a new refresh.
    pub fn begin(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Publishes `value` unless a newer refresh already did. Returns whether it was applied.
    pub fn publish(&self, seq: u64, value: T) -> bool {
        self.sender.send_if_modified(|current| {
            if current.as_ref().is_some_and(|published| published.seq >= seq) {
                return false;
            }
            *current = Some(Arc::new(Published { seq, value }));
            true
        })
    }

    /// Subscribes to published values.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Published<T>>>> {
        self.sender.subscribe()
    }

    /// The most recently published value, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<Published<T>>> {
        self.sender.borrow().clone()
    }
}

/// Recomputes the items table and the profit totals for one user.
#[derive(Debug)]
pub struct InventoryPipeline {
    session: Session,
    table: Publisher<Vec<TableRow>>,
    totals: Publisher<ProfitTotals>,
}

impl InventoryPipeline {
    /// Creates a pipeline acting for `session`'s user.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            table: Publisher::new(),
            totals: Publisher::new(),
        }
    }

    /// Items table publisher
    #[must_use]
    pub const fn table(&self) -> &Publisher<Vec<TableRow>> {
        &self.table
    }

    /// Profit totals publisher
    #[must_use]
    pub const fn totals(&self) -> &Publisher<ProfitTotals> {
        &self.totals
    }

    /// Loads the current items, builds the table for `params` and publishes it.
    ///
    /// Returns `false` when a newer refresh finished first and this result was dropped.
    ///
    /// # Errors
    /// Propagates load and member resolution failures; nothing is published then.
    pub async fn refresh_table(&self, params: &ViewParams) -> Result<bool> {
        let seq = self.table.begin();
        let models = item::list_table_items(&self.session).await?;
        let records = normalize_snapshot(self.session.db(), models).await?;
        let rows = build_table(records, params);
        debug!("Table refresh {} produced {} rows", seq, rows.len());

        let applied = self.table.publish(seq, rows);
        if !applied {
            warn!("Discarded stale table refresh {}", seq);
        }
        Ok(applied)
    }

    /// Loads every item, computes the totals for `year` and `month` and publishes them.
    ///
    /// # Errors
    /// Propagates load failures; nothing is published then.
    pub async fn refresh_totals(&self, year: YearSelection, month: u32) -> Result<bool> {
        let seq = self.totals.begin();
        let records: Vec<_> = item::list_all_items(&self.session)
            .await?
            .into_iter()
            .map(to_record)
            .collect();
        let totals = compute_totals(&records, year, month);
        debug!("Totals refresh {} over {} items", seq, records.len());

        let applied = self.totals.publish(seq, totals);
        if !applied {
            warn!("Discarded stale totals refresh {}", seq);
        }
        Ok(applied)
    }
}
