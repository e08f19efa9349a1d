//! Per-task transition locks and in-flight settlement reservations.

use crate::task::domain::TaskId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Serializes read-modify-write sequences on individual tasks.
#[derive(Debug, Default)]
pub(super) struct TaskLocks {
    transitions: Mutex<HashMap<TaskId, Arc<AsyncMutex<()>>>>,
    settling: Mutex<HashSet<TaskId>>,
    released: Mutex<HashSet<TaskId>>,
}

impl TaskLocks {
    /// Waits for exclusive access to `task_id`.
    ///
    /// Entries nobody holds or waits on are pruned, so the table only
    /// tracks tasks with a transition in flight.
    pub(super) async fn acquire(&self, task_id: &TaskId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut transitions = self
                .transitions
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            transitions.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(transitions.entry(task_id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Marks a settlement for `task_id` as in flight.
    ///
    /// Returns `None` when another settlement for the task already holds
    /// the reservation.
    pub(super) fn reserve_settlement(
        self: &Arc<Self>,
        task_id: &TaskId,
    ) -> Option<SettlementReservation> {
        let mut settling = self.settling.lock().unwrap_or_else(PoisonError::into_inner);
        if !settling.insert(task_id.clone()) {
            return None;
        }
        Some(SettlementReservation {
            locks: Arc::clone(self),
            task_id: task_id.clone(),
        })
    }

    /// Remembers that the bounty of `task_id` was paid out but the
    /// completion is not yet recorded.
    pub(super) fn record_release(&self, task_id: &TaskId) {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(task_id.clone());
    }

    /// Returns `true` when a payout for `task_id` awaits its completion.
    pub(super) fn is_released(&self, task_id: &TaskId) -> bool {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(task_id)
    }

    /// Forgets the payout of `task_id` once its completion is stored.
    pub(super) fn clear_release(&self, task_id: &TaskId) {
        self.released
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(task_id);
    }

    #[cfg(test)]
    pub(super) fn is_settling(&self, task_id: &TaskId) -> bool {
        self.settling
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(task_id)
    }

    #[cfg(test)]
    pub(super) fn tracked_transitions(&self) -> usize {
        self.transitions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Releases its settlement reservation when dropped, including when the
/// owning future is cancelled.
#[derive(Debug)]
pub(super) struct SettlementReservation {
    locks: Arc<TaskLocks>,
    task_id: TaskId,
}

impl Drop for SettlementReservation {
    fn drop(&mut self) {
        self.locks
            .settling
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.task_id);
    }
}
