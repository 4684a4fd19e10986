#![allow(dead_code)]

//! In-memory deferred mail queue.
//!
//! Shared between the request path (`enqueue`) and the ticking loop
//! (`drain_due`). Tasks live only for the lifetime of the process; a drained
//! task is gone from the queue and can never appear in a second drain.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

/// A queued follow-up email. `send_time` is computed once at enqueue time
/// and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUpTask {
    pub recipient: String,
    pub display_name: String,
    pub send_time: DateTime<Utc>,
}

/// Concurrency-safe container of pending follow-ups.
///
/// Both operations are short in-memory critical sections; the lock is never
/// held across an `.await` or any I/O.
#[derive(Debug, Default)]
pub struct FollowUpQueue {
    pending: Mutex<Vec<FollowUpTask>>,
}

impl FollowUpQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task. Unbounded; duplicates are permitted and will each be
    /// dispatched.
    pub fn enqueue(&self, task: FollowUpTask) {
        self.lock().push(task);
    }

    /// Removes and returns every task with `send_time <= now`.
    ///
    /// The scan and removal happen in a single critical section, so a task
    /// appears in at most one drain result and an `enqueue` racing this call
    /// is either fully before or fully after it. No ordering is guaranteed
    /// within the returned set.
    pub fn drain_due(&self, now: DateTime<Utc>) -> Vec<FollowUpTask> {
        let mut pending = self.lock();
        let (due, rest) = std::mem::take(&mut *pending)
            .into_iter()
            .partition(|task| task.send_time <= now);
        *pending = rest;
        due
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FollowUpTask>> {
        // A Vec has no cross-element invariants to break; a poisoned lock is
        // still safe to reuse.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;
    use proptest::prelude::*;

    use super::*;

    fn task(recipient: &str, send_time: DateTime<Utc>) -> FollowUpTask {
        FollowUpTask {
            recipient: recipient.to_string(),
            display_name: "Applicant".to_string(),
            send_time,
        }
    }

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, h, m, s).unwrap()
    }

    #[test]
    fn test_drain_respects_send_time_boundary() {
        let queue = FollowUpQueue::new();
        queue.enqueue(task("a@example.com", at(9, 0, 0)));

        assert!(queue.drain_due(at(8, 59, 59)).is_empty());
        let due = queue.drain_due(at(9, 0, 0));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].recipient, "a@example.com");
    }

    #[test]
    fn test_drained_task_never_reappears() {
        let queue = FollowUpQueue::new();
        queue.enqueue(task("a@example.com", at(9, 0, 0)));

        assert_eq!(queue.drain_due(at(10, 0, 0)).len(), 1);
        assert!(queue.drain_due(at(10, 0, 0)).is_empty());
        assert!(queue.drain_due(at(23, 0, 0)).is_empty());
    }

    #[test]
    fn test_drain_partitions_due_from_not_yet_due() {
        let queue = FollowUpQueue::new();
        queue.enqueue(task("early@example.com", at(8, 0, 0)));
        queue.enqueue(task("late@example.com", at(12, 0, 0)));

        let due = queue.drain_due(at(9, 0, 0));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].recipient, "early@example.com");
        assert_eq!(queue.len(), 1);

        let rest = queue.drain_due(at(12, 0, 0));
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].recipient, "late@example.com");
        assert!(queue.is_empty());
    }

    #[test]
    fn test_duplicate_enqueues_are_both_kept() {
        let queue = FollowUpQueue::new();
        queue.enqueue(task("same@example.com", at(9, 0, 0)));
        queue.enqueue(task("same@example.com", at(9, 0, 0)));

        assert_eq!(queue.drain_due(at(9, 0, 0)).len(), 2);
    }

    #[test]
    fn test_concurrent_enqueue_loses_nothing() {
        let queue = Arc::new(FollowUpQueue::new());
        let threads = 8;
        let per_thread = 100;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    for i in 0..per_thread {
                        queue.enqueue(task(&format!("{t}-{i}@example.com"), at(9, 0, 0)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let due = queue.drain_due(at(23, 0, 0));
        assert_eq!(due.len(), threads * per_thread);
        let mut recipients: Vec<_> = due.iter().map(|t| t.recipient.clone()).collect();
        recipients.sort();
        recipients.dedup();
        assert_eq!(recipients.len(), threads * per_thread, "duplicated tasks");
    }

    proptest! {
        /// Concurrent enqueue of N tasks across a randomized thread count,
        /// then one future-dated drain: exactly N come back, none twice.
        #[test]
        fn property_concurrent_enqueue_then_drain_conserves_tasks(
            threads in 1usize..8,
            per_thread in 1usize..40,
        ) {
            let queue = Arc::new(FollowUpQueue::new());
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let queue = Arc::clone(&queue);
                    std::thread::spawn(move || {
                        for i in 0..per_thread {
                            queue.enqueue(task(&format!("{t}-{i}@example.com"), at(9, 0, 0)));
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            let due = queue.drain_due(at(23, 59, 59));
            prop_assert_eq!(due.len(), threads * per_thread);
            prop_assert!(queue.is_empty());
        }

        /// Drains at an arbitrary instant partition the queue exactly: every
        /// returned task is due, every retained task is not, nothing is lost.
        #[test]
        fn property_drain_partitions_exactly(
            offsets in proptest::collection::vec(-3600i64..3600, 1..50),
        ) {
            let queue = FollowUpQueue::new();
            let now = at(12, 0, 0);
            for (i, offset) in offsets.iter().enumerate() {
                queue.enqueue(task(
                    &format!("{i}@example.com"),
                    now + chrono::Duration::seconds(*offset),
                ));
            }

            let due = queue.drain_due(now);
            let expected_due = offsets.iter().filter(|o| **o <= 0).count();
            prop_assert_eq!(due.len(), expected_due);
            prop_assert!(due.iter().all(|t| t.send_time <= now));
            prop_assert_eq!(queue.len(), offsets.len() - expected_due);

            // A second drain at the same instant must find nothing new.
            prop_assert!(queue.drain_due(now).is_empty());
        }
    }
}
