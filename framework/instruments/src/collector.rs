use parking_lot::Mutex;
use paperload_summary_model::RequestRecord;

/// Append-only log of submission attempts, shared by every virtual user.
///
/// Appends are atomic but carry no ordering guarantee across users; each user appends its own
/// records sequentially so per-user order is monotonic. The log is frozen with
/// [ResultsCollector::snapshot] once all users have finished and is only read after that.
#[derive(Debug, Default)]
pub struct ResultsCollector {
    records: Mutex<Vec<RequestRecord>>,
}

impl ResultsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, record: RequestRecord) {
        log::debug!(
            "User {}: {} {} in {}ms",
            record.user_index,
            record.scenario,
            if record.success { "completed" } else { "failed" },
            record.duration_ms
        );
        self.records.lock().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Clone the log contents in insertion order.
    pub fn snapshot(&self) -> Vec<RequestRecord> {
        self.records.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(user: usize, sequence: u64) -> RequestRecord {
        RequestRecord::new(
            user,
            "merge".to_string(),
            sequence as i64,
            sequence as i64 + 10,
            None,
            None,
            None,
            true,
        )
    }

    #[test]
    fn snapshot_preserves_insertion_order() {
        let collector = ResultsCollector::new();
        assert!(collector.is_empty());

        for i in 0..5 {
            collector.record(record(0, i));
        }
        assert_eq!(collector.len(), 5);
        assert!(!collector.is_empty());

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.len(), 5);
        for (i, r) in snapshot.iter().enumerate() {
            assert_eq!(r.started_at, i as i64);
        }
    }

    #[test]
    fn concurrent_appends_lose_nothing_and_stay_per_user_monotonic() {
        let collector = Arc::new(ResultsCollector::new());

        let handles = (0..8_usize)
            .map(|user| {
                let collector = collector.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        collector.record(record(user, i));
                    }
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.len(), 8 * 50);

        for user in 0..8 {
            let sequence = snapshot
                .iter()
                .filter(|r| r.user_index == user)
                .map(|r| r.started_at)
                .collect::<Vec<_>>();
            assert_eq!(sequence, (0..50).collect::<Vec<i64>>());
        }
    }
}
