//! Static partitioning of entities across parallel workers

/// Item list split into fixed per-worker shares.
///
/// Shares are decided when the queue is built, before any worker starts:
/// worker `w` of `n` owns indices `w, w + n, w + 2n, ...`. Every item is
/// yielded together with its position so results can be put back in input
/// order by the collector.
pub struct WorkQueue<S> {
    items: Vec<S>,
    workers: usize,
}

impl<S> WorkQueue<S> {
    /// Split `items` across `workers` (at least one)
    pub fn new(items: Vec<S>, workers: usize) -> Self {
        let workers = workers.max(1);
        log::debug!("{} items across {} workers", items.len(), workers);
        Self { items, workers }
    }

    /// Items assigned to `worker`, with their index in the original list
    pub fn share(&self, worker: usize) -> impl Iterator<Item = (usize, &S)> {
        self.items
            .iter()
            .enumerate()
            .skip(worker)
            .step_by(self.workers)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Total items in queue
    pub fn total(&self) -> usize {
        self.items.len()
    }
}

/// Restore input order from `(index, value)` pairs gathered out of order.
pub fn into_input_order<T>(mut results: Vec<(usize, T)>) -> Vec<T> {
    results.sort_unstable_by_key(|(idx, _)| *idx);
    results.into_iter().map(|(_, v)| v).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices<S>(q: &WorkQueue<S>, worker: usize) -> Vec<usize> {
        q.share(worker).map(|(i, _)| i).collect()
    }

    #[test]
    fn shares_are_strided() {
        let q = WorkQueue::new(vec!["a", "b", "c", "d", "e"], 2);
        assert_eq!(q.total(), 5);
        assert_eq!(indices(&q, 0), vec![0, 2, 4]);
        assert_eq!(indices(&q, 1), vec![1, 3]);
        assert_eq!(q.share(1).next(), Some((1, &"b")));
    }

    #[test]
    fn shares_do_not_depend_on_consumption() {
        let q = WorkQueue::new((0..10).collect::<Vec<_>>(), 3);
        let before: Vec<Vec<usize>> = (0..3).map(|w| indices(&q, w)).collect();
        // draining one share leaves the others untouched
        assert_eq!(q.share(0).count(), 4);
        let after: Vec<Vec<usize>> = (0..3).map(|w| indices(&q, w)).collect();
        assert_eq!(before, after);
        assert_eq!(after, vec![vec![0, 3, 6, 9], vec![1, 4, 7], vec![2, 5, 8]]);
    }

    #[test]
    fn more_workers_than_items() {
        let q = WorkQueue::new(vec!["a", "b"], 4);
        assert_eq!(indices(&q, 0), vec![0]);
        assert_eq!(indices(&q, 1), vec![1]);
        assert!(indices(&q, 2).is_empty());
        assert!(indices(&q, 3).is_empty());
    }

    #[test]
    fn zero_workers_means_one() {
        let q = WorkQueue::new(vec![1, 2, 3], 0);
        assert_eq!(q.workers(), 1);
        assert_eq!(indices(&q, 0), vec![0, 1, 2]);
    }

    #[test]
    fn empty_queue() {
        let q: WorkQueue<i32> = WorkQueue::new(vec![], 3);
        assert_eq!(q.total(), 0);
        assert_eq!(q.share(0).next(), None);
    }

    #[test]
    fn shares_cover_every_item_once() {
        let q = WorkQueue::new((0..1000).collect::<Vec<_>>(), 8);
        let claimed = std::sync::Mutex::new(Vec::new());
        std::thread::scope(|s| {
            for w in 0..q.workers() {
                let (q, claimed) = (&q, &claimed);
                s.spawn(move || {
                    for (idx, v) in q.share(w) {
                        assert_eq!(idx, *v as usize);
                        claimed.lock().unwrap().push(idx);
                    }
                });
            }
        });
        let mut claimed = claimed.into_inner().unwrap();
        claimed.sort_unstable();
        assert_eq!(claimed, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn into_input_order_sorts_by_index() {
        let out = into_input_order(vec![(2, "c"), (0, "a"), (1, "b")]);
        assert_eq!(out, vec!["a", "b", "c"]);
    }
}
