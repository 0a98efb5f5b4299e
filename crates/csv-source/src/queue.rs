//! Bounded batch queue shared by one producer and many writers.

use import_core::Batch;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Default number of batches buffered between the reader and the writers.
pub const DEFAULT_QUEUE_CAPACITY: usize = 128;

/// Create a bounded queue holding at most `capacity` batches.
///
/// # Panics
///
/// Panics if `capacity` is zero.
pub fn batch_queue(capacity: usize) -> (BatchSender, BatchReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        BatchSender { tx },
        BatchReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Error returned when every receiver has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueClosed;

/// Producer half of the batch queue.
pub struct BatchSender {
    tx: mpsc::Sender<Batch>,
}

impl BatchSender {
    /// Send a batch, waiting for space.
    pub async fn send(&self, batch: Batch) -> Result<(), QueueClosed> {
        self.tx.send(batch).await.map_err(|_| QueueClosed)
    }

    /// Send a batch from a blocking thread, waiting for space.
    ///
    /// Must not be called from within an async task.
    pub fn send_blocking(&self, batch: Batch) -> Result<(), QueueClosed> {
        self.tx.blocking_send(batch).map_err(|_| QueueClosed)
    }

    /// Signal that no more batches will be sent.
    pub fn close(self) {
        drop(self.tx);
    }
}

/// Consumer half of the batch queue. Clones share the same queue; each batch
/// is delivered to exactly one of them.
#[derive(Clone)]
pub struct BatchReceiver {
    rx: Arc<Mutex<mpsc::Receiver<Batch>>>,
}

impl BatchReceiver {
    /// Receive the next batch. Returns `None` once the sender is closed and
    /// the queue is drained.
    pub async fn recv(&self) -> Option<Batch> {
        self.rx.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_core::{Item, ItemValue};
    use std::collections::HashSet;

    fn batch(id: usize) -> Batch {
        let mut item = Item::new();
        item.insert("id", ItemValue::number(id.to_string()));
        vec![item]
    }

    #[tokio::test]
    async fn test_close_drains_then_ends() {
        let (tx, rx) = batch_queue(4);
        tx.send(batch(1)).await.unwrap();
        tx.send(batch(2)).await.unwrap();
        tx.close();

        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_some());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_each_batch_delivered_once() {
        let (tx, rx) = batch_queue(2);
        let consumers: Vec<_> = (0..4)
            .map(|_| {
                let rx = rx.clone();
                tokio::spawn(async move {
                    let mut ids = Vec::new();
                    while let Some(batch) = rx.recv().await {
                        ids.push(batch[0].get("id").unwrap().as_number().unwrap().to_string());
                    }
                    ids
                })
            })
            .collect();
        drop(rx);

        for i in 0..100 {
            tx.send(batch(i)).await.unwrap();
        }
        tx.close();

        let mut seen = HashSet::new();
        let mut total = 0;
        for consumer in consumers {
            for id in consumer.await.unwrap() {
                total += 1;
                seen.insert(id);
            }
        }
        assert_eq!(total, 100);
        assert_eq!(seen.len(), 100);
    }

    #[tokio::test]
    async fn test_send_fails_without_receivers() {
        let (tx, rx) = batch_queue(1);
        drop(rx);
        assert_eq!(tx.send(batch(1)).await, Err(QueueClosed));
    }

    #[tokio::test]
    async fn test_send_blocking_from_blocking_thread() {
        let (tx, rx) = batch_queue(1);
        let producer = tokio::task::spawn_blocking(move || {
            for i in 0..3 {
                tx.send_blocking(batch(i)).unwrap();
            }
            tx.close();
        });

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        producer.await.unwrap();
        assert_eq!(received, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_full_queue_blocks_producer() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::time::Duration;

        let (tx, rx) = batch_queue(3);
        let sent = Arc::new(AtomicUsize::new(0));
        let producer_sent = sent.clone();
        let producer = tokio::task::spawn_blocking(move || {
            for i in 0..10 {
                if tx.send_blocking(batch(i)).is_err() {
                    break;
                }
                producer_sent.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(sent.load(Ordering::SeqCst), 3);
        assert!(!producer.is_finished());

        // Taking one batch frees exactly one slot
        assert!(rx.recv().await.is_some());
        tokio::time::timeout(Duration::from_secs(5), async {
            while sent.load(Ordering::SeqCst) < 4 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(sent.load(Ordering::SeqCst), 4);

        // Without receivers the stalled send fails instead of hanging
        drop(rx);
        producer.await.unwrap();
        assert_eq!(sent.load(Ordering::SeqCst), 4);
    }
}
