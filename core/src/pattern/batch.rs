//! Batched learning queue.
//!
//! A bounded channel with a background consumer task, draining on
//! shutdown, triggered by either queue size or a timer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;

use crate::chunk::Chunk;
use crate::error::{Error, Result};

/// One queued learn request: the chunks to learn from, the outcome
/// label, and a callback that signals completion.
pub struct LearnItem {
    pub chunks: Vec<Chunk>,
    pub outcome: String,
    pub responder: oneshot::Sender<Result<()>>,
}

/// Statistics about batch-queue operations.
#[derive(Debug, Default, Clone)]
pub struct QueueStats {
    pub total_enqueued: u64,
    pub total_processed: u64,
    pub total_failed: u64,
    pub current_queue_size: usize,
}

/// A bounded batching queue over [`LearnItem`]s. `process_batch` is
/// invoked whenever `batch_size` items accumulate, or `batch_interval`
/// elapses with at least one item queued.
pub struct BatchQueue {
    sender: Mutex<Option<mpsc::Sender<LearnItem>>>,
    stats: Arc<Mutex<QueueStats>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl BatchQueue {
    /// Construct a queue and start its background consumer task, which
    /// calls `process_batch` for each size- or time-triggered batch.
    pub fn start<F, Fut>(batch_size: usize, batch_interval: Duration, process_batch: F) -> Arc<Self>
    where
        F: Fn(Vec<LearnItem>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::channel::<LearnItem>(batch_size.max(1) * 4);
        let stats = Arc::new(Mutex::new(QueueStats::default()));
        let stats_for_worker = Arc::clone(&stats);

        let worker = tokio::spawn(async move {
            let mut buffer: Vec<LearnItem> = Vec::with_capacity(batch_size);
            loop {
                let timeout = tokio::time::sleep(batch_interval);
                tokio::pin!(timeout);
                tokio::select! {
                    maybe_item = receiver.recv() => {
                        match maybe_item {
                            Some(item) => {
                                buffer.push(item);
                                {
                                    let mut stats = stats_for_worker.lock().await;
                                    stats.current_queue_size = buffer.len();
                                }
                                if buffer.len() >= batch_size {
                                    let batch = std::mem::take(&mut buffer);
                                    process_batch(batch).await;
                                }
                            }
                            None => {
                                if !buffer.is_empty() {
                                    let batch = std::mem::take(&mut buffer);
                                    process_batch(batch).await;
                                }
                                break;
                            }
                        }
                    }
                    () = &mut timeout => {
                        if !buffer.is_empty() {
                            let batch = std::mem::take(&mut buffer);
                            process_batch(batch).await;
                        }
                    }
                }
            }
        });

        Arc::new(Self {
            sender: Mutex::new(Some(sender)),
            stats,
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Enqueue a learn item. Fails with a collaborator error if the
    /// queue has already been shut down.
    ///
    /// # Errors
    /// Returns an error if the background consumer has shut down.
    pub async fn enqueue(&self, item: LearnItem) -> Result<()> {
        let sender = self
            .sender
            .lock()
            .await
            .clone()
            .ok_or_else(|| Error::Collaborator("batch queue has been shut down".into()))?;
        {
            let mut stats = self.stats.lock().await;
            stats.total_enqueued += 1;
        }
        sender
            .send(item)
            .await
            .map_err(|_| Error::Collaborator("batch queue consumer has shut down".into()))
    }

    #[must_use]
    pub async fn stats(&self) -> QueueStats {
        self.stats.lock().await.clone()
    }

    /// Close the intake channel and wait for the consumer to drain any
    /// buffered items.
    pub async fn shutdown(&self) {
        self.sender.lock().await.take();
        if let Some(handle) = self.worker.lock().await.take() {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn size_trigger_processes_a_full_batch() {
        let processed = Arc::new(AtomicUsize::new(0));
        let processed_clone = Arc::clone(&processed);
        let queue = BatchQueue::start(2, Duration::from_secs(60), move |batch| {
            let processed = Arc::clone(&processed_clone);
            async move {
                processed.fetch_add(batch.len(), Ordering::SeqCst);
                for item in batch {
                    let _ = item.responder.send(Ok(()));
                }
            }
        });

        let (tx1, rx1) = oneshot::channel();
        let (tx2, rx2) = oneshot::channel();
        queue
            .enqueue(LearnItem {
                chunks: vec![],
                outcome: "success".into(),
                responder: tx1,
            })
            .await
            .unwrap();
        queue
            .enqueue(LearnItem {
                chunks: vec![],
                outcome: "success".into(),
                responder: tx2,
            })
            .await
            .unwrap();

        rx1.await.unwrap().unwrap();
        rx2.await.unwrap().unwrap();
        assert_eq!(processed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn time_trigger_processes_a_partial_batch() {
        let processed = Arc::new(AtomicUsize::new(0));
        let processed_clone = Arc::clone(&processed);
        let queue = BatchQueue::start(10, Duration::from_millis(50), move |batch| {
            let processed = Arc::clone(&processed_clone);
            async move {
                processed.fetch_add(batch.len(), Ordering::SeqCst);
                for item in batch {
                    let _ = item.responder.send(Ok(()));
                }
            }
        });

        let (tx, rx) = oneshot::channel();
        queue
            .enqueue(LearnItem {
                chunks: vec![],
                outcome: "success".into(),
                responder: tx,
            })
            .await
            .unwrap();

        rx.await.unwrap().unwrap();
        assert_eq!(processed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_drains_buffered_items() {
        let processed = Arc::new(AtomicUsize::new(0));
        let processed_clone = Arc::clone(&processed);
        let queue = BatchQueue::start(100, Duration::from_secs(60), move |batch| {
            let processed = Arc::clone(&processed_clone);
            async move {
                processed.fetch_add(batch.len(), Ordering::SeqCst);
            }
        });

        let (tx, _rx) = oneshot::channel();
        queue
            .enqueue(LearnItem {
                chunks: vec![],
                outcome: "success".into(),
                responder: tx,
            })
            .await
            .unwrap();

        queue.shutdown().await;
        assert_eq!(processed.load(Ordering::SeqCst), 1);
    }
}
