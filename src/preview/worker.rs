//! Background thread driving a [`PreviewProducer`].

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::JoinHandle;

use super::Notifier;
use super::producer::{CancelToken, PreviewItem, PreviewProducer};
use super::render::{BlockImage, BlockRenderer};

/// Messages from a preview worker to the UI thread.
#[derive(Debug, Clone)]
pub enum PreviewEvent {
    /// One font, already shaped and rasterized
    Item {
        generation: u64,
        item: PreviewItem,
        image: BlockImage,
    },
    /// The worker is done; sent exactly once per worker
    Finished {
        generation: u64,
        produced: usize,
        cancelled: bool,
    },
}

impl PreviewEvent {
    pub fn generation(&self) -> u64 {
        match self {
            PreviewEvent::Item { generation, .. } | PreviewEvent::Finished { generation, .. } => {
                *generation
            }
        }
    }
}

/// Owns one preview worker thread and the receiving end of its channel.
///
/// Dropping the worker cancels it and waits for the thread, which takes at
/// most one chunk pause or one item's rendering.
pub struct PreviewWorker {
    generation: u64,
    total: usize,
    cancel: CancelToken,
    receiver: Receiver<PreviewEvent>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    /// Start streaming `producer` on a new thread, rendering every item with
    /// `renderer` before it is sent.
    ///
    /// `notify` is called after every event so the UI can wake up.
    pub fn spawn(
        producer: PreviewProducer,
        renderer: BlockRenderer,
        generation: u64,
        notify: Notifier,
    ) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let cancel = producer.cancel_token().clone();
        let total = producer.total();
        let worker_cancel = cancel.clone();

        let handle = std::thread::Builder::new()
            .name(format!("preview-worker-{generation}"))
            .spawn(move || {
                let mut produced = 0;
                for item in producer {
                    let image = renderer.render(&item);
                    let event = PreviewEvent::Item {
                        generation,
                        item,
                        image,
                    };
                    if tx.send(event).is_err() {
                        // Receiver gone: the request was superseded
                        break;
                    }
                    produced += 1;
                    notify();
                }

                let cancelled = worker_cancel.is_cancelled();
                log::debug!(
                    "Preview worker {} finished: {} item(s), cancelled={}",
                    generation,
                    produced,
                    cancelled
                );
                let _ = tx.send(PreviewEvent::Finished {
                    generation,
                    produced,
                    cancelled,
                });
                notify();
            })?;

        Ok(Self {
            generation,
            total,
            cancel,
            receiver: rx,
            handle: Some(handle),
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of fonts the worker was started with.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Take up to `max` pending events without blocking.
    pub fn drain(&self, max: usize) -> Vec<PreviewEvent> {
        let mut events = Vec::new();
        while events.len() < max {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Block until the next event arrives (tests and shutdown only).
    pub fn recv(&self) -> Option<PreviewEvent> {
        self.receiver.recv().ok()
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fontpeek_fonts::{FaceSource, FontError, FontRegistry, PreviewRenderer};
    use parking_lot::Mutex;
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct NoFaces;

    impl FontRegistry for NoFaces {
        fn families(&self) -> Vec<String> {
            Vec::new()
        }
        fn register_font_file(&self, path: &Path) -> Result<Vec<String>, FontError> {
            Err(FontError::InvalidFont(path.to_path_buf()))
        }
        fn face_source(&self, _family: &str) -> Option<FaceSource> {
            None
        }
    }

    fn renderer(size: u32) -> BlockRenderer {
        let cache = Arc::new(Mutex::new(PreviewRenderer::new(8)));
        BlockRenderer::new(Arc::new(NoFaces), cache, size, 1.0, true)
    }

    fn producer(n: usize, chunk: usize, cancel: CancelToken) -> PreviewProducer {
        let fonts: Arc<[String]> = (0..n).map(|i| format!("F{i}")).collect();
        PreviewProducer::new(fonts, "Hello", chunk, Duration::from_millis(1), cancel)
    }

    #[test]
    fn test_notifier_called_per_event() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let worker = PreviewWorker::spawn(
            producer(5, 2, CancelToken::new()),
            renderer(18),
            1,
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        let mut events = Vec::new();
        while let Some(event) = worker.recv() {
            let done = matches!(event, PreviewEvent::Finished { .. });
            events.push(event);
            if done {
                break;
            }
        }
        drop(worker);
        // 5 items + 1 finished
        assert_eq!(events.len(), 6);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert!(events.iter().all(|e| e.generation() == 1));
        // Items arrive already rendered at the pass size
        assert!(events.iter().all(|e| match e {
            PreviewEvent::Item { image, .. } => image.size == 18 && image.rendered.is_none(),
            PreviewEvent::Finished { .. } => true,
        }));
    }

    #[test]
    fn test_drop_cancels_running_worker() {
        let cancel = CancelToken::new();
        let worker = PreviewWorker::spawn(
            producer(10_000, 1, cancel.clone()),
            renderer(12),
            3,
            Arc::new(|| {}),
        )
        .unwrap();
        assert_eq!(worker.total(), 10_000);
        drop(worker);
        assert!(cancel.is_cancelled());
    }
}
