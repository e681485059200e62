//! Chunked, cancellable stream of preview items.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Cooperative cancellation flag shared between the UI thread and a worker.
///
/// Single writer (UI), any number of readers. Cancellation is sticky.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One font ready to be previewed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewItem {
    pub font_name: String,
    pub sample_text: String,
    /// Position of `font_name` in the list the producer was built from
    pub index: usize,
}

/// Lazily yields one [`PreviewItem`] per font, in input order.
///
/// After every complete chunk of `chunk_size` items, and only when more items
/// remain, the producer sleeps for `chunk_pause` so the consumer gets a chance
/// to catch up. The cancel token is checked before every item and again after
/// every pause; once it is set the iterator is exhausted.
///
/// A producer runs once. Start a new one for a changed list.
#[derive(Debug)]
pub struct PreviewProducer {
    fonts: Arc<[String]>,
    sample_text: String,
    chunk_size: usize,
    chunk_pause: Duration,
    cancel: CancelToken,
    next: usize,
}

impl PreviewProducer {
    pub fn new(
        fonts: Arc<[String]>,
        sample_text: impl Into<String>,
        chunk_size: usize,
        chunk_pause: Duration,
        cancel: CancelToken,
    ) -> Self {
        Self {
            fonts,
            sample_text: sample_text.into(),
            chunk_size: chunk_size.max(1),
            chunk_pause,
            cancel,
            next: 0,
        }
    }

    /// Number of fonts this producer was built over.
    pub fn total(&self) -> usize {
        self.fonts.len()
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }
}

impl Iterator for PreviewProducer {
    type Item = PreviewItem;

    fn next(&mut self) -> Option<PreviewItem> {
        if self.cancel.is_cancelled() || self.next >= self.fonts.len() {
            return None;
        }

        if self.next > 0 && self.next % self.chunk_size == 0 {
            if !self.chunk_pause.is_zero() {
                std::thread::sleep(self.chunk_pause);
            }
            if self.cancel.is_cancelled() {
                return None;
            }
        }

        let index = self.next;
        self.next += 1;
        Some(PreviewItem {
            font_name: self.fonts[index].clone(),
            sample_text: self.sample_text.clone(),
            index,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.fonts.len() - self.next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn fonts(n: usize) -> Arc<[String]> {
        (0..n).map(|i| format!("Font {i}")).collect()
    }

    #[test]
    fn test_yields_every_font_in_order() {
        let producer =
            PreviewProducer::new(fonts(7), "Hi", 3, Duration::ZERO, CancelToken::new());
        let items: Vec<PreviewItem> = producer.collect();
        assert_eq!(items.len(), 7);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.index, i);
            assert_eq!(item.font_name, format!("Font {i}"));
            assert_eq!(item.sample_text, "Hi");
        }
    }

    #[test]
    fn test_cancel_stops_production() {
        let cancel = CancelToken::new();
        let mut producer = PreviewProducer::new(fonts(10), "Hi", 2, Duration::ZERO, cancel.clone());
        assert_eq!(producer.next().map(|i| i.index), Some(0));
        cancel.cancel();
        assert!(producer.next().is_none());
        assert!(producer.next().is_none());
    }

    #[test]
    fn test_pauses_between_chunks_only() {
        // 4 items in chunks of 2: exactly one pause (before item 2)
        let pause = Duration::from_millis(40);
        let start = Instant::now();
        let count = PreviewProducer::new(fonts(4), "Hi", 2, pause, CancelToken::new()).count();
        let elapsed = start.elapsed();
        assert_eq!(count, 4);
        assert!(elapsed >= pause);
        assert!(elapsed < pause * 2 + Duration::from_millis(500));
    }

    #[test]
    fn test_zero_chunk_size_is_treated_as_one() {
        let producer = PreviewProducer::new(fonts(3), "Hi", 0, Duration::ZERO, CancelToken::new());
        assert_eq!(producer.count(), 3);
    }

    #[test]
    fn test_empty_list() {
        let mut producer =
            PreviewProducer::new(fonts(0), "Hi", 5, Duration::ZERO, CancelToken::new());
        assert_eq!(producer.total(), 0);
        assert!(producer.next().is_none());
    }
}
