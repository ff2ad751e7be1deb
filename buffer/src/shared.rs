//! Mutex-guarded stream handle for producer and consumer threads.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

/// A cloneable handle to a stream behind a mutex.
///
/// Streams do no locking of their own. When the producer and the consumer
/// run on different threads, both hold a `SharedStream` and lock it around
/// each operation. Spans handed out by `reserve` or `peek` borrow the guard,
/// so they cannot outlive the lock.
///
/// ```
/// use pcmpipe_audio::AudioFormat;
/// use pcmpipe_buffer::{AbstractStream, SharedStream, StandardAllocator, Stream};
///
/// let shared = SharedStream::new(Stream::new(AudioFormat::MONO_8K_16, &StandardAllocator, 2, 4));
/// let producer = shared.clone();
///
/// std::thread::spawn(move || {
///     assert!(producer.lock().push(&[1, 2]));
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(shared.lock().used_block_count(), 1);
/// ```
#[derive(Debug)]
pub struct SharedStream<S> {
    inner: Arc<Mutex<S>>,
}

impl<S> SharedStream<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(stream)),
        }
    }

    /// Locks the stream, blocking until it is available.
    pub fn lock(&self) -> MutexGuard<'_, S> {
        self.inner.lock()
    }

    /// Locks the stream if no other handle holds it.
    pub fn try_lock(&self) -> Option<MutexGuard<'_, S>> {
        self.inner.try_lock()
    }
}

impl<S> Clone for SharedStream<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AbstractStream, StandardAllocator, Stream};
    use pcmpipe_audio::AudioFormat;
    use std::thread;

    const BLOCKS: usize = 200;

    #[test]
    fn test_producer_consumer_threads() {
        let shared = SharedStream::new(Stream::new(
            AudioFormat::MONO_16K_16,
            &StandardAllocator,
            4,
            8,
        ));

        let producer = {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut next = 0u32;
                while (next as usize) < BLOCKS {
                    let mut stream = shared.lock();
                    let written = match stream.reserve() {
                        Some(block) => {
                            block.copy_from_slice(&next.to_le_bytes());
                            true
                        }
                        None => false,
                    };
                    if written {
                        stream.commit();
                        next += 1;
                    } else {
                        drop(stream);
                        thread::yield_now();
                    }
                }
            })
        };

        let mut received = Vec::with_capacity(BLOCKS);
        while received.len() < BLOCKS {
            let mut stream = shared.lock();
            let value = stream
                .peek()
                .map(|block| u32::from_le_bytes([block[0], block[1], block[2], block[3]]));
            match value {
                Some(v) => {
                    stream.consume();
                    received.push(v);
                }
                None => {
                    drop(stream);
                    thread::yield_now();
                }
            }
        }

        producer.join().unwrap();
        let expected: Vec<u32> = (0..BLOCKS as u32).collect();
        assert_eq!(received, expected);
        assert!(shared.lock().is_empty());
    }

    #[test]
    fn test_try_lock() {
        let shared = SharedStream::new(Stream::new(
            AudioFormat::MONO_16K_16,
            &StandardAllocator,
            4,
            2,
        ));
        let guard = shared.lock();
        assert!(shared.try_lock().is_none());
        drop(guard);
        assert!(shared.try_lock().is_some());
    }
}
