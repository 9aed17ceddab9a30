//! The raw line store.
//!
//! Lines are append-only and immutable once complete. Reader tasks feed
//! byte chunks from whatever source (file tail, pipe, decompressor) on
//! their own threads; the UI thread reads under a short read lock. The
//! only mutation after append is completing the open tail line when its
//! newline arrives.

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::{Mutex, RwLock};

/// Store change notifications for follow mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The store now holds this many lines.
    Appended(usize),
    /// The store was truncated to this many lines (reload).
    Truncated(usize),
}

#[derive(Debug, Default)]
struct RawLine {
    bytes: Vec<u8>,
    complete: bool,
}

#[derive(Debug, Default)]
struct StoreInner {
    lines: Vec<RawLine>,
    /// Bumped whenever existing lines are invalidated (truncation), so
    /// memoized built lines can notice and drop their entries.
    generation: u64,
}

/// Append-only store of raw input lines.
#[derive(Debug, Default)]
pub struct LineStore {
    inner: RwLock<StoreInner>,
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl LineStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled from a string, one line per `\n`.
    ///
    /// Used by tests and by callers with fully-buffered input. A
    /// trailing newline does not create an empty final line.
    #[must_use]
    pub fn from_str(content: &str) -> Self {
        let store = Self::new();
        store.feed(content.as_bytes());
        store.close();
        store
    }

    /// Number of lines (including an incomplete tail line).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().lines.len()
    }

    /// Whether the store holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().lines.is_empty()
    }

    /// Run `f` over a line's bytes and completeness without copying.
    ///
    /// Returns `None` for out-of-range line numbers.
    pub fn with_line<R>(&self, ln: usize, f: impl FnOnce(&[u8], bool) -> R) -> Option<R> {
        let inner = self.inner.read();
        inner.lines.get(ln).map(|line| f(&line.bytes, line.complete))
    }

    /// A line's text, lossily decoded. `None` when out of range.
    #[must_use]
    pub fn text(&self, ln: usize) -> Option<String> {
        self.with_line(ln, |bytes, _| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Feed a chunk of raw bytes, splitting on `\n`.
    ///
    /// CRLF endings are normalized away. A chunk ending mid-line leaves
    /// an incomplete tail that later chunks extend.
    pub fn feed(&self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        let len = {
            let mut inner = self.inner.write();
            let mut rest = chunk;
            while let Some(nl) = rest.iter().position(|&b| b == b'\n') {
                let (segment, tail) = rest.split_at(nl);
                rest = &tail[1..];
                let segment = segment.strip_suffix(b"\r").unwrap_or(segment);
                match inner.lines.last_mut().filter(|l| !l.complete) {
                    Some(line) => {
                        line.bytes.extend_from_slice(segment);
                        // A CR that arrived at the end of a previous
                        // chunk belongs to this newline.
                        if segment.is_empty() && line.bytes.last() == Some(&b'\r') {
                            line.bytes.pop();
                        }
                        line.complete = true;
                    }
                    None => inner.lines.push(RawLine {
                        bytes: segment.to_vec(),
                        complete: true,
                    }),
                }
            }
            if !rest.is_empty() {
                match inner.lines.last_mut().filter(|l| !l.complete) {
                    Some(line) => line.bytes.extend_from_slice(rest),
                    None => inner.lines.push(RawLine {
                        bytes: rest.to_vec(),
                        complete: false,
                    }),
                }
            }
            inner.lines.len()
        };
        self.notify(StoreEvent::Appended(len));
    }

    /// Mark the open tail line, if any, as complete (end of input).
    pub fn close(&self) {
        let mut inner = self.inner.write();
        if let Some(line) = inner.lines.last_mut() {
            line.complete = true;
        }
    }

    /// Invalidation generation: changes whenever existing lines may
    /// have changed identity (truncation).
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Drop all lines from `len` on (source reload or shrink).
    pub fn truncate(&self, len: usize) {
        {
            let mut inner = self.inner.write();
            if len >= inner.lines.len() {
                return;
            }
            inner.lines.truncate(len);
            inner.generation += 1;
        }
        tracing::debug!(len, "line store truncated");
        self.notify(StoreEvent::Truncated(len));
    }

    /// Subscribe to append/truncate events (follow mode).
    #[must_use]
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    fn notify(&self, event: StoreEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event).is_ok());
    }
}
