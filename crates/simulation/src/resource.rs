//! In-memory resource loader that tracks how many streams are still open.

use std::collections::HashMap;
use std::io::Cursor;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll};

use async_trait::async_trait;
use herald_core::AttachmentStream;
use herald_messaging::{MessagingError, ResourceLoader};
use tokio::io::{AsyncRead, ReadBuf};

/// Serves workflow resources from a path to bytes map.
///
/// Every stream handed out is counted as open until it is dropped, so tests
/// can check that no exit path leaks one.
#[derive(Debug, Default)]
pub struct MemoryResourceLoader {
    resources: HashMap<String, Vec<u8>>,
    opened: AtomicUsize,
    open_streams: Arc<AtomicUsize>,
}

impl MemoryResourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_resource(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.resources.insert(path.into(), data.into());
        self
    }

    /// Number of streams opened so far.
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// Number of streams opened and not yet dropped.
    pub fn open_streams(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceLoader for MemoryResourceLoader {
    async fn open(&self, path: &str) -> Result<Option<AttachmentStream>, MessagingError> {
        let Some(data) = self.resources.get(path) else {
            return Ok(None);
        };
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Some(Box::pin(TrackedStream {
            inner: Cursor::new(data.clone()),
            open_streams: Arc::clone(&self.open_streams),
        })))
    }
}

struct TrackedStream {
    inner: Cursor<Vec<u8>>,
    open_streams: Arc<AtomicUsize>,
}

impl AsyncRead for TrackedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl Drop for TrackedStream {
    fn drop(&mut self) {
        self.open_streams.fetch_sub(1, Ordering::SeqCst);
    }
}
