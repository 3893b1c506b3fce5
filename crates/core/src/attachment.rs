use std::fmt;
use std::io::Cursor;
use std::pin::Pin;

use tokio::io::AsyncRead;

/// An owned, single-read byte stream backing one attachment.
///
/// The underlying resource (file handle, buffer) is released when the stream
/// is dropped.
pub type AttachmentStream = Pin<Box<dyn AsyncRead + Send + Sync>>;

/// Wrap an in-memory buffer as an [`AttachmentStream`].
pub fn stream_from_bytes(data: impl Into<Vec<u8>>) -> AttachmentStream {
    Box::pin(Cursor::new(data.into()))
}

/// An attachment ready to be uploaded with an outbound message.
pub struct ResolvedAttachment {
    /// File name presented to recipients.
    pub filename: String,
    /// Attachment bytes. Consumed once by the dispatch call.
    pub content: AttachmentStream,
}

impl ResolvedAttachment {
    #[must_use]
    pub fn new(filename: impl Into<String>, content: AttachmentStream) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

impl fmt::Debug for ResolvedAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAttachment")
            .field("filename", &self.filename)
            .field("content", &"<stream>")
            .finish()
    }
}

/// A fully composed message: text plus attachments in declaration order.
///
/// Owns the attachment streams; moving it into a send call hands them over,
/// and dropping it on any path releases them.
#[derive(Debug, Default)]
pub struct OutboundMessage {
    pub content: String,
    pub attachments: Vec<ResolvedAttachment>,
}

impl OutboundMessage {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachments: Vec::new(),
        }
    }

    pub fn push_attachment(&mut self, attachment: ResolvedAttachment) {
        self.attachments.push(attachment);
    }

    #[must_use]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Attachment file names in order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.attachments.iter().map(|a| a.filename.as_str())
    }
}
