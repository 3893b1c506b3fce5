//! In-memory messaging service that captures every dispatch for verification.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use herald_core::{
    AttachmentId, DispatchResult, MessageId, OutboundMessage, RemoteMessage, StreamId,
};
use herald_messaging::{MessageService, MessagingError};
use parking_lot::Mutex;
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::fixture::Fixture;

/// Which service call a message was dispatched through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPath {
    /// `send_text`: content only.
    Text,
    /// `send_message`: content plus attachments.
    WithAttachments,
}

/// An uploaded attachment, read to its end at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedAttachment {
    pub filename: String,
    pub data: Vec<u8>,
}

/// A message accepted by the service.
#[derive(Debug, Clone)]
pub struct CapturedSend {
    pub stream_id: StreamId,
    pub send_path: SendPath,
    pub content: String,
    pub attachments: Vec<CapturedAttachment>,
    /// Id handed back to the caller, if ids are enabled.
    pub message_id: Option<MessageId>,
}

/// Mode for simulating failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Never fail.
    #[default]
    Never,
    /// Fail every `send_text` and `send_message` call.
    OnSend,
    /// Fail every `get_message` call.
    OnGetMessage,
    /// Fail every `get_attachment` call.
    OnGetAttachment,
}

/// A messaging service backed by in-memory maps.
///
/// Stored messages and their base64 attachment payloads are seeded up front.
/// Sent messages are recorded and receive sequential ids (`m-1`, `m-2`, ...).
pub struct InMemoryMessageService {
    name: String,
    messages: HashMap<MessageId, RemoteMessage>,
    payloads: HashMap<(MessageId, AttachmentId), Bytes>,
    sent: Mutex<Vec<CapturedSend>>,
    attachment_requests: Mutex<Vec<(StreamId, MessageId, AttachmentId)>>,
    send_count: AtomicUsize,
    failure_mode: FailureMode,
    returns_ids: bool,
}

impl std::fmt::Debug for InMemoryMessageService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMessageService")
            .field("name", &self.name)
            .field("messages", &self.messages.len())
            .field("send_count", &self.send_count.load(Ordering::SeqCst))
            .field("failure_mode", &self.failure_mode)
            .finish_non_exhaustive()
    }
}

impl Default for InMemoryMessageService {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageService {
    pub fn new() -> Self {
        Self {
            name: "memory".to_owned(),
            messages: HashMap::new(),
            payloads: HashMap::new(),
            sent: Mutex::new(Vec::new()),
            attachment_requests: Mutex::new(Vec::new()),
            send_count: AtomicUsize::new(0),
            failure_mode: FailureMode::Never,
            returns_ids: true,
        }
    }

    /// Seed the store from a fixture.
    pub fn from_fixture(fixture: Fixture) -> Self {
        let mut service = Self::new();
        for message in fixture.messages {
            service = service.with_message(message);
        }
        for payload in fixture.attachments {
            service = service.with_attachment_payload(
                payload.message_id,
                payload.attachment_id,
                payload.data,
            );
        }
        service
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Store a message so it can be looked up by id.
    #[must_use]
    pub fn with_message(mut self, message: RemoteMessage) -> Self {
        self.messages.insert(message.message_id.clone(), message);
        self
    }

    /// Store the transport-encoded (base64) payload of an attachment.
    #[must_use]
    pub fn with_attachment_payload(
        mut self,
        message_id: impl Into<MessageId>,
        attachment_id: impl Into<AttachmentId>,
        encoded: impl Into<Bytes>,
    ) -> Self {
        self.payloads
            .insert((message_id.into(), attachment_id.into()), encoded.into());
        self
    }

    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Accept sends without reporting a message id back.
    #[must_use]
    pub fn without_message_ids(mut self) -> Self {
        self.returns_ids = false;
        self
    }

    /// All messages accepted so far, in dispatch order.
    pub fn sent(&self) -> Vec<CapturedSend> {
        self.sent.lock().clone()
    }

    pub fn last_sent(&self) -> Option<CapturedSend> {
        self.sent.lock().last().cloned()
    }

    /// Every `get_attachment` call as `(stream, message, attachment)`.
    pub fn attachment_requests(&self) -> Vec<(StreamId, MessageId, AttachmentId)> {
        self.attachment_requests.lock().clone()
    }

    /// Assert that exactly `n` messages were accepted.
    ///
    /// # Panics
    ///
    /// Panics if a different number of messages was sent.
    pub fn assert_sent(&self, n: usize) {
        let count = self.sent.lock().len();
        assert_eq!(
            count, n,
            "expected {n} messages sent through '{}', got {count}",
            self.name
        );
    }

    /// Assert that nothing was sent.
    ///
    /// # Panics
    ///
    /// Panics if any message was sent.
    pub fn assert_nothing_sent(&self) {
        self.assert_sent(0);
    }

    fn fail_if(&self, mode: FailureMode, call: &str) -> Result<(), MessagingError> {
        if self.failure_mode == mode {
            return Err(MessagingError::ExecutionFailed(format!(
                "simulated failure in {call}"
            )));
        }
        Ok(())
    }

    fn record(
        &self,
        stream_id: &StreamId,
        send_path: SendPath,
        content: String,
        attachments: Vec<CapturedAttachment>,
    ) -> DispatchResult {
        let number = self.send_count.fetch_add(1, Ordering::SeqCst) + 1;
        let message_id = self
            .returns_ids
            .then(|| MessageId::new(format!("m-{number}")));
        debug!(
            service = %self.name,
            %stream_id,
            ?send_path,
            attachment_count = attachments.len(),
            "captured send"
        );
        self.sent.lock().push(CapturedSend {
            stream_id: stream_id.clone(),
            send_path,
            content,
            attachments,
            message_id: message_id.clone(),
        });
        DispatchResult { message_id }
    }
}

impl MessageService for InMemoryMessageService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_text(
        &self,
        stream_id: &StreamId,
        content: &str,
    ) -> Result<DispatchResult, MessagingError> {
        self.fail_if(FailureMode::OnSend, "send_text")?;
        Ok(self.record(stream_id, SendPath::Text, content.to_owned(), Vec::new()))
    }

    async fn send_message(
        &self,
        stream_id: &StreamId,
        message: OutboundMessage,
    ) -> Result<DispatchResult, MessagingError> {
        self.fail_if(FailureMode::OnSend, "send_message")?;

        let OutboundMessage {
            content,
            attachments,
        } = message;
        let mut captured = Vec::with_capacity(attachments.len());
        for mut attachment in attachments {
            let mut data = Vec::new();
            attachment
                .content
                .read_to_end(&mut data)
                .await
                .map_err(|e| {
                    MessagingError::ExecutionFailed(format!(
                        "failed to read attachment {}: {e}",
                        attachment.filename
                    ))
                })?;
            captured.push(CapturedAttachment {
                filename: attachment.filename,
                data,
            });
        }
        Ok(self.record(stream_id, SendPath::WithAttachments, content, captured))
    }

    async fn get_message(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<RemoteMessage>, MessagingError> {
        self.fail_if(FailureMode::OnGetMessage, "get_message")?;
        Ok(self.messages.get(message_id).cloned())
    }

    async fn get_attachment(
        &self,
        stream_id: &StreamId,
        message_id: &MessageId,
        attachment_id: &AttachmentId,
    ) -> Result<Bytes, MessagingError> {
        self.attachment_requests.lock().push((
            stream_id.clone(),
            message_id.clone(),
            attachment_id.clone(),
        ));
        self.fail_if(FailureMode::OnGetAttachment, "get_attachment")?;
        self.payloads
            .get(&(message_id.clone(), attachment_id.clone()))
            .cloned()
            .ok_or_else(|| {
                MessagingError::NotFound(format!(
                    "attachment {attachment_id} of message {message_id}"
                ))
            })
    }
}
