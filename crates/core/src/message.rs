use serde::{Deserialize, Serialize};

use crate::types::{AttachmentId, MessageId, StreamId};

/// A message as stored by the remote messaging service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteMessage {
    pub message_id: MessageId,

    /// Conversation the message was posted in. Attachments must be fetched
    /// from this stream, not from the stream a new message is sent to.
    pub stream_id: StreamId,

    /// Attachment listing in the order the service returns it.
    #[serde(default)]
    pub attachments: Vec<AttachmentInfo>,
}

impl RemoteMessage {
    #[must_use]
    pub fn new(message_id: impl Into<MessageId>, stream_id: impl Into<StreamId>) -> Self {
        Self {
            message_id: message_id.into(),
            stream_id: stream_id.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentInfo) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Find an attachment by id.
    #[must_use]
    pub fn attachment(&self, id: &AttachmentId) -> Option<&AttachmentInfo> {
        self.attachments.iter().find(|a| &a.id == id)
    }
}

/// Descriptor of an attachment on a stored message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentInfo {
    pub id: AttachmentId,
    /// File name shown to users; reused when the attachment is forwarded.
    pub name: String,
    /// Size in bytes, as reported by the service.
    #[serde(default)]
    pub size: Option<u64>,
}

impl AttachmentInfo {
    #[must_use]
    pub fn new(id: impl Into<AttachmentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: None,
        }
    }
}

/// Result of sending a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    /// Id assigned by the service. Absent when the service did not return one.
    pub message_id: Option<MessageId>,
}

impl DispatchResult {
    #[must_use]
    pub fn sent(message_id: impl Into<MessageId>) -> Self {
        Self {
            message_id: Some(message_id.into()),
        }
    }

    #[must_use]
    pub fn without_id() -> Self {
        Self::default()
    }
}
