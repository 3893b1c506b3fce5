use serde::{Deserialize, Serialize};

use crate::types::{AttachmentId, MessageId, StreamId};

/// Configuration of a `send-message` workflow activity.
///
/// Deserialized from the workflow definition, for example:
///
/// ```yaml
/// content: "Hello"
/// to:
///   stream-id: abc
/// attachments:
///   - content-path: /reports/weekly.pdf
///   - message-id: MSG1
///     attachment-id: ATT1
/// ```
///
/// Both `kebab-case` and `camelCase` keys are accepted for the nested fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageSpec {
    /// Message body as authored in the workflow.
    #[serde(default)]
    pub content: String,

    /// Explicit destination. When absent the destination is inferred from
    /// the event that triggered the workflow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Recipient>,

    /// Attachments to include, in declaration order.
    #[serde(default)]
    pub attachments: Vec<AttachmentSpec>,
}

impl SendMessageSpec {
    /// Create a spec carrying only text content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Send to the given stream instead of inferring it from the event.
    #[must_use]
    pub fn to_stream(mut self, stream_id: impl Into<StreamId>) -> Self {
        self.to = Some(Recipient {
            stream_id: Some(stream_id.into()),
        });
        self
    }

    /// Append an attachment declaration.
    #[must_use]
    pub fn with_attachment(mut self, attachment: AttachmentSpec) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// The explicitly configured stream id, if set and non-empty.
    #[must_use]
    pub fn explicit_stream_id(&self) -> Option<&StreamId> {
        self.to
            .as_ref()
            .and_then(|to| to.stream_id.as_ref())
            .filter(|id| !id.is_empty())
    }
}

/// Destination of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default, alias = "stream-id", skip_serializing_if = "Option::is_none")]
    pub stream_id: Option<StreamId>,
}

/// One attachment declaration.
///
/// `content_path` and `message_id` are independent: when both are set, the
/// local file and the forwarded attachment(s) are all included, local first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentSpec {
    /// Path of a workflow resource to upload.
    #[serde(default, alias = "content-path", skip_serializing_if = "Option::is_none")]
    pub content_path: Option<String>,

    /// Message to forward attachments from.
    #[serde(default, alias = "message-id", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,

    /// Single attachment to forward from `message_id`. When absent, every
    /// attachment of that message is forwarded.
    #[serde(
        default,
        alias = "attachment-id",
        skip_serializing_if = "Option::is_none"
    )]
    pub attachment_id: Option<AttachmentId>,
}

impl AttachmentSpec {
    /// Upload a local workflow resource.
    #[must_use]
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            content_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Forward every attachment of a stored message.
    #[must_use]
    pub fn forward_all(message_id: impl Into<MessageId>) -> Self {
        Self {
            message_id: Some(message_id.into()),
            ..Self::default()
        }
    }

    /// Forward one attachment of a stored message.
    #[must_use]
    pub fn forward_one(
        message_id: impl Into<MessageId>,
        attachment_id: impl Into<AttachmentId>,
    ) -> Self {
        Self {
            content_path: None,
            message_id: Some(message_id.into()),
            attachment_id: Some(attachment_id.into()),
        }
    }
}
