use herald_core::{AttachmentId, MessageId};
use herald_messaging::MessagingError;
use thiserror::Error;

/// Errors that abort an activity execution.
///
/// None of these are retried inside the executor; they are surfaced to the
/// workflow engine, which marks the activity as failed.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// Neither the activity nor the triggering event names a stream.
    #[error("no stream id set to send a message")]
    NoDestination,

    /// The message to forward attachments from does not exist.
    #[error("message with id {message_id} not found")]
    MessageNotFound { message_id: MessageId },

    /// A specific attachment was requested from a message that has none.
    #[error("no attachment in requested message with id {message_id}")]
    NoAttachments { message_id: MessageId },

    /// The requested attachment is not part of the referenced message.
    #[error("no attachment with id {attachment_id} found in message with id {message_id}")]
    AttachmentNotFound {
        attachment_id: AttachmentId,
        message_id: MessageId,
    },

    /// The attachment payload returned by the service is not valid base64.
    #[error("failed to decode attachment {attachment_id} of message {message_id}: {source}")]
    Decode {
        attachment_id: AttachmentId,
        message_id: MessageId,
        #[source]
        source: base64::DecodeError,
    },

    /// The messaging service or resource loader failed.
    #[error("messaging error: {0}")]
    Transport(#[from] MessagingError),
}

impl ExecutorError {
    /// Short, stable error code suitable for workflow variables and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoDestination => "NO_DESTINATION",
            Self::MessageNotFound { .. } => "MESSAGE_NOT_FOUND",
            Self::NoAttachments { .. } => "NO_ATTACHMENTS",
            Self::AttachmentNotFound { .. } => "ATTACHMENT_NOT_FOUND",
            Self::Decode { .. } => "DECODE_FAILURE",
            Self::Transport(_) => "TRANSPORT_FAILURE",
        }
    }
}
