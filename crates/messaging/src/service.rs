use async_trait::async_trait;
use bytes::Bytes;
use herald_core::{AttachmentId, DispatchResult, MessageId, OutboundMessage, RemoteMessage, StreamId};

use crate::error::MessagingError;

/// Strongly-typed messaging service trait with native `async fn`.
///
/// This trait is **not** object-safe because it uses native `async fn` methods
/// (which desugar to opaque `impl Future` return types). If you need dynamic
/// dispatch, use [`DynMessageService`] instead -- every `MessageService`
/// automatically implements `DynMessageService` via a blanket implementation.
pub trait MessageService: Send + Sync {
    /// Returns the name of this service, used in logs.
    fn name(&self) -> &str;

    /// Post a text-only message to a stream.
    fn send_text(
        &self,
        stream_id: &StreamId,
        content: &str,
    ) -> impl std::future::Future<Output = Result<DispatchResult, MessagingError>> + Send;

    /// Post a message with attachments to a stream.
    ///
    /// Takes ownership of the message so the attachment streams are released
    /// as soon as the call completes, whether it succeeds or fails.
    fn send_message(
        &self,
        stream_id: &StreamId,
        message: OutboundMessage,
    ) -> impl std::future::Future<Output = Result<DispatchResult, MessagingError>> + Send;

    /// Look up a stored message. Returns `None` if it does not exist.
    fn get_message(
        &self,
        message_id: &MessageId,
    ) -> impl std::future::Future<Output = Result<Option<RemoteMessage>, MessagingError>> + Send;

    /// Download one attachment of a stored message, still in its base64
    /// transport encoding.
    fn get_attachment(
        &self,
        stream_id: &StreamId,
        message_id: &MessageId,
        attachment_id: &AttachmentId,
    ) -> impl std::future::Future<Output = Result<Bytes, MessagingError>> + Send;
}

/// Object-safe messaging service trait for use behind `Arc<dyn DynMessageService>`.
///
/// Uses [`macro@async_trait`] to enable dynamic dispatch of async methods.
/// You generally should not implement this trait directly -- instead implement
/// [`MessageService`] and rely on the blanket implementation.
#[async_trait]
pub trait DynMessageService: Send + Sync {
    fn name(&self) -> &str;

    async fn send_text(
        &self,
        stream_id: &StreamId,
        content: &str,
    ) -> Result<DispatchResult, MessagingError>;

    async fn send_message(
        &self,
        stream_id: &StreamId,
        message: OutboundMessage,
    ) -> Result<DispatchResult, MessagingError>;

    async fn get_message(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<RemoteMessage>, MessagingError>;

    async fn get_attachment(
        &self,
        stream_id: &StreamId,
        message_id: &MessageId,
        attachment_id: &AttachmentId,
    ) -> Result<Bytes, MessagingError>;
}

/// Blanket implementation: any type that implements [`MessageService`] also
/// implements [`DynMessageService`], bridging the static and dynamic dispatch
/// worlds.
#[async_trait]
impl<T: MessageService + Sync> DynMessageService for T {
    fn name(&self) -> &str {
        MessageService::name(self)
    }

    async fn send_text(
        &self,
        stream_id: &StreamId,
        content: &str,
    ) -> Result<DispatchResult, MessagingError> {
        MessageService::send_text(self, stream_id, content).await
    }

    async fn send_message(
        &self,
        stream_id: &StreamId,
        message: OutboundMessage,
    ) -> Result<DispatchResult, MessagingError> {
        MessageService::send_message(self, stream_id, message).await
    }

    async fn get_message(
        &self,
        message_id: &MessageId,
    ) -> Result<Option<RemoteMessage>, MessagingError> {
        MessageService::get_message(self, message_id).await
    }

    async fn get_attachment(
        &self,
        stream_id: &StreamId,
        message_id: &MessageId,
        attachment_id: &AttachmentId,
    ) -> Result<Bytes, MessagingError> {
        MessageService::get_attachment(self, stream_id, message_id, attachment_id).await
    }
}
