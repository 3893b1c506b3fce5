use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::{Engine, alphabet};
use herald_core::{AttachmentInfo, RemoteMessage, ResolvedAttachment, stream_from_bytes};
use herald_messaging::DynMessageService;
use tracing::{debug, instrument};

use crate::error::ExecutorError;

/// Standard alphabet, `=` padding optional on decode.
const TRANSPORT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Downloads attachments of stored messages so they can be forwarded.
pub struct RemoteAttachmentFetcher<'a> {
    messages: &'a dyn DynMessageService,
}

impl<'a> RemoteAttachmentFetcher<'a> {
    pub fn new(messages: &'a dyn DynMessageService) -> Self {
        Self { messages }
    }

    /// Download an attachment and decode it from base64.
    ///
    /// The attachment is fetched from the stream the source message lives
    /// in, which may differ from the destination of the new message.
    #[instrument(
        skip(self, source, attachment),
        fields(message_id = %source.message_id, attachment_id = %attachment.id)
    )]
    pub async fn fetch(
        &self,
        source: &RemoteMessage,
        attachment: &AttachmentInfo,
    ) -> Result<Vec<u8>, ExecutorError> {
        let encoded = self
            .messages
            .get_attachment(&source.stream_id, &source.message_id, &attachment.id)
            .await?;

        let decoded = TRANSPORT
            .decode(&encoded)
            .map_err(|source_err| ExecutorError::Decode {
                attachment_id: attachment.id.clone(),
                message_id: source.message_id.clone(),
                source: source_err,
            })?;

        debug!(
            encoded_len = encoded.len(),
            decoded_len = decoded.len(),
            "fetched remote attachment"
        );
        Ok(decoded)
    }

    /// Fetch an attachment and wrap it under its original file name.
    pub async fn fetch_resolved(
        &self,
        source: &RemoteMessage,
        attachment: &AttachmentInfo,
    ) -> Result<ResolvedAttachment, ExecutorError> {
        let data = self.fetch(source, attachment).await?;
        Ok(ResolvedAttachment::new(
            attachment.name.clone(),
            stream_from_bytes(data),
        ))
    }
}
