use herald_core::{OutboundMessage, SendMessageSpec};
use herald_messaging::{DynMessageService, ResourceLoader};
use tracing::debug;

use crate::error::ExecutorError;
use crate::resolver::AttachmentResolver;

/// Builds the outbound message for a send-message activity.
pub struct MessageComposer<'a> {
    resolver: AttachmentResolver<'a>,
}

impl<'a> MessageComposer<'a> {
    pub fn new(messages: &'a dyn DynMessageService, resources: &'a dyn ResourceLoader) -> Self {
        Self {
            resolver: AttachmentResolver::new(messages, resources),
        }
    }

    /// Compose the message: the activity content followed by every
    /// attachment declaration resolved in order.
    ///
    /// The first failing declaration aborts composition; attachments
    /// resolved so far are dropped with the partial message.
    pub async fn compose(&self, spec: &SendMessageSpec) -> Result<OutboundMessage, ExecutorError> {
        let mut message = OutboundMessage::new(spec.content.clone());
        for attachment in &spec.attachments {
            for resolved in self.resolver.resolve(attachment).await? {
                message.push_attachment(resolved);
            }
        }
        debug!(
            content_len = message.content.len(),
            attachment_count = message.attachments.len(),
            "composed outbound message"
        );
        Ok(message)
    }
}
