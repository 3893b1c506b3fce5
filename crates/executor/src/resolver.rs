use std::path::Path;

use herald_core::{AttachmentSpec, ResolvedAttachment};
use herald_messaging::{DynMessageService, ResourceLoader};
use tracing::debug;

use crate::error::ExecutorError;
use crate::fetcher::RemoteAttachmentFetcher;

/// Turns one attachment declaration into the attachments it contributes.
///
/// A declaration may contribute a local file, forwarded attachments, both,
/// or nothing. Local content always comes first.
pub struct AttachmentResolver<'a> {
    messages: &'a dyn DynMessageService,
    resources: &'a dyn ResourceLoader,
    fetcher: RemoteAttachmentFetcher<'a>,
}

impl<'a> AttachmentResolver<'a> {
    pub fn new(messages: &'a dyn DynMessageService, resources: &'a dyn ResourceLoader) -> Self {
        Self {
            messages,
            resources,
            fetcher: RemoteAttachmentFetcher::new(messages),
        }
    }

    pub async fn resolve(
        &self,
        spec: &AttachmentSpec,
    ) -> Result<Vec<ResolvedAttachment>, ExecutorError> {
        let mut resolved = Vec::new();
        if let Some(path) = spec.content_path.as_deref() {
            resolved.extend(self.resolve_local(path).await?);
        }
        self.resolve_forwarded(spec, &mut resolved).await?;
        Ok(resolved)
    }

    async fn resolve_local(&self, path: &str) -> Result<Option<ResolvedAttachment>, ExecutorError> {
        let Some(content) = self.resources.open(path).await? else {
            debug!(path, "resource has no content, skipping attachment");
            return Ok(None);
        };
        let filename = file_name(path);
        debug!(path, %filename, "attaching workflow resource");
        Ok(Some(ResolvedAttachment::new(filename, content)))
    }

    async fn resolve_forwarded(
        &self,
        spec: &AttachmentSpec,
        resolved: &mut Vec<ResolvedAttachment>,
    ) -> Result<(), ExecutorError> {
        let Some(message_id) = spec.message_id.as_ref() else {
            return Ok(());
        };

        let source = self.messages.get_message(message_id).await?.ok_or_else(|| {
            ExecutorError::MessageNotFound {
                message_id: message_id.clone(),
            }
        })?;

        match spec.attachment_id.as_ref() {
            Some(attachment_id) => {
                if source.attachments.is_empty() {
                    return Err(ExecutorError::NoAttachments {
                        message_id: source.message_id.clone(),
                    });
                }
                let info = source.attachment(attachment_id).ok_or_else(|| {
                    ExecutorError::AttachmentNotFound {
                        attachment_id: attachment_id.clone(),
                        message_id: message_id.clone(),
                    }
                })?;
                resolved.push(self.fetcher.fetch_resolved(&source, info).await?);
            }
            None => {
                debug!(
                    %message_id,
                    attachment_count = source.attachments.len(),
                    "forwarding all attachments"
                );
                for info in &source.attachments {
                    resolved.push(self.fetcher.fetch_resolved(&source, info).await?);
                }
            }
        }
        Ok(())
    }
}

/// Last path segment, used as the uploaded file name.
fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_owned()
}
