use std::sync::Arc;

use herald_core::SendMessageSpec;
use tracing::{debug, info, instrument};

use crate::activity::ActivityExecutor;
use crate::composer::MessageComposer;
use crate::context::ActivityContext;
use crate::error::ExecutorError;
use crate::stream::StreamIdResolver;

/// Executes the `send-message` activity.
///
/// Resolves the destination stream, composes the message with its
/// attachments, sends it and records the id of the sent message as the
/// `msgId` output variable.
#[derive(Debug, Default, Clone, Copy)]
pub struct SendMessageExecutor;

impl SendMessageExecutor {
    /// Output variable holding the id of the sent message.
    pub const OUTPUT_MESSAGE_ID_KEY: &'static str = "msgId";

    pub fn new() -> Self {
        Self
    }
}

impl ActivityExecutor for SendMessageExecutor {
    type Activity = SendMessageSpec;

    #[instrument(skip(self, activity, ctx), fields(activity_id = %ctx.activity_id()))]
    async fn execute(
        &self,
        activity: &SendMessageSpec,
        ctx: &mut ActivityContext,
    ) -> Result<(), ExecutorError> {
        let stream_id = StreamIdResolver::resolve(activity, ctx.event())?;
        debug!(%stream_id, "sending message to stream");

        let messages = Arc::clone(ctx.messages());
        let resources = Arc::clone(ctx.resources());

        let message = MessageComposer::new(messages.as_ref(), resources.as_ref())
            .compose(activity)
            .await?;

        // The message is moved into the send call, which releases the
        // attachment streams whether it succeeds or fails.
        let result = if message.has_attachments() {
            let attachment_count = message.attachments.len();
            debug!(%stream_id, attachment_count, send_path = "attachments", "dispatching");
            messages.send_message(&stream_id, message).await?
        } else {
            debug!(%stream_id, send_path = "text", "dispatching");
            messages.send_text(&stream_id, &message.content).await?
        };

        match result.message_id {
            Some(message_id) => {
                let output = ctx.qualified_name(Self::OUTPUT_MESSAGE_ID_KEY);
                info!(%stream_id, %message_id, %output, "message sent");
                ctx.set_output_variable(Self::OUTPUT_MESSAGE_ID_KEY, message_id.as_str());
            }
            None => {
                info!(%stream_id, "message sent, no message id returned");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use herald_core::{AttachmentInfo, AttachmentSpec, MessageSentEvent, RemoteMessage};
    use herald_messaging::MessagingError;
    use herald_simulation::{FailureMode, InMemoryMessageService, MemoryResourceLoader, SendPath};

    use super::*;

    fn context(
        service: &Arc<InMemoryMessageService>,
        resources: &Arc<MemoryResourceLoader>,
    ) -> ActivityContext {
        ActivityContext::new("send", service.clone(), resources.clone())
    }

    #[tokio::test]
    async fn text_only_uses_the_text_path() {
        let service = Arc::new(InMemoryMessageService::new());
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources);

        let spec = SendMessageSpec::new("").to_stream("S1");
        SendMessageExecutor::new().execute(&spec, &mut ctx).await.unwrap();

        let sent = service.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].send_path, SendPath::Text);
        assert_eq!(sent[0].content, "");
        assert!(ctx.output_variable("msgId").is_some());
    }

    #[tokio::test]
    async fn message_id_is_published_under_the_activity_scope() {
        let service = Arc::new(InMemoryMessageService::new());
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources);

        let spec = SendMessageSpec::new("hi").to_stream("S1");
        SendMessageExecutor::new().execute(&spec, &mut ctx).await.unwrap();

        let sent_id = service.sent()[0].message_id.clone().unwrap();
        assert_eq!(
            ctx.qualified_name(SendMessageExecutor::OUTPUT_MESSAGE_ID_KEY),
            "send.outputs.msgId"
        );
        assert_eq!(
            ctx.output_variable(SendMessageExecutor::OUTPUT_MESSAGE_ID_KEY),
            Some(&serde_json::json!(sent_id.as_str()))
        );
    }

    #[tokio::test]
    async fn attachments_use_the_attachment_path() {
        let service = Arc::new(InMemoryMessageService::new());
        let resources =
            Arc::new(MemoryResourceLoader::new().with_resource("/tmp/a.png", vec![1u8; 10]));
        let mut ctx = context(&service, &resources);

        let spec = SendMessageSpec::new("hi")
            .to_stream("S1")
            .with_attachment(AttachmentSpec::local("/tmp/a.png"));
        SendMessageExecutor::new().execute(&spec, &mut ctx).await.unwrap();

        let sent = service.sent();
        assert_eq!(sent[0].send_path, SendPath::WithAttachments);
        assert_eq!(sent[0].attachments[0].filename, "a.png");
        assert_eq!(resources.open_streams(), 0);
    }

    #[tokio::test]
    async fn missing_resource_falls_back_to_the_text_path() {
        let service = Arc::new(InMemoryMessageService::new());
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources);

        let spec = SendMessageSpec::new("hi")
            .to_stream("S1")
            .with_attachment(AttachmentSpec::local("/tmp/none.png"));
        SendMessageExecutor::new().execute(&spec, &mut ctx).await.unwrap();

        assert_eq!(service.sent()[0].send_path, SendPath::Text);
    }

    #[tokio::test]
    async fn stream_comes_from_the_triggering_message() {
        let service = Arc::new(InMemoryMessageService::new());
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources).with_event(MessageSentEvent {
            message: RemoteMessage::new("M0", "room/with+chars=="),
        });

        SendMessageExecutor::new()
            .execute(&SendMessageSpec::new("pong"), &mut ctx)
            .await
            .unwrap();

        assert_eq!(service.sent()[0].stream_id.as_str(), "room_with-chars");
    }

    #[tokio::test]
    async fn no_destination_sends_nothing() {
        let service = Arc::new(InMemoryMessageService::new());
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources);

        let err = SendMessageExecutor::new()
            .execute(&SendMessageSpec::new("hi"), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutorError::NoDestination));
        assert!(service.sent().is_empty());
        assert!(ctx.outputs().is_empty());
    }

    #[tokio::test]
    async fn missing_message_id_writes_no_variable() {
        let service = Arc::new(InMemoryMessageService::new().without_message_ids());
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources);

        SendMessageExecutor::new()
            .execute(&SendMessageSpec::new("hi").to_stream("S1"), &mut ctx)
            .await
            .unwrap();

        assert_eq!(service.sent().len(), 1);
        assert!(ctx.output_variable(SendMessageExecutor::OUTPUT_MESSAGE_ID_KEY).is_none());
    }

    #[tokio::test]
    async fn dispatch_failure_propagates_and_releases_streams() {
        let service =
            Arc::new(InMemoryMessageService::new().with_failure_mode(FailureMode::OnSend));
        let resources =
            Arc::new(MemoryResourceLoader::new().with_resource("/a.png", b"a".to_vec()));
        let mut ctx = context(&service, &resources);

        let spec = SendMessageSpec::new("hi")
            .to_stream("S1")
            .with_attachment(AttachmentSpec::local("/a.png"));
        let err = SendMessageExecutor::new().execute(&spec, &mut ctx).await.unwrap_err();

        assert!(matches!(
            err,
            ExecutorError::Transport(MessagingError::ExecutionFailed(_))
        ));
        assert_eq!(resources.opened(), 1);
        assert_eq!(resources.open_streams(), 0);
        assert!(ctx.outputs().is_empty());
    }

    #[tokio::test]
    async fn forwarded_attachment_missing_sends_nothing() {
        let service = Arc::new(InMemoryMessageService::new().with_message(
            RemoteMessage::new("M1", "S-src").with_attachment(AttachmentInfo::new("a", "a.txt")),
        ));
        let resources = Arc::new(MemoryResourceLoader::new());
        let mut ctx = context(&service, &resources);

        let spec = SendMessageSpec::new("fwd")
            .to_stream("S1")
            .with_attachment(AttachmentSpec::forward_one("M1", "b"));
        let err = SendMessageExecutor::new().execute(&spec, &mut ctx).await.unwrap_err();

        assert!(matches!(err, ExecutorError::AttachmentNotFound { .. }));
        assert!(service.sent().is_empty());
    }
}
