//! The `send-message` workflow activity.
//!
//! [`SendMessageExecutor`] resolves the destination stream, gathers local and
//! forwarded attachments, sends the message through the messaging service and
//! records the sent message id as the `msgId` output variable.

pub mod activity;
pub mod composer;
pub mod context;
pub mod error;
pub mod fetcher;
pub mod resolver;
pub mod send_message;
pub mod stream;

pub use activity::ActivityExecutor;
pub use composer::MessageComposer;
pub use context::{ActivityContext, OutputVariables};
pub use error::ExecutorError;
pub use fetcher::RemoteAttachmentFetcher;
pub use resolver::AttachmentResolver;
pub use send_message::SendMessageExecutor;
pub use stream::StreamIdResolver;
