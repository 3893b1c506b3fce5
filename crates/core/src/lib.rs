pub mod activity;
pub mod attachment;
pub mod event;
pub mod message;
pub mod types;

pub use activity::{AttachmentSpec, Recipient, SendMessageSpec};
pub use attachment::{AttachmentStream, OutboundMessage, ResolvedAttachment, stream_from_bytes};
pub use event::{ElementsActionEvent, EventSource, MessageSentEvent, TriggeringEvent};
pub use message::{AttachmentInfo, DispatchResult, RemoteMessage};
pub use types::{AttachmentId, MessageId, StreamId};
