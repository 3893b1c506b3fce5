use serde::{Deserialize, Serialize};

use crate::message::RemoteMessage;
use crate::types::StreamId;

/// The event that started the current workflow execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeringEvent {
    pub source: EventSource,
}

impl TriggeringEvent {
    #[must_use]
    pub fn new(source: EventSource) -> Self {
        Self { source }
    }

    /// Stream the event originated from, when the event carries one.
    #[must_use]
    pub fn stream_id(&self) -> Option<&StreamId> {
        self.source.stream_id()
    }
}

/// Payload of a triggering event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventSource {
    /// A message was posted in a conversation the bot is part of.
    MessageSent(MessageSentEvent),
    /// A user submitted a form.
    ElementsAction(ElementsActionEvent),
    /// Any other event type. Carries no stream.
    Other {
        #[serde(default)]
        event_type: String,
    },
}

impl EventSource {
    #[must_use]
    pub fn stream_id(&self) -> Option<&StreamId> {
        match self {
            Self::MessageSent(event) => Some(&event.message.stream_id),
            Self::ElementsAction(event) => Some(&event.stream_id),
            Self::Other { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSentEvent {
    pub message: RemoteMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementsActionEvent {
    pub stream_id: StreamId,
    #[serde(default)]
    pub form_id: Option<String>,
    #[serde(default)]
    pub form_values: serde_json::Map<String, serde_json::Value>,
}

impl From<MessageSentEvent> for TriggeringEvent {
    fn from(event: MessageSentEvent) -> Self {
        Self::new(EventSource::MessageSent(event))
    }
}

impl From<ElementsActionEvent> for TriggeringEvent {
    fn from(event: ElementsActionEvent) -> Self {
        Self::new(EventSource::ElementsAction(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_sent_carries_message_stream() {
        let event = TriggeringEvent::from(MessageSentEvent {
            message: RemoteMessage::new("M1", "room-1"),
        });
        assert_eq!(event.stream_id().map(StreamId::as_str), Some("room-1"));
    }

    #[test]
    fn elements_action_carries_its_stream() {
        let json = r#"{"source": {"type": "elements_action", "streamId": "form-room", "formId": "f1"}}"#;
        let event: TriggeringEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.stream_id().map(StreamId::as_str), Some("form-room"));
        match event.source {
            EventSource::ElementsAction(action) => {
                assert_eq!(action.form_id.as_deref(), Some("f1"));
                assert!(action.form_values.is_empty());
            }
            other => panic!("expected ElementsAction, got {other:?}"),
        }
    }

    #[test]
    fn other_events_have_no_stream() {
        let json = r#"{"source": {"type": "other", "event_type": "user_joined_room"}}"#;
        let event: TriggeringEvent = serde_json::from_str(json).unwrap();
        assert!(event.stream_id().is_none());
    }
}
