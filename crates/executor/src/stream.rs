use herald_core::{EventSource, SendMessageSpec, StreamId, TriggeringEvent};
use tracing::debug;

use crate::error::ExecutorError;

/// Determines which stream a message is sent to.
pub struct StreamIdResolver;

impl StreamIdResolver {
    /// Resolve the destination stream.
    ///
    /// The explicit `to.streamId` of the activity wins. Otherwise the stream
    /// of the triggering event is used when the event is a sent message or a
    /// form submission. Any id still in the legacy padded form is converted
    /// to its URL-safe form, whichever source it came from.
    pub fn resolve(
        spec: &SendMessageSpec,
        event: Option<&TriggeringEvent>,
    ) -> Result<StreamId, ExecutorError> {
        let stream_id = match (spec.explicit_stream_id(), event.map(|e| &e.source)) {
            (Some(explicit), _) => explicit,
            (None, Some(EventSource::MessageSent(sent))) => &sent.message.stream_id,
            (None, Some(EventSource::ElementsAction(action))) => &action.stream_id,
            (None, Some(EventSource::Other { .. }) | None) => {
                return Err(ExecutorError::NoDestination);
            }
        };

        if stream_id.is_legacy_padded() {
            let url_safe = stream_id.to_url_safe();
            debug!(original = %stream_id, %url_safe, "converted padded stream id");
            return Ok(url_safe);
        }
        Ok(stream_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use herald_core::{ElementsActionEvent, MessageSentEvent, RemoteMessage};

    use super::*;

    fn message_sent(stream: &str) -> TriggeringEvent {
        MessageSentEvent {
            message: RemoteMessage::new("M0", stream),
        }
        .into()
    }

    fn form_submitted(stream: &str) -> TriggeringEvent {
        ElementsActionEvent {
            stream_id: stream.into(),
            form_id: Some("form".into()),
            form_values: serde_json::Map::new(),
        }
        .into()
    }

    fn other_event() -> TriggeringEvent {
        TriggeringEvent::new(EventSource::Other {
            event_type: "user_joined_room".into(),
        })
    }

    #[test]
    fn explicit_stream_wins_over_any_event() {
        let spec = SendMessageSpec::new("hi").to_stream("explicit");
        for event in [
            None,
            Some(message_sent("from-message")),
            Some(form_submitted("from-form")),
            Some(other_event()),
        ] {
            let resolved = StreamIdResolver::resolve(&spec, event.as_ref()).unwrap();
            assert_eq!(resolved.as_str(), "explicit");
        }
    }

    #[test]
    fn message_sent_event_stream() {
        let spec = SendMessageSpec::new("hi");
        let resolved = StreamIdResolver::resolve(&spec, Some(&message_sent("room"))).unwrap();
        assert_eq!(resolved.as_str(), "room");
    }

    #[test]
    fn elements_action_event_stream() {
        let spec = SendMessageSpec::new("hi");
        let resolved = StreamIdResolver::resolve(&spec, Some(&form_submitted("form-room"))).unwrap();
        assert_eq!(resolved.as_str(), "form-room");
    }

    #[test]
    fn empty_explicit_stream_falls_back_to_event() {
        let spec = SendMessageSpec::new("hi").to_stream("");
        let resolved = StreamIdResolver::resolve(&spec, Some(&message_sent("room"))).unwrap();
        assert_eq!(resolved.as_str(), "room");
    }

    #[test]
    fn no_destination() {
        let spec = SendMessageSpec::new("hi");
        let err = StreamIdResolver::resolve(&spec, None).unwrap_err();
        assert!(matches!(err, ExecutorError::NoDestination));

        let err = StreamIdResolver::resolve(&spec, Some(&other_event())).unwrap_err();
        assert!(matches!(err, ExecutorError::NoDestination));
    }

    #[test]
    fn padded_ids_are_normalized_from_every_source() {
        let padded = "iWyZBIOdQQzQj/a+1ZD/cX///o/7uN2dA==";
        let expected = "iWyZBIOdQQzQj_a-1ZD_cX___o_7uN2dA";

        let spec = SendMessageSpec::new("hi").to_stream(padded);
        assert_eq!(StreamIdResolver::resolve(&spec, None).unwrap().as_str(), expected);

        let spec = SendMessageSpec::new("hi");
        let resolved = StreamIdResolver::resolve(&spec, Some(&message_sent(padded))).unwrap();
        assert_eq!(resolved.as_str(), expected);

        let resolved = StreamIdResolver::resolve(&spec, Some(&form_submitted(padded))).unwrap();
        assert_eq!(resolved.as_str(), expected);
    }

    #[test]
    fn url_safe_ids_are_left_alone() {
        let safe = "iWyZBIOdQQzQj_a-1ZD_cX___o_7uN2dA";
        let spec = SendMessageSpec::new("hi").to_stream(safe);
        assert_eq!(StreamIdResolver::resolve(&spec, None).unwrap().as_str(), safe);
    }
}
