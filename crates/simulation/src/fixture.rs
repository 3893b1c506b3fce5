//! Seed data for the in-memory message service.

use std::path::Path;

use herald_core::{AttachmentId, MessageId, RemoteMessage};
use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Stored messages and attachment payloads, loaded from JSON.
///
/// ```json
/// {
///   "messages": [
///     {"messageId": "M1", "streamId": "S-src",
///      "attachments": [{"id": "A1", "name": "hello.txt"}]}
///   ],
///   "attachments": [
///     {"messageId": "M1", "attachmentId": "A1", "data": "aGVsbG8="}
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub messages: Vec<RemoteMessage>,
    #[serde(default)]
    pub attachments: Vec<AttachmentPayload>,
}

/// Transport-encoded payload of one stored attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub message_id: MessageId,
    pub attachment_id: AttachmentId,
    /// Base64 text exactly as the service would return it.
    pub data: String,
}

impl Fixture {
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use herald_messaging::MessageService;

    use super::*;
    use crate::InMemoryMessageService;

    const FIXTURE: &str = r#"{
        "messages": [
            {"messageId": "M1", "streamId": "S-src",
             "attachments": [{"id": "A1", "name": "hello.txt", "size": 5}]}
        ],
        "attachments": [
            {"messageId": "M1", "attachmentId": "A1", "data": "aGVsbG8="}
        ]
    }"#;

    #[test]
    fn parses_messages_and_payloads() {
        let fixture = Fixture::from_json(FIXTURE).unwrap();
        assert_eq!(fixture.messages.len(), 1);
        assert_eq!(fixture.messages[0].attachments[0].size, Some(5));
        assert_eq!(fixture.attachments[0].data, "aGVsbG8=");
    }

    #[test]
    fn empty_object_is_an_empty_fixture() {
        assert_eq!(Fixture::from_json("{}").unwrap(), Fixture::default());
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            Fixture::from_json("{\"messages\": 3}"),
            Err(SimulationError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_missing_files() {
        let err = Fixture::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SimulationError::Io { .. }));
    }

    #[tokio::test]
    async fn loaded_fixture_seeds_the_service() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let service = InMemoryMessageService::from_fixture(Fixture::load(file.path()).unwrap());
        let message = service.get_message(&"M1".into()).await.unwrap().unwrap();
        let raw = service
            .get_attachment(&message.stream_id, &message.message_id, &"A1".into())
            .await
            .unwrap();
        assert_eq!(&raw[..], b"aGVsbG8=");
    }
}
