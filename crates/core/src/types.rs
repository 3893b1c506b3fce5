use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! newtype_string {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Return the inner string as a str slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    StreamId,
    "Identifies a conversation (room, IM or MIM) on the messaging service."
);
newtype_string!(MessageId, "Identifies a message already stored remotely.");
newtype_string!(
    AttachmentId,
    "Identifies one attachment within a stored message."
);

impl StreamId {
    /// Whether the id is in the legacy base64 form that still carries `=`
    /// padding.
    #[must_use]
    pub fn is_legacy_padded(&self) -> bool {
        self.0.ends_with('=')
    }

    /// Convert the id to its URL-safe form: `+` becomes `-`, `/` becomes `_`
    /// and `=` padding is dropped.
    ///
    /// Applying this to an id that is already URL-safe returns it unchanged.
    #[must_use]
    pub fn to_url_safe(&self) -> Self {
        let converted: String = self
            .0
            .chars()
            .filter(|c| *c != '=')
            .map(|c| match c {
                '+' => '-',
                '/' => '_',
                other => other,
            })
            .collect();
        Self(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newtype_from_str() {
        let stream = StreamId::from("abc");
        assert_eq!(stream.as_str(), "abc");
        assert_eq!(&*stream, "abc");
    }

    #[test]
    fn newtype_from_string() {
        let id = MessageId::from("msg-42".to_string());
        assert_eq!(id.to_string(), "msg-42");
    }

    #[test]
    fn newtype_serde_is_transparent() {
        let id = AttachmentId::new("att-123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"att-123\"");
        let back: AttachmentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn legacy_padded_ids_are_detected() {
        assert!(StreamId::from("iWyZBIOdQQzQj/a+1ZD/cX///o/7uN2dA==").is_legacy_padded());
        assert!(!StreamId::from("iWyZBIOdQQzQj_a-1ZD_cX___o_7uN2dA").is_legacy_padded());
    }

    #[test]
    fn url_safe_conversion() {
        let legacy = StreamId::from("iWyZBIOdQQzQj/a+1ZD/cX///o/7uN2dA==");
        assert_eq!(
            legacy.to_url_safe().as_str(),
            "iWyZBIOdQQzQj_a-1ZD_cX___o_7uN2dA"
        );
    }

    #[test]
    fn url_safe_conversion_is_idempotent() {
        let safe = StreamId::from("iWyZBIOdQQzQj_a-1ZD_cX___o_7uN2dA");
        assert_eq!(safe.to_url_safe(), safe);
        assert_eq!(safe.to_url_safe().to_url_safe(), safe);
    }
}
