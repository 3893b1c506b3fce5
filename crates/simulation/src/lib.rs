//! Herald simulation framework.
//!
//! Test doubles for the capabilities an activity consumes:
//!
//! - [`InMemoryMessageService`] stores seeded messages and attachment
//!   payloads and captures every message sent through it
//! - [`MemoryResourceLoader`] serves workflow resources from memory and
//!   tracks which streams are still open
//! - [`Fixture`] loads seed data from JSON for tests and dry runs
//!
//! # Quick Start
//!
//! ```
//! use herald_core::{AttachmentInfo, RemoteMessage};
//! use herald_simulation::{InMemoryMessageService, MemoryResourceLoader};
//!
//! let service = InMemoryMessageService::new()
//!     .with_message(
//!         RemoteMessage::new("M1", "S-src").with_attachment(AttachmentInfo::new("A1", "a.txt")),
//!     )
//!     .with_attachment_payload("M1", "A1", "aGVsbG8=");
//! let resources = MemoryResourceLoader::new().with_resource("/tmp/a.png", vec![0u8; 10]);
//!
//! service.assert_nothing_sent();
//! assert_eq!(resources.open_streams(), 0);
//! ```

mod error;
pub mod fixture;
pub mod resource;
pub mod service;

pub use error::SimulationError;
pub use fixture::{AttachmentPayload, Fixture};
pub use resource::MemoryResourceLoader;
pub use service::{CapturedAttachment, CapturedSend, FailureMode, InMemoryMessageService, SendPath};
