//! Capabilities consumed by Herald activities.
//!
//! A [`MessageService`] talks to the remote messaging service (sending,
//! looking up stored messages, downloading attachments). A [`ResourceLoader`]
//! opens files that ship with a workflow. Both are supplied by the workflow
//! engine at execution time.

pub mod error;
pub mod resource;
pub mod service;

pub use error::MessagingError;
pub use resource::{FsResourceLoader, ResourceLoader};
pub use service::{DynMessageService, MessageService};
