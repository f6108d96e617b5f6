//! Application logic behind the interactive surface
//!
//! The surface (the CLI today) owns a [`FilterSession`] and forwards user
//! actions to it. Everything the session talks to outside of this crate goes
//! through the traits in [`service`] and [`image_effect::RenderEngine`].

pub mod loader;
pub mod mapper;
pub mod service;
pub mod session;
pub mod share;
pub mod usage;

pub use loader::{ImageLoader, PendingImage};
pub use service::{DesktopReviewPrompt, FilePicker, FileShare, ImagePicker, ReviewPrompt, ShareService};
pub use session::{FilterSession, SessionState};
pub use share::SharePayload;
pub use usage::{ConfigUsageStore, MemoryUsageStore, UsageCounter, UsageStore};
