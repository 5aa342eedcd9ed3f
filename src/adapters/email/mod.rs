//! Mail transport adapters.
//!
//! - `ResendMailer` - Production delivery via the Resend HTTP API
//! - `RecordingMailer` - Keeps messages in memory (tests, local runs without an API key)

mod recording;
mod resend;

pub use recording::RecordingMailer;
pub use resend::{ResendConfig, ResendMailer};
