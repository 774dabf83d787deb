//! Submission moderation - the gate every user-submitted text passes before
//! it is persisted.
//!
//! A submission flows through three checks, cheapest first:
//!
//! 1. [`RateLimiter`] - per-user sliding window over recent submissions
//! 2. [`SpamDetector`] - ordered pattern heuristics, pure and synchronous
//! 3. [`ContentModerator`] - external classification plus a contextual
//!    language-model check, behind the [`ModerationClient`] trait
//!
//! The first failing check short-circuits the rest. Gate rejections are
//! expected, user-facing outcomes; only infrastructure failures are logged.
//!
//! The moderator **fails open**: when moderation is disabled or the remote
//! service errors out, content is treated as appropriate with confidence 0.
//! Availability of the platform is preferred over strict enforcement, and the
//! window of unmoderated content during an outage is an accepted tradeoff.

mod gate;
mod moderator;
mod rate_limiter;
mod spam;
mod types;

pub mod client;

pub use gate::{GateLimits, GateRejection, SubmissionGate};
pub use moderator::ContentModerator;
pub use rate_limiter::RateLimiter;
pub use spam::SpamDetector;
pub use types::{ModerationVerdict, SpamVerdict};
