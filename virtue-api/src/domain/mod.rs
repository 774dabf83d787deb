pub mod moderation;
pub mod search;
