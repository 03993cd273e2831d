//! Message domain.
//!
//! - [`entities::Message`]: a single turn in a conversation
//! - [`entities::Role`]: canonical human/agent authorship
//! - [`codec`]: normalization of wire representations into [`entities::Message`]

pub mod codec;
pub mod entities;
