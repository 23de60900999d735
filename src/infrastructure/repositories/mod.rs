//! DB Repository abstractions
//!
//! Listings are returned in insertion order (`rowid`), which is creation order.

mod citation;
mod conversation;
mod document;
mod file;
mod message;

pub use citation::DbCitationRepository;
pub use conversation::DbConversationRepository;
pub use document::DbDocumentRepository;
pub use file::DbFileRepository;
pub use message::DbMessageRepository;
