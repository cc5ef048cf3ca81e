//! Domain types and models

pub mod access_log;
pub mod matches;
pub mod object_id;

pub use access_log::AccessLogRecord;
pub use matches::{MatchEntry, MatchRecord, NetworkDescriptor, SprtDecision, SprtValue};
pub use object_id::ObjectId;
