//! Record models mapped to the `users`, `messages`, `files` and `searches` tables.

mod file_record;
mod message_record;
mod record_counts;
mod search_record;
mod user_record;

pub use file_record::FileRecord;
pub use message_record::MessageRecord;
pub use record_counts::RecordCounts;
pub use search_record::{SearchRecord, SearchRow, MAX_SEARCH_LINKS};
pub use user_record::{UserRecord, UserUpdate};
