//! Schema contracts
//!
//! Table and column names of the external message store, and the column set of
//! the CSV handed from the extractor to the chart renderer.

/// Version of the interchange column set below. Bump when a column is added,
/// removed, renamed or changes type.
pub const SCHEMA_VERSION: u32 = 1;

/// `message` table of chat.db
pub mod message {
    /// Table name
    pub const TABLE: &str = "message";
    /// Message body; NULL for attachment-only messages
    pub const TEXT: &str = "text";
    /// 1 when the local user sent the message
    pub const IS_FROM_ME: &str = "is_from_me";
    /// Send time, nanoseconds since 2001-01-01 UTC
    pub const DATE: &str = "date";
    /// Foreign key to the counterpart's handle row
    pub const HANDLE_ID: &str = "handle_id";
}

/// Columns of the interchange CSV, in file order
pub mod columns {
    /// Dense zero-based row number
    pub const INDEX: &str = "index";
    /// Message body
    pub const TEXT: &str = "text";
    /// Sender flag, 0 or 1
    pub const IS_FROM_ME: &str = "is_from_me";
    /// Calendar send time, `%Y-%m-%d %H:%M:%S`
    pub const DATE: &str = "date";
    /// Week bucket index
    pub const WEEK: &str = "week";
    /// Weekday, Monday = 0
    pub const DAY: &str = "day";
    /// Hour of day, 0-23
    pub const HOURLY_BIN: &str = "hourly_bin";
    /// Character count of the body
    pub const TEXT_LENGTH: &str = "text_length";
    /// Whitespace-delimited token count of the body
    pub const NUM_WORDS: &str = "num_words";

    /// Every column, in the order they are written
    pub const ALL: [&str; 9] = [
        INDEX,
        TEXT,
        IS_FROM_ME,
        DATE,
        WEEK,
        DAY,
        HOURLY_BIN,
        TEXT_LENGTH,
        NUM_WORDS,
    ];
}

/// Query returning every message exchanged with either of two handles, oldest first
#[must_use]
pub fn conversation_query() -> String {
    format!(
        "SELECT {text}, {is_from_me}, {date}, {handle} FROM {table} WHERE {handle} = ?1 OR {handle} = ?2 ORDER BY {date} ASC",
        text = message::TEXT,
        is_from_me = message::IS_FROM_ME,
        date = message::DATE,
        table = message::TABLE,
        handle = message::HANDLE_ID,
    )
}
