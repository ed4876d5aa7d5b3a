use std::path::{Path, PathBuf};

use rusqlite::{params, types::ValueRef, Connection, OpenFlags};
use tracing::{debug, info};

use crate::error::{Result, TxtStatsError};
use crate::models::{HandlePair, RawMessage};
use crate::schema;

/// Source of raw conversation rows
pub trait MessageRepository {
    /// Every message exchanged with either handle, oldest first
    fn fetch_messages(&self, handles: &HandlePair) -> Result<Vec<RawMessage>>;
}

/// Read-only access to an iMessage `chat.db`
pub struct ChatDbRepository {
    conn: Connection,
}

impl ChatDbRepository {
    /// Open the store at `path` read-only
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(TxtStatsError::SourceNotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX | OpenFlags::SQLITE_OPEN_URI,
        )?;
        info!("Opened message store at {}", path.display());

        Ok(Self { conn })
    }

    /// Wrap an existing connection
    #[must_use]
    pub const fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Platform location of the Messages database
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| home.join("Library").join("Messages").join("chat.db"))
            .ok_or_else(|| TxtStatsError::InvalidConfig("Cannot locate home directory for chat.db".to_string()))
    }
}

impl MessageRepository for ChatDbRepository {
    fn fetch_messages(&self, handles: &HandlePair) -> Result<Vec<RawMessage>> {
        let mut stmt = self.conn.prepare(&schema::conversation_query())?;

        let rows = stmt.query_map(params![handles.first, handles.second], |row| {
            // Attachment-only messages carry NULL; BLOB or non-UTF-8 bodies are not text either
            let text = match row.get_ref(0)? {
                ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok().map(str::to_owned),
                _ => None,
            };

            Ok(RawMessage {
                text,
                is_from_me: row.get::<_, i64>(1)? != 0,
                date: row.get(2)?,
                handle_id: row.get(3)?,
            })
        })?;

        let messages = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        debug!(
            first = handles.first,
            second = handles.second,
            rows = messages.len(),
            "Fetched conversation rows"
        );

        Ok(messages)
    }
}
