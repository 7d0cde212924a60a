// Table source
// Owns the single read-only connection to the application's database file

use super::{Payload, PayloadRow, RowId};
use crate::error::{InspectError, Result};
use crate::query::parser::ReadOnlySelect;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A read-only view over an existing SQLite file
pub struct TableSource {
    conn: Connection,
    path: PathBuf,
}

impl TableSource {
    /// Open an existing database file read-only
    /// The file is never created: SQLite would happily make an empty one
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(InspectError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| InspectError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), "opened database read-only");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run the SELECT and fetch every row
    /// Column 0 is the identifier, column 1 the payload; extra columns are ignored
    pub fn rows(&self, select: &ReadOnlySelect) -> Result<Vec<PayloadRow>> {
        let mut stmt = self.conn.prepare(select.sql())?;

        // The connection is read-only already; this also catches statements
        // the parser accepted but SQLite would treat as writes
        if !stmt.readonly() {
            return Err(InspectError::NotReadOnly);
        }

        let columns = stmt.column_count();
        if columns < 2 {
            return Err(InspectError::ColumnCount(columns));
        }

        debug!(sql = select.sql(), "running query");
        let rows = stmt
            .query_map([], |row| {
                Ok(PayloadRow::new(
                    RowId::from(row.get_ref(0)?),
                    Payload::from(row.get_ref(1)?),
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Names of the user tables in the file, sorted
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )?;

        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(names)
    }

    /// Close the connection, reporting any error SQLite raises while doing so
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_conn, e)| InspectError::Sqlite(e))
    }
}
