// SQL Parser
// This module turns either a table/column triple or a user-supplied SQL string
// into a statement we are willing to run against someone else's database
// We use the sqlparser crate to check the statement is a single read-only query

use crate::error::{InspectError, Result};
use sqlparser::ast::{SetExpr, Statement};
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

/// A validated, read-only SELECT
/// The first result column is the row identifier, the second the JSON payload
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOnlySelect {
    sql: String,
    source: String,
}

impl ReadOnlySelect {
    /// Build `SELECT "<id>", "<data>" FROM "<table>"`
    pub fn table(table: &str, id_column: &str, data_column: &str) -> Result<Self> {
        let sql = format!(
            "SELECT {}, {} FROM {}",
            quote_identifier(id_column)?,
            quote_identifier(data_column)?,
            quote_identifier(table)?
        );

        // Round-trip through the parser so both paths share one gate
        let mut select = QueryParser::parse(&sql)?;
        select.source = table.to_string();
        Ok(select)
    }

    /// The SQL text that will be prepared
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// A short human label for what is being scanned (table name or "custom query")
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// The query parser
pub struct QueryParser;

impl QueryParser {
    /// Parse a SQL string and accept it only if it is one read-only query
    pub fn parse(sql: &str) -> Result<ReadOnlySelect> {
        let dialect = SQLiteDialect {};
        let ast = Parser::parse_sql(&dialect, sql)?;

        // We only support single statements
        if ast.len() != 1 {
            return Err(InspectError::NotReadOnly);
        }

        match &ast[0] {
            Statement::Query(query) if Self::is_read_only(&query.body) => Ok(ReadOnlySelect {
                sql: sql.trim().trim_end_matches(';').trim_end().to_string(),
                source: "custom query".to_string(),
            }),
            _ => Err(InspectError::NotReadOnly),
        }
    }

    /// Walk a query body; anything other than plain SELECTs, VALUES and
    /// set operations over them is refused
    fn is_read_only(body: &SetExpr) -> bool {
        match body {
            SetExpr::Select(select) => select.into.is_none(),
            SetExpr::Query(query) => Self::is_read_only(&query.body),
            SetExpr::SetOperation { left, right, .. } => {
                Self::is_read_only(left) && Self::is_read_only(right)
            }
            SetExpr::Values(_) => true,
            _ => false,
        }
    }
}

/// Quote an identifier for SQLite, doubling embedded quotes
fn quote_identifier(name: &str) -> Result<String> {
    if name.is_empty() || name.contains('\0') {
        return Err(InspectError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}
