//! Read-only access to the harness database
//!
//! The store issues plain `SELECT` queries against four fixed tables and
//! hands back [`RawRow`]s (column name to value). A connection is opened per
//! query and dropped before returning, on success and on error alike.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use rusqlite::types::Value;
use rusqlite::{params, Connection, OpenFlags};
use thiserror::Error;

use crate::core::entity::Record;
use crate::entities::{CableRow, ConnectorRow, DesignatorRow, NetRow, Pin, Tables};

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("cannot open database '{path}': {source}")]
    #[diagnostic(
        code(sqlwire::store::open),
        help("check `db_path` in the configuration")
    )]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("query on {table} failed in '{path}': {source}")]
    #[diagnostic(
        code(sqlwire::store::query),
        help("the database must contain NetTable, DesignatorTable, ConnectorTable and CableTable")
    )]
    Query {
        table: &'static str,
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{table} has no column '{column}'")]
    #[diagnostic(code(sqlwire::store::column))]
    UnknownColumn { table: &'static str, column: String },
}

/// The four harness tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Net,
    Designator,
    Connector,
    Cable,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Net => "NetTable",
            Table::Designator => "DesignatorTable",
            Table::Connector => "ConnectorTable",
            Table::Cable => "CableTable",
        }
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Net => &[
                "cable_des",
                "comp_des_1",
                "conn_des_1",
                "pin_1",
                "comp_des_2",
                "conn_des_2",
                "pin_2",
                "net_name",
            ],
            Table::Designator => &["comp_des", "conn_des", "conn_mpn"],
            Table::Connector => &[
                "mpn",
                "pincount",
                "mate_mpn",
                "pin_mpn",
                "description",
                "manufacturer",
            ],
            Table::Cable => &["cable_des", "wire_gauge", "length", "note"],
        }
    }

    fn check_column(&self, column: &str) -> Result<&'static str, StoreError> {
        self.columns()
            .iter()
            .find(|c| **c == column)
            .copied()
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.name(),
                column: column.to_string(),
            })
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Exact-match filter on one column
#[derive(Debug, Clone, Copy)]
pub struct Filter<'a> {
    pub column: &'a str,
    pub value: &'a str,
}

impl<'a> Filter<'a> {
    pub fn eq(column: &'a str, value: &'a str) -> Self {
        Self { column, value }
    }
}

/// One database row, keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    columns: HashMap<String, Value>,
}

impl RawRow {
    pub fn from_pairs<I: IntoIterator<Item = (String, Value)>>(pairs: I) -> Self {
        Self {
            columns: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Column as text; NULL or missing becomes an empty string
    pub fn text(&self, column: &str) -> String {
        match self.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::Integer(n)) => n.to_string(),
            Some(Value::Real(x)) => x.to_string(),
            Some(Value::Text(s)) => s.clone(),
            Some(Value::Blob(b)) => String::from_utf8_lossy(b).into_owned(),
        }
    }

    /// Column as text; NULL, missing or blank becomes `None`
    pub fn opt_text(&self, column: &str) -> Option<String> {
        Some(self.text(column)).filter(|s| !s.trim().is_empty())
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        match self.get(column)? {
            Value::Integer(n) => Some(*n),
            Value::Real(x) if x.fract() == 0.0 => Some(*x as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn real(&self, column: &str) -> Option<f64> {
        match self.get(column)? {
            Value::Integer(n) => Some(*n as f64),
            Value::Real(x) => Some(*x),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Pin identifier: integers stay numeric, everything else is kept as text
    pub fn pin(&self, column: &str) -> Pin {
        match self.get(column) {
            Some(Value::Integer(n)) => Pin::Number(*n),
            Some(Value::Real(x)) if x.fract() == 0.0 => Pin::Number(*x as i64),
            _ => Pin::Name(self.text(column)),
        }
    }
}

/// SQLite-backed harness store
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open_with_flags(&self.path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
            |source| StoreError::Open {
                path: self.display_path(),
                source,
            },
        )
    }

    /// `SELECT * FROM <table> [WHERE <column> = ?]`
    pub fn fetch(&self, table: Table, filter: Option<Filter<'_>>) -> Result<Vec<RawRow>, StoreError> {
        let mut sql = format!("SELECT * FROM {}", table.name());
        if let Some(f) = filter {
            let column = table.check_column(f.column)?;
            sql.push_str(&format!(" WHERE {} = ?1", column));
        }

        let conn = self.connect()?;
        let query_err = |source| StoreError::Query {
            table: table.name(),
            path: self.display_path(),
            source,
        };

        let mut stmt = conn.prepare(&sql).map_err(query_err)?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = match filter {
            Some(f) => stmt.query(params![f.value]),
            None => stmt.query([]),
        }
        .map_err(query_err)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(query_err)? {
            let mut columns = HashMap::with_capacity(names.len());
            for (i, name) in names.iter().enumerate() {
                let value: Value = row.get(i).map_err(query_err)?;
                columns.insert(name.clone(), value);
            }
            out.push(RawRow { columns });
        }

        Ok(out)
    }

    /// `SELECT DISTINCT <column> FROM <table>`, as text, NULLs skipped
    pub fn distinct(&self, table: Table, column: &str) -> Result<Vec<String>, StoreError> {
        let column = table.check_column(column)?;
        let sql = format!("SELECT DISTINCT {} FROM {}", column, table.name());

        let conn = self.connect()?;
        let query_err = |source| StoreError::Query {
            table: table.name(),
            path: self.display_path(),
            source,
        };

        let mut stmt = conn.prepare(&sql).map_err(query_err)?;
        let values = stmt
            .query_map([], |row| row.get::<_, Value>(0))
            .map_err(query_err)?;

        let mut out = Vec::new();
        for value in values {
            let row = RawRow::from_pairs([(column.to_string(), value.map_err(query_err)?)]);
            if let Some(text) = row.opt_text(column) {
                out.push(text);
            }
        }
        Ok(out)
    }

    /// Load typed records, optionally filtered
    pub fn load<T: Record>(&self, filter: Option<Filter<'_>>) -> Result<Vec<T>, StoreError> {
        Ok(self
            .fetch(T::TABLE, filter)?
            .iter()
            .map(T::from_row)
            .collect())
    }

    pub fn load_nets(&self, cable_des: Option<&str>) -> Result<Vec<NetRow>, StoreError> {
        self.load(cable_des.map(|c| Filter::eq("cable_des", c)))
    }

    /// Load all four tables. With `cable_des`, only the net rows and cable
    /// catalog rows of that cable are loaded; the connector and designator
    /// catalogs are always complete.
    pub fn load_tables(&self, cable_des: Option<&str>) -> Result<Tables, StoreError> {
        let filter = cable_des.map(|c| Filter::eq("cable_des", c));
        Ok(Tables {
            nets: self.load::<NetRow>(filter)?,
            designators: self.load::<DesignatorRow>(None)?,
            connectors: self.load::<ConnectorRow>(None)?,
            cables: self.load::<CableRow>(filter)?,
        })
    }

    /// Cable designators that have at least one net row
    pub fn cables_with_nets(&self) -> Result<Vec<String>, StoreError> {
        self.distinct(Table::Net, "cable_des")
    }
}
