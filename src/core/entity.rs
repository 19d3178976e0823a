//! Record trait - common interface for all table records

use crate::core::store::{RawRow, Table};

/// A typed record mapped from one row of a harness table
pub trait Record: Sized {
    /// The table the record is loaded from
    const TABLE: Table;

    /// Build the record from a raw row.
    ///
    /// Mapping is total: missing columns get documented defaults instead of
    /// failing, so a half-filled row still yields a record.
    fn from_row(row: &RawRow) -> Self;
}
