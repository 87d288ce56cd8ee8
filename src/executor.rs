use thiserror::Error;
use tracing::debug;

use crate::{CodecError, Row, Rows, Statement, StoreError, Table};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("table full")]
    TableFull,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ExecuteError {
    /// Store errors mean the page addressing invariants are broken; the
    /// others leave the table usable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExecuteError::Store(_))
    }
}

pub enum Outcome<'a> {
    Inserted,
    Selected(Rows<'a>),
}

pub fn execute(statement: Statement, table: &mut Table) -> Result<Outcome<'_>, ExecuteError> {
    match statement {
        Statement::Insert(row) => {
            execute_insert(&row, table)?;
            Ok(Outcome::Inserted)
        }
        Statement::Select => Ok(Outcome::Selected(execute_select(table))),
    }
}

/// Appends `row` to the table. On error nothing is written.
pub fn execute_insert(row: &Row, table: &mut Table) -> Result<(), ExecuteError> {
    if table.is_full() {
        return Err(ExecuteError::TableFull);
    }
    let bytes = row.encode()?;
    let row_num = table.append(&bytes)?;

    debug!(row_num, id = row.id, "inserted row");
    Ok(())
}

pub fn execute_select(table: &Table) -> Rows<'_> {
    table.rows()
}
