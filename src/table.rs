use thiserror::Error;
use tracing::{debug, error, trace};

use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, Row, TABLE_MAX_PAGES};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("row {row_num} is out of range")]
    OutOfRange { row_num: usize },
}

type Page = [u8; PAGE_SIZE];

/// Location of a row: the page holding it and the byte offset inside that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSlot {
    pub page_num: usize,
    pub byte_offset: usize,
}

/// Append-only row storage backed by up to [`TABLE_MAX_PAGES`] lazily
/// allocated pages.
///
/// Every page is owned by the table and lives until the table is dropped.
pub struct Table {
    num_rows: usize,
    pages: [Option<Box<Page>>; TABLE_MAX_PAGES],
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Table {
    pub fn new() -> Self {
        Self {
            num_rows: 0,
            pages: [const { None }; TABLE_MAX_PAGES],
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_full(&self) -> bool {
        self.num_rows >= crate::TABLE_MAX_ROWS
    }

    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    pub fn slot_for(row_num: usize) -> Result<RowSlot, StoreError> {
        let page_num = row_num / ROWS_PER_PAGE;
        if page_num >= TABLE_MAX_PAGES {
            return Err(StoreError::OutOfRange { row_num });
        }
        let byte_offset = (row_num % ROWS_PER_PAGE) * ROW_SIZE;
        debug_assert!(byte_offset + ROW_SIZE <= PAGE_SIZE);

        trace!(row_num, page_num, byte_offset, "resolved row slot");
        Ok(RowSlot {
            page_num,
            byte_offset,
        })
    }

    /// Writes `bytes` as the next row and returns its row number.
    ///
    /// The caller checks capacity first; running past the last page is an
    /// invariant violation and leaves the table untouched.
    pub fn append(&mut self, bytes: &[u8; ROW_SIZE]) -> Result<usize, StoreError> {
        let row_num = self.num_rows;
        let slot = Self::slot_for(row_num).inspect_err(|err| {
            error!(%err, "append past the last page");
        })?;

        let page = self.pages[slot.page_num].get_or_insert_with(|| {
            debug!(page_num = slot.page_num, "allocating page");
            Box::new([0; PAGE_SIZE])
        });
        page[slot.byte_offset..slot.byte_offset + ROW_SIZE].copy_from_slice(bytes);

        self.num_rows += 1;
        Ok(row_num)
    }

    pub fn row(&self, row_num: usize) -> Result<&[u8; ROW_SIZE], StoreError> {
        if row_num >= self.num_rows {
            return Err(StoreError::OutOfRange { row_num });
        }
        let slot = Self::slot_for(row_num)?;
        let page = self.pages[slot.page_num]
            .as_deref()
            .ok_or(StoreError::OutOfRange { row_num })?;

        page[slot.byte_offset..slot.byte_offset + ROW_SIZE]
            .try_into()
            .map_err(|_| StoreError::OutOfRange { row_num })
    }

    /// Decodes rows `0..num_rows` in insertion order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            next: 0,
            end: self.num_rows,
        }
    }
}

/// Lazy iterator over the rows of a [`Table`]. Clone it to restart.
#[derive(Clone)]
pub struct Rows<'a> {
    table: &'a Table,
    next: usize,
    end: usize,
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.next >= self.end {
            return None;
        }
        let row_num = self.next;
        self.next += 1;

        match self.table.row(row_num) {
            Ok(bytes) => Some(Row::decode(bytes)),
            Err(err) => {
                error!(%err, "stored row unreadable");
                self.next = self.end;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}
