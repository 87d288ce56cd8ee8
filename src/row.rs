use std::fmt;

use thiserror::Error;

use crate::{EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE, ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("{field} is {len} bytes long (max {max})")]
    ValueTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} contains a NUL byte")]
    ContainsNul { field: &'static str },
}

/// One record of the table: `(id, username, email)`.
///
/// On a page a row occupies exactly [`ROW_SIZE`] bytes. Text fields are
/// zero-padded to their column width, so they may not contain NUL bytes
/// themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
        }
    }

    pub fn encode(&self) -> Result<[u8; ROW_SIZE], CodecError> {
        check_text("username", &self.username, USERNAME_SIZE)?;
        check_text("email", &self.email, EMAIL_SIZE)?;

        let mut bytes = [0u8; ROW_SIZE];
        bytes[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_text(&mut bytes[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE], &self.username);
        write_text(&mut bytes[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE], &self.email);
        Ok(bytes)
    }

    pub fn decode(bytes: &[u8; ROW_SIZE]) -> Self {
        let mut id = [0u8; ID_SIZE];
        id.copy_from_slice(&bytes[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        Self {
            id: u32::from_le_bytes(id),
            username: read_text(&bytes[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]),
            email: read_text(&bytes[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]),
        }
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.id, self.username, self.email)
    }
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), CodecError> {
    let len = value.len();
    if len > max {
        return Err(CodecError::ValueTooLong { field, len, max });
    }
    if value.as_bytes().contains(&0) {
        return Err(CodecError::ContainsNul { field });
    }
    Ok(())
}

// `dst` is already zeroed, the tail stays as padding.
fn write_text(dst: &mut [u8], value: &str) {
    dst[..value.len()].copy_from_slice(value.as_bytes());
}

fn read_text(src: &[u8]) -> String {
    let end = src.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&src[..end]).into_owned()
}
