use thiserror::Error;

use crate::Row;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("syntax error")]
    SyntaxError,

    #[error("negative id")]
    NegativeId,

    #[error("unrecognized statement")]
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

impl Statement {
    /// Parses `insert <id> <username> <email>` or `select`.
    ///
    /// Text lengths are left to the row codec.
    pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
        let mut tokens = input.split_whitespace();

        match tokens.next() {
            Some("insert") => {
                let (Some(id), Some(username), Some(email), None) =
                    (tokens.next(), tokens.next(), tokens.next(), tokens.next())
                else {
                    return Err(PrepareError::SyntaxError);
                };
                Ok(Statement::Insert(Row::new(parse_id(id)?, username, email)))
            }
            Some("select") => match tokens.next() {
                None => Ok(Statement::Select),
                Some(_) => Err(PrepareError::SyntaxError),
            },
            _ => Err(PrepareError::Unrecognized),
        }
    }
}

fn parse_id(token: &str) -> Result<u32, PrepareError> {
    if let Ok(id) = token.parse::<u32>() {
        return Ok(id);
    }
    match token.strip_prefix('-') {
        Some(digits) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            Err(PrepareError::NegativeId)
        }
        _ => Err(PrepareError::SyntaxError),
    }
}
