pub mod frames;
pub mod primitive;
pub mod walls;

use nom::{
    error::{ErrorKind, ParseError as NomParseError},
    Err, IResult,
};
use std::{fmt, io, result::Result as StdResult};
use thiserror::Error;

pub(crate) type Result<'a, T> = IResult<&'a str, T, FieldError>;

/// Names the field of a line that failed to parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    Time,
    Step,
    Name,
    X,
    Y,
    Z,
    X1,
    Y1,
    X2,
    Y2,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Time => "time",
            Field::Step => "step",
            Field::Name => "name",
            Field::X => "x",
            Field::Y => "y",
            Field::Z => "z",
            Field::X1 => "x1",
            Field::Y1 => "y1",
            Field::X2 => "x2",
            Field::Y2 => "y2",
        };
        f.write_str(name)
    }
}

/// Error produced by the line level parsers. It doesn't know which line it came from, that is
/// added when it is turned into a `ParseError`.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    NomError {
        kind: ErrorKind,
        other: Option<Box<FieldError>>,
    },
    InvalidNumber {
        field: Field,
        value: String,
    },
    FieldCount {
        entry: String,
        expected: usize,
        found: usize,
    },
    MissingField(Field),
}

impl NomParseError<&str> for FieldError {
    fn from_error_kind(_input: &str, kind: ErrorKind) -> Self {
        FieldError::NomError { kind, other: None }
    }

    fn append(_input: &str, kind: ErrorKind, other: Self) -> Self {
        FieldError::NomError {
            kind,
            other: Some(Box::new(other)),
        }
    }
}

impl FieldError {
    /// Attaches the 1-based line number of the failing line.
    pub fn at_line(self, line: usize) -> ParseError {
        match self {
            FieldError::NomError { kind, .. } => ParseError::Syntax { line, kind },
            FieldError::InvalidNumber { field, value } => ParseError::InvalidNumber {
                line,
                field,
                value,
            },
            FieldError::FieldCount {
                entry,
                expected,
                found,
            } => ParseError::FieldCount {
                line,
                entry,
                expected,
                found,
            },
            FieldError::MissingField(field) => ParseError::MissingField { line, field },
        }
    }
}

/// Errors that can happen while parsing an Alchemist export. Any of them aborts the whole file,
/// a partially parsed file is never returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("could not read input: {0}")]
    Io(#[from] io::Error),
    /// A numeric field could not be read as a floating point number.
    #[error("line {line}: {field} is not a number: {value:?}")]
    InvalidNumber {
        line: usize,
        field: Field,
        value: String,
    },
    /// A record or wall entry doesn't have the number of comma separated fields its format needs.
    /// For nodes `expected` is the minimum.
    #[error("line {line}: entry {entry:?} has {found} fields, expected {expected}")]
    FieldCount {
        line: usize,
        entry: String,
        expected: usize,
        found: usize,
    },
    /// The `time;step;` header is cut short.
    #[error("line {line}: missing {field} field")]
    MissingField { line: usize, field: Field },
    #[error("line {line}: malformed input ({kind:?})")]
    Syntax { line: usize, kind: ErrorKind },
}

impl ParseError {
    /// The line the error happened on, if the error is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io(_) => None,
            ParseError::InvalidNumber { line, .. }
            | ParseError::FieldCount { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::Syntax { line, .. } => Some(*line),
        }
    }
}

/// Runs a line parser to completion and tags its error with `line`.
pub(crate) fn finish<T>(line: usize, res: Result<'_, T>) -> StdResult<T, ParseError> {
    match res {
        Ok((_, value)) => Ok(value),
        Err(Err::Failure(e)) | Err(Err::Error(e)) => Err(e.at_line(line)),
        Err(Err::Incomplete(..)) => Err(ParseError::Syntax {
            line,
            kind: ErrorKind::Complete,
        }),
    }
}
