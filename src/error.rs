use std::fmt::{Display, Formatter};

use crate::position::Position;

/// Every error the generator can produce, grouped the way spec section 7
/// groups them: lex errors, parse errors, integrity errors, I/O errors.
/// All of them are fatal — the pipeline aborts on the first one.
#[derive(Debug)]
pub enum GeneratorError {
    /// Malformed grammar-source bytes: unterminated string/code/comment,
    /// unexpected character, bad escape.
    Lex { message: String, pos: Position },
    /// Well-tokenized but grammatically invalid: missing `=`/`;`,
    /// unmatched parens, trailing operator, unknown identifier, duplicate
    /// entry point.
    Parse { message: String, pos: Position },
    /// Structurally valid grammar that still violates an invariant: no
    /// constructs, no entry point, empty literal value, and so on.
    Integrity { message: String },
    /// Failure to open, read, or write a file.
    Io { message: String, source: std::io::Error },
}

impl GeneratorError {
    pub fn lex(message: impl Into<String>, pos: Position) -> Self {
        GeneratorError::Lex { message: message.into(), pos }
    }

    pub fn parse(message: impl Into<String>, pos: Position) -> Self {
        GeneratorError::Parse { message: message.into(), pos }
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        GeneratorError::Integrity { message: message.into() }
    }
}

impl Display for GeneratorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GeneratorError::Lex { message, pos } => {
                write!(f, "LexError at {}: {}", pos, message)
            }
            GeneratorError::Parse { message, pos } => {
                write!(f, "ParseError at {}: {}", pos, message)
            }
            GeneratorError::Integrity { message } => {
                write!(f, "IntegrityError: {}", message)
            }
            GeneratorError::Io { message, source } => {
                write!(f, "IoError: {} ({})", message, source)
            }
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GeneratorError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(source: std::io::Error) -> Self {
        GeneratorError::Io { message: "I/O operation failed".into(), source }
    }
}

pub type GenResult<T> = std::result::Result<T, GeneratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_with_tag_and_position() {
        let err = GeneratorError::lex("unterminated string", Position::new(3, 9));
        assert_eq!(format!("{err}"), "LexError at 3:9: unterminated string");
    }

    #[test]
    fn integrity_has_no_position() {
        let err = GeneratorError::integrity("no entry point declared");
        assert_eq!(format!("{err}"), "IntegrityError: no entry point declared");
    }
}
