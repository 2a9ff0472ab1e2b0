//! Fix-block scanner (spec component 3).
//!
//! Reads the balanced `{ ... }` body that follows `prefix`/`suffix`, treating
//! string/char literals and comments as opaque so that braces inside them
//! don't affect nesting depth. Grounded on the reference scanner's
//! quote/comment-aware brace counter (`examples/original_source/grammar/fix.go`).

use crate::error::{GenResult, GeneratorError};
use crate::position::Position;
use crate::reader::ByteReader;

/// Consume a fix block. The caller has already consumed the opening `{`;
/// this returns the raw text up to (exclusive of) the matching `}`.
pub fn read_fix_block(r: &mut ByteReader) -> GenResult<String> {
    let start = r.position();
    let mut depth = 1i32;
    let mut text = String::new();

    loop {
        let b = r.read().ok_or_else(|| GeneratorError::lex("unterminated fix block", start))?;
        match b {
            b'{' => {
                depth += 1;
                text.push('{');
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                text.push('}');
            }
            b'"' | b'\'' => {
                text.push(b as char);
                read_opaque_quoted(r, b, start, &mut text)?;
            }
            b'/' if r.peek() == Some(b'/') => {
                text.push('/');
                read_line_comment(r, &mut text);
            }
            b'/' if r.peek() == Some(b'*') => {
                text.push('/');
                read_block_comment(r, start, &mut text)?;
            }
            _ => text.push(b as char),
        }
    }

    Ok(text)
}

fn read_opaque_quoted(
    r: &mut ByteReader,
    quote: u8,
    start: Position,
    text: &mut String,
) -> GenResult<()> {
    loop {
        let b = r.read().ok_or_else(|| GeneratorError::lex("unterminated string in fix block", start))?;
        text.push(b as char);
        if b == b'\\' {
            let esc = r.read().ok_or_else(|| {
                GeneratorError::lex("unterminated escape in fix block", start)
            })?;
            text.push(esc as char);
            continue;
        }
        if b == quote {
            return Ok(());
        }
    }
}

fn read_line_comment(r: &mut ByteReader, text: &mut String) {
    r.read(); // second '/'
    text.push('/');
    while let Some(b) = r.peek() {
        if b == b'\n' {
            break;
        }
        text.push(b as char);
        r.read();
    }
}

fn read_block_comment(r: &mut ByteReader, start: Position, text: &mut String) -> GenResult<()> {
    r.read(); // '*'
    text.push('*');
    loop {
        let b = r.read().ok_or_else(|| GeneratorError::lex("unterminated block comment in fix block", start))?;
        text.push(b as char);
        if b == b'*' && r.peek() == Some(b'/') {
            r.read();
            text.push('/');
            return Ok(());
        }
    }
}
