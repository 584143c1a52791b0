//! C3: the recursive-descent grammar parser.

pub mod adjustment;
pub mod numeric;
pub mod path_body;
pub mod program;
pub mod rule_body;

use crate::error_reporting::{expect_some, SourceReport};
use cfdg_lexer::SourceReader;

/// `{ ... }` or `[ ... ]`: returns the opening delimiter so callers that
/// care (adjustment bodies) can tell block-mode from compose-mode.
pub(crate) fn open_block(reader: &mut SourceReader) -> Result<char, SourceReport> {
    reader.skip_space();
    let pos = reader.position();
    match reader.peek_char() {
        Some('{') => {
            reader.skip_chars(1);
            Ok('{')
        }
        Some('[') => {
            reader.skip_chars(1);
            Ok('[')
        }
        _ => Err(SourceReport::new(pos, "expected a block: '{' or '['", None).with_label(pos, "here")),
    }
}

pub(crate) fn closer_for(opener: char) -> char {
    if opener == '{' {
        '}'
    } else {
        ']'
    }
}

pub(crate) fn at_block_close(reader: &mut SourceReader, closer: char) -> bool {
    reader.skip_space();
    reader.peek_char() == Some(closer)
}

pub(crate) fn close_block(reader: &mut SourceReader, closer: char) -> Result<(), SourceReport> {
    reader.skip_space();
    let pos = reader.position();
    expect_some!(
        (reader.peek_char() == Some(closer)).then_some(()),
        pos,
        "the closing delimiter of this block"
    )?;
    reader.skip_chars(1);
    Ok(())
}

/// `<int> *`, backtracking cleanly if the lookahead doesn't match.
/// Shared by rule-body and path-body parsing (spec.md §4.3: both have a
/// `<int> * <adjustment> ...` loop form).
pub(crate) fn try_consume_loop_header(reader: &mut SourceReader) -> Result<Option<u32>, SourceReport> {
    let saved = reader.position();
    reader.skip_space();
    if !matches!(reader.peek_char(), Some(c) if c.is_ascii_digit()) {
        reader.set_position(saved);
        return Ok(None);
    }
    let count = numeric::parse_unsigned_int(reader)?;
    reader.skip_space();
    if reader.peek_char() == Some('*') {
        reader.skip_chars(1);
        Ok(Some(count))
    } else {
        reader.set_position(saved);
        Ok(None)
    }
}

/// Delegates a leading `(`/identifier numeric literal to [`crate::eval`],
/// translating [`crate::eval::EvalError`] into a [`SourceReport`] anchored
/// at the start of the literal.
pub(crate) fn eval_err_at(pos: usize, err: crate::eval::EvalError) -> SourceReport {
    SourceReport::new(pos, &err.to_string(), None).with_label(pos, "in this expression")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_block_accepts_either_delimiter() {
        let mut r = SourceReader::new("{ x 1 }");
        assert_eq!(open_block(&mut r).unwrap(), '{');

        let mut r = SourceReader::new("[ x 1 ]");
        assert_eq!(open_block(&mut r).unwrap(), '[');
    }
}
