//! Numeric-value parsing shared by adjustment keys and path-part fields
//! (spec.md §4.3: "a number is either a signed decimal literal, a
//! parenthesized expression delegated to C1, or `<identifier>(<args>)`
//! also delegated to C1").

use super::eval_err_at;
use crate::error_reporting::SourceReport;
use crate::eval::{self, EvalContext};
use cfdg_lexer::SourceReader;

/// Parses one number and consumes trailing whitespace/comments, per
/// spec.md §4.3 ("after every value parse, trailing whitespace/comments
/// are consumed").
pub fn parse_number_value(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<f64, SourceReport> {
    reader.skip_space();
    let start = reader.position();
    let value = match reader.peek_char() {
        Some('(') => eval::eval_parenthesized(reader, ctx).map_err(|e| eval_err_at(start, e))?.as_f64(),
        Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => reader
            .read_signed_real()
            .ok_or_else(|| SourceReport::new(start, "expected a number", None).with_label(start, "here"))?,
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let name = reader.read_identifier().unwrap().to_string();
            eval::eval_function_call(&name, reader, ctx).map_err(|e| eval_err_at(start, e))?.as_f64()
        }
        _ => {
            return Err(SourceReport::new(start, "expected a number, '(', or function call", None)
                .with_label(start, "here"))
        }
    };
    reader.skip_space();
    Ok(value)
}

/// An unsigned integer, used for loop counts. Does not consume a
/// trailing `*`.
pub fn parse_unsigned_int(reader: &mut SourceReader) -> Result<u32, SourceReport> {
    reader.skip_space();
    let start = reader.position();
    let mut end = start;
    while matches!(reader.peek_char(), Some(c) if c.is_ascii_digit()) {
        reader.skip_chars(1);
        end = reader.position();
    }
    if end == start {
        return Err(SourceReport::new(start, "expected an integer", None).with_label(start, "here"));
    }
    reader
        .span_text(start..end)
        .parse()
        .map_err(|_| SourceReport::new(start, "integer literal out of range", None).with_label(start, "here"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx(rng: &mut dyn rand::RngCore) -> EvalContext<'_> {
        EvalContext { degrees: false, force_real: false, rng }
    }

    #[test]
    fn parses_plain_literal() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("-1.5 rest");
        assert_eq!(parse_number_value(&mut reader, &mut ctx(&mut rng)).unwrap(), -1.5);
    }

    #[test]
    fn parses_parenthesized_expression() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("(2+3) tail");
        assert_eq!(parse_number_value(&mut reader, &mut ctx(&mut rng)).unwrap(), 5.0);
    }

    #[test]
    fn parses_function_call() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("sqrt(9)");
        assert_eq!(parse_number_value(&mut reader, &mut ctx(&mut rng)).unwrap(), 3.0);
    }
}
