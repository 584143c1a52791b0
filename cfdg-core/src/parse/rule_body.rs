//! Rule-body parsing: the ordered sequence of Actions inside a `rule`
//! block (spec.md §4.3).

use super::adjustment::parse_adjustment;
use super::{at_block_close, close_block, closer_for, open_block, try_consume_loop_header};
use crate::ast::{Action, RuleRef};
use crate::error_reporting::SourceReport;
use crate::eval::EvalContext;
use cfdg_lexer::SourceReader;

/// `<id>` or `<id>::<id>` (the only way to spell `CF::EMPTY` given the
/// lexer's identifier charset, which excludes `:`).
pub(crate) fn parse_rule_name(reader: &mut SourceReader) -> Result<RuleRef, SourceReport> {
    reader.skip_space();
    let pos = reader.position();
    let first = reader
        .read_identifier()
        .ok_or_else(|| SourceReport::new(pos, "expected a rule name", None).with_label(pos, "here"))?
        .to_string();
    if reader.peek_char() == Some(':') && reader.peek_char_at(1) == Some(':') {
        reader.skip_chars(2);
        let rest_pos = reader.position();
        let second = reader
            .read_identifier()
            .ok_or_else(|| SourceReport::new(rest_pos, "expected a name after \"::\"", None).with_label(rest_pos, "here"))?;
        return Ok(RuleRef::Unresolved(format!("{first}::{second}")));
    }
    Ok(RuleRef::Unresolved(first))
}

pub fn parse_action(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Action, SourceReport> {
    if let Some(count) = try_consume_loop_header(reader)? {
        let loop_adjustment = parse_adjustment(reader, ctx)?;
        reader.skip_space();
        if matches!(reader.peek_char(), Some('{') | Some('[')) {
            let opener = open_block(reader)?;
            let closer = closer_for(opener);
            let inner = Box::new(parse_action(reader, ctx)?);
            reader.skip_space();
            close_block(reader, closer)?;
            Ok(Action::ComplexLoop { count, loop_adjustment, inner })
        } else {
            let target = parse_rule_name(reader)?;
            let adjustment = parse_adjustment(reader, ctx)?;
            Ok(Action::Loop { count, loop_adjustment, target, adjustment })
        }
    } else {
        let target = parse_rule_name(reader)?;
        let adjustment = parse_adjustment(reader, ctx)?;
        Ok(Action::Simple { target, adjustment })
    }
}

/// The full `{ ... }` / `[ ... ]` body of a `rule`/additional-weighted-
/// alternative block: zero or more Actions.
pub fn parse_action_sequence(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Vec<Action>, SourceReport> {
    let opener = open_block(reader)?;
    let closer = closer_for(opener);
    let mut actions = vec![];
    reader.skip_space();
    while !at_block_close(reader, closer) {
        actions.push(parse_action(reader, ctx)?);
        reader.skip_space();
    }
    close_block(reader, closer)?;
    Ok(actions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx(rng: &mut dyn rand::RngCore) -> EvalContext<'_> {
        EvalContext { degrees: false, force_real: false, rng }
    }

    #[test]
    fn simple_action_parses_name_and_adjustment() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("A { s 0.5 }");
        match parse_action(&mut reader, &mut ctx(&mut rng)).unwrap() {
            Action::Simple { target: RuleRef::Unresolved(name), .. } => assert_eq!(name, "A"),
            other => panic!("expected Simple, got {other:?}"),
        }
    }

    #[test]
    fn loop_action_parses_count_and_target() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("4 * { r 90 } SQUARE { }");
        match parse_action(&mut reader, &mut ctx(&mut rng)).unwrap() {
            Action::Loop { count, target: RuleRef::Unresolved(name), .. } => {
                assert_eq!(count, 4);
                assert_eq!(name, "SQUARE");
            }
            other => panic!("expected Loop, got {other:?}"),
        }
    }

    #[test]
    fn complex_loop_wraps_a_single_inner_action() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("3 * { r 10 } { A { s 0.9 } }");
        match parse_action(&mut reader, &mut ctx(&mut rng)).unwrap() {
            Action::ComplexLoop { count, inner, .. } => {
                assert_eq!(count, 3);
                assert!(matches!(*inner, Action::Simple { .. }));
            }
            other => panic!("expected ComplexLoop, got {other:?}"),
        }
    }

    #[test]
    fn cf_colon_colon_empty_is_a_valid_name() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("CF::EMPTY { }");
        match parse_action(&mut reader, &mut ctx(&mut rng)).unwrap() {
            Action::Simple { target: RuleRef::Unresolved(name), .. } => assert_eq!(name, "CF::EMPTY"),
            other => panic!("expected Simple, got {other:?}"),
        }
    }

    #[test]
    fn action_sequence_parses_multiple_actions() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("{ A { s 0.5 } B [ x 1 r 30 ] }");
        let actions = parse_action_sequence(&mut reader, &mut ctx(&mut rng)).unwrap();
        assert_eq!(actions.len(), 2);
    }
}
