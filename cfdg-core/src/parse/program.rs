//! Top-level directive loop: `startshape`, `include`, `background`,
//! `tile`, `size`, `rule`, `path` (spec.md §4.3). Parse errors abandon
//! the current directive and resynchronize at the next recognized
//! keyword (spec.md §7) rather than aborting the whole source.

use super::adjustment::parse_adjustment;
use super::numeric::parse_number_value;
use super::path_body::parse_path_part_sequence;
use super::rule_body::parse_action_sequence;
use super::{closer_for, open_block};
use crate::ast::{ActionList, PathAction, Program, RuleKind, TileSpec};
use crate::color::Hsva;
use crate::error_reporting::SourceReport;
use crate::eval::EvalContext;
use crate::state::{apply, State};
use cfdg_lexer::SourceReader;

const TOP_LEVEL_KEYWORDS: &[&str] = &["startshape", "include", "background", "tile", "size", "rule", "path"];

/// Parses a whole source file into a [`Program`]. `rng`/`degrees` back
/// the embedded expression evaluator (spec.md §4.1); diagnostics for
/// abandoned directives are printed to stderr as they're found.
pub fn parse_source(source: &str, rng: &mut dyn rand::RngCore) -> Program {
    let mut program = Program::default();
    let mut reader = SourceReader::new(source);
    let mut ctx = EvalContext { degrees: true, force_real: false, rng };

    loop {
        reader.skip_space();
        if reader.at_eof() {
            break;
        }
        if let Err(report) = parse_one_directive(&mut reader, &mut ctx, &mut program) {
            report.eprint(source);
            recover(&mut reader);
        }
    }
    program
}

fn parse_one_directive(
    reader: &mut SourceReader,
    ctx: &mut EvalContext,
    program: &mut Program,
) -> Result<(), SourceReport> {
    let pos = reader.position();
    let keyword = reader
        .read_identifier()
        .ok_or_else(|| SourceReport::new(pos, "expected a top-level directive", None).with_label(pos, "here"))?;

    match keyword {
        "startshape" => {
            reader.skip_space();
            let name_pos = reader.position();
            let name = reader
                .read_identifier()
                .ok_or_else(|| {
                    SourceReport::new(name_pos, "expected a rule name after \"startshape\"", None)
                        .with_label(name_pos, "here")
                })?
                .to_string();
            program.start_shape = name;
            reader.skip_space();
            if matches!(reader.peek_char(), Some('{') | Some('[')) {
                program.start_adjustment = parse_adjustment(reader, ctx)?;
            }
            Ok(())
        }
        "include" => {
            reader.skip_space();
            let path_pos = reader.position();
            let raw = if reader.peek_char() == Some('"') {
                reader.read_quoted_string()
            } else {
                reader.read_token()
            }
            .ok_or_else(|| {
                SourceReport::new(path_pos, "expected a filename after \"include\"", None)
                    .with_label(path_pos, "here")
            })?;
            program.includes.push(raw.to_string());
            Ok(())
        }
        "background" => {
            let adj = parse_adjustment(reader, ctx)?;
            let base = State::identity(Hsva { hue: 0.0, saturation: 0.0, value: 1.0, alpha: 1.0 });
            program.background = apply(base, &adj).color;
            Ok(())
        }
        "tile" => {
            let adj = parse_adjustment(reader, ctx)?;
            program.tile = Some(TileSpec { m: adj.m });
            Ok(())
        }
        "size" => skip_balanced_block(reader),
        "rule" => {
            reader.skip_space();
            let name_pos = reader.position();
            let name = reader
                .read_identifier()
                .ok_or_else(|| {
                    SourceReport::new(name_pos, "expected a rule name after \"rule\"", None)
                        .with_label(name_pos, "here")
                })?
                .to_string();
            reader.skip_space();
            let weight = if matches!(reader.peek_char(), Some(c) if c.is_ascii_digit() || c == '.' || c == '(') {
                parse_number_value(reader, ctx)?
            } else {
                1.0
            };
            let actions = parse_action_sequence(reader, ctx)?;
            let id = program.rule_or_insert(&name);
            program.rule_mut(id).action_lists.push(ActionList { weight, actions });
            Ok(())
        }
        "path" => {
            reader.skip_space();
            let name_pos = reader.position();
            let name = reader
                .read_identifier()
                .ok_or_else(|| {
                    SourceReport::new(name_pos, "expected a rule name after \"path\"", None)
                        .with_label(name_pos, "here")
                })?
                .to_string();
            let parts = parse_path_part_sequence(reader, ctx)?;
            let id = program.rule_or_insert(&name);
            let entry = program.rule_mut(id);
            entry.kind = RuleKind::Path;
            entry.path = Some(PathAction { parts });
            Ok(())
        }
        other => Err(SourceReport::new(pos, &format!("unrecognized top-level directive \"{other}\""), None)
            .with_label(pos, "here")),
    }
}

/// `size`'s fields are parsed but never used by the engine (spec.md §9
/// Open Questions); consume the balanced block and discard it.
fn skip_balanced_block(reader: &mut SourceReader) -> Result<(), SourceReport> {
    let opener = open_block(reader)?;
    let closer = closer_for(opener);
    let mut depth = 1usize;
    loop {
        match reader.read_char() {
            Some(c) if c == opener => depth += 1,
            Some(c) if c == closer => {
                depth -= 1;
                if depth == 0 {
                    return Ok(());
                }
            }
            Some(_) => {}
            None => {
                let pos = reader.position();
                return Err(SourceReport::new(pos, "unterminated \"size\" block", None).with_label(pos, "here"));
            }
        }
    }
}

/// Advances past whatever caused the error until the next recognized
/// top-level keyword (or end of source), so parsing can resume there.
fn recover(reader: &mut SourceReader) {
    loop {
        reader.skip_space();
        if reader.at_eof() {
            return;
        }
        let here = reader.position();
        let mut probe = reader.clone();
        if let Some(word) = probe.read_identifier() {
            if TOP_LEVEL_KEYWORDS.contains(&word) {
                return;
            }
        }
        reader.set_position(here);
        if reader.read_char().is_none() {
            return;
        }
    }
}

/// SPEC_FULL.md §2 supplement: includes resolve relative to the
/// including file's directory first, then as written (colinw7's
/// search order). Pure path arithmetic — actual file reads are the
/// embedding driver's job.
#[must_use]
pub fn resolve_include_path(including_file: Option<&std::path::Path>, raw: &str) -> Vec<std::path::PathBuf> {
    let mut candidates = vec![];
    if let Some(base) = including_file.and_then(|p| p.parent()) {
        candidates.push(base.join(raw));
    }
    candidates.push(std::path::PathBuf::from(raw));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn parse(src: &str) -> Program {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        parse_source(src, &mut rng)
    }

    #[test]
    fn parses_startshape_and_a_terminal_square_rule() {
        let program = parse("startshape S\nrule S { SQUARE { } }");
        assert_eq!(program.start_shape, "S");
        let id = program.find_rule("S").unwrap();
        assert!(!program.rule(id).is_terminal_primitive());
        assert_eq!(program.rule(id).action_lists.len(), 1);
    }

    #[test]
    fn background_brightness_delta_moves_from_white_toward_black() {
        let program = parse("startshape S\nbackground { b -1 }\nrule S { SQUARE { } }");
        assert_eq!(program.background.value, 0.0);
    }

    #[test]
    fn multiple_rule_statements_append_weighted_alternatives() {
        let program = parse("startshape S\nrule S 1 { SQUARE { } }\nrule S 3 { CIRCLE { } }");
        let id = program.find_rule("S").unwrap();
        let entry = program.rule(id);
        assert_eq!(entry.action_lists.len(), 2);
        assert_eq!(entry.total_weight(), 4.0);
    }

    #[test]
    fn path_directive_marks_rule_kind_path() {
        let program = parse("path P { MOVETO {x 0 y 0} LINETO {x 1 y 1} STROKE {width 0.2} }\nstartshape P");
        let id = program.find_rule("P").unwrap();
        assert_eq!(program.rule(id).kind, RuleKind::Path);
        assert!(program.rule(id).path.is_some());
    }

    #[test]
    fn size_directive_is_parsed_and_discarded() {
        let program = parse("startshape S\nsize { 400 400 }\nrule S { SQUARE { } }");
        assert_eq!(program.start_shape, "S");
    }

    #[test]
    fn an_error_in_one_rule_does_not_abort_the_rest_of_the_file() {
        let program = parse("rule Bad { !!! }\nstartshape S\nrule S { SQUARE { } }");
        assert_eq!(program.start_shape, "S");
        assert!(program.find_rule("S").is_some());
    }

    #[test]
    fn include_directive_is_recorded_verbatim() {
        let program = parse("include \"shapes/extra.cfdg\"\nstartshape S\nrule S { SQUARE { } }");
        assert_eq!(program.includes, vec!["shapes/extra.cfdg".to_string()]);
    }
}
