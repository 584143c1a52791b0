//! Path-body parsing: `path <id> <block>` holds PathParts instead of
//! Actions (spec.md §4.3/§4.6).

use super::adjustment::{try_apply_adjustment_key, PartialAdjustment};
use super::numeric::parse_number_value;
use super::{at_block_close, close_block, closer_for, open_block, try_consume_loop_header};
use crate::ast::{Adjustment, PathPart, Point};
use crate::error_reporting::SourceReport;
use crate::eval::EvalContext;
use cfdg_lexer::SourceReader;

#[derive(Default)]
struct PointFields {
    x: Option<f64>,
    y: Option<f64>,
    x1: Option<f64>,
    y1: Option<f64>,
    x2: Option<f64>,
    y2: Option<f64>,
    rx: Option<f64>,
    ry: Option<f64>,
    r: Option<f64>,
    width: Option<f64>,
    param: Option<String>,
    adjustment: Adjustment,
}

fn require(value: Option<f64>, pos: usize, what: &str) -> Result<f64, SourceReport> {
    value.ok_or_else(|| {
        SourceReport::new(pos, &format!("this path op is missing its \"{what}\" field"), None)
            .with_label(pos, "here")
    })
}

fn parse_fields(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<PointFields, SourceReport> {
    let opener = open_block(reader)?;
    let closer = closer_for(opener);
    let mut fields = PointFields::default();
    let mut partial = PartialAdjustment::new(opener);

    reader.skip_space();
    while !at_block_close(reader, closer) {
        let pos = reader.position();
        let key = reader
            .read_identifier()
            .ok_or_else(|| SourceReport::new(pos, "expected a field key", None).with_label(pos, "here"))?
            .to_string();
        match key.as_str() {
            "x" => fields.x = Some(parse_number_value(reader, ctx)?),
            "y" => fields.y = Some(parse_number_value(reader, ctx)?),
            "x1" => fields.x1 = Some(parse_number_value(reader, ctx)?),
            "y1" => fields.y1 = Some(parse_number_value(reader, ctx)?),
            "x2" => fields.x2 = Some(parse_number_value(reader, ctx)?),
            "y2" => fields.y2 = Some(parse_number_value(reader, ctx)?),
            "rx" => fields.rx = Some(parse_number_value(reader, ctx)?),
            "ry" => fields.ry = Some(parse_number_value(reader, ctx)?),
            "r" => fields.r = Some(parse_number_value(reader, ctx)?),
            "width" => fields.width = Some(parse_number_value(reader, ctx)?),
            "p" | "param" => {
                reader.skip_space();
                let token_pos = reader.position();
                let token = reader.read_identifier().ok_or_else(|| {
                    SourceReport::new(token_pos, "expected a flag identifier", None).with_label(token_pos, "here")
                })?;
                fields.param = Some(token.to_string());
                reader.skip_space();
            }
            other => {
                if !try_apply_adjustment_key(&mut partial, other, reader, ctx)? {
                    return Err(SourceReport::new(pos, &format!("unrecognized path field key \"{key}\""), None)
                        .with_label(pos, "here"));
                }
            }
        }
        reader.skip_space();
    }
    close_block(reader, closer)?;
    fields.adjustment = partial.finish();
    Ok(fields)
}

fn build_path_part(op: &str, fields: PointFields, pos: usize) -> Result<PathPart, SourceReport> {
    match op {
        "MOVETO" => Ok(PathPart::MoveTo(Point { x: require(fields.x, pos, "x")?, y: require(fields.y, pos, "y")? })),
        "LINETO" => Ok(PathPart::LineTo(Point { x: require(fields.x, pos, "x")?, y: require(fields.y, pos, "y")? })),
        "ARCTO" => {
            let to = Point { x: require(fields.x, pos, "x")?, y: require(fields.y, pos, "y")? };
            let (mut rx, mut ry) = match fields.r {
                Some(r) => (r, r),
                None => {
                    let rx = fields.rx.unwrap_or(0.0);
                    (rx, fields.ry.unwrap_or(rx))
                }
            };
            let large_arc = fields.param.as_deref() == Some("large");
            let mut sweep = true;
            if fields.param.as_deref() == Some("cw") {
                sweep = false;
            }
            if rx < 0.0 {
                sweep = !sweep;
                rx = rx.abs();
            }
            if ry < 0.0 {
                sweep = !sweep;
                ry = ry.abs();
            }
            Ok(PathPart::ArcTo { to, rx, ry, x_axis_rotation_deg: 0.0, large_arc, sweep })
        }
        "CURVETO" => {
            let end = Point { x: require(fields.x, pos, "x")?, y: require(fields.y, pos, "y")? };
            let control1 = Point { x: require(fields.x1, pos, "x1")?, y: require(fields.y1, pos, "y1")? };
            let control2 = match (fields.x2, fields.y2) {
                (Some(x2), Some(y2)) => Some(Point { x: x2, y: y2 }),
                _ => None,
            };
            Ok(PathPart::CurveTo { control1, control2, end })
        }
        "CLOSEPOLY" => Ok(PathPart::Close),
        "STROKE" => Ok(PathPart::Stroke { width: fields.width.unwrap_or(0.1), adjustment: fields.adjustment }),
        "FILL" => Ok(PathPart::Fill {
            evenodd: fields.param.as_deref() == Some("evenodd"),
            adjustment: fields.adjustment,
        }),
        "MOVEREL" => Ok(PathPart::Unimplemented("MOVEREL")),
        "LINEREL" => Ok(PathPart::Unimplemented("LINEREL")),
        "ARCREL" => Ok(PathPart::Unimplemented("ARCREL")),
        "CURVEREL" => Ok(PathPart::Unimplemented("CURVEREL")),
        other => Err(SourceReport::new(pos, &format!("unrecognized path operation \"{other}\""), None)
            .with_label(pos, "here")),
    }
}

fn parse_single_op(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<PathPart, SourceReport> {
    reader.skip_space();
    let pos = reader.position();
    let op = reader
        .read_identifier()
        .ok_or_else(|| SourceReport::new(pos, "expected a path operation name", None).with_label(pos, "here"))?
        .to_string();
    let fields = parse_fields(reader, ctx)?;
    build_path_part(&op, fields, pos)
}

pub fn parse_path_part(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<PathPart, SourceReport> {
    if let Some(count) = try_consume_loop_header(reader)? {
        let adjustment = super::adjustment::parse_adjustment(reader, ctx)?;
        reader.skip_space();
        if matches!(reader.peek_char(), Some('{') | Some('[')) {
            let parts = parse_path_part_sequence(reader, ctx)?;
            Ok(PathPart::LoopPartList { count, adjustment, parts })
        } else {
            let inner = Box::new(parse_single_op(reader, ctx)?);
            Ok(PathPart::LoopPart { count, adjustment, inner })
        }
    } else {
        parse_single_op(reader, ctx)
    }
}

/// The full `{ ... }` / `[ ... ]` body of a `path` rule, or of a
/// `LoopPartList`'s nested group.
pub fn parse_path_part_sequence(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Vec<PathPart>, SourceReport> {
    let opener = open_block(reader)?;
    let closer = closer_for(opener);
    let mut parts = vec![];
    reader.skip_space();
    while !at_block_close(reader, closer) {
        parts.push(parse_path_part(reader, ctx)?);
        reader.skip_space();
    }
    close_block(reader, closer)?;
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx(rng: &mut dyn rand::RngCore) -> EvalContext<'_> {
        EvalContext { degrees: false, force_real: false, rng }
    }

    #[test]
    fn moveto_reads_point() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("MOVETO {x 1 y 2}");
        match parse_path_part(&mut reader, &mut ctx(&mut rng)).unwrap() {
            PathPart::MoveTo(p) => assert_eq!(p, Point { x: 1.0, y: 2.0 }),
            other => panic!("expected MoveTo, got {other:?}"),
        }
    }

    #[test]
    fn arcto_large_and_negative_radius_flips_sweep() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("ARCTO {x 1 y 0 r -1 p large}");
        match parse_path_part(&mut reader, &mut ctx(&mut rng)).unwrap() {
            PathPart::ArcTo { rx, ry, large_arc, sweep, .. } => {
                assert_eq!(rx, 1.0);
                assert_eq!(ry, 1.0);
                assert!(large_arc);
                assert!(!sweep);
            }
            other => panic!("expected ArcTo, got {other:?}"),
        }
    }

    #[test]
    fn curveto_with_one_control_point() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("CURVETO {x1 0 y1 1 x 2 y 2}");
        match parse_path_part(&mut reader, &mut ctx(&mut rng)).unwrap() {
            PathPart::CurveTo { control2, .. } => assert!(control2.is_none()),
            other => panic!("expected CurveTo, got {other:?}"),
        }
    }

    #[test]
    fn stroke_defaults_width_when_omitted() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("STROKE {}");
        match parse_path_part(&mut reader, &mut ctx(&mut rng)).unwrap() {
            PathPart::Stroke { width, .. } => assert_eq!(width, 0.1),
            other => panic!("expected Stroke, got {other:?}"),
        }
    }

    #[test]
    fn moverel_is_parsed_but_unimplemented() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("MOVEREL {x 1 y 1}");
        match parse_path_part(&mut reader, &mut ctx(&mut rng)).unwrap() {
            PathPart::Unimplemented(name) => assert_eq!(name, "MOVEREL"),
            other => panic!("expected Unimplemented, got {other:?}"),
        }
    }

    #[test]
    fn loop_part_list_parses_nested_group() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("2 * { x 1 } { MOVETO {x 0 y 0} LINETO {x 1 y 0} }");
        match parse_path_part(&mut reader, &mut ctx(&mut rng)).unwrap() {
            PathPart::LoopPartList { count, parts, .. } => {
                assert_eq!(count, 2);
                assert_eq!(parts.len(), 2);
            }
            other => panic!("expected LoopPartList, got {other:?}"),
        }
    }
}
