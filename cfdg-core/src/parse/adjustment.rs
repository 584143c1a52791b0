//! Adjustment-block parsing (spec.md §4.3): `<key> <value>` pairs inside
//! `{ ... }` (block mode) or `[ ... ]` (compose mode).

use super::numeric::parse_number_value;
use super::{at_block_close, close_block, closer_for, open_block};
use crate::ast::{Adjustment, ChannelAdj};
use crate::error_reporting::SourceReport;
use crate::eval::EvalContext;
use crate::transform::Affine;
use cfdg_lexer::SourceReader;

const ADJUSTMENT_KEYS: &[&str] = &[
    "x", "y", "z", "size", "s", "rotate", "r", "flip", "f", "skew", "hue", "h", "saturation", "sat",
    "brightness", "b", "alpha", "a", "|h", "|sat", "|b", "|a",
];

fn peek_is_key(reader: &SourceReader) -> bool {
    let mut probe = reader.clone();
    probe.skip_space();
    probe.read_identifier().is_some_and(|word| ADJUSTMENT_KEYS.contains(&word))
}

fn peek_is_number_start(reader: &SourceReader) -> bool {
    let mut probe = reader.clone();
    probe.skip_space();
    match probe.peek_char() {
        Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' || c == '(' => true,
        Some(c) if c.is_ascii_alphabetic() || c == '_' => !peek_is_key(reader),
        _ => false,
    }
}

fn parse_number_list(
    reader: &mut SourceReader,
    ctx: &mut EvalContext,
    min: usize,
    max: usize,
) -> Result<Vec<f64>, SourceReport> {
    let mut values = vec![];
    while values.len() < max && peek_is_number_start(reader) {
        values.push(parse_number_value(reader, ctx)?);
    }
    if values.len() < min {
        let pos = reader.position();
        return Err(SourceReport::new(pos, "not enough numeric arguments for this adjustment key", None)
            .with_label(pos, "here"));
    }
    Ok(values)
}

fn parse_channel_adj(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<ChannelAdj, SourceReport> {
    let delta = parse_number_value(reader, ctx)?;
    let use_target = reader.peek_char() == Some('|');
    if use_target {
        reader.skip_chars(1);
        reader.skip_space();
    }
    Ok(ChannelAdj { delta, use_target })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Block,
    Compose,
}

/// Accumulates an adjustment body. In [`Mode::Compose`], geometric keys
/// right-multiply into a running matrix as they're written; in
/// [`Mode::Block`], they're stored and combined in the fixed order
/// translate · rotate · scale · skew · flip once the block closes.
struct AdjustmentBuilder {
    mode: Mode,
    m: Affine,
    translate: Option<(f64, f64)>,
    rotate: Option<f64>,
    scale: Option<(f64, f64)>,
    skew: Option<(f64, f64)>,
    flip: Option<f64>,
    z: Option<f64>,
    sz: Option<f64>,
    hue: Option<ChannelAdj>,
    saturation: Option<ChannelAdj>,
    brightness: Option<ChannelAdj>,
    alpha: Option<ChannelAdj>,
    lhue: Option<ChannelAdj>,
    lsaturation: Option<ChannelAdj>,
    lbrightness: Option<ChannelAdj>,
    lalpha: Option<ChannelAdj>,
}

impl AdjustmentBuilder {
    fn new(mode: Mode) -> Self {
        AdjustmentBuilder {
            mode,
            m: Affine::IDENTITY,
            translate: None,
            rotate: None,
            scale: None,
            skew: None,
            flip: None,
            z: None,
            sz: None,
            hue: None,
            saturation: None,
            brightness: None,
            alpha: None,
            lhue: None,
            lsaturation: None,
            lbrightness: None,
            lalpha: None,
        }
    }

    fn compose_now(&mut self, op: Affine) {
        if self.mode == Mode::Compose {
            // Each newly-written key applies *before* everything
            // accumulated so far (spec.md §4.3 "right-multiplication"):
            // written-first applies last, i.e. outermost.
            self.m = op.compose(&self.m);
        }
    }

    /// Tries to consume `key`'s value(s) from `reader`. Returns `Ok(true)`
    /// if `key` was a recognized adjustment key (and its value consumed),
    /// `Ok(false)` if the caller should try some other kind of key (used
    /// by path-part fields, which overlay point keys on top of these).
    fn try_apply(
        &mut self,
        key: &str,
        reader: &mut SourceReader,
        ctx: &mut EvalContext,
    ) -> Result<bool, SourceReport> {
        match key {
            "x" | "y" => {
                let first = parse_number_value(reader, ctx)?;
                let (x, y) = if key == "x" { (first, 0.0) } else { (0.0, first) };
                self.translate = Some(add_pair(self.translate, (x, y)));
                self.compose_now(Affine::translate(x, y));
            }
            "z" => self.z = Some(self.z.unwrap_or(0.0) + parse_number_value(reader, ctx)?),
            "size" | "s" => {
                let values = parse_number_list(reader, ctx, 1, 3)?;
                let sx = values[0];
                let sy = values.get(1).copied().unwrap_or(sx);
                self.scale = Some((sx, sy));
                self.compose_now(Affine::scale(sx, sy));
                if let Some(&sz) = values.get(2) {
                    self.sz = Some(self.sz.unwrap_or(1.0) * sz);
                }
            }
            "rotate" | "r" => {
                let deg = parse_number_value(reader, ctx)?;
                self.rotate = Some(self.rotate.unwrap_or(0.0) + deg);
                self.compose_now(Affine::rotate_degrees(deg));
            }
            "flip" | "f" => {
                let deg = parse_number_value(reader, ctx)?;
                self.flip = Some(deg);
                self.compose_now(Affine::reflect_degrees(deg));
            }
            "skew" => {
                let values = parse_number_list(reader, ctx, 2, 2)?;
                self.skew = Some((values[0], values[1]));
                self.compose_now(Affine::skew_degrees(values[0], values[1]));
            }
            "hue" | "h" => self.hue = Some(parse_channel_adj(reader, ctx)?),
            "saturation" | "sat" => self.saturation = Some(parse_channel_adj(reader, ctx)?),
            "brightness" | "b" => self.brightness = Some(parse_channel_adj(reader, ctx)?),
            "alpha" | "a" => self.alpha = Some(parse_channel_adj(reader, ctx)?),
            "|h" => self.lhue = Some(parse_channel_adj(reader, ctx)?),
            "|sat" => self.lsaturation = Some(parse_channel_adj(reader, ctx)?),
            "|b" => self.lbrightness = Some(parse_channel_adj(reader, ctx)?),
            "|a" => self.lalpha = Some(parse_channel_adj(reader, ctx)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Adjustment {
        let m = match self.mode {
            Mode::Compose => self.m,
            Mode::Block => {
                // Fixed order translate * rotate * scale * skew * flip
                // (spec.md §4.3): flip applies first (innermost), each
                // subsequent factor applies after what's accumulated so
                // far, translate last (outermost).
                let mut m = Affine::IDENTITY;
                if let Some((x, y)) = self.translate {
                    m = Affine::translate(x, y).compose(&m);
                }
                if let Some(deg) = self.rotate {
                    m = Affine::rotate_degrees(deg).compose(&m);
                }
                if let Some((sx, sy)) = self.scale {
                    m = Affine::scale(sx, sy).compose(&m);
                }
                if let Some((rx, ry)) = self.skew {
                    m = Affine::skew_degrees(rx, ry).compose(&m);
                }
                if let Some(deg) = self.flip {
                    m = Affine::reflect_degrees(deg).compose(&m);
                }
                m
            }
        };
        Adjustment {
            m,
            z: self.z,
            sz: self.sz,
            hue: self.hue,
            saturation: self.saturation,
            brightness: self.brightness,
            alpha: self.alpha,
            lhue: self.lhue,
            lsaturation: self.lsaturation,
            lbrightness: self.lbrightness,
            lalpha: self.lalpha,
        }
    }
}

fn add_pair(existing: Option<(f64, f64)>, delta: (f64, f64)) -> (f64, f64) {
    match existing {
        Some((x, y)) => (x + delta.0, y + delta.1),
        None => delta,
    }
}

/// Parses a full `{ ... }` / `[ ... ]` adjustment block.
pub fn parse_adjustment(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Adjustment, SourceReport> {
    let opener = open_block(reader)?;
    let closer = closer_for(opener);
    let mode = if opener == '[' { Mode::Compose } else { Mode::Block };
    let mut builder = AdjustmentBuilder::new(mode);

    while !at_block_close(reader, closer) {
        let pos = reader.position();
        let key = reader
            .read_identifier()
            .ok_or_else(|| SourceReport::new(pos, "expected an adjustment key", None).with_label(pos, "here"))?
            .to_string();
        if !builder.try_apply(&key, reader, ctx)? {
            return Err(SourceReport::new(pos, &format!("unrecognized adjustment key \"{key}\""), None)
                .with_label(pos, "here"));
        }
        reader.skip_space();
    }
    close_block(reader, closer)?;
    Ok(builder.finish())
}

/// Exposed for `path_body`, whose STROKE/FILL blocks accept the same
/// keys plus their own (`width`, `p`/`param`).
pub(crate) fn try_apply_adjustment_key(
    builder_state: &mut PartialAdjustment,
    key: &str,
    reader: &mut SourceReader,
    ctx: &mut EvalContext,
) -> Result<bool, SourceReport> {
    builder_state.0.try_apply(key, reader, ctx)
}

/// A `pub(crate)`-visible wrapper so `path_body.rs` can build up an
/// adjustment field-by-field alongside its own point keys, in the same
/// block, without re-exporting `AdjustmentBuilder` itself.
pub(crate) struct PartialAdjustment(AdjustmentBuilder);

impl PartialAdjustment {
    pub(crate) fn new(opener: char) -> Self {
        let mode = if opener == '[' { Mode::Compose } else { Mode::Block };
        PartialAdjustment(AdjustmentBuilder::new(mode))
    }

    pub(crate) fn finish(self) -> Adjustment {
        self.0.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ctx(rng: &mut dyn rand::RngCore) -> EvalContext<'_> {
        EvalContext { degrees: false, force_real: false, rng }
    }

    #[test]
    fn block_mode_combines_in_fixed_order() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("{ x 1 r 90 }");
        let adj = parse_adjustment(&mut reader, &mut ctx(&mut rng)).unwrap();
        // block mode is fixed-order translate-last: rotate first, then
        // translate: (0,0) -> rotate 90 -> (0,0) -> translate -> (1,0)
        let (x, y) = adj.m.apply(0.0, 0.0);
        assert!((x - 1.0).abs() < 1e-9);
        assert!((y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn compose_mode_applies_in_written_order() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("[ r 90 x 1 ]");
        let adj = parse_adjustment(&mut reader, &mut ctx(&mut rng)).unwrap();
        // compose mode applies written-first last: translate first, then
        // rotate: (0,0) -> translate -> (1,0) -> rotate 90 -> (0,1)
        let (x, y) = adj.m.apply(0.0, 0.0);
        assert!((x - 0.0).abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn size_with_one_real_scales_uniformly() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("{ s 0.5 }");
        let adj = parse_adjustment(&mut reader, &mut ctx(&mut rng)).unwrap();
        assert_eq!(adj.m.approx_scale(), (0.5, 0.5));
        assert_eq!(adj.sz, None);
    }

    #[test]
    fn size_with_three_reals_sets_sz() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("{ s 0.5 0.6 0.7 }");
        let adj = parse_adjustment(&mut reader, &mut ctx(&mut rng)).unwrap();
        assert_eq!(adj.m.approx_scale(), (0.5, 0.6));
        assert_eq!(adj.sz, Some(0.7));
    }

    #[test]
    fn hue_with_trailing_pipe_sets_target_flag() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("{ h 30| }");
        let adj = parse_adjustment(&mut reader, &mut ctx(&mut rng)).unwrap();
        assert!(adj.hue.unwrap().use_target);
    }

    #[test]
    fn unrecognized_key_is_an_error() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        let mut reader = SourceReader::new("{ bogus 1 }");
        assert!(parse_adjustment(&mut reader, &mut ctx(&mut rng)).is_err());
    }
}
