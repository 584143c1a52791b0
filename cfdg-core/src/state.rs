//! The value threaded through expansion (spec.md §3, "State").

use crate::ast::Adjustment;
use crate::color::{adjust_channel, adjust_hue, Hsva};
use crate::transform::Affine;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub color: Hsva,
    pub lcolor: Hsva,
    pub z: f64,
    pub sz: f64,
    pub m: Affine,
}

impl State {
    #[must_use]
    pub fn identity(background: Hsva) -> Self {
        State { color: background, lcolor: background, z: 0.0, sz: 1.0, m: Affine::IDENTITY }
    }
}

/// Produces a new `State` from the old one plus an `Adjustment`
/// (spec.md §4.4 "Adjustment apply").
#[must_use]
pub fn apply(state: State, adj: &Adjustment) -> State {
    let mut next = state;

    if let Some(z) = adj.z {
        next.z += z;
    }
    if let Some(sz) = adj.sz {
        next.sz *= sz;
    }

    next.m = adj.m.compose(&state.m);

    if adj.touches_color() {
        next.color = apply_color(state.color, state.lcolor, adj.hue, adj.saturation, adj.brightness, adj.alpha);
    }
    if adj.touches_lcolor() {
        // Line-color deltas never use a target (GLOSSARY: lcolor is the
        // target for `color`, not for itself).
        next.lcolor = apply_color(state.lcolor, state.lcolor, adj.lhue, adj.lsaturation, adj.lbrightness, adj.lalpha);
    }

    next
}

fn apply_color(
    base: Hsva,
    target_source: Hsva,
    hue: Option<crate::ast::ChannelAdj>,
    saturation: Option<crate::ast::ChannelAdj>,
    brightness: Option<crate::ast::ChannelAdj>,
    alpha: Option<crate::ast::ChannelAdj>,
) -> Hsva {
    let mut color = base;
    if let Some(h) = hue {
        color.hue = adjust_hue(color.hue, h.resolve_against(target_source.hue));
    }
    if let Some(s) = saturation {
        color.saturation = adjust_channel(color.saturation, s.resolve_against(target_source.saturation));
    }
    if let Some(b) = brightness {
        color.value = adjust_channel(color.value, b.resolve_against(target_source.value));
    }
    if let Some(a) = alpha {
        color.alpha = adjust_channel(color.alpha, a.resolve_against(target_source.alpha));
    }
    color.clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ChannelAdj;

    #[test]
    fn z_is_additive_and_sz_is_multiplicative() {
        let s0 = State::identity(Hsva::BLACK);
        let adj = Adjustment { z: Some(2.0), sz: Some(0.5), ..Adjustment::default() };
        let s1 = apply(s0, &adj);
        assert_eq!(s1.z, 2.0);
        assert_eq!(s1.sz, 0.5);
        let s2 = apply(s1, &adj);
        assert_eq!(s2.z, 4.0);
        assert_eq!(s2.sz, 0.25);
    }

    #[test]
    fn hue_adjustment_is_clamped_into_range() {
        let mut s0 = State::identity(Hsva::BLACK);
        s0.color.hue = 350.0;
        let adj = Adjustment { hue: Some(ChannelAdj { delta: 20.0, use_target: false }), ..Adjustment::default() };
        let s1 = apply(s0, &adj);
        assert!((0.0..360.0).contains(&s1.color.hue));
    }

    #[test]
    fn lcolor_is_independent_of_color() {
        let s0 = State::identity(Hsva::BLACK);
        let adj = Adjustment {
            lbrightness: Some(ChannelAdj { delta: 0.9, use_target: false }),
            ..Adjustment::default()
        };
        let s1 = apply(s0, &adj);
        assert_eq!(s1.color.value, 0.0);
        assert!(s1.lcolor.value > 0.0);
    }
}
