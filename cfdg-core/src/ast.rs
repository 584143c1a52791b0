//! The program AST produced by the parser (C3) and consumed by the
//! expansion engine (C5): spec.md §3's Data Model, verbatim.

use crate::color::{ChannelDelta, Hsva};
use crate::transform::Affine;
use std::collections::HashMap;

/// Opaque handle into [`Program::rules`], resolved once after the whole
/// program (and its includes) has been parsed — see [`crate::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleId(pub usize);

/// A reference to a rule by name, as written in the source, until
/// [`crate::resolve::resolve_program`] turns it into a [`RuleId`].
#[derive(Debug, Clone)]
pub enum RuleRef {
    Unresolved(String),
    Resolved(RuleId),
    /// `CF::EMPTY`: an always-zero-area no-op, usable as a weighted
    /// branch that contributes nothing (colinw7/CContextFree supplement,
    /// see SPEC_FULL.md §2).
    BuiltinEmpty,
}

impl RuleRef {
    #[must_use]
    pub fn as_resolved(&self) -> Option<RuleId> {
        match self {
            RuleRef::Resolved(id) => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    User,
    Square,
    Circle,
    Triangle,
    Path,
}

#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub name: String,
    pub kind: RuleKind,
    pub action_lists: Vec<ActionList>,
    /// Only populated for `RuleKind::Path`: the path body is the sole
    /// action of a path rule (spec.md §3).
    pub path: Option<PathAction>,
}

impl RuleEntry {
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.action_lists.iter().map(|a| a.weight).sum()
    }

    /// Square/Circle/Triangle are terminal primitives exactly when they
    /// carry no user-supplied alternatives.
    #[must_use]
    pub fn is_terminal_primitive(&self) -> bool {
        matches!(self.kind, RuleKind::Square | RuleKind::Circle | RuleKind::Triangle)
            && self.action_lists.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ActionList {
    pub weight: f64,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone)]
pub enum Action {
    Simple { target: RuleRef, adjustment: Adjustment },
    Loop { count: u32, loop_adjustment: Adjustment, target: RuleRef, adjustment: Adjustment },
    ComplexLoop { count: u32, loop_adjustment: Adjustment, inner: Box<Action> },
    PathAction(PathAction),
}

/// One channel's `{delta}` / `{delta}|` adjustment as written: the
/// target value itself is read live from `state.lcolor` at apply time
/// (GLOSSARY: "Target color"), so only the use-target flag is stored
/// here.
#[derive(Debug, Clone, Copy)]
pub struct ChannelAdj {
    pub delta: f64,
    pub use_target: bool,
}

impl ChannelAdj {
    #[must_use]
    pub fn resolve_against(self, target_channel: f64) -> ChannelDelta {
        ChannelDelta { delta: self.delta, target: self.use_target.then_some(target_channel) }
    }
}

/// The per-invocation modifier (spec.md §3). `m` is the already-composed
/// geometric matrix: built by the parser according to block-mode
/// (`{...}`, fixed order translate·rotate·scale·skew·flip) or
/// compose-mode (`[...]`, right-multiplied in written order) — spec.md
/// §4.3. By the time an `Adjustment` exists, that distinction no longer
/// matters to the engine.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub m: Affine,
    pub z: Option<f64>,
    pub sz: Option<f64>,

    pub hue: Option<ChannelAdj>,
    pub saturation: Option<ChannelAdj>,
    pub brightness: Option<ChannelAdj>,
    pub alpha: Option<ChannelAdj>,

    pub lhue: Option<ChannelAdj>,
    pub lsaturation: Option<ChannelAdj>,
    pub lbrightness: Option<ChannelAdj>,
    pub lalpha: Option<ChannelAdj>,
}

impl Default for Adjustment {
    fn default() -> Self {
        Adjustment {
            m: Affine::IDENTITY,
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
}

impl Adjustment {
    #[must_use]
    pub fn touches_color(&self) -> bool {
        self.hue.is_some() || self.saturation.is_some() || self.brightness.is_some() || self.alpha.is_some()
    }

    #[must_use]
    pub fn touches_lcolor(&self) -> bool {
        self.lhue.is_some() || self.lsaturation.is_some() || self.lbrightness.is_some() || self.lalpha.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub enum PathPart {
    MoveTo(Point),
    LineTo(Point),
    ArcTo {
        to: Point,
        rx: f64,
        ry: f64,
        x_axis_rotation_deg: f64,
        large_arc: bool,
        sweep: bool,
    },
    CurveTo {
        control1: Point,
        control2: Option<Point>,
        end: Point,
    },
    Close,
    Stroke { width: f64, adjustment: Adjustment },
    Fill { evenodd: bool, adjustment: Adjustment },
    LoopPart { count: u32, adjustment: Adjustment, inner: Box<PathPart> },
    LoopPartList { count: u32, adjustment: Adjustment, parts: Vec<PathPart> },
    /// `MOVEREL`/`LINEREL`/`ARCREL`/`CURVEREL`: parsed, deliberately
    /// unimplemented (spec.md §9 Open Questions).
    Unimplemented(&'static str),
}

#[derive(Debug, Clone)]
pub struct PathAction {
    pub parts: Vec<PathPart>,
}

#[derive(Debug, Clone, Copy)]
pub struct TileSpec {
    pub m: Affine,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub start_shape: String,
    pub start_adjustment: Adjustment,
    pub background: Hsva,
    pub tile: Option<TileSpec>,
    pub rules: Vec<RuleEntry>,
    pub rule_index: HashMap<String, RuleId>,
    /// Raw strings from `include` directives, in the order they were
    /// written. Resolving and parsing these is the embedding driver's
    /// job (C3 never touches the filesystem) — see
    /// [`crate::parse::program::resolve_include_path`].
    pub includes: Vec<String>,
}

impl Default for Program {
    fn default() -> Self {
        Program {
            start_shape: String::new(),
            start_adjustment: Adjustment::default(),
            background: Hsva { hue: 0.0, saturation: 0.0, value: 1.0, alpha: 1.0 },
            tile: None,
            rules: vec![],
            rule_index: HashMap::new(),
            includes: vec![],
        }
    }
}

impl Program {
    #[must_use]
    pub fn rule(&self, id: RuleId) -> &RuleEntry {
        &self.rules[id.0]
    }

    pub fn rule_mut(&mut self, id: RuleId) -> &mut RuleEntry {
        &mut self.rules[id.0]
    }

    #[must_use]
    pub fn find_rule(&self, name: &str) -> Option<RuleId> {
        self.rule_index.get(name).copied()
    }

    /// Looks up `name`, creating a terminal (empty) primitive entry the
    /// first time `SQUARE`/`CIRCLE`/`TRIANGLE` is mentioned, and a plain
    /// `User` entry otherwise. Called only at rule-*definition* sites
    /// (`rule <id> ...`, `path <id> ...`); rule *uses* stay as
    /// `RuleRef::Unresolved` until [`crate::resolve::resolve_program`]
    /// runs over the finished program, so an undefined name is still
    /// reported as an error rather than silently treated as empty.
    pub fn rule_or_insert(&mut self, name: &str) -> RuleId {
        if let Some(id) = self.rule_index.get(name) {
            return *id;
        }
        let kind = match name {
            "SQUARE" => RuleKind::Square,
            "CIRCLE" => RuleKind::Circle,
            "TRIANGLE" => RuleKind::Triangle,
            _ => RuleKind::User,
        };
        let id = RuleId(self.rules.len());
        self.rules.push(RuleEntry {
            name: name.to_string(),
            kind,
            action_lists: vec![],
            path: None,
        });
        self.rule_index.insert(name.to_string(), id);
        id
    }
}
