//! Resolves every `RuleRef::Unresolved(name)` in a finished [`Program`]
//! (primary file plus all its includes already merged) into a
//! [`RuleId`], once, as spec.md §9 prescribes ("resolve by identifier
//! ... cache the resolved handle"). Doing this as a single eager pass
//! right after parsing is equivalent to the spec's "first-use caches
//! the reference" for a Program that is immutable from here on, and
//! avoids threading interior mutability through the AST.

use crate::ast::{Action, PathAction, PathPart, Program, RuleRef};
use crate::error_reporting::EngineError;

pub fn resolve_program(program: &mut Program) -> Result<(), EngineError> {
    if program.find_rule(&program.start_shape).is_none() {
        return Err(EngineError::UnknownStartShape(program.start_shape.clone()));
    }

    for idx in 0..program.rules.len() {
        let mut action_lists = std::mem::take(&mut program.rules[idx].action_lists);
        for list in &mut action_lists {
            for action in &mut list.actions {
                resolve_action(action, program)?;
            }
        }
        program.rules[idx].action_lists = action_lists;

        if let Some(mut path) = program.rules[idx].path.take() {
            resolve_path_action(&mut path, program)?;
            program.rules[idx].path = Some(path);
        }
    }

    Ok(())
}

fn resolve_ref(target: &mut RuleRef, program: &Program) -> Result<(), EngineError> {
    if let RuleRef::Unresolved(name) = target {
        if name == "CF::EMPTY" {
            *target = RuleRef::BuiltinEmpty;
        } else if let Some(stripped) = name.strip_prefix("CF::") {
            return Err(EngineError::UnknownBuiltin(stripped.to_string()));
        } else if let Some(id) = program.find_rule(name) {
            *target = RuleRef::Resolved(id);
        } else {
            return Err(EngineError::UnknownRule(name.clone()));
        }
    }
    Ok(())
}

fn resolve_action(action: &mut Action, program: &Program) -> Result<(), EngineError> {
    match action {
        Action::Simple { target, .. } | Action::Loop { target, .. } => resolve_ref(target, program),
        Action::ComplexLoop { inner, .. } => resolve_action(inner, program),
        Action::PathAction(path) => resolve_path_action(path, program),
    }
}

fn resolve_path_action(path: &mut PathAction, program: &Program) -> Result<(), EngineError> {
    for part in &mut path.parts {
        resolve_path_part(part, program)?;
    }
    Ok(())
}

fn resolve_path_part(part: &mut PathPart, program: &Program) -> Result<(), EngineError> {
    match part {
        PathPart::LoopPart { inner, .. } => resolve_path_part(inner, program),
        PathPart::LoopPartList { parts, .. } => {
            for p in parts {
                resolve_path_part(p, program)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Adjustment, RuleEntry, RuleKind};

    fn empty_program(start: &str) -> Program {
        Program { start_shape: start.to_string(), ..Program::default() }
    }

    #[test]
    fn unknown_start_shape_is_reported() {
        let mut program = empty_program("MISSING");
        let err = resolve_program(&mut program).unwrap_err();
        assert_eq!(err, EngineError::UnknownStartShape("MISSING".into()));
    }

    #[test]
    fn unknown_rule_reference_is_reported() {
        let mut program = empty_program("S");
        let id = program.rule_or_insert("S");
        program.rule_mut(id).action_lists.push(crate::ast::ActionList {
            weight: 1.0,
            actions: vec![Action::Simple {
                target: RuleRef::Unresolved("GHOST".into()),
                adjustment: Adjustment::default(),
            }],
        });

        let err = resolve_program(&mut program).unwrap_err();
        assert_eq!(err, EngineError::UnknownRule("GHOST".into()));
    }

    #[test]
    fn cf_empty_resolves_to_builtin() {
        let mut program = empty_program("S");
        let id = program.rule_or_insert("S");
        program.rule_mut(id).action_lists.push(crate::ast::ActionList {
            weight: 1.0,
            actions: vec![Action::Simple {
                target: RuleRef::Unresolved("CF::EMPTY".into()),
                adjustment: Adjustment::default(),
            }],
        });

        resolve_program(&mut program).unwrap();
        let RuleEntry { action_lists, .. } = &program.rules[id.0];
        match &action_lists[0].actions[0] {
            Action::Simple { target: RuleRef::BuiltinEmpty, .. } => {}
            other => panic!("expected BuiltinEmpty, got {other:?}"),
        }
    }

    #[test]
    fn rule_or_insert_marks_primitive_kinds() {
        let mut program = empty_program("S");
        let square = program.rule_or_insert("SQUARE");
        assert_eq!(program.rule(square).kind, RuleKind::Square);
    }
}
