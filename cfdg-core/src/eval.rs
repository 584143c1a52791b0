//! C1: the parenthesized-expression / function-call evaluator.
//!
//! A precedence-climbing recursive-descent evaluator: no variables, just
//! literals, the fixed operator table, and a small function library.
//! Called from the parser wherever a numeric value may be `(expr)` or
//! `ident(args)` instead of a bare literal.

use cfdg_lexer::SourceReader;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
}

impl Value {
    #[must_use]
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Real(r) => r,
        }
    }

    fn is_real(self) -> bool {
        matches!(self, Value::Real(_))
    }

    fn bool_to_value(b: bool) -> Value {
        Value::Int(i64::from(b))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnmatchedParen,
    UnknownFunction(String),
    Arity { name: String, expected: &'static str, got: usize },
    Syntax(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::UnmatchedParen => write!(f, "unmatched parenthesis in expression"),
            EvalError::UnknownFunction(name) => write!(f, "unknown function \"{name}\""),
            EvalError::Arity { name, expected, got } => {
                write!(f, "\"{name}\" expects {expected} argument(s), got {got}")
            }
            EvalError::Syntax(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Ambient evaluation flags plus the engine's shared PRNG, threaded
/// through every call per spec.md §9 ("Global PRNG -> threaded
/// explicitly as a state object").
pub struct EvalContext<'a> {
    pub degrees: bool,
    pub force_real: bool,
    pub rng: &'a mut dyn rand::RngCore,
}

/// Evaluates a `(...)`-delimited expression. The reader must be
/// positioned at the opening `(`; on success it is left just past the
/// matching `)`.
pub fn eval_parenthesized(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Value, EvalError> {
    reader.skip_space();
    if reader.peek_char() != Some('(') {
        return Err(EvalError::Syntax("expected '('".into()));
    }
    reader.skip_chars(1);
    let value = parse_or(reader, ctx)?;
    reader.skip_space();
    if reader.peek_char() != Some(')') {
        return Err(EvalError::UnmatchedParen);
    }
    reader.skip_chars(1);
    Ok(value)
}

/// Evaluates `name(args...)`. The reader must be positioned at the
/// opening `(` right after the already-consumed function name.
pub fn eval_function_call(name: &str, reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Value, EvalError> {
    reader.skip_space();
    if reader.peek_char() != Some('(') {
        return Err(EvalError::Syntax(format!("expected '(' after \"{name}\"")));
    }
    reader.skip_chars(1);

    let mut args = vec![];
    reader.skip_space();
    if reader.peek_char() != Some(')') {
        loop {
            args.push(parse_or(reader, ctx)?);
            reader.skip_space();
            match reader.peek_char() {
                Some(',') => {
                    reader.skip_chars(1);
                    reader.skip_space();
                }
                _ => break,
            }
        }
    }
    reader.skip_space();
    if reader.peek_char() != Some(')') {
        return Err(EvalError::UnmatchedParen);
    }
    reader.skip_chars(1);

    call_function(name, &args, ctx)
}

macro_rules! left_assoc {
    ($name:ident, $next:ident, [$($tok:expr => $op:expr),+ $(,)?]) => {
        fn $name(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Value, EvalError> {
            let mut lhs = $next(reader, ctx)?;
            loop {
                reader.skip_space();
                let matched = [$($tok),+].into_iter().find(|tok: &&str| matches_op(reader, tok));
                let Some(tok) = matched else { break };
                reader.skip_chars(tok.chars().count());
                let rhs = $next(reader, ctx)?;
                lhs = match tok {
                    $($tok => $op(lhs, rhs)),+,
                    _ => unreachable!(),
                };
            }
            Ok(lhs)
        }
    };
}

fn matches_op(reader: &SourceReader, tok: &str) -> bool {
    let mut chars = tok.chars();
    let first = chars.next().unwrap();
    if reader.peek_char() != Some(first) {
        return false;
    }
    for (i, c) in chars.enumerate() {
        if reader.peek_char_at(i + 1) != Some(c) {
            return false;
        }
    }
    // Don't let `<` match a `<=` short, or `=` alone match `==`.
    if matches!(tok, "<" | ">") && reader.peek_char_at(1) == Some('=') {
        return false;
    }
    true
}

fn promote(a: Value, b: Value) -> (Value, Value) {
    if a.is_real() || b.is_real() {
        (Value::Real(a.as_f64()), Value::Real(b.as_f64()))
    } else {
        (a, b)
    }
}

fn op_add(a: Value, b: Value) -> Value {
    match promote(a, b) {
        (Value::Int(x), Value::Int(y)) => Value::Int(x + y),
        (Value::Real(x), Value::Real(y)) => Value::Real(x + y),
        _ => unreachable!(),
    }
}

fn op_sub(a: Value, b: Value) -> Value {
    match promote(a, b) {
        (Value::Int(x), Value::Int(y)) => Value::Int(x - y),
        (Value::Real(x), Value::Real(y)) => Value::Real(x - y),
        _ => unreachable!(),
    }
}

fn op_mul(a: Value, b: Value) -> Value {
    match promote(a, b) {
        (Value::Int(x), Value::Int(y)) => Value::Int(x * y),
        (Value::Real(x), Value::Real(y)) => Value::Real(x * y),
        _ => unreachable!(),
    }
}

fn op_div(a: Value, b: Value) -> Value {
    match promote(a, b) {
        (Value::Int(x), Value::Int(y)) => {
            if y == 0 {
                Value::Real(f64::INFINITY * x.signum() as f64)
            } else {
                Value::Int(x / y)
            }
        }
        (Value::Real(x), Value::Real(y)) => Value::Real(x / y),
        _ => unreachable!(),
    }
}

fn op_mod(a: Value, b: Value) -> Value {
    match promote(a, b) {
        (Value::Int(x), Value::Int(y)) => Value::Int(x % y),
        (Value::Real(x), Value::Real(y)) => Value::Real(x % y),
        _ => unreachable!(),
    }
}

fn op_pow(a: Value, b: Value) -> Value {
    // `^` on two integers still yields real, per spec.
    Value::Real(a.as_f64().powf(b.as_f64()))
}

fn op_lt(a: Value, b: Value) -> Value {
    Value::bool_to_value(a.as_f64() < b.as_f64())
}
fn op_le(a: Value, b: Value) -> Value {
    Value::bool_to_value(a.as_f64() <= b.as_f64())
}
fn op_gt(a: Value, b: Value) -> Value {
    Value::bool_to_value(a.as_f64() > b.as_f64())
}
fn op_ge(a: Value, b: Value) -> Value {
    Value::bool_to_value(a.as_f64() >= b.as_f64())
}
fn op_eq(a: Value, b: Value) -> Value {
    Value::bool_to_value((a.as_f64() - b.as_f64()).abs() < f64::EPSILON)
}
fn op_ne(a: Value, b: Value) -> Value {
    Value::bool_to_value((a.as_f64() - b.as_f64()).abs() >= f64::EPSILON)
}
fn op_and(a: Value, b: Value) -> Value {
    Value::bool_to_value(a.as_f64() != 0.0 && b.as_f64() != 0.0)
}
fn op_or(a: Value, b: Value) -> Value {
    Value::bool_to_value(a.as_f64() != 0.0 || b.as_f64() != 0.0)
}

// Precedence, ascending: || (0), && (1), ==/!= (2), </>/<=/>= (3), +/- (4), */%  (5), ^ (6).
left_assoc!(parse_or, parse_and, ["||" => op_or]);
left_assoc!(parse_and, parse_eq, ["&&" => op_and]);
left_assoc!(parse_eq, parse_rel, ["==" => op_eq, "!=" => op_ne]);
left_assoc!(parse_rel, parse_add, ["<=" => op_le, ">=" => op_ge, "<" => op_lt, ">" => op_gt]);
left_assoc!(parse_add, parse_mul, ["+" => op_add, "-" => op_sub]);
left_assoc!(parse_mul, parse_pow, ["*" => op_mul, "/" => op_div, "%" => op_mod]);
left_assoc!(parse_pow, parse_unary, ["^" => op_pow]);

fn parse_unary(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Value, EvalError> {
    reader.skip_space();
    match reader.peek_char() {
        Some('-') => {
            reader.skip_chars(1);
            let v = parse_unary(reader, ctx)?;
            Ok(match v {
                Value::Int(i) => Value::Int(-i),
                Value::Real(r) => Value::Real(-r),
            })
        }
        Some('+') => {
            reader.skip_chars(1);
            parse_unary(reader, ctx)
        }
        _ => parse_primary(reader, ctx),
    }
}

fn parse_primary(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Value, EvalError> {
    reader.skip_space();
    match reader.peek_char() {
        Some('(') => eval_parenthesized(reader, ctx),
        Some(c) if c.is_ascii_digit() || c == '.' => parse_number(reader, ctx),
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            let name = reader
                .read_identifier()
                .ok_or_else(|| EvalError::Syntax("expected identifier".into()))?
                .to_string();
            reader.skip_space();
            if reader.peek_char() == Some('(') {
                eval_function_call(&name, reader, ctx)
            } else {
                Err(EvalError::Syntax(format!(
                    "\"{name}\" is not a function (no variables in expressions)"
                )))
            }
        }
        _ => Err(EvalError::Syntax("expected a number, '(', or function call".into())),
    }
}

fn parse_number(reader: &mut SourceReader, ctx: &mut EvalContext) -> Result<Value, EvalError> {
    let start = reader.position();
    let mut has_dot = false;
    while matches!(reader.peek_char(), Some(c) if c.is_ascii_digit()) {
        reader.skip_chars(1);
    }
    if reader.peek_char() == Some('.') {
        has_dot = true;
        reader.skip_chars(1);
        while matches!(reader.peek_char(), Some(c) if c.is_ascii_digit()) {
            reader.skip_chars(1);
        }
    }
    let text = reader.span_text(start..reader.position());
    if text.is_empty() {
        return Err(EvalError::Syntax("expected a number".into()));
    }
    if has_dot || ctx.force_real {
        text.parse::<f64>()
            .map(Value::Real)
            .map_err(|_| EvalError::Syntax(format!("invalid numeric literal \"{text}\"")))
    } else {
        text.parse::<i64>()
            .map(Value::Int)
            .or_else(|_| text.parse::<f64>().map(Value::Real))
            .map_err(|_| EvalError::Syntax(format!("invalid numeric literal \"{text}\"")))
    }
}

fn to_radians_if_needed(ctx: &EvalContext, v: f64) -> f64 {
    if ctx.degrees {
        v.to_radians()
    } else {
        v
    }
}

fn from_radians_if_needed(ctx: &EvalContext, v: f64) -> f64 {
    if ctx.degrees {
        v.to_degrees()
    } else {
        v
    }
}

fn call_function(name: &str, args: &[Value], ctx: &mut EvalContext) -> Result<Value, EvalError> {
    let arity_err = |expected: &'static str| EvalError::Arity {
        name: name.to_string(),
        expected,
        got: args.len(),
    };
    let unary = |f: fn(f64) -> f64| -> Result<Value, EvalError> {
        if args.len() != 1 {
            return Err(arity_err("1"));
        }
        Ok(Value::Real(f(args[0].as_f64())))
    };
    let unary_trig = |f: fn(f64) -> f64| -> Result<Value, EvalError> {
        if args.len() != 1 {
            return Err(arity_err("1"));
        }
        Ok(Value::Real(f(to_radians_if_needed(ctx, args[0].as_f64()))))
    };
    let unary_inv_trig = |f: fn(f64) -> f64| -> Result<Value, EvalError> {
        if args.len() != 1 {
            return Err(arity_err("1"));
        }
        Ok(Value::Real(from_radians_if_needed(ctx, f(args[0].as_f64()))))
    };

    match name {
        "abs" => unary(f64::abs),
        "ceil" => unary(f64::ceil),
        "floor" => unary(f64::floor),
        "exp" => unary(f64::exp),
        "log" => unary(f64::ln),
        "log10" => unary(f64::log10),
        "sqrt" => unary(f64::sqrt),

        "sin" => unary_trig(f64::sin),
        "cos" => unary_trig(f64::cos),
        "tan" => unary_trig(f64::tan),
        "sinh" => unary(f64::sinh),
        "cosh" => unary(f64::cosh),
        "tanh" => unary(f64::tanh),

        "asin" => unary_inv_trig(f64::asin),
        "acos" => unary_inv_trig(f64::acos),
        "atan" => unary_inv_trig(f64::atan),

        "atan2" => {
            if args.len() != 2 {
                return Err(arity_err("2"));
            }
            Ok(Value::Real(from_radians_if_needed(
                ctx,
                args[0].as_f64().atan2(args[1].as_f64()),
            )))
        }

        "mod" => {
            if args.len() != 2 {
                return Err(arity_err("2"));
            }
            Ok(op_mod(args[0], args[1]))
        }

        "pow" => {
            if args.len() != 2 {
                return Err(arity_err("2"));
            }
            Ok(op_pow(args[0], args[1]))
        }

        "rand_static" => match args.len() {
            1 => {
                let a = args[0].as_f64();
                let (lo, hi) = if a >= 0.0 { (0.0, a) } else { (a, 0.0) };
                Ok(Value::Real(ctx.rng.gen_range(lo..=hi)))
            }
            2 => {
                let (mut lo, mut hi) = (args[0].as_f64(), args[1].as_f64());
                if lo > hi {
                    std::mem::swap(&mut lo, &mut hi);
                }
                Ok(Value::Real(ctx.rng.gen_range(lo..=hi)))
            }
            _ => Err(arity_err("1 or 2")),
        },

        _ => Err(EvalError::UnknownFunction(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn eval_str(src: &str) -> Value {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut ctx = EvalContext { degrees: false, force_real: false, rng: &mut rng };
        let mut reader = SourceReader::new(src);
        eval_parenthesized(&mut reader, &mut ctx).unwrap()
    }

    fn eval_deg(src: &str) -> Value {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut ctx = EvalContext { degrees: true, force_real: false, rng: &mut rng };
        let mut reader = SourceReader::new(src);
        eval_parenthesized(&mut reader, &mut ctx).unwrap()
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(eval_str("((2+3)*4)"), Value::Int(20));
    }

    #[test]
    fn power_is_real_even_for_integers() {
        assert_eq!(eval_str("(2^10)"), Value::Real(1024.0));
    }

    #[test]
    fn integer_modulo() {
        assert_eq!(eval_str("(10%3)"), Value::Int(1));
    }

    #[test]
    fn logical_and_comparison() {
        assert_eq!(eval_str("((1<2)&&(3>2))"), Value::Int(1));
    }

    #[test]
    fn sin_in_degree_mode() {
        match eval_deg("(sin(90))") {
            Value::Real(r) => assert!((r - 1.0).abs() < 1e-9),
            other => panic!("expected real, got {other:?}"),
        }
    }

    #[test]
    fn rand_static_negative_bound() {
        for seed in 0..20 {
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let mut ctx = EvalContext { degrees: false, force_real: false, rng: &mut rng };
            let mut reader = SourceReader::new("(rand_static(-5))");
            let v = eval_parenthesized(&mut reader, &mut ctx).unwrap().as_f64();
            assert!((-5.0..=0.0).contains(&v));
        }
    }

    #[test]
    fn unmatched_paren_is_an_error() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut ctx = EvalContext { degrees: false, force_real: false, rng: &mut rng };
        let mut reader = SourceReader::new("(1+2");
        assert!(eval_parenthesized(&mut reader, &mut ctx).is_err());
    }

    #[test]
    fn unknown_function_is_an_error() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let mut ctx = EvalContext { degrees: false, force_real: false, rng: &mut rng };
        let mut reader = SourceReader::new("(frobnicate(1))");
        assert!(matches!(
            eval_parenthesized(&mut reader, &mut ctx),
            Err(EvalError::UnknownFunction(_))
        ));
    }
}
