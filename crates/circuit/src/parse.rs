//! Text circuit descriptions
//!
//! ```text
//! n_gates,n_commits,n_bits,n_constraints;
//! L0 + 2*R0 - O1 = -5;
//! ...
//! ```
//!
//! Each constraint is a signed sum of optionally weighted wires `L<i>`,
//! `R<i>` or `O<i>` equal to an integer constant. Whitespace is ignored.
//! Parsing is slow and meant for tooling and tests; use the binary format
//! for anything large.

use crate::{Circuit, CircuitBuilder, CircuitError, CircuitResult, Constraint, LinearCombination, Wire, WireRole};
use curve25519_dalek::scalar::Scalar;
use tracing::instrument;

type StatementResult<T> = Result<T, String>;

/// Decimal integer of any length, reduced into the scalar field
fn parse_integer(text: &str) -> StatementResult<Scalar> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("expected an integer, found {:?}", text));
    }
    let ten = Scalar::from(10u64);
    Ok(text
        .bytes()
        .fold(Scalar::ZERO, |acc, digit| acc * ten + Scalar::from(u64::from(digit - b'0'))))
}

fn parse_signed(text: &str) -> StatementResult<Scalar> {
    match text.strip_prefix('-') {
        Some(magnitude) => parse_integer(magnitude).map(|v| -v),
        None => parse_integer(text),
    }
}

fn parse_wire(text: &str, n_gates: usize) -> StatementResult<Wire> {
    let mut chars = text.chars();
    let role = chars
        .next()
        .and_then(WireRole::from_symbol)
        .ok_or_else(|| format!("expected a wire, found {:?}", text))?;
    let index = chars.as_str();
    let gate: usize = index
        .parse()
        .map_err(|_| format!("invalid gate index {:?}", index))?;
    if gate >= n_gates {
        return Err(format!("gate {} out of range (circuit has {} gates)", gate, n_gates));
    }
    Ok(Wire::new(role, gate))
}

fn parse_term(text: &str, n_gates: usize) -> StatementResult<(Scalar, Wire)> {
    match text.split_once('*') {
        Some((coefficient, wire)) => Ok((parse_integer(coefficient)?, parse_wire(wire, n_gates)?)),
        None => Ok((Scalar::ONE, parse_wire(text, n_gates)?)),
    }
}

fn parse_sum(text: &str, n_gates: usize) -> StatementResult<LinearCombination> {
    let mut lc = LinearCombination::new();
    let (mut negate, mut rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    loop {
        let end = rest.find(|c: char| c == '+' || c == '-').unwrap_or(rest.len());
        let (term, tail) = rest.split_at(end);
        let (coefficient, wire) = parse_term(term, n_gates)?;
        lc.add_term(if negate { -coefficient } else { coefficient }, wire);

        match tail.chars().next() {
            Some(sign) => {
                negate = sign == '-';
                rest = &tail[1..];
            }
            None => return Ok(lc),
        }
    }
}

fn parse_header(text: &str) -> StatementResult<[usize; 4]> {
    let fields: Vec<&str> = text.split(',').collect();
    let mut header = [0usize; 4];
    if fields.len() != header.len() {
        return Err(format!("expected 4 header fields, found {}", fields.len()));
    }
    for (slot, field) in header.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| format!("invalid header field {:?}", field))?;
    }
    Ok(header)
}

impl Circuit {
    /// Parse a text circuit description, padding the gate count to a power of two
    #[instrument(skip_all, level = "debug", fields(len = description.len()))]
    pub fn parse(description: &str) -> CircuitResult<Self> {
        let compact: String = description.chars().filter(|c| !c.is_whitespace()).collect();
        let mut statements: Vec<&str> = compact.split(';').collect();
        let error = |statement: usize, message: String| CircuitError::Parse { statement, message };

        // Everything after the final ';' must be empty
        match statements.pop() {
            Some("") => {}
            _ => return Err(error(statements.len(), "missing ';'".to_string())),
        }
        let header = statements
            .first()
            .ok_or_else(|| error(0, "missing header".to_string()))?;
        let [n_gates, n_commits, n_bits, n_constraints] =
            parse_header(header).map_err(|message| error(0, message))?;

        let constraints = &statements[1..];
        if constraints.len() != n_constraints {
            return Err(error(
                0,
                format!("header announces {} constraints, found {}", n_constraints, constraints.len()),
            ));
        }

        let mut builder = CircuitBuilder::new(n_gates, n_commits, n_bits)?;
        for (i, statement) in constraints.iter().enumerate() {
            let (lhs, rhs) = statement
                .split_once('=')
                .ok_or_else(|| error(i + 1, "expected '='".to_string()))?;
            let lhs = parse_sum(lhs, n_gates).map_err(|message| error(i + 1, message))?;
            let constant = parse_signed(rhs).map_err(|message| error(i + 1, message))?;
            builder.add_constraint(Constraint::new(lhs, constant))?;
        }
        builder.build()
    }
}
