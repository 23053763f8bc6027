//! Package versions and composer-style version constraints.

use crate::domain::errors::{DomainError, DomainResult};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted numeric version with an optional pre-release suffix
/// (`1.2.3`, `v0.9`, `1.0.0-beta2`). Missing components compare as zero.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    parts: Vec<u64>,
    pre: Option<String>,
}

impl Version {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim().trim_start_matches(['v', 'V']);
        let (numbers, pre) = match trimmed.split_once('-') {
            Some((numbers, pre)) if !pre.is_empty() => (numbers, Some(pre.to_ascii_lowercase())),
            Some(_) => return Err(invalid(raw)),
            None => (trimmed, None),
        };
        if numbers.is_empty() {
            return Err(invalid(raw));
        }
        let parts = numbers
            .split('.')
            .map(|p| p.parse::<u64>().map_err(|_| invalid(raw)))
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self { parts, pre })
    }

    fn component(&self, idx: usize) -> u64 {
        self.parts.get(idx).copied().unwrap_or(0)
    }

    pub fn major(&self) -> u64 {
        self.component(0)
    }

    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    fn from_parts(parts: Vec<u64>) -> Self {
        Self { parts, pre: None }
    }

    /// Smallest version above every version sharing the first `len` components.
    fn bump_prefix(parts: &[u64], len: usize) -> DomainResult<Self> {
        let mut next: Vec<u64> = parts.iter().take(len).copied().collect();
        while next.len() < len {
            next.push(0);
        }
        if let Some(last) = next.last_mut() {
            let bumped = last.checked_add(1).ok_or_else(|| {
                DomainError::Validation(format!("version component {last} has no upper bound"))
            })?;
            *last = bumped;
        }
        Ok(Self::from_parts(next))
    }
}

fn invalid(raw: &str) -> DomainError {
    DomainError::Validation(format!("invalid version '{raw}'"))
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for idx in 0..len {
            match self.component(idx).cmp(&other.component(idx)) {
                Ordering::Equal => continue,
                non_eq => return non_eq,
            }
        }
        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .parts
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(".");
        match &self.pre {
            Some(pre) => write!(f, "{joined}-{pre}"),
            None => f.write_str(&joined),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Predicate {
    op: Op,
    version: Version,
}

impl Predicate {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    fn matches(&self, candidate: &Version) -> bool {
        let ord = candidate.cmp(&self.version);
        match self.op {
            Op::Eq => ord == Ordering::Equal,
            Op::Ne => ord != Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Ge => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Le => ord != Ordering::Greater,
        }
    }
}

/// Disjunction (`||`) of conjunctions (`,` or whitespace) of predicates.
///
/// Supported atoms: `*`, `1.2.3`, `=1.2`, `!=1.2`, `>1`, `>=1`, `<2`, `<=2`,
/// `1.2.*`, `~1.2`, `~1.2.3`, `^1.2.3`, `^0.9`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    raw: String,
    alternatives: Vec<Vec<Predicate>>,
}

impl Constraint {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("empty version constraint".into()));
        }
        let alternatives = trimmed
            .split("||")
            .map(parse_conjunction)
            .collect::<DomainResult<Vec<_>>>()?;
        Ok(Self {
            raw: trimmed.to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|all| all.iter().all(|p| p.matches(version)))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_conjunction(raw: &str) -> DomainResult<Vec<Predicate>> {
    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op: Option<String> = None;
    for token in raw.split([',', ' ']).filter(|t| !t.is_empty()) {
        let is_bare_op = token.chars().all(|c| matches!(c, '<' | '>' | '=' | '!'));
        match (pending_op.take(), is_bare_op) {
            (Some(op), false) => tokens.push(format!("{op}{token}")),
            (Some(op), true) => return Err(DomainError::Validation(format!(
                "dangling operator '{op}' in constraint '{raw}'"
            ))),
            (None, true) => pending_op = Some(token.to_string()),
            (None, false) => tokens.push(token.to_string()),
        }
    }
    if let Some(op) = pending_op {
        return Err(DomainError::Validation(format!(
            "dangling operator '{op}' in constraint '{raw}'"
        )));
    }
    if tokens.is_empty() {
        return Err(DomainError::Validation(format!("empty constraint in '{raw}'")));
    }

    let mut predicates = Vec::new();
    for token in tokens {
        predicates.extend(parse_atom(&token)?);
    }
    Ok(predicates)
}

fn parse_atom(atom: &str) -> DomainResult<Vec<Predicate>> {
    if atom == "*" {
        return Ok(Vec::new());
    }
    for (prefix, op) in [
        (">=", Op::Ge),
        ("<=", Op::Le),
        ("!=", Op::Ne),
        ("==", Op::Eq),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("=", Op::Eq),
    ] {
        if let Some(rest) = atom.strip_prefix(prefix) {
            return Ok(vec![Predicate::new(op, Version::parse(rest)?)]);
        }
    }
    if let Some(rest) = atom.strip_prefix('~') {
        let base = Version::parse(rest)?;
        // ~1.2 allows 1.x (x >= 2), ~1.2.3 allows 1.2.x (x >= 3)
        let keep = base.parts.len().saturating_sub(1).max(1);
        let upper = Version::bump_prefix(&base.parts, keep)?;
        return Ok(vec![
            Predicate::new(Op::Ge, base),
            Predicate::new(Op::Lt, upper),
        ]);
    }
    if let Some(rest) = atom.strip_prefix('^') {
        let base = Version::parse(rest)?;
        let significant = base
            .parts
            .iter()
            .position(|p| *p != 0)
            .unwrap_or(base.parts.len().saturating_sub(1));
        let upper = Version::bump_prefix(&base.parts, significant + 1)?;
        return Ok(vec![
            Predicate::new(Op::Ge, base),
            Predicate::new(Op::Lt, upper),
        ]);
    }
    if let Some(prefix) = atom.strip_suffix(".*") {
        let base = Version::parse(prefix)?;
        let upper = Version::bump_prefix(&base.parts, base.parts.len())?;
        return Ok(vec![
            Predicate::new(Op::Ge, base),
            Predicate::new(Op::Lt, upper),
        ]);
    }
    Ok(vec![Predicate::new(Op::Eq, Version::parse(atom)?)])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    fn allows(constraint: &str, version: &str) -> bool {
        Constraint::parse(constraint).unwrap().matches(&v(version))
    }

    #[test]
    fn versions_compare_numerically() {
        assert!(v("0.10") > v("0.9"));
        assert_eq!(v("1.2"), v("1.2.0"));
        assert!(v("v2.0.1") > v("2.0"));
        assert!(v("1.0.0-beta") < v("1.0.0"));
        assert!(v("1.0.0-alpha") < v("1.0.0-beta"));
        assert!(Version::parse("1.x").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn wildcard_and_exact() {
        assert!(allows("*", "12.4"));
        assert!(allows("0.9.*", "0.9.7"));
        assert!(!allows("0.9.*", "0.10.0"));
        assert!(allows("1.2", "1.2.0"));
        assert!(!allows("1.2", "1.2.1"));
    }

    #[test]
    fn tilde_ranges() {
        assert!(allows("~0.9", "0.9.3"));
        assert!(allows("~0.9", "0.12"));
        assert!(!allows("~0.9", "1.0"));
        assert!(allows("~1.2.3", "1.2.9"));
        assert!(!allows("~1.2.3", "1.3.0"));
    }

    #[test]
    fn caret_ranges() {
        assert!(allows("^1.2.3", "1.9"));
        assert!(!allows("^1.2.3", "2.0"));
        assert!(allows("^0.9", "0.9.5"));
        assert!(!allows("^0.9", "0.10"));
    }

    #[test]
    fn comparisons_conjunctions_and_alternatives() {
        assert!(allows(">=0.8,<0.10", "0.9.1"));
        assert!(!allows(">=0.8,<0.10", "0.10.0"));
        assert!(allows(">= 0.8 < 0.10", "0.8"));
        assert!(allows("<0.5 || >=1.0", "1.1"));
        assert!(!allows("<0.5 || >=1.0", "0.7"));
        assert!(!allows("!=1.0", "1.0.0"));
    }

    #[test]
    fn malformed_constraints_are_rejected() {
        assert!(Constraint::parse("").is_err());
        assert!(Constraint::parse(">=").is_err());
        assert!(Constraint::parse("~abc").is_err());
    }

    #[test]
    fn unbounded_components_are_rejected() {
        let max = u64::MAX;
        assert!(Constraint::parse(&format!("~{max}")).is_err());
        assert!(Constraint::parse(&format!("^{max}")).is_err());
        assert!(Constraint::parse(&format!("1.{max}.*")).is_err());
        assert!(Constraint::parse(&format!("^0.{max}")).is_err());
        // the largest value stays usable as a plain bound
        assert!(allows(&format!("<={max}"), "1.0"));
    }
}
