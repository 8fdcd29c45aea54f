use crate::error::StateError;

/// A parsed `(v)?MAJOR(.MINOR)?(.PATCH)?` version, with missing trailing
/// components defaulting to `999` so `"1.2"` means "at least 1.2.anything"
/// (spec §4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Version {
    major: u32,
    minor: u32,
    patch: u32,
}

impl Version {
    fn encode(self) -> u64 {
        ((self.major as u64 * 1000) + self.minor as u64) * 1000 + self.patch as u64
    }
}

fn parse_version(raw: &str) -> Option<Version> {
    let raw = raw.strip_prefix('v').unwrap_or(raw);
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.split('.');
    let major: u32 = parts.next()?.parse().ok()?;
    let minor = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 999,
    };
    let patch = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 999,
    };
    if parts.next().is_some() {
        return None;
    }
    Some(Version { major, minor, patch })
}

enum Op {
    Eq,
    Ge,
    Gt,
}

fn parse_constraint(raw: &str) -> Option<(Op, Version)> {
    let (op, rest) = if let Some(rest) = raw.strip_prefix(">=") {
        (Op::Ge, rest)
    } else if let Some(rest) = raw.strip_prefix('>') {
        (Op::Gt, rest)
    } else if let Some(rest) = raw.strip_prefix('=') {
        (Op::Eq, rest)
    } else {
        return None;
    };
    parse_version(rest).map(|v| (op, v))
}

/// Check that `current` satisfies `constraint` (one of `=X.Y.Z`, `>=X.Y.Z`,
/// `>X.Y.Z`, with the same loose trailing-component rules as `current`).
pub fn check_version(current: &str, constraint: &str) -> Result<(), StateError> {
    let cur = parse_version(current)
        .ok_or_else(|| StateError::InvalidVersion(current.to_string()))?;
    let (op, cons) = parse_constraint(constraint)
        .ok_or_else(|| StateError::InvalidConstraint(constraint.to_string()))?;

    let satisfied = match op {
        Op::Eq => cur.encode() == cons.encode(),
        Op::Ge => cur.encode() >= cons.encode(),
        Op::Gt => cur.encode() > cons.encode(),
    };

    if satisfied {
        Ok(())
    } else {
        Err(StateError::VersionMismatch {
            current: current.to_string(),
            constraint: constraint.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_minor_matches_anything_at_or_above() {
        check_version("1.2", ">=1.2.0").unwrap();
        check_version("1.2.5", ">=1.2").unwrap();
    }

    #[test]
    fn exact_match_requires_equal_encoding() {
        check_version("1.2.3", "=1.2.3").unwrap();
        assert!(check_version("1.2.4", "=1.2.3").is_err());
    }

    #[test]
    fn strict_greater_than_excludes_equal() {
        assert!(check_version("1.2.3", ">1.2.3").is_err());
        check_version("1.2.4", ">1.2.3").unwrap();
    }

    #[test]
    fn v_prefix_is_tolerated() {
        check_version("v1.2.3", "=1.2.3").unwrap();
    }

    #[test]
    fn malformed_version_is_an_error() {
        assert!(check_version("not-a-version", ">=1.0.0").is_err());
    }
}
