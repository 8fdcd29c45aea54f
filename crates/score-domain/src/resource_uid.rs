use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The canonical identity of a resource: `"<type>.<class>#<id>"` (spec §4.2).
///
/// Two resource declarations — possibly in different workloads — that
/// resolve to the same `ResourceUid` describe the same shared resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceUid(String);

impl ResourceUid {
    /// Build a uid from a resource declaration's coordinates.
    ///
    /// `class` defaults to `"default"`; `id` defaults to
    /// `"<workload_name>.<res_name>"` (an unshared, workload-local resource).
    pub fn new(
        workload_name: &str,
        res_name: &str,
        res_type: &str,
        class: Option<&str>,
        id: Option<&str>,
    ) -> Self {
        let class = class.unwrap_or("default");
        let owned_id;
        let id = match id {
            Some(id) => id,
            None => {
                owned_id = format!("{workload_name}.{res_name}");
                &owned_id
            }
        };
        ResourceUid(format!("{res_type}.{class}#{id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split back into `(type, class, id)` by the first `.` and first `#`.
    pub fn parts(&self) -> Result<(&str, &str, &str), DomainError> {
        let hash_idx = self
            .0
            .find('#')
            .ok_or_else(|| DomainError::InvalidResourceUid(self.0.clone()))?;
        let (left, rest) = self.0.split_at(hash_idx);
        let id = &rest[1..];
        let dot_idx = left
            .find('.')
            .ok_or_else(|| DomainError::InvalidResourceUid(self.0.clone()))?;
        let (res_type, rest) = left.split_at(dot_idx);
        let class = &rest[1..];
        Ok((res_type, class, id))
    }

    pub fn res_type(&self) -> Result<&str, DomainError> {
        self.parts().map(|(t, _, _)| t)
    }

    pub fn class(&self) -> Result<&str, DomainError> {
        self.parts().map(|(_, c, _)| c)
    }

    pub fn id(&self) -> Result<&str, DomainError> {
        self.parts().map(|(_, _, i)| i)
    }

    /// Parse a uid string previously produced by [`ResourceUid::new`], validating shape.
    pub fn parse(s: impl Into<String>) -> Result<Self, DomainError> {
        let uid = ResourceUid(s.into());
        uid.parts()?;
        Ok(uid)
    }
}

impl std::fmt::Display for ResourceUid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_class_and_derived_id() {
        let uid = ResourceUid::new("app", "db", "postgres", None, None);
        assert_eq!(uid.as_str(), "postgres.default#app.db");
    }

    #[test]
    fn explicit_class_and_id() {
        let uid = ResourceUid::new("app", "db", "postgres", Some("prod"), Some("shared-db"));
        assert_eq!(uid.as_str(), "postgres.prod#shared-db");
    }

    #[test]
    fn parts_round_trip() {
        let uid = ResourceUid::new("app", "cache", "redis", Some("big"), Some("r1"));
        let (t, c, i) = uid.parts().unwrap();
        assert_eq!((t, c, i), ("redis", "big", "r1"));
    }

    #[test]
    fn shared_resources_have_equal_uid() {
        let a = ResourceUid::new("app-a", "db", "postgres", None, Some("shared"));
        let b = ResourceUid::new("app-b", "other", "postgres", None, Some("shared"));
        assert_eq!(a, b);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(ResourceUid::parse("no-hash-or-dot").is_err());
    }
}
