use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::engine::{split_ref, Resolver};
use crate::error::SubstituteError;

/// A resource's deferred output lookup (spec §3's `OutputLookupFunc`).
///
/// Given the remaining path segments after `resources.<name>`, returns the
/// resolved output value (serialized as compact JSON downstream if it isn't
/// already a string).
pub type OutputLookupFn = dyn Fn(&[&str]) -> Result<Value, SubstituteError> + Send + Sync;

/// The standard resolver: `metadata.*` traverses workload metadata,
/// `resources.<name>[.<key>...]` invokes the matching resource's output
/// lookup (spec §4.1).
pub struct StandardResolver<'a> {
    pub metadata: &'a Map<String, Value>,
    pub resources: &'a HashMap<String, Box<OutputLookupFn>>,
}

impl<'a> Resolver for StandardResolver<'a> {
    fn resolve(&self, reference: &str) -> Result<String, SubstituteError> {
        let parts = split_ref(reference);
        let root = parts.first().map(String::as_str).unwrap_or("");

        match root {
            "metadata" => self.resolve_metadata(&parts),
            "resources" => self.resolve_resource(&parts),
            other => Err(SubstituteError::UnknownRoot(other.to_string())),
        }
    }
}

impl<'a> StandardResolver<'a> {
    fn resolve_metadata(&self, parts: &[String]) -> Result<String, SubstituteError> {
        if parts.len() < 2 {
            return Err(SubstituteError::BareMetadata);
        }
        let mut cur = Value::Object(self.metadata.clone());
        for key in &parts[1..] {
            cur = match cur {
                Value::Object(ref m) => m
                    .get(key)
                    .cloned()
                    .ok_or_else(|| SubstituteError::KeyNotFound(key.clone()))?,
                _ => return Err(SubstituteError::NotAMap(key.clone())),
            };
        }
        Ok(value_to_text(&cur))
    }

    fn resolve_resource(&self, parts: &[String]) -> Result<String, SubstituteError> {
        if parts.len() < 2 {
            return Err(SubstituteError::MissingResourceName);
        }
        let name = &parts[1];
        let lookup = self
            .resources
            .get(name)
            .ok_or_else(|| SubstituteError::UnknownResource(name.clone()))?;

        if parts.len() == 2 {
            // Legacy behavior: bare `${resources.<name>}` returns the literal name.
            return Ok(name.clone());
        }

        let rest: Vec<&str> = parts[2..].iter().map(String::as_str).collect();
        let value = lookup(&rest)?;
        Ok(value_to_text(&value))
    }
}

/// Strings pass through verbatim; anything else is compact JSON (spec §4.1).
fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
