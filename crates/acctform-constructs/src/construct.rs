//! Construct paths and logical id allocation.
//!
//! Every resource is declared at a path below the stack, e.g.
//! `PersonalRoles/PersonalDevRole/Resource`. The logical id written into the
//! template is derived from that path:
//!
//! - `Default` components are dropped entirely.
//! - A path with a single component uses that component (alphanumerics
//!   only) as-is.
//! - Longer paths concatenate their components, skipping `Resource` and
//!   consecutive repeats, and append the first 8 hex digits (uppercase) of
//!   the MD5 digest of the `/`-joined path.
//!
//! The digest keeps ids stable for a given path while avoiding collisions
//! between paths that concatenate to the same text.

use std::fmt;

use acctform_model::Resource;
use md5::{Digest, Md5};

/// Component hidden from both the id and the digest.
const HIDDEN_ID: &str = "Default";

/// Component hidden from the human-readable part only.
const HIDDEN_FROM_HUMAN_ID: &str = "Resource";

/// Longest human-readable prefix kept before the digest.
const MAX_HUMAN_LEN: usize = 240;

/// Longest id allowed without a digest suffix.
const MAX_ID_LEN: usize = 255;

/// Digest characters appended to multi-component ids.
const HASH_LEN: usize = 8;

/// Location of a construct below the stack root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ConstructPath {
    parts: Vec<String>,
}

impl ConstructPath {
    /// The stack root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the child `id` of this scope.
    #[must_use]
    pub fn child(&self, id: impl Into<String>) -> Self {
        let mut parts = self.parts.clone();
        parts.push(id.into());
        Self { parts }
    }

    /// Path components, outermost first.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Logical id for a resource declared at this path.
    #[must_use]
    pub fn logical_id(&self) -> String {
        let components: Vec<&str> = self
            .parts
            .iter()
            .map(String::as_str)
            .filter(|c| *c != HIDDEN_ID)
            .collect();

        if let [single] = components.as_slice() {
            let candidate = alphanumeric(single);
            if candidate.len() <= MAX_ID_LEN {
                return candidate;
            }
        }

        let hash = path_hash(&components);
        let mut human: String = dedupe(&components)
            .into_iter()
            .filter(|c| *c != HIDDEN_FROM_HUMAN_ID)
            .map(alphanumeric)
            .collect();
        human.truncate(MAX_HUMAN_LEN);
        human + &hash
    }
}

impl fmt::Display for ConstructPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("/"))
    }
}

fn alphanumeric(s: &str) -> String {
    s.chars().filter(char::is_ascii_alphanumeric).collect()
}

fn dedupe<'a>(components: &[&'a str]) -> Vec<&'a str> {
    let mut out: Vec<&str> = Vec::with_capacity(components.len());
    for c in components {
        if out.last() != Some(c) {
            out.push(c);
        }
    }
    out
}

fn path_hash(components: &[&str]) -> String {
    let digest = Md5::digest(components.join("/").as_bytes());
    let mut hash = hex::encode_upper(digest);
    hash.truncate(HASH_LEN);
    hash
}

/// A resource placed at a path.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Where the resource lives in the construct tree.
    pub path: ConstructPath,
    /// What to declare.
    pub resource: Resource,
}

impl Declaration {
    /// Logical id the resource will get in the template.
    #[must_use]
    pub fn logical_id(&self) -> String {
        self.path.logical_id()
    }
}

/// Something that contributes resources to a stack.
pub trait Construct {
    /// Path of the construct itself.
    fn path(&self) -> &ConstructPath;

    /// Resources this construct declares, in declaration order.
    fn declarations(&self) -> Vec<Declaration>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_use_single_component_verbatim() {
        let path = ConstructPath::root().child("DevRoleArn");
        assert_eq!(path.logical_id(), "DevRoleArn");
    }

    #[test]
    fn test_should_strip_non_alphanumerics_from_single_component() {
        let path = ConstructPath::root().child("Dev-Role_Arn");
        assert_eq!(path.logical_id(), "DevRoleArn");
    }

    #[test]
    fn test_should_append_hash_for_nested_paths() {
        let path = ConstructPath::root()
            .child("PersonalRoles")
            .child("PersonalDevRole")
            .child("Resource");
        let id = path.logical_id();

        assert!(id.starts_with("PersonalRolesPersonalDevRole"));
        let suffix = &id["PersonalRolesPersonalDevRole".len()..];
        assert_eq!(suffix.len(), 8);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
    }

    #[test]
    fn test_should_hash_the_full_path() {
        let a = ConstructPath::root().child("Roles").child("Dev");
        let b = ConstructPath::root().child("RolesDev");
        let c = ConstructPath::root().child("RolesDe").child("v");
        assert_ne!(a.logical_id(), c.logical_id());
        assert_eq!(b.logical_id(), "RolesDev");
    }

    #[test]
    fn test_should_compute_md5_suffix() {
        // md5("a/b") = a7e86136...
        let path = ConstructPath::root().child("a").child("b");
        assert_eq!(path.logical_id(), "abA7E86136");
    }

    #[test]
    fn test_should_drop_default_components() {
        let with_default = ConstructPath::root().child("Topic").child("Default");
        assert_eq!(with_default.logical_id(), "Topic");
    }

    #[test]
    fn test_should_collapse_repeated_components() {
        let path = ConstructPath::root().child("Alerts").child("Alerts");
        let id = path.logical_id();
        assert!(id.starts_with("Alerts"));
        assert!(!id.starts_with("AlertsAlerts"));
    }

    #[test]
    fn test_should_display_path() {
        let path = ConstructPath::root().child("CostAlerts").child("BillingAlerts");
        assert_eq!(path.to_string(), "CostAlerts/BillingAlerts");
        assert_eq!(path.parts().len(), 2);
    }
}
