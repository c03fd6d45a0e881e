//! Access control value types
//!
//! Core identifier types used by the permission engine: access levels and
//! resource references. Both are pure values; identifiers are opaque to the
//! engine and never parsed for semantics.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Principal scope at which a permission override can be configured
///
/// Override priority is `Default < Role < User`. `Visitor` is a disjoint
/// branch that falls back only to `Default`, never to `Role` or `User`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccessLevel {
    /// Anonymous, unauthenticated visitor
    Visitor,
    /// Site-wide baseline applying to everyone
    Default,
    /// Everyone holding the given role
    Role(String),
    /// A single authenticated user
    User(u64),
}

impl AccessLevel {
    /// Override specificity, higher wins
    ///
    /// `Visitor` shares rank with `Role` but the two never appear in the
    /// same fallback chain.
    pub fn specificity(&self) -> u8 {
        match self {
            AccessLevel::Default => 0,
            AccessLevel::Visitor => 1,
            AccessLevel::Role(_) => 1,
            AccessLevel::User(_) => 2,
        }
    }

    /// Compact string form used in config keys and CLI arguments
    pub fn as_key(&self) -> String {
        self.to_string()
    }

    /// Parse the compact string form (`visitor`, `default`, `role:editor`,
    /// `user:42`)
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "visitor" => Some(AccessLevel::Visitor),
            "default" => Some(AccessLevel::Default),
            _ => {
                if let Some(slug) = s.strip_prefix("role:") {
                    if slug.is_empty() {
                        return None;
                    }
                    return Some(AccessLevel::Role(slug.to_string()));
                }
                if let Some(id) = s.strip_prefix("user:") {
                    return id.parse().ok().map(AccessLevel::User);
                }
                None
            }
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Visitor => write!(f, "visitor"),
            AccessLevel::Default => write!(f, "default"),
            AccessLevel::Role(slug) => write!(f, "role:{}", slug),
            AccessLevel::User(id) => write!(f, "user:{}", id),
        }
    }
}

impl Serialize for AccessLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        AccessLevel::try_parse(&s)
            .ok_or_else(|| D::Error::custom(format!("invalid access level '{}'", s)))
    }
}

/// Kind of protected object a permission attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Post,
    PostType,
    Taxonomy,
    Term,
    Role,
    User,
    Menu,
    Metabox,
    Widget,
    ApiRoute,
    Url,
    Capability,
}

impl ResourceType {
    /// Get the resource type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Post => "post",
            ResourceType::PostType => "post_type",
            ResourceType::Taxonomy => "taxonomy",
            ResourceType::Term => "term",
            ResourceType::Role => "role",
            ResourceType::User => "user",
            ResourceType::Menu => "menu",
            ResourceType::Metabox => "metabox",
            ResourceType::Widget => "widget",
            ResourceType::ApiRoute => "api_route",
            ResourceType::Url => "url",
            ResourceType::Capability => "capability",
        }
    }

    /// Try to parse a resource type from a string
    pub fn try_parse(s: &str) -> Option<Self> {
        match s {
            "post" => Some(ResourceType::Post),
            "post_type" => Some(ResourceType::PostType),
            "taxonomy" => Some(ResourceType::Taxonomy),
            "term" => Some(ResourceType::Term),
            "role" => Some(ResourceType::Role),
            "user" => Some(ResourceType::User),
            "menu" => Some(ResourceType::Menu),
            "metabox" => Some(ResourceType::Metabox),
            "widget" => Some(ResourceType::Widget),
            "api_route" => Some(ResourceType::ApiRoute),
            "url" => Some(ResourceType::Url),
            "capability" => Some(ResourceType::Capability),
            _ => None,
        }
    }

    /// Get all resource types
    pub fn all() -> &'static [ResourceType] {
        &[
            ResourceType::Post,
            ResourceType::PostType,
            ResourceType::Taxonomy,
            ResourceType::Term,
            ResourceType::Role,
            ResourceType::User,
            ResourceType::Menu,
            ResourceType::Metabox,
            ResourceType::Widget,
            ResourceType::ApiRoute,
            ResourceType::Url,
            ResourceType::Capability,
        ]
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resource identifier, numeric or string depending on the resource type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    /// Numeric id (posts, users, terms)
    Id(u64),
    /// String slug or compound key (everything else)
    Key(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Id(id) => write!(f, "{}", id),
            Identifier::Key(key) => write!(f, "{}", key),
        }
    }
}

/// Reference to a protected object: a resource type plus an opaque identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceRef {
    pub resource_type: ResourceType,
    pub identifier: Identifier,
}

impl ResourceRef {
    /// Generic constructor; prefer the typed helpers below
    pub fn new(resource_type: ResourceType, identifier: Identifier) -> Self {
        Self {
            resource_type,
            identifier,
        }
    }

    pub fn post(id: u64) -> Self {
        Self::new(ResourceType::Post, Identifier::Id(id))
    }

    pub fn post_type(slug: impl Into<String>) -> Self {
        Self::new(ResourceType::PostType, Identifier::Key(slug.into()))
    }

    pub fn taxonomy(slug: impl Into<String>) -> Self {
        Self::new(ResourceType::Taxonomy, Identifier::Key(slug.into()))
    }

    pub fn term(id: u64) -> Self {
        Self::new(ResourceType::Term, Identifier::Id(id))
    }

    pub fn role(slug: impl Into<String>) -> Self {
        Self::new(ResourceType::Role, Identifier::Key(slug.into()))
    }

    pub fn user(id: u64) -> Self {
        Self::new(ResourceType::User, Identifier::Id(id))
    }

    pub fn menu(slug: impl Into<String>) -> Self {
        Self::new(ResourceType::Menu, Identifier::Key(slug.into()))
    }

    pub fn metabox(slug: impl Into<String>) -> Self {
        Self::new(ResourceType::Metabox, Identifier::Key(slug.into()))
    }

    pub fn widget(slug: impl Into<String>) -> Self {
        Self::new(ResourceType::Widget, Identifier::Key(slug.into()))
    }

    /// API route reference; method and path are lower-cased into the
    /// compound form `"method path"`
    pub fn api_route(method: &str, path: &str) -> Self {
        let key = format!("{} {}", method.to_lowercase(), path.to_lowercase());
        Self::new(ResourceType::ApiRoute, Identifier::Key(key))
    }

    pub fn url(schema: impl Into<String>) -> Self {
        Self::new(ResourceType::Url, Identifier::Key(schema.into()))
    }

    pub fn capability(name: impl Into<String>) -> Self {
        Self::new(ResourceType::Capability, Identifier::Key(name.into()))
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_level_roundtrip() {
        let levels = [
            AccessLevel::Visitor,
            AccessLevel::Default,
            AccessLevel::Role("editor".into()),
            AccessLevel::User(42),
        ];
        for level in levels {
            let s = level.to_string();
            let parsed = AccessLevel::try_parse(&s).unwrap();
            assert_eq!(level, parsed);
        }
    }

    #[test]
    fn test_access_level_parse_rejects_garbage() {
        assert!(AccessLevel::try_parse("").is_none());
        assert!(AccessLevel::try_parse("role:").is_none());
        assert!(AccessLevel::try_parse("user:abc").is_none());
        assert!(AccessLevel::try_parse("group:editors").is_none());
    }

    #[test]
    fn test_access_level_specificity() {
        assert!(AccessLevel::Default.specificity() < AccessLevel::Role("x".into()).specificity());
        assert!(AccessLevel::Role("x".into()).specificity() < AccessLevel::User(1).specificity());
    }

    #[test]
    fn test_access_level_serde() {
        let level = AccessLevel::Role("editor".into());
        let json = serde_json::to_string(&level).unwrap();
        assert_eq!(json, r#""role:editor""#);
        let back: AccessLevel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_resource_type_roundtrip() {
        for rt in ResourceType::all() {
            let s = rt.as_str();
            assert_eq!(ResourceType::try_parse(s), Some(*rt));
        }
        assert!(ResourceType::try_parse("gadget").is_none());
    }

    #[test]
    fn test_api_route_normalization() {
        let r = ResourceRef::api_route("GET", "/WP/v2/Posts");
        assert_eq!(r.identifier, Identifier::Key("get /wp/v2/posts".into()));
    }

    #[test]
    fn test_resource_ref_display() {
        assert_eq!(ResourceRef::post(7).to_string(), "post:7");
        assert_eq!(
            ResourceRef::capability("edit_posts").to_string(),
            "capability:edit_posts"
        );
    }
}
