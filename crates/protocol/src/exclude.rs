use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::types::Category;

/// One key of the exclusion vocabulary the viewer feeds back into the
/// aggregators: a whole category, one type within a category, or one of
/// the two reserved flag keys.
///
/// Wire forms: `init`, `inlinable`, `{category}`, `{category}:{type}`
/// (e.g. `deps`, `deps:lodash`, `all-v8:cpp`).
///
/// The set is always passed explicitly to every aggregation call; nothing
/// caches it, so one tree can be queried under several filters at once.
/// A key that matches no node is inert.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExcludeKey {
    /// Hide initialization frames (`[INIT]`).
    Init,
    /// Hide inlinable frames (`[INLINABLE]`).
    Inlinable,
    /// Hide every frame of a category.
    Category(Category),
    /// Hide one type within a category.
    Kind(Category, String),
}

pub type ExcludeSet = HashSet<ExcludeKey>;

impl ExcludeKey {
    /// Convenience constructor for `{category}:{type}` keys.
    pub fn kind(category: Category, kind: impl Into<String>) -> Self {
        Self::Kind(category, kind.into())
    }
}

impl fmt::Display for ExcludeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => f.write_str("init"),
            Self::Inlinable => f.write_str("inlinable"),
            Self::Category(category) => f.write_str(category.as_str()),
            Self::Kind(category, kind) => write!(f, "{category}:{kind}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    #[error("empty exclude key")]
    Empty,
    #[error("unknown category in exclude key: {0:?}")]
    UnknownCategory(String),
}

fn parse_category(text: &str) -> Result<Category, KeyParseError> {
    match text {
        "app" => Ok(Category::App),
        "deps" => Ok(Category::Deps),
        "core" => Ok(Category::Core),
        "wasm" => Ok(Category::Wasm),
        "all-v8" => Ok(Category::AllV8),
        "none" => Ok(Category::Root),
        other => Err(KeyParseError::UnknownCategory(other.to_string())),
    }
}

impl FromStr for ExcludeKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(KeyParseError::Empty);
        }
        match s {
            "init" => return Ok(Self::Init),
            "inlinable" => return Ok(Self::Inlinable),
            _ => {}
        }
        // Category names contain no colon, so the first colon separates
        // category from type (the type keeps any further colons).
        match s.split_once(':') {
            Some((category, kind)) => Ok(Self::Kind(parse_category(category)?, kind.to_string())),
            None => Ok(Self::Category(parse_category(s)?)),
        }
    }
}

/// The conventional starting filter of the viewer: engine internals and
/// initialization frames hidden, app/deps/core/wasm visible.
pub fn default_excludes() -> ExcludeSet {
    [
        ExcludeKey::kind(Category::AllV8, "v8"),
        ExcludeKey::kind(Category::AllV8, "cpp"),
        ExcludeKey::kind(Category::AllV8, "native"),
        ExcludeKey::kind(Category::AllV8, "regexp"),
        ExcludeKey::Init,
    ]
    .into_iter()
    .collect()
}
