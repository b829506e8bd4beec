use serde::{Deserialize, Serialize};

/// Coarse code-origin category assigned to every classified frame.
///
/// The viewer filters on these, so the wire form matches its vocabulary:
/// `app`, `deps`, `core`, `wasm`, `all-v8`, `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// The profiled application's own code.
    App,
    /// Third-party dependency code (installed under `node_modules`).
    Deps,
    /// Runtime standard-library code shipped with the platform.
    Core,
    /// WebAssembly frames.
    Wasm,
    /// Engine internals: JIT code, C++ builtins, native helpers, compiled
    /// regular expressions.
    AllV8,
    /// The synthetic "all stacks" root. Bypasses classification and is
    /// never part of the exclusion vocabulary.
    #[serde(rename = "none")]
    Root,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Deps => "deps",
            Self::Core => "core",
            Self::Wasm => "wasm",
            Self::AllV8 => "all-v8",
            Self::Root => "none",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path convention of the platform the samples were captured on.
///
/// Carried in the environment descriptor so a capture taken on Windows
/// analyzes correctly on any host (path handling is string-based, never
/// `std::path`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSeparator {
    #[serde(rename = "/")]
    Slash,
    #[serde(rename = "\\")]
    Backslash,
}

impl PathSeparator {
    pub fn as_char(self) -> char {
        match self {
            Self::Slash => '/',
            Self::Backslash => '\\',
        }
    }

    /// Whether `path` is absolute under this platform's convention.
    ///
    /// Windows recognizes both drive-letter paths (`C:\…`) and UNC paths
    /// (`\\server\…`).
    pub fn is_absolute(self, path: &str) -> bool {
        match self {
            Self::Slash => path.starts_with('/'),
            Self::Backslash => {
                let mut chars = path.chars();
                match (chars.next(), chars.next(), chars.next()) {
                    (Some(drive), Some(':'), Some('\\')) => drive.is_ascii_alphabetic(),
                    (Some('\\'), Some('\\'), _) => true,
                    _ => false,
                }
            }
        }
    }
}

/// Discriminates the two tree variants built from the same raw samples:
/// one where optimized/unoptimized versions of a function are combined,
/// one where they are kept separate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Merged,
    Unmerged,
}

impl TreeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Merged => "merged",
            Self::Unmerged => "unmerged",
        }
    }
}

/// System/environment metadata reported by the capture side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentInfo {
    /// Absolute working directory of the profiled process; base for path
    /// anonymization.
    pub main_directory: String,
    /// Path convention of the capture platform.
    pub path_separator: PathSeparator,
    /// Runtime component versions, keyed the way the platform reports them.
    pub node_versions: NodeVersions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeVersions {
    /// Runtime version string, e.g. `18.19.0` (a leading `v` is tolerated).
    pub node: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_names() {
        assert_eq!(
            serde_json::to_string(&Category::AllV8).ok(),
            Some("\"all-v8\"".to_string())
        );
        assert_eq!(
            serde_json::to_string(&Category::Root).ok(),
            Some("\"none\"".to_string())
        );
        assert_eq!(Category::Deps.to_string(), "deps");
    }

    #[test]
    fn absolute_paths_per_convention() {
        assert!(PathSeparator::Slash.is_absolute("/root/app.js"));
        assert!(!PathSeparator::Slash.is_absolute("util.js"));
        assert!(PathSeparator::Backslash.is_absolute("C:\\proj\\app.js"));
        assert!(PathSeparator::Backslash.is_absolute("\\\\share\\app.js"));
        assert!(!PathSeparator::Backslash.is_absolute("proj\\app.js"));
        // A Unix-absolute path is not Windows-absolute.
        assert!(!PathSeparator::Backslash.is_absolute("/root/app.js"));
    }

    #[test]
    fn environment_info_wire_shape() {
        let json = r#"{
            "mainDirectory": "/root",
            "pathSeparator": "/",
            "nodeVersions": { "node": "18.19.0" }
        }"#;
        let env: EnvironmentInfo = serde_json::from_str(json).unwrap();
        assert_eq!(env.main_directory, "/root");
        assert_eq!(env.path_separator, PathSeparator::Slash);
        assert_eq!(env.node_versions.node, "18.19.0");
    }
}
