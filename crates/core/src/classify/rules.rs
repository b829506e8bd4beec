use cindertree_protocol::{Category, EnvironmentInfo};

use super::label::{FrameLabel, NativeTag};

/// File name shown for compiled regular-expression frames. Regex bodies
/// may contain arbitrary whitespace and control characters, so the real
/// source never goes into the display fields.
pub const REGEXP_FILE_NAME: &str = "[regexp]";

/// Category plus the finer type label whose meaning depends on the
/// category: a dependency package name, the application name, or a fixed
/// engine subtype (`core`, `v8`, `cpp`, `native`, `regexp`, `wasm`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub kind: String,
}

impl Classification {
    fn new(category: Category, kind: impl Into<String>) -> Self {
        Self {
            category,
            kind: kind.into(),
        }
    }
}

/// Everything a classification rule may inspect: the normalized label
/// text, its parsed form, and the capture environment.
#[derive(Debug)]
pub struct RuleInput<'a> {
    pub label: &'a str,
    pub parsed: &'a FrameLabel,
    pub env: &'a EnvironmentInfo,
    pub app_name: &'a str,
}

type Rule = fn(&RuleInput<'_>) -> Option<Classification>;

/// Ranked classifier rules; the first rule returning `Some` wins. The
/// order is load-bearing — the textual patterns overlap heavily.
pub const RULES: &[Rule] = &[
    esm_app_frame,
    wasm_frame,
    engine_frame,
    dependency_frame,
    application_frame,
];

/// Classify a parsed frame. Runs the ranked rule chain; the final rule is
/// total, so every frame receives exactly one classification.
pub fn classify(input: &RuleInput<'_>) -> Classification {
    for rule in RULES {
        if let Some(classification) = rule(input) {
            return classification;
        }
    }
    Classification::new(Category::App, input.app_name)
}

fn has_script_extension(path: &str) -> bool {
    path.ends_with(".js") || path.ends_with(".mjs") || path.ends_with(".cjs")
}

/// User code loaded as an ES module carries a `file://` URL instead of a
/// filesystem path; it must reach the application bucket before the path
/// heuristics below would misread it.
fn esm_app_frame(input: &RuleInput<'_>) -> Option<Classification> {
    let FrameLabel::Js(js) = input.parsed else {
        return None;
    };
    if js.file_name.starts_with("file://") && has_script_extension(&js.file_name) {
        return Some(Classification::new(Category::App, input.app_name));
    }
    None
}

fn wasm_frame(input: &RuleInput<'_>) -> Option<Classification> {
    if matches!(input.parsed, FrameLabel::Wasm(_)) {
        return Some(Classification::new(Category::Wasm, "wasm"));
    }
    None
}

fn is_regexp_code(parsed: &FrameLabel) -> bool {
    matches!(
        parsed,
        FrameLabel::Native(native) if matches!(&native.tag, NativeTag::Code(tag) if tag == "RegExp")
    )
}

/// Whether the frame points into a JS module: a `.js`/`.mjs` path or a
/// `node:`-prefixed internal module specifier.
fn looks_like_js_module(parsed: &FrameLabel) -> bool {
    let FrameLabel::Js(js) = parsed else {
        return false;
    };
    js.file_name.ends_with(".js")
        || js.file_name.ends_with(".mjs")
        || js.file_name.starts_with("node:")
}

/// Runtime and engine frames. Everything classified here lands in
/// `all-v8` except the runtime's own JS standard library (`core`).
fn engine_frame(input: &RuleInput<'_>) -> Option<Classification> {
    // Compiled regular-expression code carries its own tag.
    if is_regexp_code(input.parsed) {
        return Some(Classification::new(Category::AllV8, "regexp"));
    }

    if !looks_like_js_module(input.parsed) {
        return Some(classify_non_js(input));
    }

    // Old-style internal frames carry a literal `native` token.
    if input.label.contains(" native ") {
        return Some(Classification::new(Category::AllV8, "native"));
    }

    // Runtime standard-library modules are addressed relatively (or via
    // `node:`); user code always comes with an absolute path.
    if let FrameLabel::Js(js) = input.parsed {
        if !input.env.path_separator.is_absolute(&js.file_name) {
            return Some(Classification::new(Category::Core, "core"));
        }
    }

    None
}

/// The non-JS-path half of the engine rule, decided from native tags.
fn classify_non_js(input: &RuleInput<'_>) -> Classification {
    let native = match input.parsed {
        FrameLabel::Native(native) => Some(native),
        _ => None,
    };

    if let Some(native) = native {
        let is_v8_internal_cpp = native.tag == NativeTag::Cpp
            && native
                .function_name
                .as_deref()
                .is_some_and(|name| name.starts_with("v8::internal::"));
        if matches!(native.tag, NativeTag::Code(_)) || is_v8_internal_cpp {
            return Classification::new(Category::AllV8, "v8");
        }
    }

    // Catch-all for malformed or ambiguous frames that end in a bare dot.
    let ends_with_dot = input.label.trim_end().ends_with('.')
        || native
            .and_then(|n| n.function_name.as_deref())
            .is_some_and(|name| name.ends_with('.'));
    if ends_with_dot {
        return Classification::new(Category::Core, "core");
    }

    if let Some(native) = native {
        if matches!(native.tag, NativeTag::Cpp | NativeTag::SharedLib) {
            return Classification::new(Category::AllV8, "cpp");
        }
    }

    // The origin of eval'd code cannot be determined; bucket it as native
    // rather than falsely attributing it to app, deps, or core.
    if input.label.contains("[eval]") {
        return Classification::new(Category::AllV8, "native");
    }

    Classification::new(Category::AllV8, "v8")
}

/// Frames under a `node_modules` directory belong to the dependency named
/// by the folder under the innermost such segment, so a dependency's own
/// dependency is attributed to the inner one.
fn dependency_frame(input: &RuleInput<'_>) -> Option<Classification> {
    let FrameLabel::Js(js) = input.parsed else {
        return None;
    };
    let package = innermost_dependency(&js.file_name, input.env.path_separator.as_char())?;
    Some(Classification::new(Category::Deps, package))
}

fn innermost_dependency(path: &str, separator: char) -> Option<String> {
    let segments: Vec<&str> = path.split(separator).collect();
    let last = segments.iter().rposition(|segment| *segment == "node_modules")?;
    let package = segments.get(last + 1)?;
    if package.is_empty() {
        return None;
    }
    Some((*package).to_string())
}

/// Fallback: everything else is the application itself. A single flat
/// bucket — application code is not subdivided further.
fn application_frame(input: &RuleInput<'_>) -> Option<Classification> {
    Some(Classification::new(Category::App, input.app_name))
}
