use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The label matches none of the known stack-trace dialects. Fatal:
    /// a single ununderstood frame means the capture format is not what
    /// we think it is, and sample counts could not be trusted.
    #[error("unrecognized frame label: {0:?}")]
    UnrecognizedLabel(String),
}

/// Leading optimization marker on a JS frame. `*` marks optimized code;
/// `~` and `^` are two textual conventions for unoptimized code with
/// identical meaning. No marker: status not recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptMarker {
    Optimized,
    Unoptimized,
}

/// A frame in the JavaScript dialect:
/// `[marker]name file:line:col [INIT] [INLINABLE]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsFrame {
    /// May be empty (anonymous functions).
    pub function_name: String,
    pub file_name: String,
    pub line: u32,
    pub column: u32,
    pub marker: Option<OptMarker>,
    pub is_init: bool,
    pub is_inlinable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeTag {
    Cpp,
    SharedLib,
    /// `[CODE:tag]` — the engine's code-kind tag, e.g. `RegExp`, `LoadIC`.
    Code(String),
}

/// A frame in the native/C++ dialect: `name [CPP|SHARED_LIB|CODE:tag] [INIT]`.
///
/// For `[SHARED_LIB]` the captured text is the module path, not a function
/// name, so the roles swap: `file_name` is set and `function_name` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeFrame {
    pub function_name: Option<String>,
    pub file_name: Option<String>,
    pub tag: NativeTag,
    pub is_init: bool,
}

/// A frame in the WebAssembly dialect: `name [WASM[:tier]] [INIT]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WasmFrame {
    pub function_name: String,
    /// Compilation tier when reported (e.g. `liftoff`, `turbofan`).
    pub tier: Option<String>,
    pub is_init: bool,
}

/// A parsed frame label, tagged by dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameLabel {
    Js(JsFrame),
    Native(NativeFrame),
    Wasm(WasmFrame),
}

/// Undo capture artifacts before parsing: the upstream tool escapes literal
/// backslashes as the text `\u005c`, and an embedded newline would break
/// the one-frame-per-line assumption of everything downstream.
pub fn normalize_label(label: &str) -> String {
    label.replace("\\u005c", "\\").replace('\n', " /")
}

/// Parse a frame label, attempting the dialect grammars in strict order:
/// JavaScript, then native, then WebAssembly.
pub fn parse(label: &str) -> Result<FrameLabel, ParseError> {
    if let Some(js) = parse_js(label) {
        return Ok(FrameLabel::Js(js));
    }
    if let Some(native) = parse_native(label) {
        return Ok(FrameLabel::Native(native));
    }
    if let Some(wasm) = parse_wasm(label) {
        return Ok(FrameLabel::Wasm(wasm));
    }
    Err(ParseError::UnrecognizedLabel(label.to_string()))
}

/// Strip trailing `[INIT]` / `[INLINABLE]` flags, in any order.
fn strip_js_flags(label: &str) -> (&str, bool, bool) {
    let mut rest = label.trim_end();
    let mut is_init = false;
    let mut is_inlinable = false;
    loop {
        if let Some(head) = rest.strip_suffix(" [INIT]") {
            is_init = true;
            rest = head.trim_end();
        } else if let Some(head) = rest.strip_suffix(" [INLINABLE]") {
            is_inlinable = true;
            rest = head.trim_end();
        } else {
            return (rest, is_init, is_inlinable);
        }
    }
}

fn strip_init_flag(label: &str) -> (&str, bool) {
    match label.trim_end().strip_suffix(" [INIT]") {
        Some(head) => (head.trim_end(), true),
        None => (label.trim_end(), false),
    }
}

fn parse_js(label: &str) -> Option<JsFrame> {
    let (rest, is_init, is_inlinable) = strip_js_flags(label);

    // Location is parsed from the right: `…file:line:col`. Splitting from
    // the right keeps colons inside the path (Windows drives, URLs) intact.
    let col_sep = rest.rfind(':')?;
    let column: u32 = rest[col_sep + 1..].parse().ok()?;
    let head = &rest[..col_sep];
    let line_sep = head.rfind(':')?;
    let line: u32 = head[line_sep + 1..].parse().ok()?;
    let head = &head[..line_sep];

    // The path is the last space-separated token; anything before it is the
    // function name (which itself may contain spaces, e.g. getters).
    let (function, file) = match head.rfind(' ') {
        Some(pos) => (&head[..pos], &head[pos + 1..]),
        None => ("", head),
    };
    if file.is_empty() {
        return None;
    }

    let (marker, function) = match function.chars().next() {
        Some('*') => (Some(OptMarker::Optimized), &function[1..]),
        Some('~' | '^') => (Some(OptMarker::Unoptimized), &function[1..]),
        _ => (None, function),
    };

    Some(JsFrame {
        function_name: function.to_string(),
        file_name: file.to_string(),
        line,
        column,
        marker,
        is_init,
        is_inlinable,
    })
}

fn parse_native(label: &str) -> Option<NativeFrame> {
    let (rest, is_init) = strip_init_flag(label);

    if let Some(name) = rest.strip_suffix(" [CPP]") {
        return Some(NativeFrame {
            function_name: Some(name.to_string()),
            file_name: None,
            tag: NativeTag::Cpp,
            is_init,
        });
    }
    if let Some(path) = rest.strip_suffix(" [SHARED_LIB]") {
        // The "function name" slot carries the module path here.
        return Some(NativeFrame {
            function_name: None,
            file_name: Some(path.to_string()),
            tag: NativeTag::SharedLib,
            is_init,
        });
    }
    if let Some(head) = rest.strip_suffix(']') {
        if let Some(pos) = head.rfind(" [CODE:") {
            let tag = &head[pos + " [CODE:".len()..];
            if !tag.is_empty() && !tag.contains('[') && !tag.contains(']') {
                return Some(NativeFrame {
                    function_name: Some(head[..pos].to_string()),
                    file_name: None,
                    tag: NativeTag::Code(tag.to_string()),
                    is_init,
                });
            }
        }
    }
    None
}

fn parse_wasm(label: &str) -> Option<WasmFrame> {
    let (rest, is_init) = strip_init_flag(label);

    if let Some(name) = rest.strip_suffix(" [WASM]") {
        return Some(WasmFrame {
            function_name: name.to_string(),
            tier: None,
            is_init,
        });
    }
    if let Some(head) = rest.strip_suffix(']') {
        if let Some(pos) = head.rfind(" [WASM:") {
            let tier = &head[pos + " [WASM:".len()..];
            if !tier.is_empty() && !tier.contains('[') && !tier.contains(']') {
                return Some(WasmFrame {
                    function_name: head[..pos].to_string(),
                    tier: Some(tier.to_string()),
                    is_init,
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_js_frame(label: &str) -> JsFrame {
        match parse(label) {
            Ok(FrameLabel::Js(js)) => js,
            other => panic!("expected JS frame for {label:?}, got {other:?}"),
        }
    }

    #[test]
    fn plain_js_frame() {
        let js = parse_js_frame("coreFunction util.js:15:7");
        assert_eq!(js.function_name, "coreFunction");
        assert_eq!(js.file_name, "util.js");
        assert_eq!(js.line, 15);
        assert_eq!(js.column, 7);
        assert_eq!(js.marker, None);
        assert!(!js.is_init && !js.is_inlinable);
    }

    #[test]
    fn optimization_markers() {
        assert_eq!(
            parse_js_frame("*hot /app/index.js:1:1").marker,
            Some(OptMarker::Optimized)
        );
        assert_eq!(
            parse_js_frame("~cold /app/index.js:1:1").marker,
            Some(OptMarker::Unoptimized)
        );
        // Caret is an alternate spelling of the same status.
        assert_eq!(
            parse_js_frame("^cold /app/index.js:1:1").marker,
            Some(OptMarker::Unoptimized)
        );
    }

    #[test]
    fn trailing_flags_in_any_order() {
        let js = parse_js_frame("~getX /a/b/node_modules/foo/x.js:1:1 [INLINABLE]");
        assert!(js.is_inlinable);
        assert!(!js.is_init);
        assert_eq!(js.file_name, "/a/b/node_modules/foo/x.js");

        let js = parse_js_frame("boot main.js:3:2 [INLINABLE] [INIT]");
        assert!(js.is_init && js.is_inlinable);
    }

    #[test]
    fn anonymous_function_and_spaced_getter() {
        let js = parse_js_frame("/app/index.js:10:3");
        assert_eq!(js.function_name, "");
        assert_eq!(js.file_name, "/app/index.js");

        let js = parse_js_frame("get length /app/index.js:10:3");
        assert_eq!(js.function_name, "get length");
    }

    #[test]
    fn windows_drive_paths_keep_their_colon() {
        let js = parse_js_frame("main C:\\proj\\app.js:4:9");
        assert_eq!(js.file_name, "C:\\proj\\app.js");
        assert_eq!(js.line, 4);
        assert_eq!(js.column, 9);
    }

    #[test]
    fn native_frames() {
        let cpp = parse("node::Start(int, char**) [CPP]").unwrap();
        assert_eq!(
            cpp,
            FrameLabel::Native(NativeFrame {
                function_name: Some("node::Start(int, char**)".to_string()),
                file_name: None,
                tag: NativeTag::Cpp,
                is_init: false,
            })
        );

        let lib = parse("/usr/lib/libuv.so [SHARED_LIB]").unwrap();
        match lib {
            FrameLabel::Native(native) => {
                assert_eq!(native.function_name, None);
                assert_eq!(native.file_name.as_deref(), Some("/usr/lib/libuv.so"));
                assert_eq!(native.tag, NativeTag::SharedLib);
            }
            other => panic!("expected native frame, got {other:?}"),
        }

        let code = parse("foo.*bar [CODE:RegExp]").unwrap();
        match code {
            FrameLabel::Native(native) => {
                assert_eq!(native.function_name.as_deref(), Some("foo.*bar"));
                assert_eq!(native.tag, NativeTag::Code("RegExp".to_string()));
            }
            other => panic!("expected native frame, got {other:?}"),
        }
    }

    #[test]
    fn native_init_suffix() {
        let code = parse("bootstrap [CODE:Builtin] [INIT]").unwrap();
        match code {
            FrameLabel::Native(native) => assert!(native.is_init),
            other => panic!("expected native frame, got {other:?}"),
        }
    }

    #[test]
    fn wasm_frames() {
        let plain = parse("wasm-function[7] [WASM]").unwrap();
        match plain {
            FrameLabel::Wasm(wasm) => {
                assert_eq!(wasm.function_name, "wasm-function[7]");
                assert_eq!(wasm.tier, None);
            }
            other => panic!("expected wasm frame, got {other:?}"),
        }

        let tiered = parse("add [WASM:turbofan] [INIT]").unwrap();
        match tiered {
            FrameLabel::Wasm(wasm) => {
                assert_eq!(wasm.tier.as_deref(), Some("turbofan"));
                assert!(wasm.is_init);
            }
            other => panic!("expected wasm frame, got {other:?}"),
        }
    }

    #[test]
    fn js_dialect_wins_over_native_and_wasm() {
        // A label that satisfies the JS grammar must never reach the other
        // parsers, whatever else it contains.
        let js = parse_js_frame("foo [CPP] /app/x.js:1:2");
        assert_eq!(js.file_name, "/app/x.js");
    }

    #[test]
    fn unrecognized_label_is_fatal() {
        assert_eq!(
            parse("garbage"),
            Err(ParseError::UnrecognizedLabel("garbage".to_string()))
        );
        assert!(parse("almost a frame [WAT]").is_err());
    }

    #[test]
    fn normalization_undoes_capture_artifacts() {
        assert_eq!(normalize_label(r"C:\u005cproj\u005capp.js"), "C:\\proj\\app.js");
        assert_eq!(normalize_label("line one\nline two"), "line one /line two");
    }
}
