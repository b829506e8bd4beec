use cindertree_protocol::PathSeparator;

/// Compute `path` relative to `base`, both absolute under the given
/// convention. String-based on purpose: the capture's platform need not
/// match the analysis host, so `std::path` semantics would be wrong.
///
/// Returns `None` when no relative form exists (the path is not absolute,
/// or the two are on different Windows drives).
pub fn relative_from(path: &str, base: &str, separator: PathSeparator) -> Option<String> {
    if !separator.is_absolute(path) || !separator.is_absolute(base) {
        return None;
    }
    let sep = separator.as_char();
    let path_segments: Vec<&str> = path.split(sep).filter(|s| !s.is_empty()).collect();
    let base_segments: Vec<&str> = base.split(sep).filter(|s| !s.is_empty()).collect();

    let common = path_segments
        .iter()
        .zip(base_segments.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Different drives never share a prefix; there is no relative form.
    if separator == PathSeparator::Backslash && common == 0 {
        return None;
    }

    let mut segments: Vec<&str> = Vec::with_capacity(base_segments.len() - common + path_segments.len() - common);
    for _ in common..base_segments.len() {
        segments.push("..");
    }
    segments.extend(&path_segments[common..]);
    Some(segments.join(&sep.to_string()))
}

/// Resolve a relative path (as produced by `relative_from`, possibly with
/// a `./` prefix) against an absolute base. Inverse of anonymization.
pub fn resolve(base: &str, relative: &str, separator: PathSeparator) -> String {
    let sep = separator.as_char();
    let relative = relative.strip_prefix("./").unwrap_or(relative);

    let mut segments: Vec<&str> = base.split(sep).filter(|s| !s.is_empty()).collect();
    for segment in relative.split(sep).filter(|s| !s.is_empty()) {
        match segment {
            "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    match separator {
        // Unix absolute paths grow their leading slash back.
        PathSeparator::Slash => format!("/{}", segments.join("/")),
        PathSeparator::Backslash => segments.join("\\"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_below_base() {
        assert_eq!(
            relative_from("/root/src/index.js", "/root", PathSeparator::Slash).as_deref(),
            Some("src/index.js")
        );
    }

    #[test]
    fn relative_outside_base_uses_parent_markers() {
        assert_eq!(
            relative_from("/opt/lib/x.js", "/root/app", PathSeparator::Slash).as_deref(),
            Some("../../opt/lib/x.js")
        );
    }

    #[test]
    fn non_absolute_path_cannot_be_relativized() {
        assert_eq!(relative_from("util.js", "/root", PathSeparator::Slash), None);
    }

    #[test]
    fn windows_paths() {
        assert_eq!(
            relative_from("C:\\proj\\src\\a.js", "C:\\proj", PathSeparator::Backslash).as_deref(),
            Some("src\\a.js")
        );
        // Different drives: no relative form.
        assert_eq!(
            relative_from("D:\\other\\a.js", "C:\\proj", PathSeparator::Backslash),
            None
        );
    }

    #[test]
    fn round_trip_recovers_the_absolute_path() {
        for (path, base) in [
            ("/root/src/index.js", "/root"),
            ("/opt/lib/x.js", "/root/app"),
            ("/root/node_modules/foo/i.js", "/root"),
        ] {
            let relative = relative_from(path, base, PathSeparator::Slash).unwrap();
            assert_eq!(resolve(base, &relative, PathSeparator::Slash), path);
        }

        let relative =
            relative_from("C:\\proj\\src\\a.js", "C:\\proj", PathSeparator::Backslash).unwrap();
        assert_eq!(
            resolve("C:\\proj", &relative, PathSeparator::Backslash),
            "C:\\proj\\src\\a.js"
        );
    }

    #[test]
    fn resolve_tolerates_dot_prefix() {
        assert_eq!(
            resolve("/root", "./src/index.js", PathSeparator::Slash),
            "/root/src/index.js"
        );
    }
}
