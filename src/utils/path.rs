/// Lexically cleans a slash-separated path: duplicate slashes, `.` and
/// `..` segments are resolved and trailing slashes dropped.
/// `..` never climbs above the root of an absolute path.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                let last = parts.last().copied();
                match last {
                    Some(last) if last != ".." => {
                        parts.pop();
                    }
                    // Relative paths keep leading ..
                    _ if !rooted => parts.push(".."),
                    _ => {}
                }
            }
            _ => parts.push(segment),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

pub fn is_canonical(path: &str) -> bool {
    clean(path) == path
}

/// Splits an absolute path into its components, ignoring empty segments
pub fn components(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
