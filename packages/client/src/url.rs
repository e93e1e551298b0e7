//! URL resolution for logical cluster hosts.

/// Build an absolute URL from a logical host and path.
///
/// Appends `:<default_port>` unless the host already carries an explicit
/// port, and guarantees the path begins with `/`. Cluster services speak
/// plain HTTP.
pub fn resolve_url(host: &str, path: &str, default_port: u16) -> String {
    let port = if has_explicit_port(host) {
        String::new()
    } else {
        format!(":{default_port}")
    };
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    format!("http://{host}{port}{path}")
}

/// A host carries an explicit port when a `:` is followed by a digit.
fn has_explicit_port(host: &str) -> bool {
    host.as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b':' && pair[1].is_ascii_digit())
}
