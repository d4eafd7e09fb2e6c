//! Logical path normalization and serving path construction.

use super::hash::Token;
use crate::utils::path::split_dir;

/// Reduce a configured public prefix to its bare form.
///
/// `"/public/"` → `"public"`, `"/static/v1"` → `"static/v1"`
pub fn normalize_prefix(prefix: &str) -> String {
    prefix.trim_matches('/').to_string()
}

/// Strip leading slashes and one leading prefix segment.
///
/// `"main.js"`, `"/main.js"`, `"public/main.js"` and `"/public/main.js"`
/// all normalize to `"main.js"` when the prefix is `"public"`. A name that
/// merely starts with the prefix (`"publicity.js"`) is left alone.
pub fn normalize<'a>(path: &'a str, prefix: &str) -> &'a str {
    let path = path.trim_start_matches('/');
    if prefix.is_empty() {
        return path;
    }
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(path)
}

/// Build `/<prefix>/<dir>/<token>-<basename>` for a normalized logical path.
pub fn serving_path(prefix: &str, logical: &str, token: Token) -> String {
    let (dir, base) = split_dir(logical);
    let mut out = String::with_capacity(prefix.len() + logical.len() + 20);
    out.push('/');
    if !prefix.is_empty() {
        out.push_str(prefix);
        out.push('/');
    }
    if !dir.is_empty() {
        out.push_str(dir);
        out.push('/');
    }
    out.push_str(&token.to_hex());
    out.push('-');
    out.push_str(base);
    out
}

/// Split a prefix-relative fingerprinted path back into its logical path
/// and token.
///
/// `"js/3f9a0c2e71b4d5e8-main.js"` → `("js/main.js", token)`. Returns `None`
/// when the base name does not start with a well-formed token.
pub fn parse_fingerprinted(path: &str) -> Option<(String, Token)> {
    let (dir, base) = split_dir(path);
    let (head, name) = base.split_once('-')?;
    if name.is_empty() {
        return None;
    }
    let token = Token::parse(head)?;
    let logical = if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    };
    Some((logical, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::hash;

    #[test]
    fn test_normalize_variants() {
        for input in ["main.js", "/main.js", "public/main.js", "/public/main.js"] {
            assert_eq!(normalize(input, "public"), "main.js", "input: {input}");
        }
        assert_eq!(normalize("/public/js/app.js", "public"), "js/app.js");
    }

    #[test]
    fn test_normalize_keeps_lookalikes() {
        assert_eq!(normalize("publicity.js", "public"), "publicity.js");
        assert_eq!(normalize("js/public/app.js", "public"), "js/public/app.js");
        assert_eq!(normalize("/main.js", ""), "main.js");
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/public/"), "public");
        assert_eq!(normalize_prefix("static/v1"), "static/v1");
        assert_eq!(normalize_prefix("/"), "");
    }

    #[test]
    fn test_serving_path_layout() {
        let token = hash(b"AAA");
        assert_eq!(
            serving_path("public", "main.js", token),
            format!("/public/{token}-main.js")
        );
        assert_eq!(
            serving_path("public", "other/main.js", token),
            format!("/public/other/{token}-main.js")
        );
        assert_eq!(serving_path("", "main.js", token), format!("/{token}-main.js"));
    }

    #[test]
    fn test_parse_fingerprinted() {
        let token = hash(b"AAA");
        let (logical, parsed) = parse_fingerprinted(&format!("other/{token}-main.js")).unwrap();
        assert_eq!(logical, "other/main.js");
        assert_eq!(parsed, token);

        // Dashes inside the base name survive.
        let (logical, _) = parse_fingerprinted(&format!("{token}-chart-lib.js")).unwrap();
        assert_eq!(logical, "chart-lib.js");
    }

    #[test]
    fn test_parse_plain_names() {
        assert_eq!(parse_fingerprinted("main.js"), None);
        assert_eq!(parse_fingerprinted("chart-lib.js"), None);
        assert_eq!(parse_fingerprinted(&format!("{}-", hash(b"AAA"))), None);
    }
}
