//! # Name/Path Resolver
//!
//! Derives the canonical identifiers of a project (crate name, package
//! namespace, output directory and route prefix) from [`ProjectOptions`].
//!
//! [`resolve`] is pure and total: invalid characters are replaced rather than
//! rejected, so naming alone never blocks generation. Structural checks (for
//! example Rust keywords inside the package namespace) happen later in the
//! model builder.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::{ProjectConfiguration, ProjectOptions, DEFAULT_PROJECT_VERSION};

/// Rust keywords that cannot be used as plain identifiers.
pub const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use",
    "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final",
    "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Resolve user options into the configuration of one run.
pub fn resolve(options: &ProjectOptions) -> ProjectConfiguration {
    let project_name = options.project_name.trim().to_string();
    let crate_name = crate_name_for(&project_name);
    let package_name = match options.package_name.as_deref().map(str::trim) {
        Some(explicit) if !explicit.is_empty() => sanitize_package_name(explicit),
        _ => format!("com.{crate_name}"),
    };
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&crate_name));

    ProjectConfiguration {
        context_path: resolve_context_path(options.context_path.as_deref(), &project_name),
        project_name,
        crate_name,
        package_name,
        output_dir,
        address_length: options.address_length,
        generate_swagger: options.generate_swagger.unwrap_or(true),
        version: options
            .version
            .clone()
            .unwrap_or_else(|| DEFAULT_PROJECT_VERSION.to_string()),
        dependencies: options.dependencies.clone(),
    }
}

/// `contextPath` rule: the explicit value with trailing `/` stripped, else the
/// project name. Leading and repeated separators are dropped and characters
/// that are not URL-path safe become `_`; a value that ends up empty falls
/// back to the project name as well.
pub fn resolve_context_path(explicit: Option<&str>, project_name: &str) -> String {
    let cleaned = explicit.map(clean_route_path).unwrap_or_default();
    if cleaned.is_empty() {
        clean_route_path(project_name)
    } else {
        cleaned
    }
}

/// Normalise a route fragment: drop empty segments, replace characters that
/// are not URL-path safe with `_`.
pub fn clean_route_path(raw: &str) -> String {
    raw.trim()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Cargo package name derived from the project name (`[a-z0-9_]`, not
/// starting with a digit).
pub fn crate_name_for(project_name: &str) -> String {
    let snake = to_snake_case(project_name);
    if snake.is_empty() {
        "contract_api".to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("project_{snake}")
    } else {
        snake
    }
}

/// Lower-case a dotted namespace and replace characters outside
/// `[a-z0-9_.]` with `_`.
pub fn sanitize_package_name(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Convert a snake_case string to CamelCase
///
/// # Example
///
/// ```rust,ignore
/// assert_eq!(to_camel_case("user_profile"), "UserProfile");
/// ```
pub fn to_camel_case(s: &str) -> String {
    s.split(|c: char| c == '_' || !c.is_ascii_alphanumeric())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Convert camelCase / PascalCase / mixed input to snake_case.
///
/// Acronyms stay together: `tokenURI` → `token_uri`, `ERC20Token` →
/// `erc20_token`.
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Escape Rust keywords with a raw identifier prefix.
pub fn sanitize_rust_identifier(name: &str) -> String {
    if matches!(name, "self" | "Self" | "super" | "crate") {
        format!("{name}_")
    } else if RUST_KEYWORDS.contains(&name) {
        format!("r#{name}")
    } else {
        name.to_string()
    }
}

/// Snake-case field name that is a valid Rust identifier.
pub fn sanitize_field_name(name: &str) -> String {
    let mut s = to_snake_case(name);
    if s.is_empty() {
        s = "field".to_string();
    }
    if s.chars()
        .next()
        .map(|c| c.is_ascii_digit())
        .unwrap_or(false)
    {
        s.insert(0, '_');
    }
    sanitize_rust_identifier(&s)
}

/// Module / function identifier: snake_case, never a keyword, never starting
/// with a digit, falling back to `fallback` when nothing usable is left.
pub fn module_ident(name: &str, fallback: &str) -> String {
    let snake = to_snake_case(name);
    if snake.is_empty() {
        fallback.to_string()
    } else if snake.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{fallback}_{snake}")
    } else if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("{snake}_")
    } else {
        snake
    }
}

/// CamelCase variant of [`unique_name`]: `Name`, then `Name1`, `Name2`, …
pub(crate) fn unique_type_name(seen: &mut HashSet<String>, name: &str) -> String {
    let mut candidate = name.to_string();
    let mut counter = 1;
    while seen.contains(&candidate) {
        candidate = format!("{name}{counter}");
        counter += 1;
    }
    if counter > 1 {
        tracing::warn!(name, candidate = %candidate, "duplicate generated type name");
    }
    seen.insert(candidate.clone());
    candidate
}

/// Return `name`, or `name_1`, `name_2`, … if it was already taken.
pub(crate) fn unique_name(seen: &mut HashSet<String>, name: &str) -> String {
    if !seen.contains(name) {
        seen.insert(name.to_string());
        return name.to_string();
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{name}_{counter}");
        if !seen.contains(&candidate) {
            tracing::warn!(name, candidate = %candidate, "duplicate generated name");
            seen.insert(candidate.clone());
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_path_defaults_to_project_name() {
        let cfg = resolve(&ProjectOptions::new("Token"));
        assert_eq!(cfg.context_path, "Token");
    }

    #[test]
    fn test_context_path_strips_trailing_separator() {
        assert_eq!(resolve_context_path(Some("api/"), "Token"), "api");
        assert_eq!(resolve_context_path(Some("/api//v1///"), "Token"), "api/v1");
        assert_eq!(resolve_context_path(Some("/"), "Token"), "Token");
        assert_eq!(resolve_context_path(Some("my api"), "Token"), "my_api");
    }

    #[test]
    fn test_package_and_output_defaults() {
        let cfg = resolve(&ProjectOptions::new("My Token"));
        assert_eq!(cfg.crate_name, "my_token");
        assert_eq!(cfg.package_name, "com.my_token");
        assert_eq!(cfg.output_dir, PathBuf::from("my_token"));
        assert!(cfg.generate_swagger);
        assert_eq!(cfg.version, "0.1.0");
    }

    #[test]
    fn test_explicit_values_pass_through_sanitized() {
        let opts = ProjectOptions {
            project_name: "Token".to_string(),
            package_name: Some("Com.Example-Org.token".to_string()),
            output_dir: Some(PathBuf::from("/tmp/out")),
            address_length: Some(32),
            generate_swagger: Some(false),
            ..ProjectOptions::default()
        };
        let cfg = resolve(&opts);
        assert_eq!(cfg.package_name, "com.example_org.token");
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.address_length, Some(32));
        assert!(!cfg.generate_swagger);
    }

    #[test]
    fn test_resolve_is_total_on_hostile_input() {
        let cfg = resolve(&ProjectOptions::new("  42 ¡¿  "));
        assert_eq!(cfg.crate_name, "project_42");
        let cfg = resolve(&ProjectOptions::new(""));
        assert_eq!(cfg.crate_name, "contract_api");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("balanceOf"), "balance_of");
        assert_eq!(to_snake_case("tokenURI"), "token_uri");
        assert_eq!(to_snake_case("ERC20Token"), "erc20_token");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("DOMAIN_SEPARATOR"), "domain_separator");
        assert_eq!(to_snake_case("_owner"), "owner");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("hello_world"), "HelloWorld");
        assert_eq!(to_camel_case("balanceOf"), "BalanceOf");
        assert_eq!(to_camel_case("_leading_underscore"), "LeadingUnderscore");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_sanitize_field_name() {
        assert_eq!(sanitize_field_name("type"), "r#type");
        assert_eq!(sanitize_field_name("self"), "self_");
        assert_eq!(sanitize_field_name("2nd"), "_2nd");
        assert_eq!(sanitize_field_name(""), "field");
        assert_eq!(sanitize_field_name("_spender"), "spender");
    }

    #[test]
    fn test_module_ident() {
        assert_eq!(module_ident("ERC20Token", "contract"), "erc20_token");
        assert_eq!(module_ident("type", "contract"), "type_");
        assert_eq!(module_ident("1inch", "contract"), "contract_1inch");
        assert_eq!(module_ident("$$", "contract"), "contract");
    }

    #[test]
    fn test_unique_name() {
        let mut seen = HashSet::new();
        assert_eq!(unique_name(&mut seen, "foo"), "foo");
        assert_eq!(unique_name(&mut seen, "foo"), "foo_1");
        assert_eq!(unique_name(&mut seen, "foo"), "foo_2");
    }

    #[test]
    fn test_unique_type_name_keeps_camel_case() {
        let mut seen = HashSet::new();
        assert_eq!(unique_type_name(&mut seen, "FooBar1"), "FooBar1");
        assert_eq!(unique_type_name(&mut seen, "FooBar1"), "FooBar11");
        assert_eq!(unique_type_name(&mut seen, "FooBar1"), "FooBar12");
    }
}
