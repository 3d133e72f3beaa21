use std::env;
use std::fs;
use std::path::Path;

/// Settings read by `AppConfig::from_env` through `option_env!`.
const CONFIG_KEYS: &[&str] = &[
    "ENVIRONMENT",
    "BACKEND_URL_DEVELOPMENT",
    "BACKEND_URL_PRODUCTION",
    "ENABLE_LOGGING",
    "CART_PAGE_SIZE",
    "CATALOG_PAGE_SIZE",
    "USERS_PAGE_SIZE",
    "FEATURED_REFRESH_MS",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.env");
    for key in CONFIG_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
    }

    let Ok(contents) = fs::read_to_string(Path::new(".env")) else {
        println!("cargo:warning=No .env found, using built-in FarmMart defaults (see .env.example)");
        return;
    };

    for (key, value) in contents.lines().filter_map(parse_line) {
        if !CONFIG_KEYS.contains(&key) {
            println!("cargo:warning=.env: ignoring unknown setting {}", key);
            continue;
        }
        // The real environment overrides .env
        if env::var_os(key).is_none() {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
}

/// `KEY=value`, optionally prefixed with `export`. Quoted values keep
/// their content as is; unquoted ones drop a trailing `# comment`.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, raw) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, unquote(raw.trim())))
}

fn unquote(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote)) {
            return inner;
        }
    }
    match raw.split_once(" #") {
        Some((value, _)) => value.trim_end(),
        None => raw,
    }
}
