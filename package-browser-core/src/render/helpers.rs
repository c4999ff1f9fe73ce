//! Helper filters and functions available to every template
//!
//! The minijinja-contrib library (string, collection and date helpers plus
//! Python-style methods such as `.upper()` or `.split()`) is installed first;
//! the path and listing helpers below are layered on top.

use minijinja::{Environment, Value};

/// Register the helper library on `env`
pub fn register(env: &mut Environment<'_>) {
    minijinja_contrib::add_to_environment(env);
    env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);

    env.add_filter("basename", basename);
    env.add_filter("dirname", dirname);
    env.add_filter("trimprefix", trimprefix);
    env.add_filter("trimsuffix", trimsuffix);
    env.add_filter("sortalpha", sortalpha);
    env.add_function("repo_count", repo_count);
}

fn basename(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed).to_string()
}

fn dirname(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => ".".to_string(),
    }
}

fn trimprefix(value: &str, prefix: &str) -> String {
    value.strip_prefix(prefix).unwrap_or(value).to_string()
}

fn trimsuffix(value: &str, suffix: &str) -> String {
    value.strip_suffix(suffix).unwrap_or(value).to_string()
}

fn sortalpha(mut values: Vec<String>) -> Vec<String> {
    values.sort();
    values
}

/// Number of repositories in a `Packages` mapping
fn repo_count(packages: Value) -> usize {
    packages.len().unwrap_or(0)
}
