//! Slug helpers for task folder names.
//!
//! A slug is lowercase ASCII letters, digits and hyphens. Task folders are
//! `{order:02}-{slug}` so a plain directory listing sorts in execution order.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn disallowed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9-]").expect("static regex"))
}

/// Lowercase, turn each whitespace run into one `-`, then drop anything
/// outside `[a-z0-9-]`. Idempotent.
pub fn slugify_task_name(name: &str) -> String {
    let lower = name.to_lowercase();
    let hyphenated = whitespace_re().replace_all(&lower, "-");
    disallowed_re().replace_all(&hyphenated, "").into_owned()
}

/// `derive_task_folder(1, "Build UI")` → `"01-build-ui"`.
///
/// The order is padded to at least two digits; wider orders are kept whole.
pub fn derive_task_folder(order: u32, name_or_slug: &str) -> String {
    format!("{:02}-{}", order, slugify_task_name(name_or_slug))
}

/// Split a task folder back into `(order, slug)`. Returns `None` when the
/// folder does not start with a numeric prefix followed by `-`.
pub fn parse_task_folder(folder: &str) -> Option<(u32, &str)> {
    let (order, slug) = folder.split_once('-')?;
    if order.is_empty() || !order.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((order.parse().ok()?, slug))
}
