//! Doxygen-compatible page names and member anchors.
//!
//! Page names follow Doxygen's `escapeCharsInString()` so links such as
//! `group__Activation.html` or `structriscv__nn__lstm__params.html` line up
//! with the pages the HTML generator writes.

use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;

static RE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+\.html(?:#[A-Za-z][A-Za-z0-9_\-]*)?$").unwrap()
});

/// Escape a compound name the way Doxygen does for output file names.
pub fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() * 2);
    for c in name.chars() {
        match c {
            '_' => out.push_str("__"),
            _ => match escape_char(c) {
                Some(rep) => out.push_str(rep),
                None => out.push(c),
            },
        }
    }
    out
}

/// Replacement for a character that cannot appear in an output file name.
fn escape_char(c: char) -> Option<&'static str> {
    let rep = match c {
        ':' => "_1",
        '/' => "_2",
        '<' => "_3",
        '>' => "_4",
        '*' => "_5",
        '&' => "_6",
        '|' => "_7",
        '.' => "_8",
        '!' => "_9",
        ',' => "_00",
        ' ' => "_01",
        '{' => "_02",
        '}' => "_03",
        '?' => "_04",
        '^' => "_05",
        '%' => "_06",
        '(' => "_07",
        ')' => "_08",
        '+' => "_09",
        '=' => "_0a",
        '$' => "_0b",
        '\\' => "_0c",
        '@' => "_0d",
        ']' => "_0e",
        '[' => "_0f",
        '#' => "_0g",
        '"' => "_0h",
        '~' => "_0i",
        '\'' => "_0j",
        ';' => "_0k",
        '`' => "_0l",
        _ => return None,
    };
    Some(rep)
}

/// Table/variable name of a group, e.g. `group__Activation`.
pub fn group_var(name: &str) -> String {
    format!("group__{}", escape_name(name))
}

pub fn group_file(name: &str) -> String {
    format!("{}.html", group_var(name))
}

/// Table/variable name of a data structure, e.g. `structriscv__nn__scaling`.
pub fn struct_var(name: &str) -> String {
    format!("struct{}", escape_name(name))
}

pub fn struct_file(name: &str) -> String {
    format!("{}.html", struct_var(name))
}

/// Page file of a `@section`/`@page` id. Doxygen keeps underscores in page
/// names (`copy_sec.html`), so only unsafe characters are escaped.
pub fn page_file(id: &str) -> String {
    let mut out = String::with_capacity(id.len() + 5);
    for c in id.chars() {
        match escape_char(c) {
            Some(rep) => out.push_str(rep),
            None => out.push(c),
        }
    }
    out.push_str(".html");
    out
}

/// Member anchor: `prefix` followed by 32 hex digits identifying the member.
///
/// Doxygen hashes the member declaration; the digest only has to be stable
/// and distinct per member, so the key is the member's name plus its
/// whitespace-normalized argument list.
pub fn member_anchor(prefix: &str, name: &str, args: &str) -> String {
    let args: String = args.split_whitespace().collect();
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(args.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}{}", prefix, &digest[..32])
}

/// Full link to a group member, e.g. `group__Activation.html#ga…`.
pub fn group_member_link(group: &str, name: &str, args: &str) -> String {
    format!("{}#{}", group_file(group), member_anchor("ga", name, args))
}

/// Full link to a struct field.
pub fn field_link(structure: &str, field: &str) -> String {
    format!(
        "{}#{}",
        struct_file(structure),
        member_anchor("a", &format!("{}::{}", structure, field), "")
    )
}

/// A link is `page.html` or `page.html#anchor` with file-name-safe characters.
pub fn is_well_formed(link: &str) -> bool {
    RE_LINK.is_match(link)
}
