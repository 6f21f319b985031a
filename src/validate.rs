//! Structural checks over the generated navigation data.

use crate::anchor::{self, group_var};
use crate::nav::{Children, NavNode, SiteIndex, Table, MAX_DEPTH};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Where the problem is, e.g. `group__Activation[3]` or `NAVTREE/0/2`
    pub location: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}: {}", level, self.location, self.message)
    }
}

pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Run every structural check and return what was found.
pub fn validate(site: &SiteIndex) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    let mut seen_vars = HashSet::new();
    for table in &site.tables {
        if !seen_vars.insert(table.var()) {
            out.push(error(table.var(), "table defined more than once"));
        }
        check_table(table, &mut out);
    }

    for group in &site.empty_groups {
        out.push(warning(&group_var(group), "group has no documented functions"));
    }

    let mut visiting = Vec::new();
    for (i, node) in site.navtree.iter().enumerate() {
        check_node(site, node, &format!("NAVTREE/{}", i), 0, &mut visiting, &mut out);
    }

    out
}

fn check_table(table: &Table, out: &mut Vec<Diagnostic>) {
    match table {
        Table::Functions { var, entries, .. } => {
            if entries.is_empty() {
                out.push(warning(var, "group has no documented functions"));
            }
            let mut names = HashSet::new();
            let mut anchors = HashSet::new();
            for (i, entry) in entries.iter().enumerate() {
                let loc = format!("{}[{}]", var, i);
                if !names.insert(entry.name.as_str()) {
                    out.push(error(&loc, &format!("duplicate entry `{}`", entry.name)));
                }
                if !anchors.insert(entry.link.as_str()) {
                    out.push(error(&loc, &format!("duplicate anchor `{}`", entry.link)));
                }
            }
        }
        Table::Nodes { var, rows } => {
            if rows.is_empty() {
                out.push(warning(var, "table is empty"));
            }
        }
    }
}

fn check_node(
    site: &SiteIndex,
    node: &NavNode,
    loc: &str,
    depth: usize,
    visiting: &mut Vec<String>,
    out: &mut Vec<Diagnostic>,
) {
    if depth > MAX_DEPTH {
        out.push(error(loc, "navigation tree is too deep"));
        return;
    }
    if node.label.trim().is_empty() {
        out.push(error(loc, "empty label"));
    }
    if !anchor::is_well_formed(&node.link) {
        out.push(error(loc, &format!("malformed link `{}`", node.link)));
    }

    match &node.children {
        Children::Leaf => {}
        Children::Inline(children) => {
            if children.is_empty() {
                out.push(error(loc, "empty child list must be null"));
            }
            for (i, child) in children.iter().enumerate() {
                check_node(site, child, &format!("{}/{}", loc, i), depth + 1, visiting, out);
            }
        }
        Children::Table(var) => {
            if visiting.iter().any(|v| v == var) {
                out.push(error(
                    loc,
                    &format!("cycle through table `{}` ({})", var, visiting.join(" -> ")),
                ));
                return;
            }
            let Some(table) = site.resolve_table(var) else {
                out.push(error(loc, &format!("unknown table `{}`", var)));
                return;
            };
            visiting.push(var.clone());
            for (i, child) in table.rows().iter().enumerate() {
                check_node(site, child, &format!("{}[{}]", var, i), depth + 1, visiting, out);
            }
            visiting.pop();
        }
    }
}

fn error(loc: &str, msg: &str) -> Diagnostic {
    Diagnostic {
        severity: Severity::Error,
        location: loc.to_string(),
        message: msg.to_string(),
    }
}

fn warning(loc: &str, msg: &str) -> Diagnostic {
    Diagnostic {
        severity: Severity::Warning,
        location: loc.to_string(),
        message: msg.to_string(),
    }
}
