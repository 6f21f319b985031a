//! Doxygen navigation data files, the `var X = [...]` scripts loaded by
//! the HTML viewer's sidebar (`navtreedata.js`, `modules.js`,
//! `group__*.js`, `navtreeindexN.js`).

use crate::model::Project;
use crate::nav::*;
use crate::render::{RenderedFile, Renderer};

pub struct JsRenderer;

const LICENSE_BANNER: &str = "/*
@licstart  The following is the entire license notice for the
JavaScript code in this file.

This file was generated by navdoc and contains navigation data only.

@licend  The above is the entire license notice
for the JavaScript code in this file
*/
";

impl Renderer for JsRenderer {
    fn render(&self, _project: &Project, site: &SiteIndex) -> Vec<RenderedFile> {
        let mut files = vec![RenderedFile {
            name: "navtreedata.js".to_string(),
            content: render_navtreedata(site),
        }];

        for table in &site.tables {
            files.push(RenderedFile {
                name: format!("{}.js", table.var()),
                content: render_table(table),
            });
        }

        for page in &site.index_pages {
            files.push(RenderedFile {
                name: format!("{}.js", page.var.to_lowercase()),
                content: render_index_page(page),
            });
        }

        files
    }
}

fn render_navtreedata(site: &SiteIndex) -> String {
    let mut out = String::new();
    if site.license_banner {
        out.push_str(LICENSE_BANNER);
    }

    out.push_str("var NAVTREE =\n[\n");
    let rows: Vec<String> = site.navtree.iter().map(|n| render_node(n, 2)).collect();
    out.push_str(&rows.join(",\n"));
    out.push_str("\n];\n\n");

    out.push_str("var NAVTREEINDEX =\n[\n");
    let keys: Vec<String> = site.navtree_index.iter().map(|k| js_string(k)).collect();
    out.push_str(&keys.join(",\n"));
    out.push_str("\n];\n\n");

    out.push_str(&format!("var SYNCONMSG = {};\n", js_single(&site.sync_on_message)));
    out.push_str(&format!("var SYNCOFFMSG = {};\n", js_single(&site.sync_off_message)));
    out
}

/// `var group__X =` table with four-space rows.
fn render_table(table: &Table) -> String {
    let rows: Vec<String> = table.rows().iter().map(|n| render_node(n, 4)).collect();
    format!("var {} =\n[\n{}\n];\n", table.var(), rows.join(",\n"))
}

fn render_index_page(page: &IndexPage) -> String {
    let rows: Vec<String> = page
        .entries
        .iter()
        .map(|(link, path)| {
            let path: Vec<String> = path.iter().map(|i| i.to_string()).collect();
            format!("{}:[{}]", js_string(link), path.join(","))
        })
        .collect();
    format!("var {} =\n{{\n{}\n}};\n", page.var, rows.join(",\n"))
}

/// `[ "label", "link", children ]`; inline children nest two spaces deeper.
fn render_node(node: &NavNode, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let head = format!("{}[ {}, {}, ", pad, js_string(&node.label), js_string(&node.link));
    match &node.children {
        Children::Leaf => format!("{}null ]", head),
        Children::Table(var) => format!("{}{} ]", head, js_string(var)),
        Children::Inline(children) => {
            let rows: Vec<String> = children.iter().map(|c| render_node(c, indent + 2)).collect();
            format!("{}[\n{}\n{}] ]", head, rows.join(",\n"), pad)
        }
    }
}

/// Double-quoted JS string literal. JSON leaves U+2028/U+2029 raw, which
/// older script engines reject inside string literals.
fn js_string(s: &str) -> String {
    serde_json::to_string(s)
        .unwrap_or_else(|_| "\"\"".to_string())
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

/// Single-quoted JS string literal, as Doxygen writes the sync messages.
fn js_single(s: &str) -> String {
    let quoted = js_string(s);
    let inner = &quoted[1..quoted.len() - 1];
    let mut out = String::with_capacity(inner.len() + 2);
    out.push('\'');
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('"') => out.push('"'),
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => {}
            },
            '\'' => out.push_str("\\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteIndex {
        SiteIndex {
            navtree: vec![NavNode::inline(
                "Manual",
                "index.html",
                vec![
                    NavNode::leaf("Overview", "ov_sec.html"),
                    NavNode::table("Descriptions of Functions", "modules.html", "modules"),
                ],
            )],
            tables: vec![
                Table::Nodes {
                    var: "modules".to_string(),
                    rows: vec![NavNode::table(
                        "Activation Functions",
                        "group__Activation.html",
                        "group__Activation",
                    )],
                },
                Table::Functions {
                    var: "group__Activation".to_string(),
                    group: "Activation".to_string(),
                    entries: vec![FunctionEntry {
                        name: "relu_s8".to_string(),
                        link: "group__Activation.html#ga01".to_string(),
                    }],
                },
            ],
            index_pages: vec![IndexPage {
                var: "NAVTREEINDEX0".to_string(),
                entries: vec![
                    ("index.html".to_string(), vec![]),
                    ("ov_sec.html".to_string(), vec![0]),
                ],
            }],
            navtree_index: vec!["index.html".to_string(), "ov_sec.html".to_string()],
            empty_groups: Vec::new(),
            sync_on_message: "click to disable panel synchronisation".to_string(),
            sync_off_message: "click to enable panel synchronisation".to_string(),
            license_banner: false,
        }
    }

    #[test]
    fn navtreedata_layout() {
        let out = render_navtreedata(&site());
        let expected = r#"var NAVTREE =
[
  [ "Manual", "index.html", [
    [ "Overview", "ov_sec.html", null ],
    [ "Descriptions of Functions", "modules.html", "modules" ]
  ] ]
];

var NAVTREEINDEX =
[
"index.html",
"ov_sec.html"
];

var SYNCONMSG = 'click to disable panel synchronisation';
var SYNCOFFMSG = 'click to enable panel synchronisation';
"#;
        assert_eq!(out, expected);
    }

    #[test]
    fn banner_is_optional() {
        let mut s = site();
        s.license_banner = true;
        let out = render_navtreedata(&s);
        assert!(out.starts_with("/*\n@licstart"));
        assert!(out.contains("*/\nvar NAVTREE ="));
    }

    #[test]
    fn group_table_layout() {
        let s = site();
        let out = render_table(s.resolve_table("group__Activation").unwrap());
        assert_eq!(
            out,
            "var group__Activation =\n[\n    [ \"relu_s8\", \"group__Activation.html#ga01\", null ]\n];\n"
        );
    }

    #[test]
    fn modules_table_references_group() {
        let s = site();
        let out = render_table(s.resolve_table("modules").unwrap());
        assert!(out.contains(
            "[ \"Activation Functions\", \"group__Activation.html\", \"group__Activation\" ]"
        ));
    }

    #[test]
    fn index_page_layout() {
        let s = site();
        let out = render_index_page(&s.index_pages[0]);
        assert_eq!(
            out,
            "var NAVTREEINDEX0 =\n{\n\"index.html\":[],\n\"ov_sec.html\":[0]\n};\n"
        );
    }

    #[test]
    fn file_names() {
        let s = site();
        let project = Project::default();
        let names: Vec<_> = JsRenderer
            .render(&project, &s)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(
            names,
            ["navtreedata.js", "modules.js", "group__Activation.js", "navtreeindex0.js"]
        );
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(js_string("a \"b\""), "\"a \\\"b\\\"\"");
        assert_eq!(js_single("it's"), "'it\\'s'");
        assert_eq!(js_string("A<sup>TM</sup>"), "\"A<sup>TM</sup>\"");
    }

    #[test]
    fn single_quoted_escapes_line_breaks_and_separators() {
        assert_eq!(js_single("a\r\nb"), "'a\\r\\nb'");
        assert_eq!(js_single("x\u{2028}y\u{2029}"), "'x\\u2028y\\u2029'");
        assert_eq!(js_single("say \"hi\""), "'say \"hi\"'");
        assert_eq!(js_single("back\\slash\ttab"), "'back\\\\slash\\ttab'");
        assert_eq!(js_string("p\u{2028}"), "\"p\\u2028\"");
    }
}
