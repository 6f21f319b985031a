//! Markdown output: a nested bullet table of contents with briefs.

use crate::anchor;
use crate::model::*;
use crate::nav::*;
use crate::render::{RenderedFile, Renderer};
use std::collections::HashMap;

pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, project: &Project, site: &SiteIndex) -> Vec<RenderedFile> {
        let mut out = format!("# {}\n\n", project.title);

        // Briefs keyed by link, so tree rows can carry a short description
        let mut briefs: HashMap<String, String> = HashMap::new();
        for group in &project.groups {
            if let Some(ref brief) = group.brief {
                briefs.insert(anchor::group_file(&group.name), brief.clone());
            }
            for func in &group.functions {
                if let Some(ref brief) = func.brief {
                    let link = anchor::group_member_link(&group.name, &func.name, func.args_string());
                    briefs.insert(link, brief.clone());
                }
            }
        }
        for st in &project.structs {
            if let Some(ref brief) = st.brief {
                briefs.insert(anchor::struct_file(&st.name), brief.clone());
            }
        }

        let mut visiting = Vec::new();
        for root in &site.navtree {
            let rows = match &root.children {
                Children::Inline(children) => children.clone(),
                Children::Table(var) => site.resolve_table(var).map(Table::rows).unwrap_or_default(),
                Children::Leaf => Vec::new(),
            };
            for node in &rows {
                render_node(site, node, 0, &briefs, &mut visiting, &mut out);
            }
        }

        vec![RenderedFile {
            name: "index.md".to_string(),
            content: out,
        }]
    }
}

fn render_node(
    site: &SiteIndex,
    node: &NavNode,
    depth: usize,
    briefs: &HashMap<String, String>,
    visiting: &mut Vec<String>,
    out: &mut String,
) {
    if depth > MAX_DEPTH {
        return;
    }
    out.push_str(&"  ".repeat(depth));
    out.push_str(&format!("* [{}]({})", escape(&node.label), node.link));
    if let Some(brief) = briefs.get(&node.link) {
        out.push_str(&format!(": {}", escape(brief)));
    }
    out.push('\n');

    let children = match &node.children {
        Children::Leaf => return,
        Children::Inline(children) => children.clone(),
        Children::Table(var) => {
            if visiting.contains(var) {
                return;
            }
            visiting.push(var.clone());
            let rows = site.resolve_table(var).map(Table::rows).unwrap_or_default();
            for child in &rows {
                render_node(site, child, depth + 1, briefs, visiting, out);
            }
            visiting.pop();
            return;
        }
    };
    for child in &children {
        render_node(site, child, depth + 1, briefs, visiting, out);
    }
}

fn escape(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn nested_toc_with_briefs() {
        let project = Project {
            title: "Manual".to_string(),
            pages: vec![Page {
                id: "ov_sec".to_string(),
                title: "Overview".to_string(),
            }],
            groups: vec![Group {
                name: "Pooling".to_string(),
                title: "Pooling Functions".to_string(),
                brief: Some("Down-sampling.".to_string()),
                functions: vec![FunctionDoc {
                    name: "maxpool_s8".to_string(),
                    brief: Some("Max pooling.".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let site = SiteIndex::build(&project, &Config::default());
        let out = &MarkdownRenderer.render(&project, &site)[0].content;

        assert!(out.starts_with("# Manual\n\n* [Overview](ov_sec.html)\n"));
        assert!(out.contains("* [Descriptions of Functions](modules.html)\n"));
        assert!(out.contains("  * [Pooling Functions](group__Pooling.html): Down-sampling.\n"));
        assert!(out.contains("    * [maxpool_s8](group__Pooling.html#ga"));
        assert!(out.contains("): Max pooling.\n"));
    }
}
