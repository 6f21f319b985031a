//! Cross-file merge: combine per-file documents into one Project.
//!
//! A kernel is usually declared and documented in a header and defined in a
//! `.c` file, and a group can be opened in one header and extended with
//! `@addtogroup` elsewhere. This module folds those pieces together.

use crate::model::*;
use std::collections::HashMap;

/// Merge parsed documents into a single project.
///
/// Groups and functions keep the order in which they were first seen.
pub fn merge(docs: Vec<Document>, title: &str) -> Project {
    let mut project = Project {
        title: title.to_string(),
        ..Default::default()
    };

    let mut groups: Vec<Group> = Vec::new();
    let mut func_map: HashMap<String, FunctionDoc> = HashMap::new();
    let mut func_order: Vec<String> = Vec::new();

    for doc in docs {
        for page in doc.pages {
            if page.id == "index" {
                if project.main_page.is_none() {
                    project.main_page = Some(page);
                }
            } else if !project.pages.iter().any(|p| p.id == page.id) {
                project.pages.push(page);
            }
        }

        for group in doc.groups {
            match groups.iter_mut().find(|g| g.name == group.name) {
                Some(existing) => merge_group(existing, group),
                None => groups.push(group),
            }
        }

        for func in doc.functions {
            if let Some(existing) = func_map.get_mut(&func.name) {
                merge_function(existing, func);
            } else {
                func_order.push(func.name.clone());
                func_map.insert(func.name.clone(), func);
            }
        }

        for st in doc.structs {
            if !project.structs.iter().any(|s| s.name == st.name) {
                project.structs.push(st);
            }
        }
    }

    // Preserve insertion order while distributing into groups
    for name in func_order {
        let Some(func) = func_map.remove(&name) else {
            continue;
        };
        match func.group.clone() {
            Some(group_name) => {
                let idx = match groups.iter().position(|g| g.name == group_name) {
                    Some(i) => i,
                    None => {
                        groups.push(Group {
                            name: group_name.clone(),
                            title: group_name,
                            ..Default::default()
                        });
                        groups.len() - 1
                    }
                };
                groups[idx].functions.push(func);
            }
            None => project.ungrouped.push(func),
        }
    }

    project.groups = groups;
    project
}

/// Fold a second sighting of a group into the first.
/// A `@defgroup` outranks titles that came from `@addtogroup`.
fn merge_group(existing: &mut Group, incoming: Group) {
    if existing.defined_in.is_none() && incoming.defined_in.is_some() {
        existing.title = incoming.title;
        existing.defined_in = incoming.defined_in;
        if incoming.brief.is_some() {
            existing.brief = incoming.brief;
        }
        return;
    }
    if existing.title.is_empty() {
        existing.title = incoming.title;
    }
    if existing.brief.is_none() {
        existing.brief = incoming.brief;
    }
}

/// Header declarations carry the reference documentation; a definition only
/// replaces it when the header had none worth keeping.
fn merge_function(existing: &mut FunctionDoc, incoming: FunctionDoc) {
    let replace = if is_header(&existing.sources) == is_header(&incoming.sources) {
        incoming.is_richer_than(existing)
    } else {
        is_header(&incoming.sources) || !existing.is_richer_than(&FunctionDoc::default())
    };

    let mut sources = existing.sources.clone();
    for src in &incoming.sources {
        if !sources.contains(src) {
            sources.push(src.clone());
        }
    }
    let group = existing.group.clone().or_else(|| incoming.group.clone());

    if replace {
        *existing = incoming;
    }
    existing.sources = sources;
    existing.group = group;
}

fn is_header(sources: &[String]) -> bool {
    sources
        .first()
        .is_some_and(|s| s.ends_with(".h") || s.ends_with(".hpp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, source: &str, brief: Option<&str>, group: Option<&str>) -> FunctionDoc {
        FunctionDoc {
            name: name.to_string(),
            brief: brief.map(str::to_string),
            group: group.map(str::to_string),
            sources: vec![source.to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn merge_single_doc() {
        let doc = Document {
            groups: vec![Group {
                name: "Activation".to_string(),
                title: "Activation Functions".to_string(),
                defined_in: Some("act.h".to_string()),
                ..Default::default()
            }],
            functions: vec![func("relu_s8", "act.h", Some("Relu"), Some("Activation"))],
            ..Default::default()
        };

        let project = merge(vec![doc], "Manual");
        assert_eq!(project.title, "Manual");
        assert_eq!(project.groups.len(), 1);
        assert_eq!(project.groups[0].functions.len(), 1);
        assert!(project.ungrouped.is_empty());
    }

    #[test]
    fn merge_header_and_source() {
        let header = Document {
            functions: vec![func("relu_s8", "Include/act.h", Some("From header"), Some("Activation"))],
            ..Default::default()
        };
        let source = Document {
            functions: vec![FunctionDoc {
                params: vec![ParamDoc {
                    name: "x".into(),
                    direction: Direction::In,
                    text: String::new(),
                }],
                ..func("relu_s8", "Source/relu.c", Some("From source"), None)
            }],
            ..Default::default()
        };

        let project = merge(vec![source, header], "Manual");
        let funcs = &project.groups[0].functions;
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].brief.as_deref(), Some("From header"));
        assert_eq!(funcs[0].sources, ["Source/relu.c", "Include/act.h"]);
        assert_eq!(funcs[0].group.as_deref(), Some("Activation"));
    }

    #[test]
    fn defgroup_title_wins_over_addtogroup() {
        let extend = Document {
            groups: vec![Group {
                name: "Util".to_string(),
                title: "Util".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let define = Document {
            groups: vec![Group {
                name: "Util".to_string(),
                title: "Util Functions".to_string(),
                brief: Some("Helpers".to_string()),
                defined_in: Some("util.h".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let project = merge(vec![extend, define], "Manual");
        assert_eq!(project.groups.len(), 1);
        assert_eq!(project.groups[0].title, "Util Functions");
        assert_eq!(project.groups[0].brief.as_deref(), Some("Helpers"));
    }

    #[test]
    fn unknown_group_is_created_and_orphans_kept() {
        let doc = Document {
            functions: vec![
                func("a", "a.h", Some("A"), Some("Misc")),
                func("b", "a.h", Some("B"), None),
            ],
            ..Default::default()
        };
        let project = merge(vec![doc], "Manual");
        assert_eq!(project.groups[0].name, "Misc");
        assert_eq!(project.groups[0].title, "Misc");
        assert_eq!(project.ungrouped.len(), 1);
        assert_eq!(project.ungrouped[0].name, "b");
    }

    #[test]
    fn first_main_page_wins_and_sections_dedup() {
        let page = |id: &str, title: &str| Page {
            id: id.to_string(),
            title: title.to_string(),
        };
        let a = Document {
            pages: vec![page("index", "First"), page("ov_sec", "Overview")],
            ..Default::default()
        };
        let b = Document {
            pages: vec![page("index", "Second"), page("ov_sec", "Overview again")],
            ..Default::default()
        };
        let project = merge(vec![a, b], "Manual");
        assert_eq!(project.main_page.unwrap().title, "First");
        assert_eq!(project.pages.len(), 1);
        assert_eq!(project.pages[0].title, "Overview");
    }
}
