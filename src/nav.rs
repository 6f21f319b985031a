//! Navigation data: the sidebar tree, the tables it references and the
//! link index the viewer uses to sync the sidebar with the open page.

use crate::anchor;
use crate::config::Config;
use crate::model::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Table references are followed at most this deep when indexing.
pub const MAX_DEPTH: usize = 32;

/// One row of a group table: display name and anchor link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionEntry {
    pub name: String,
    pub link: String,
}

/// Child list of a navigation node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Children {
    /// Rendered as `null`
    Leaf,
    Inline(Vec<NavNode>),
    /// Name of a separately loaded table, e.g. `"modules"`
    Table(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNode {
    pub label: String,
    pub link: String,
    pub children: Children,
}

impl NavNode {
    pub fn leaf(label: &str, link: &str) -> NavNode {
        NavNode {
            label: label.to_string(),
            link: link.to_string(),
            children: Children::Leaf,
        }
    }

    pub fn table(label: &str, link: &str, table: &str) -> NavNode {
        NavNode {
            label: label.to_string(),
            link: link.to_string(),
            children: Children::Table(table.to_string()),
        }
    }

    pub fn inline(label: &str, link: &str, children: Vec<NavNode>) -> NavNode {
        NavNode {
            label: label.to_string(),
            link: link.to_string(),
            children: if children.is_empty() {
                Children::Leaf
            } else {
                Children::Inline(children)
            },
        }
    }
}

impl From<&FunctionEntry> for NavNode {
    fn from(entry: &FunctionEntry) -> NavNode {
        NavNode::leaf(&entry.name, &entry.link)
    }
}

/// A separately loaded table (`var <name> = [...]`).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Table {
    Nodes { var: String, rows: Vec<NavNode> },
    Functions {
        var: String,
        group: String,
        entries: Vec<FunctionEntry>,
    },
}

impl Table {
    pub fn var(&self) -> &str {
        match self {
            Table::Nodes { var, .. } | Table::Functions { var, .. } => var,
        }
    }

    pub fn rows(&self) -> Vec<NavNode> {
        match self {
            Table::Nodes { rows, .. } => rows.clone(),
            Table::Functions { entries, .. } => entries.iter().map(NavNode::from).collect(),
        }
    }
}

/// One `navtreeindexN.js` page: link → child-index path.
#[derive(Debug, Clone, Serialize)]
pub struct IndexPage {
    pub var: String,
    pub entries: Vec<(String, Vec<usize>)>,
}

/// Everything the viewer needs, derived from a Project.
#[derive(Debug, Serialize)]
pub struct SiteIndex {
    pub navtree: Vec<NavNode>,
    pub tables: Vec<Table>,
    pub index_pages: Vec<IndexPage>,
    /// First key of each index page, then the last key overall
    pub navtree_index: Vec<String>,
    /// Groups with nothing to list, kept out of `modules`
    pub empty_groups: Vec<String>,
    pub sync_on_message: String,
    pub sync_off_message: String,
    #[serde(skip)]
    pub license_banner: bool,
}

impl SiteIndex {
    pub fn build(project: &Project, config: &Config) -> SiteIndex {
        let mut tables = Vec::new();
        let mut top = Vec::new();

        if let Some(ref main) = project.main_page {
            top.push(NavNode::leaf(&main.title, "index.html"));
        }
        for page in &project.pages {
            top.push(NavNode::leaf(&page.title, &anchor::page_file(&page.id)));
        }

        // Modules and one function table per group
        let mut modules = Vec::new();
        let mut empty_groups = Vec::new();
        for group in &project.groups {
            if group.functions.is_empty() {
                empty_groups.push(group.name.clone());
                continue;
            }
            let var = anchor::group_var(&group.name);
            modules.push(NavNode::table(&group.title, &anchor::group_file(&group.name), &var));

            let mut entries: Vec<FunctionEntry> = group
                .functions
                .iter()
                .map(|f| FunctionEntry {
                    name: f.name.clone(),
                    link: anchor::group_member_link(&group.name, &f.name, f.args_string()),
                })
                .collect();
            if config.sort_members {
                entries.sort_by(|a, b| a.name.cmp(&b.name));
            }
            tables.push(Table::Functions {
                var,
                group: group.name.clone(),
                entries,
            });
        }
        if !modules.is_empty() {
            top.push(NavNode::table(&config.functions_label, "modules.html", "modules"));
            tables.insert(
                0,
                Table::Nodes {
                    var: "modules".to_string(),
                    rows: modules,
                },
            );
        }

        // Data structures
        if !project.structs.is_empty() {
            let mut structs: Vec<&StructDoc> = project.structs.iter().collect();
            structs.sort_by(|a, b| a.name.cmp(&b.name));

            let mut annotated = Vec::new();
            for st in &structs {
                if st.fields.is_empty() {
                    annotated.push(NavNode::leaf(&st.name, &anchor::struct_file(&st.name)));
                    continue;
                }
                let var = anchor::struct_var(&st.name);
                annotated.push(NavNode::table(&st.name, &anchor::struct_file(&st.name), &var));
                tables.push(Table::Nodes {
                    var,
                    rows: st
                        .fields
                        .iter()
                        .map(|f| NavNode::leaf(&f.name, &anchor::field_link(&st.name, &f.name)))
                        .collect(),
                });
            }
            tables.push(Table::Nodes {
                var: "annotated_dup".to_string(),
                rows: annotated,
            });

            let mut children = vec![NavNode::table(
                &config.structures_label,
                "annotated.html",
                "annotated_dup",
            )];
            if structs.iter().any(|s| !s.fields.is_empty()) {
                children.push(NavNode::inline(
                    "Data Fields",
                    "functions.html",
                    vec![
                        NavNode::leaf("All", "functions.html"),
                        NavNode::leaf("Variables", "functions_vars.html"),
                    ],
                ));
            }
            top.push(NavNode::inline(&config.structures_label, "annotated.html", children));
        }

        // Functions outside any group only show up in the globals index
        if !project.ungrouped.is_empty() {
            top.push(NavNode::inline(
                "Globals",
                "globals.html",
                vec![
                    NavNode::leaf("All", "globals.html"),
                    NavNode::leaf("Functions", "globals_func.html"),
                ],
            ));
        }

        let mut site = SiteIndex {
            navtree: vec![NavNode::inline(&project.title, "index.html", top)],
            tables,
            index_pages: Vec::new(),
            navtree_index: Vec::new(),
            empty_groups,
            sync_on_message: config.sync_on_message.clone(),
            sync_off_message: config.sync_off_message.clone(),
            license_banner: config.license_banner,
        };
        site.build_index(config.index_page_size);
        site
    }

    /// Look up a table by its variable name.
    pub fn resolve_table(&self, var: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.var() == var)
    }

    /// Every link reachable from the tree, with its child-index path.
    /// The first path seen for a link wins.
    ///
    /// The viewer prepends the root itself, so the root link maps to `[]`
    /// and its children start at `[i]`.
    pub fn link_paths(&self) -> BTreeMap<String, Vec<usize>> {
        let mut paths = BTreeMap::new();
        let mut visiting = HashSet::new();
        for node in &self.navtree {
            self.collect_paths(node, Vec::new(), &mut paths, &mut visiting);
        }
        paths
    }

    fn collect_paths(
        &self,
        node: &NavNode,
        path: Vec<usize>,
        paths: &mut BTreeMap<String, Vec<usize>>,
        visiting: &mut HashSet<String>,
    ) {
        if path.len() > MAX_DEPTH {
            return;
        }
        if !node.link.is_empty() {
            paths.entry(node.link.clone()).or_insert_with(|| path.clone());
        }
        let children = match &node.children {
            Children::Leaf => return,
            Children::Inline(nodes) => nodes.clone(),
            Children::Table(var) => {
                // Cycles are reported by validation; here they are cut short
                if !visiting.insert(var.clone()) {
                    return;
                }
                let rows = self.resolve_table(var).map(Table::rows).unwrap_or_default();
                for (i, child) in rows.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(i);
                    self.collect_paths(child, child_path, paths, visiting);
                }
                visiting.remove(var);
                return;
            }
        };
        for (i, child) in children.iter().enumerate() {
            let mut child_path = path.clone();
            child_path.push(i);
            self.collect_paths(child, child_path, paths, visiting);
        }
    }

    fn build_index(&mut self, page_size: usize) {
        let paths: Vec<(String, Vec<usize>)> = self.link_paths().into_iter().collect();
        let page_size = page_size.max(1);

        self.index_pages = paths
            .chunks(page_size)
            .enumerate()
            .map(|(n, chunk)| IndexPage {
                var: format!("NAVTREEINDEX{}", n),
                entries: chunk.to_vec(),
            })
            .collect();

        self.navtree_index = self
            .index_pages
            .iter()
            .filter_map(|p| p.entries.first().map(|(k, _)| k.clone()))
            .collect();
        if let Some((last, _)) = paths.last() {
            self.navtree_index.push(last.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_project() -> Project {
        let func = |name: &str| FunctionDoc {
            name: name.to_string(),
            signature: format!("void {}(q7_t * x, uint32_t n)", name),
            ..Default::default()
        };
        Project {
            title: "NN Library".to_string(),
            main_page: Some(Page {
                id: "index".to_string(),
                title: "User Manual".to_string(),
            }),
            pages: vec![Page {
                id: "copy_sec".to_string(),
                title: "Copyright Notice".to_string(),
            }],
            groups: vec![
                Group {
                    name: "Activation".to_string(),
                    title: "Activation Functions".to_string(),
                    functions: vec![func("relu_s8"), func("activate_s8")],
                    ..Default::default()
                },
                Group {
                    name: "Empty".to_string(),
                    title: "Empty Functions".to_string(),
                    ..Default::default()
                },
            ],
            structs: vec![StructDoc {
                name: "nn_scaling".to_string(),
                fields: vec![FieldDoc {
                    name: "shift".to_string(),
                    decl: "int32_t shift".to_string(),
                    brief: None,
                }],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn navtree_layout() {
        let site = SiteIndex::build(&sample_project(), &Config::default());
        assert_eq!(site.navtree.len(), 1);
        let root = &site.navtree[0];
        assert_eq!(root.label, "NN Library");
        let Children::Inline(top) = &root.children else {
            panic!("root should have inline children");
        };
        let labels: Vec<_> = top.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            ["User Manual", "Copyright Notice", "Descriptions of Functions", "Data Structures"]
        );
        assert_eq!(top[1].link, "copy_sec.html");
        assert_eq!(top[2].children, Children::Table("modules".to_string()));
    }

    #[test]
    fn empty_groups_are_left_out() {
        let site = SiteIndex::build(&sample_project(), &Config::default());
        let modules = site.resolve_table("modules").unwrap().rows();
        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].link, "group__Activation.html");
        assert!(site.resolve_table("group__Empty").is_none());
        assert_eq!(site.empty_groups, ["Empty"]);
    }

    #[test]
    fn group_table_keeps_declaration_order() {
        let site = SiteIndex::build(&sample_project(), &Config::default());
        let Some(Table::Functions { entries, .. }) = site.resolve_table("group__Activation") else {
            panic!("missing group table");
        };
        assert_eq!(entries[0].name, "relu_s8");
        assert!(entries[0].link.starts_with("group__Activation.html#ga"));
    }

    #[test]
    fn sort_members_orders_by_name() {
        let config = Config {
            sort_members: true,
            ..Default::default()
        };
        let site = SiteIndex::build(&sample_project(), &config);
        let rows = site.resolve_table("group__Activation").unwrap().rows();
        assert_eq!(rows[0].label, "activate_s8");
    }

    #[test]
    fn index_paths_follow_tables() {
        let site = SiteIndex::build(&sample_project(), &Config::default());
        let paths = site.link_paths();
        assert_eq!(paths["index.html"], Vec::<usize>::new());
        assert_eq!(paths["copy_sec.html"], vec![1]);
        assert_eq!(paths["modules.html"], vec![2]);
        assert_eq!(paths["group__Activation.html"], vec![2, 0]);
        let relu = site.resolve_table("group__Activation").unwrap().rows()[0].link.clone();
        assert_eq!(paths[&relu], vec![2, 0, 0]);
        assert_eq!(paths["structnn__scaling.html"], vec![3, 0, 0]);
    }

    #[test]
    fn navtree_index_lists_page_heads_and_last_key() {
        let config = Config {
            index_page_size: 3,
            ..Default::default()
        };
        let site = SiteIndex::build(&sample_project(), &config);
        let all: Vec<String> = site.link_paths().into_keys().collect();
        assert_eq!(site.index_pages.len(), all.len().div_ceil(3));
        assert_eq!(site.index_pages[0].var, "NAVTREEINDEX0");
        assert_eq!(site.navtree_index[0], all[0]);
        assert_eq!(site.navtree_index[1], all[3]);
        assert_eq!(site.navtree_index.last(), all.last());
    }

    #[test]
    fn empty_project_is_a_single_leaf() {
        let project = Project {
            title: "Empty".to_string(),
            ..Default::default()
        };
        let site = SiteIndex::build(&project, &Config::default());
        assert_eq!(site.navtree[0].children, Children::Leaf);
        assert_eq!(site.navtree_index, ["index.html", "index.html"]);
    }
}
