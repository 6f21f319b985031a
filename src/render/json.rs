//! JSON output: the merged project and its navigation data.
//!
//! Serializes the merged project and the derived navigation data together,
//! so custom viewers can be built without re-parsing the sources.

use crate::model::Project;
use crate::nav::SiteIndex;
use crate::render::{RenderedFile, Renderer};
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct Output<'a> {
    project: &'a Project,
    navigation: &'a SiteIndex,
}

impl Renderer for JsonRenderer {
    fn render(&self, project: &Project, site: &SiteIndex) -> Vec<RenderedFile> {
        let output = Output {
            project,
            navigation: site,
        };
        let mut content = serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string());
        content.push('\n');
        vec![RenderedFile {
            name: "navdoc.json".to_string(),
            content,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::*;

    #[test]
    fn json_contains_project_and_navigation() {
        let project = Project {
            title: "Manual".to_string(),
            groups: vec![Group {
                name: "Softmax".to_string(),
                title: "Softmax Functions".to_string(),
                functions: vec![FunctionDoc {
                    name: "softmax_s8".to_string(),
                    brief: Some("Softmax on q7 input.".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            ..Default::default()
        };
        let site = SiteIndex::build(&project, &Config::default());
        let files = JsonRenderer.render(&project, &site);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "navdoc.json");

        let value: serde_json::Value = serde_json::from_str(&files[0].content).unwrap();
        assert_eq!(value["project"]["title"], "Manual");
        assert_eq!(
            value["project"]["groups"][0]["functions"][0]["brief"],
            "Softmax on q7 input."
        );
        assert_eq!(value["navigation"]["navtree"][0]["label"], "Manual");
        assert_eq!(
            value["navigation"]["sync_on_message"],
            "click to disable panel synchronisation"
        );
    }
}
