//! Output formats behind a common `Renderer` trait.

pub mod js;
pub mod json;
pub mod markdown;

use crate::model::Project;
use crate::nav::SiteIndex;
use anyhow::{anyhow, Result};

/// One output file, named relative to the output directory.
#[derive(Debug)]
pub struct RenderedFile {
    pub name: String,
    pub content: String,
}

/// Trait for rendering the navigation data into a specific output format.
pub trait Renderer {
    fn render(&self, project: &Project, site: &SiteIndex) -> Vec<RenderedFile>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "js" | "doxygen" => Ok(Box::new(js::JsRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use js, json, or markdown",
            format
        )),
    }
}
