//! Parsed documentation, shared by every output format.

use serde::Serialize;

/// Everything extracted from a single source file.
#[derive(Debug, Default)]
pub struct Document {
    pub file: FileDoc,
    pub pages: Vec<Page>,
    pub groups: Vec<Group>,
    pub functions: Vec<FunctionDoc>,
    pub structs: Vec<StructDoc>,
}

/// File-level metadata.
#[derive(Debug, Default)]
pub struct FileDoc {
    /// Path as given on the command line
    pub path: String,
}

/// The merged view over every input file.
#[derive(Debug, Default, Serialize)]
pub struct Project {
    pub title: String,
    pub main_page: Option<Page>,
    pub pages: Vec<Page>,
    pub groups: Vec<Group>,
    /// Documented functions that belong to no group
    pub ungrouped: Vec<FunctionDoc>,
    pub structs: Vec<StructDoc>,
}

/// @mainpage or a @section inside it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    /// Anchor id, e.g. "copy_sec". The main page uses "index".
    pub id: String,
    pub title: String,
}

/// A @defgroup / @addtogroup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Group {
    pub name: String,
    pub title: String,
    pub brief: Option<String>,
    pub functions: Vec<FunctionDoc>,
    /// File that carried the @defgroup
    pub defined_in: Option<String>,
}

/// A single documented function.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FunctionDoc {
    pub name: String,
    pub brief: Option<String>,
    /// Free text after the brief that is not owned by another command
    pub details: Option<String>,
    pub params: Vec<ParamDoc>,
    pub returns: Option<String>,
    pub notes: Vec<String>,
    pub example: Option<String>,
    /// Declaration with whitespace collapsed, e.g. `void f(q7_t * x, uint32_t n)`
    pub signature: String,
    /// Explicit @ingroup, resolved against open scopes during merge
    #[serde(skip)]
    pub group: Option<String>,
    #[serde(skip)]
    pub is_internal: bool,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
    InOut,
    Unspecified,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamDoc {
    pub name: String,
    pub direction: Direction,
    pub text: String,
}

/// A documented `typedef struct`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StructDoc {
    pub name: String,
    pub brief: Option<String>,
    pub fields: Vec<FieldDoc>,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldDoc {
    pub name: String,
    /// Declaration without the trailing `;`, e.g. `int32_t min`
    pub decl: String,
    pub brief: Option<String>,
}

impl FunctionDoc {
    /// Argument list of the signature, used to tell overload-like
    /// declarations apart when hashing anchors.
    pub fn args_string(&self) -> &str {
        match (self.signature.find('('), self.signature.rfind(')')) {
            (Some(open), Some(close)) if close > open => &self.signature[open..=close],
            _ => "",
        }
    }

    /// Documentation weight used when two files describe the same function.
    pub fn is_richer_than(&self, other: &FunctionDoc) -> bool {
        let score = |f: &FunctionDoc| {
            f.params.len()
                + f.notes.len()
                + usize::from(f.brief.is_some())
                + usize::from(f.example.is_some())
                + usize::from(f.returns.is_some())
        };
        score(self) > score(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_string_extracts_parenthesised_list() {
        let f = FunctionDoc {
            signature: "void riscv_nn_relu_s8(q7_t * in_out, uint32_t size)".to_string(),
            ..Default::default()
        };
        assert_eq!(f.args_string(), "(q7_t * in_out, uint32_t size)");
    }

    #[test]
    fn args_string_empty_without_parens() {
        let f = FunctionDoc::default();
        assert_eq!(f.args_string(), "");
    }

    #[test]
    fn richer_counts_params_and_brief() {
        let thin = FunctionDoc::default();
        let rich = FunctionDoc {
            brief: Some("Relu".into()),
            params: vec![ParamDoc {
                name: "x".into(),
                direction: Direction::In,
                text: String::new(),
            }],
            ..Default::default()
        };
        assert!(rich.is_richer_than(&thin));
        assert!(!thin.is_richer_than(&rich));
    }
}
