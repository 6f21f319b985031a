//! Doxygen comment parser for C headers and sources, driven line by line.
//!
//! Handles `/** ... */`, `/*! ... */` and `///` blocks, trailing `/**< */`
//! field comments, group scoping with `@{` / `@}` and the subset of the
//! preprocessor needed to drop declarations in disabled `#if` branches.

use crate::model::*;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// -- Regex patterns -----------------------------------------------------------

static RE_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[@\\]([A-Za-z]+)(?:\[([A-Za-z, ]*)\])?(?:[[:blank:]]+(.*))?$").unwrap()
});

static RE_SCOPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|[[:blank:]*])[@\\]([{}])(?:[[:blank:]]|$)").unwrap());

static RE_WORD_THEN_REST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_:]+)(?:[[:blank:]]+(.*))?$").unwrap());

static RE_AGGREGATE_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(typedef[[:space:]]+)?(struct|union|enum)([[:space:]]+[A-Za-z_][A-Za-z0-9_]*)?[[:space:]]*\{")
        .unwrap()
});

static RE_FUNC_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)[[:space:]]*\($").unwrap());

static RE_TRAILING_IDENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)[[:space:]]*(?:\[[^\]]*\][[:space:]]*)*$").unwrap());

static RE_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[[:blank:]]*([a-z]+)[[:blank:]]*(.*)$").unwrap());

static RE_DEFINED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^defined[[:blank:]]*\(?[[:blank:]]*([A-Za-z_][A-Za-z0-9_]*)[[:blank:]]*\)?$").unwrap()
});

// -- Comment blocks -----------------------------------------------------------

/// Where continuation lines of a paragraph end up.
#[derive(Clone, Copy, PartialEq)]
enum Target {
    Nothing,
    Brief,
    Details,
    Param(usize),
    Return,
    Note(usize),
}

/// One parsed comment block.
#[derive(Default)]
struct Block {
    brief: Option<String>,
    details: Vec<String>,
    params: Vec<ParamDoc>,
    returns: Option<String>,
    notes: Vec<String>,
    example: Option<String>,
    file: bool,
    defgroup: Option<(String, String)>,
    addtogroup: Option<(String, Option<String>)>,
    ingroup: Option<String>,
    mainpage: Option<String>,
    sections: Vec<Page>,
    scope_ops: Vec<char>,
    internal: bool,
}

impl Block {
    /// Whether the block describes the declaration that follows it.
    fn documents_entity(&self) -> bool {
        if self.file
            || self.defgroup.is_some()
            || self.addtogroup.is_some()
            || self.mainpage.is_some()
            || !self.sections.is_empty()
        {
            return false;
        }
        self.brief.is_some()
            || !self.details.is_empty()
            || !self.params.is_empty()
            || self.returns.is_some()
            || !self.notes.is_empty()
            || self.example.is_some()
    }

    fn append(&mut self, target: Target, text: &str) {
        let slot = match target {
            Target::Nothing => return,
            Target::Brief => self.brief.get_or_insert_with(String::new),
            Target::Details => {
                if self.details.is_empty() {
                    self.details.push(String::new());
                }
                let last = self.details.len() - 1;
                &mut self.details[last]
            }
            Target::Param(i) => &mut self.params[i].text,
            Target::Return => self.returns.get_or_insert_with(String::new),
            Target::Note(i) => &mut self.notes[i],
        };
        join_words(slot, text);
    }
}

/// Parse the text lines of one comment block (decorations already stripped).
fn parse_block(lines: &[String]) -> Block {
    let mut block = Block::default();
    let mut target = Target::Nothing;
    let mut code: Option<Vec<String>> = None;

    for raw in lines {
        // Verbatim inside @code ... @endcode
        if let Some(ref mut buf) = code {
            let t = raw.trim();
            if t.starts_with("@endcode") || t.starts_with("\\endcode") {
                block.example = Some(unindent(buf));
                code = None;
            } else {
                buf.push(raw.clone());
            }
            continue;
        }

        // Nested decoration such as " *   * @}"
        let trimmed = raw.trim().trim_start_matches('*').trim();

        let mut had_scope = false;
        for caps in RE_SCOPE.captures_iter(trimmed) {
            block.scope_ops.push(caps[1].chars().next().unwrap_or('}'));
            had_scope = true;
        }
        let cleaned;
        let line = if had_scope {
            cleaned = RE_SCOPE.replace_all(trimmed, " ").trim().to_string();
            if cleaned.is_empty() {
                continue;
            }
            cleaned.as_str()
        } else {
            trimmed
        };

        if line.is_empty() {
            // Blank line ends the paragraph; later text becomes details
            if target != Target::Nothing || block.brief.is_some() {
                if block.details.last().is_some_and(|d| !d.is_empty()) {
                    block.details.push(String::new());
                }
                target = Target::Details;
            }
            continue;
        }

        let Some(caps) = RE_COMMAND.captures(line) else {
            // Plain text: autobrief for the first paragraph
            if target == Target::Nothing && block.brief.is_none() {
                target = Target::Brief;
            } else if target == Target::Nothing {
                target = Target::Details;
            }
            block.append(target, line);
            continue;
        };

        let cmd = caps[1].to_string();
        let attr = caps.get(2).map(|m| m.as_str().trim().to_string());
        let rest = caps.get(3).map(|m| m.as_str().trim()).unwrap_or("");

        match cmd.as_str() {
            "brief" | "short" => {
                block.brief = None;
                target = Target::Brief;
                block.append(target, rest);
            }
            "details" => {
                block.details.push(String::new());
                target = Target::Details;
                block.append(target, rest);
            }
            "param" => {
                let (name, text) = split_word(rest);
                block.params.push(ParamDoc {
                    name,
                    direction: parse_direction(attr.as_deref()),
                    text: String::new(),
                });
                target = Target::Param(block.params.len() - 1);
                block.append(target, &text);
            }
            "return" | "returns" | "retval" => {
                target = Target::Return;
                block.append(target, rest);
            }
            "note" | "remark" | "remarks" | "warning" => {
                block.notes.push(String::new());
                target = Target::Note(block.notes.len() - 1);
                block.append(target, rest);
            }
            "code" => {
                code = Some(Vec::new());
            }
            "file" => {
                block.file = true;
                target = Target::Nothing;
            }
            "defgroup" => {
                let (name, title) = split_word(rest);
                let title = if title.is_empty() { name.clone() } else { title };
                block.defgroup = Some((name, title));
                target = Target::Nothing;
            }
            "addtogroup" => {
                let (name, title) = split_word(rest);
                block.addtogroup = Some((name, Some(title).filter(|t| !t.is_empty())));
                target = Target::Nothing;
            }
            "ingroup" => {
                let (name, _) = split_word(rest);
                block.ingroup = Some(name);
            }
            "mainpage" => {
                block.mainpage = Some(rest.to_string());
                target = Target::Nothing;
            }
            "section" | "subsection" | "page" => {
                let (id, title) = split_word(rest);
                if !id.is_empty() {
                    let title = if title.is_empty() { id.clone() } else { title };
                    block.sections.push(Page { id, title });
                }
                target = Target::Nothing;
            }
            "internal" => block.internal = true,
            // Inline bold marker: keep the text
            "b" | "e" | "em" | "c" | "p" => {
                if target == Target::Nothing {
                    target = Target::Details;
                }
                block.append(target, rest);
            }
            // Layout-only commands
            "image" | "endinternal" | "n" | "par" => {}
            _ => {
                if target != Target::Nothing {
                    block.append(target, rest);
                }
            }
        }
    }

    if let Some(buf) = code {
        // Unterminated @code: keep what we have
        block.example = Some(unindent(&buf));
    }
    block.details.retain(|d| !d.is_empty());
    block
}

fn parse_direction(attr: Option<&str>) -> Direction {
    match attr.map(|a| a.replace(' ', "")) {
        Some(a) if a == "in" => Direction::In,
        Some(a) if a == "out" => Direction::Out,
        Some(a) if a == "in,out" || a == "out,in" => Direction::InOut,
        _ => Direction::Unspecified,
    }
}

/// Split "word rest of line" into its two halves.
fn split_word(text: &str) -> (String, String) {
    match RE_WORD_THEN_REST.captures(text.trim()) {
        Some(caps) => (
            caps[1].to_string(),
            caps.get(2).map(|m| m.as_str().trim().to_string()).unwrap_or_default(),
        ),
        None => (text.trim().to_string(), String::new()),
    }
}

fn join_words(dest: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !dest.is_empty() {
        dest.push(' ');
    }
    dest.push_str(text);
}

/// Remove the common leading whitespace of a code example, counted in
/// characters.
fn unindent(lines: &[String]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    let body: Vec<&str> = lines.iter().map(|l| strip_indent(l, indent)).collect();
    body.join("\n").trim_matches('\n').to_string()
}

fn strip_indent(line: &str, indent: usize) -> &str {
    let start = line
        .char_indices()
        .take(indent)
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .or_else(|| line.char_indices().nth(indent).map(|(i, _)| i))
        .unwrap_or(line.len());
    line[start..].trim_end()
}

/// Strip the comment decoration of one line inside a `/** */` block.
fn strip_decoration(line: &str) -> String {
    let t = line.trim_start();
    let t = match t.strip_prefix('*') {
        Some(rest) if !rest.starts_with('/') => rest,
        _ => t,
    };
    t.strip_prefix(' ').unwrap_or(t).trim_end().to_string()
}

// -- Preprocessor conditionals ------------------------------------------------

struct CondFrame {
    parent_active: bool,
    taken: bool,
    active: bool,
}

// -- Parser state -------------------------------------------------------------

/// Struct/union/enum body being collected.
struct Aggregate {
    kind: String,
    tag: Option<String>,
    block: Block,
    depth: usize,
    fields: Vec<FieldDoc>,
    /// Doc comment placed before a field
    field_brief: Option<String>,
    /// Text after the closing brace, up to ';'
    tail: Option<String>,
}

#[derive(Default)]
struct ParserState {
    doc: Document,
    defines: HashMap<String, String>,
    cond: Vec<CondFrame>,
    directive_continues: bool,

    // Comment tracking
    in_block: Option<Vec<String>>,
    in_plain_comment: bool,
    line_block: Vec<String>,

    // Group scoping
    scopes: Vec<String>,
    last_group: Option<String>,
    internal_next: bool,

    // Entity waiting for its declaration
    pending: Option<Block>,
    decl: String,
    aggregate: Option<Aggregate>,
}

impl ParserState {
    fn active(&self) -> bool {
        self.cond.last().map_or(true, |f| f.active)
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse a C header/source (or a `.dox` page) into a Document.
///
/// `defines` seeds the preprocessor, entries are `NAME` or `NAME=VALUE`.
pub fn parse(input: &str, path: &str, defines: &[String]) -> Document {
    let mut state = ParserState::default();
    state.doc.file.path = path.to_string();
    for def in defines {
        let (name, value) = def.split_once('=').unwrap_or((def.as_str(), "1"));
        state.defines.insert(name.trim().to_string(), value.trim().to_string());
    }

    for line in input.lines() {
        process_line(&mut state, line);
    }
    flush_line_block(&mut state);

    state.doc
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut ParserState, line: &str) {
    let in_comment = s.in_block.is_some() || s.in_plain_comment;

    // 1. Preprocessor directives (including continued #define lines)
    if !in_comment && (s.directive_continues || line.trim_start().starts_with('#')) {
        flush_line_block(s);
        // A block right before a directive documents the macro, not the next declaration
        if s.active() && s.pending.take().is_some() {
            s.decl.clear();
            s.internal_next = false;
        }
        if !s.directive_continues {
            handle_directive(s, line.trim());
        }
        s.directive_continues = line.trim_end().ends_with('\\');
        return;
    }

    // 2. Disabled #if branch
    if !s.active() {
        return;
    }

    // 3. `///` and `//!` line blocks
    let trimmed = line.trim_start();
    if !in_comment && is_line_doc(trimmed) {
        s.line_block.push(strip_line_doc(trimmed));
        return;
    }
    flush_line_block(s);

    let mut rest = line;
    loop {
        if let Some(lines) = s.in_block.as_mut() {
            match rest.find("*/") {
                Some(end) => {
                    lines.push(strip_decoration(&rest[..end]));
                    let lines = s.in_block.take().unwrap_or_default();
                    finish_block(s, &lines);
                    rest = &rest[end + 2..];
                    continue;
                }
                None => {
                    lines.push(strip_decoration(rest));
                    return;
                }
            }
        }

        if s.in_plain_comment {
            match rest.find("*/") {
                Some(end) => {
                    s.in_plain_comment = false;
                    rest = &rest[end + 2..];
                    continue;
                }
                None => return,
            }
        }

        let block_start = rest.find("/*");
        let line_start = rest.find("//");
        let pos = match (block_start, line_start) {
            (Some(b), Some(l)) => b.min(l),
            (Some(b), None) => b,
            (None, Some(l)) => l,
            (None, None) => {
                process_code(s, rest);
                return;
            }
        };

        process_code(s, &rest[..pos]);
        let comment = &rest[pos..];

        if let Some(text) = comment
            .strip_prefix("///<")
            .or_else(|| comment.strip_prefix("//!<"))
        {
            trailing_doc(s, text.trim());
            return;
        }
        if comment.starts_with("//") {
            return;
        }

        if let Some(body) = comment
            .strip_prefix("/**<")
            .or_else(|| comment.strip_prefix("/*!<"))
        {
            match body.find("*/") {
                Some(end) => {
                    trailing_doc(s, body[..end].trim());
                    rest = &body[end + 2..];
                    continue;
                }
                None => {
                    trailing_doc(s, body.trim());
                    s.in_plain_comment = true;
                    return;
                }
            }
        }

        if (comment.starts_with("/**") && !comment.starts_with("/**/")) || comment.starts_with("/*!") {
            s.in_block = Some(Vec::new());
            rest = &comment[3..];
            continue;
        }

        s.in_plain_comment = true;
        rest = &comment[2..];
    }
}

fn is_line_doc(trimmed: &str) -> bool {
    (trimmed.starts_with("///") && !trimmed.starts_with("///<") && !trimmed.starts_with("////"))
        || (trimmed.starts_with("//!") && !trimmed.starts_with("//!<"))
}

fn strip_line_doc(trimmed: &str) -> String {
    let t = &trimmed[3..];
    t.strip_prefix(' ').unwrap_or(t).trim_end().to_string()
}

fn flush_line_block(s: &mut ParserState) {
    if !s.line_block.is_empty() {
        let lines = std::mem::take(&mut s.line_block);
        finish_block(s, &lines);
    }
}

/// Apply a finished comment block to the parser state.
fn finish_block(s: &mut ParserState, lines: &[String]) {
    let block = parse_block(lines);

    // Inside a struct body a block documents the next field
    if let Some(agg) = s.aggregate.as_mut() {
        if block.documents_entity() {
            agg.field_brief = block.brief.or_else(|| block.details.first().cloned());
        }
        return;
    }

    if let Some(ref title) = block.mainpage {
        s.doc.pages.insert(
            0,
            Page {
                id: "index".to_string(),
                title: title.clone(),
            },
        );
    }
    s.doc.pages.extend(block.sections.iter().cloned());

    if let Some((ref name, ref title)) = block.defgroup {
        let path = s.doc.file.path.clone();
        let group = group_mut(s, name);
        group.title = title.clone();
        if group.brief.is_none() {
            group.brief = block.brief.clone();
        }
        if group.defined_in.is_none() {
            group.defined_in = Some(path);
        }
        s.last_group = Some(name.clone());
    }

    if let Some((ref name, ref title)) = block.addtogroup {
        let group = group_mut(s, name);
        if group.title.is_empty() {
            group.title = title.clone().unwrap_or_else(|| name.clone());
        }
        s.last_group = Some(name.clone());
    }

    for op in &block.scope_ops {
        if *op == '{' {
            let scope = s.last_group.take().unwrap_or_default();
            s.scopes.push(scope);
        } else {
            s.scopes.pop();
        }
    }

    if block.internal {
        s.internal_next = true;
    }

    if block.documents_entity() {
        s.pending = Some(block);
        s.decl.clear();
    }
}

fn group_mut<'a>(s: &'a mut ParserState, name: &str) -> &'a mut Group {
    let idx = match s.doc.groups.iter().position(|g| g.name == name) {
        Some(i) => i,
        None => {
            s.doc.groups.push(Group {
                name: name.to_string(),
                ..Default::default()
            });
            s.doc.groups.len() - 1
        }
    };
    &mut s.doc.groups[idx]
}

/// `/**< text */` after a struct field.
fn trailing_doc(s: &mut ParserState, text: &str) {
    let Some(agg) = s.aggregate.as_mut() else {
        return;
    };
    if let Some(field) = agg.fields.last_mut() {
        if field.brief.is_none() && !text.is_empty() {
            field.brief = Some(text.to_string());
        }
    }
}

/// Code outside comments: declarations and struct bodies.
fn process_code(s: &mut ParserState, code: &str) {
    if code.trim().is_empty() {
        return;
    }

    if s.aggregate.is_some() {
        aggregate_code(s, code);
        return;
    }

    if s.pending.is_none() {
        return;
    }

    if !s.decl.is_empty() {
        s.decl.push(' ');
    }
    s.decl.push_str(code.trim());

    if let Some(caps) = RE_AGGREGATE_HEAD.captures(&s.decl) {
        let kind = caps[2].to_string();
        let tag = caps.get(3).map(|m| m.as_str().trim().to_string());
        let body_start = caps.get(0).map_or(0, |m| m.end());
        let body = s.decl[body_start..].to_string();
        let block = s.pending.take().unwrap_or_default();
        s.decl.clear();
        s.aggregate = Some(Aggregate {
            kind,
            tag,
            block,
            depth: 1,
            fields: Vec::new(),
            field_brief: None,
            tail: None,
        });
        if !body.trim().is_empty() {
            aggregate_code(s, &body);
        }
        return;
    }

    let end = s.decl.find([';', '{']);
    if let Some(end) = end {
        let decl = collapse_ws(&s.decl[..end]);
        s.decl.clear();
        let block = s.pending.take().unwrap_or_default();
        finish_function(s, block, &decl);
    }
}

fn finish_function(s: &mut ParserState, block: Block, decl: &str) {
    let internal = std::mem::take(&mut s.internal_next) || block.internal;
    if decl.starts_with("typedef") || decl.starts_with("#") {
        return;
    }
    let Some(open) = decl.find('(') else {
        return;
    };
    let Some(caps) = RE_FUNC_NAME.captures(&decl[..=open]) else {
        return;
    };
    let name = caps[1].to_string();

    let group = block
        .ingroup
        .clone()
        .or_else(|| s.scopes.iter().rev().find(|g| !g.is_empty()).cloned());

    let details = if block.details.is_empty() {
        None
    } else {
        Some(block.details.join("\n\n"))
    };

    s.doc.functions.push(FunctionDoc {
        name,
        brief: block.brief,
        details,
        params: block.params,
        returns: block.returns,
        notes: block.notes,
        example: block.example,
        signature: decl.to_string(),
        group,
        is_internal: internal,
        sources: vec![s.doc.file.path.clone()],
    });
}

fn aggregate_code(s: &mut ParserState, code: &str) {
    let Some(agg) = s.aggregate.as_mut() else {
        return;
    };

    // After the closing brace: collect the typedef name up to ';'
    if let Some(ref mut tail) = agg.tail {
        tail.push(' ');
        tail.push_str(code);
        if tail.contains(';') {
            finish_aggregate(s);
        }
        return;
    }

    let mut field = String::new();
    for (i, c) in code.char_indices() {
        match c {
            '{' => agg.depth += 1,
            '}' => {
                agg.depth -= 1;
                if agg.depth == 0 {
                    agg.tail = Some(code[i + 1..].to_string());
                    if code[i + 1..].contains(';') {
                        finish_aggregate(s);
                    }
                    return;
                }
            }
            ';' if agg.depth == 1 => {
                push_field(agg, &field);
                field.clear();
            }
            _ if agg.depth == 1 => field.push(c),
            _ => {}
        }
    }
}

fn push_field(agg: &mut Aggregate, text: &str) {
    let decl = collapse_ws(text);
    if decl.is_empty() || agg.kind == "enum" {
        return;
    }
    let Some(caps) = RE_TRAILING_IDENT.captures(&decl) else {
        return;
    };
    agg.fields.push(FieldDoc {
        name: caps[1].to_string(),
        decl: decl.clone(),
        brief: agg.field_brief.take(),
    });
}

fn finish_aggregate(s: &mut ParserState) {
    let Some(agg) = s.aggregate.take() else {
        return;
    };
    s.internal_next = false;
    if agg.kind == "enum" {
        return;
    }
    let tail = agg.tail.unwrap_or_default();
    let tail = tail.split(';').next().unwrap_or("").trim();
    let name = RE_TRAILING_IDENT
        .captures(tail)
        .map(|c| c[1].to_string())
        .or(agg.tag);
    let Some(name) = name else {
        return;
    };
    let brief = agg.block.brief.or_else(|| agg.block.details.first().cloned());
    s.doc.structs.push(StructDoc {
        name,
        brief,
        fields: agg.fields,
        source: s.doc.file.path.clone(),
    });
}

fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// -- Preprocessor -------------------------------------------------------------

fn handle_directive(s: &mut ParserState, line: &str) {
    let Some(caps) = RE_DIRECTIVE.captures(line) else {
        return;
    };
    let directive = caps[1].to_string();
    let arg = caps[2].split("//").next().unwrap_or("").trim().to_string();
    let parent_active = s.active();

    match directive.as_str() {
        "if" | "ifdef" | "ifndef" => {
            let value = match directive.as_str() {
                "ifdef" => s.defines.contains_key(first_word(&arg)),
                "ifndef" => !s.defines.contains_key(first_word(&arg)),
                _ => eval_condition(&s.defines, &arg),
            };
            let active = parent_active && value;
            s.cond.push(CondFrame {
                parent_active,
                taken: active,
                active,
            });
        }
        "elif" => {
            let defines = &s.defines;
            if let Some(frame) = s.cond.last_mut() {
                if frame.taken {
                    frame.active = false;
                } else {
                    frame.active = frame.parent_active && eval_condition(defines, &arg);
                    frame.taken = frame.active;
                }
            }
        }
        "else" => {
            if let Some(frame) = s.cond.last_mut() {
                frame.active = frame.parent_active && !frame.taken;
                frame.taken = true;
            }
        }
        "endif" => {
            s.cond.pop();
        }
        "define" if parent_active => {
            let name = first_word(&arg);
            let name = name.split('(').next().unwrap_or(name);
            let value = arg[arg.find(name).map_or(0, |p| p + name.len())..].trim();
            if !name.is_empty() {
                s.defines.insert(name.to_string(), value.to_string());
            }
        }
        "undef" if parent_active => {
            s.defines.remove(first_word(&arg));
        }
        _ => {}
    }
}

fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Evaluate a `#if` expression made of `defined(X)`, identifiers and
/// integers joined with `!`, `&&` and `||`. Unknown identifiers are 0.
fn eval_condition(defines: &HashMap<String, String>, expr: &str) -> bool {
    expr.split("||").any(|alt| {
        alt.split("&&").all(|term| {
            let mut term = term.trim();
            let mut negate = false;
            while let Some(rest) = term.strip_prefix('!') {
                negate = !negate;
                term = rest.trim_start();
            }
            while term.starts_with('(') && term.ends_with(')') && term.len() >= 2 {
                term = term[1..term.len() - 1].trim();
            }
            let value = if let Some(caps) = RE_DEFINED.captures(term) {
                defines.contains_key(&caps[1])
            } else if let Ok(n) = term.parse::<i64>() {
                n != 0
            } else {
                match defines.get(term) {
                    Some(v) => v.parse::<i64>().map_or(true, |n| n != 0),
                    None => false,
                }
            };
            value != negate
        })
    })
}
