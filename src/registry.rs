//! # Node Registry
//!
//! The registry is the package `__init__.py` the host imports to discover
//! nodes:
//!
//! ```python
//! from .TOP_flip_node import TOP_flip
//!
//! NODE_CLASS_MAPPINGS = {
//!     "TOP_flip": TOP_flip,
//! }
//!
//! NODE_DISPLAY_NAME_MAPPINGS = {
//!     "TOP_flip": "TOP_flip Node",
//! }
//! ```
//!
//! The file is loaded into a [`Registry`], updated by class name and
//! written back. Lines the model does not understand are kept verbatim.

use crate::artifact;
use crate::error::Result;
use crate::naming::{node_module_name, python_str, validate_class_name};
use std::fmt;
use std::path::Path;

pub const CLASS_MAPPINGS_MARKER: &str = "NODE_CLASS_MAPPINGS = {";
pub const DISPLAY_NAME_MAPPINGS_MARKER: &str = "NODE_DISPLAY_NAME_MAPPINGS = {";

/// What happened to one of the three registry insertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyPresent,
    /// The section marker was not found, so the insertion was skipped
    MarkerMissing,
}

impl InsertOutcome {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Inserted | Self::AlreadyPresent)
    }
}

/// Per-insertion outcome of registering one class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    pub import: InsertOutcome,
    pub class_mapping: InsertOutcome,
    pub display_name: InsertOutcome,
}

impl PatchReport {
    pub fn changed(&self) -> bool {
        [self.import, self.class_mapping, self.display_name]
            .contains(&InsertOutcome::Inserted)
    }

    /// All three entries exist after the patch
    pub fn is_complete(&self) -> bool {
        self.import.is_present() && self.class_mapping.is_present() && self.display_name.is_present()
    }
}

/// A broken registry invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryIssue {
    MissingImport(String),
    MissingDisplayName(String),
    DuplicateImport(String),
    DuplicateClassEntry(String),
    DuplicateDisplayEntry(String),
}

impl fmt::Display for RegistryIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImport(class) => write!(f, "class '{}' is mapped but never imported", class),
            Self::MissingDisplayName(class) => write!(f, "class '{}' has no display name", class),
            Self::DuplicateImport(class) => write!(f, "class '{}' is imported more than once", class),
            Self::DuplicateClassEntry(class) => write!(f, "class '{}' is mapped more than once", class),
            Self::DuplicateDisplayEntry(class) => {
                write!(f, "class '{}' has more than one display name", class)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    ClassMappings,
    DisplayNames,
}

impl SectionKind {
    fn marker(self) -> &'static str {
        match self {
            Self::ClassMappings => CLASS_MAPPINGS_MARKER,
            Self::DisplayNames => DISPLAY_NAME_MAPPINGS_MARKER,
        }
    }
}

/// A `{ ... }` mapping block, as line indices
#[derive(Debug, Clone, Copy)]
struct Section {
    marker: usize,
    /// Line of the closing brace, or the end of the file if it is missing
    end: usize,
}

/// Structured view of a registry file
#[derive(Debug, Clone)]
pub struct Registry {
    lines: Vec<String>,
    line_ending: &'static str,
    trailing_newline: bool,
    /// Index of the first line after the leading comments, docstring and imports
    import_end: usize,
    class_section: Option<Section>,
    display_section: Option<Section>,
}

impl Registry {
    pub fn parse(text: &str) -> Self {
        let mut registry = Self {
            lines: text.lines().map(str::to_string).collect(),
            line_ending: if text.contains("\r\n") { "\r\n" } else { "\n" },
            trailing_newline: text.is_empty() || text.ends_with('\n'),
            import_end: 0,
            class_section: None,
            display_section: None,
        };
        registry.reindex();
        registry
    }

    /// A registry with both mapping sections and no entries
    pub fn empty() -> Self {
        Self::parse(&format!(
            "\n{}\n}}\n\n{}\n}}\n",
            CLASS_MAPPINGS_MARKER, DISPLAY_NAME_MAPPINGS_MARKER
        ))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::parse(&artifact::read_to_string(path)?))
    }

    pub fn render(&self) -> String {
        let mut text = self.lines.join(self.line_ending);
        if self.trailing_newline && !self.lines.is_empty() {
            text.push_str(self.line_ending);
        }
        text
    }

    pub fn has_class_section(&self) -> bool {
        self.class_section.is_some()
    }

    pub fn has_display_section(&self) -> bool {
        self.display_section.is_some()
    }

    /// Class names in the class mapping, in file order
    pub fn class_names(&self) -> Vec<String> {
        self.section_keys(SectionKind::ClassMappings)
    }

    pub fn contains_class(&self, class_name: &str) -> bool {
        self.section_keys(SectionKind::ClassMappings)
            .iter()
            .any(|key| key == class_name)
    }

    pub fn display_name(&self, class_name: &str) -> Option<String> {
        let section = self.display_section?;
        self.section_lines(section)
            .filter_map(|line| parse_entry(line))
            .find(|(key, _)| *key == class_name)
            .map(|(_, value)| unquote(value.trim_end_matches(',').trim()).unwrap_or(value).to_string())
    }

    /// Add the import, class mapping and display name for a class
    ///
    /// Entries that already exist are left alone, so registering the same
    /// class twice changes nothing the second time.
    pub fn register(&mut self, class_name: &str, display_name: &str) -> Result<PatchReport> {
        validate_class_name(class_name)?;

        let class_mapping = self.insert_entry(
            SectionKind::ClassMappings,
            class_name,
            format!("    {}: {},", python_str(class_name), class_name),
        );
        let display = self.insert_entry(
            SectionKind::DisplayNames,
            class_name,
            format!("    {}: {},", python_str(class_name), python_str(display_name)),
        );
        let import = self.insert_import(class_name);

        Ok(PatchReport {
            import,
            class_mapping,
            display_name: display,
        })
    }

    /// Invariant violations: every mapped class needs exactly one import
    /// and exactly one display name
    pub fn check(&self) -> Vec<RegistryIssue> {
        let mut issues = Vec::new();
        let classes = self.class_names();
        let displays = self.section_keys(SectionKind::DisplayNames);

        let mut seen: Vec<&str> = Vec::new();
        for class in &classes {
            if seen.contains(&class.as_str()) {
                issues.push(RegistryIssue::DuplicateClassEntry(class.clone()));
                continue;
            }
            seen.push(class);

            match self.import_count(class) {
                0 => issues.push(RegistryIssue::MissingImport(class.clone())),
                1 => {}
                _ => issues.push(RegistryIssue::DuplicateImport(class.clone())),
            }
            match displays.iter().filter(|key| *key == class).count() {
                0 => issues.push(RegistryIssue::MissingDisplayName(class.clone())),
                1 => {}
                _ => issues.push(RegistryIssue::DuplicateDisplayEntry(class.clone())),
            }
        }
        issues
    }

    fn insert_import(&mut self, class_name: &str) -> InsertOutcome {
        if self.import_count(class_name) > 0 {
            return InsertOutcome::AlreadyPresent;
        }
        let line = format!("from .{} import {}", node_module_name(class_name), class_name);
        self.lines.insert(self.import_end, line);
        self.reindex();
        InsertOutcome::Inserted
    }

    fn insert_entry(&mut self, kind: SectionKind, class_name: &str, line: String) -> InsertOutcome {
        let Some(section) = self.section(kind) else {
            tracing::warn!(
                "[TDNC] Registry marker '{}' not found; skipping entry for {}",
                kind.marker(),
                class_name
            );
            return InsertOutcome::MarkerMissing;
        };
        if self.section_keys(kind).iter().any(|key| key == class_name) {
            return InsertOutcome::AlreadyPresent;
        }
        self.lines.insert(section.marker + 1, line);
        self.reindex();
        InsertOutcome::Inserted
    }

    fn import_count(&self, class_name: &str) -> usize {
        self.import_statements()
            .iter()
            .filter(|statement| statement.names.iter().any(|name| name == class_name))
            .count()
    }

    fn section(&self, kind: SectionKind) -> Option<Section> {
        match kind {
            SectionKind::ClassMappings => self.class_section,
            SectionKind::DisplayNames => self.display_section,
        }
    }

    fn section_lines(&self, section: Section) -> impl Iterator<Item = &str> {
        self.lines[section.marker + 1..section.end].iter().map(String::as_str)
    }

    fn section_keys(&self, kind: SectionKind) -> Vec<String> {
        match self.section(kind) {
            Some(section) => self
                .section_lines(section)
                .filter_map(parse_entry)
                .map(|(key, _)| key.to_string())
                .collect(),
            None => Vec::new(),
        }
    }

    fn reindex(&mut self) {
        self.import_end = header_end(&self.lines);
        self.class_section = self.find_section(SectionKind::ClassMappings);
        self.display_section = self.find_section(SectionKind::DisplayNames);
    }

    fn import_statements(&self) -> Vec<ImportStatement> {
        let mut statements = Vec::new();
        let mut index = 0;
        while index < self.lines.len() {
            match import_at(&self.lines, index) {
                Some(statement) => {
                    index = statement.end;
                    statements.push(statement);
                }
                None => index += 1,
            }
        }
        statements
    }

    fn find_section(&self, kind: SectionKind) -> Option<Section> {
        let marker = self
            .lines
            .iter()
            .position(|line| line.trim_end() == kind.marker())?;
        let end = self.lines[marker + 1..]
            .iter()
            .position(|line| line.trim_start().starts_with('}'))
            .map(|offset| marker + 1 + offset)
            .unwrap_or(self.lines.len());
        Some(Section { marker, end })
    }
}

/// An import statement, possibly continued over several lines
#[derive(Debug)]
struct ImportStatement {
    /// Line after the last line of the statement
    end: usize,
    names: Vec<String>,
}

/// Index of the line after the module header
///
/// The header is the leading run of comments, an optional module docstring
/// and import statements. Blank lines inside it are skipped; a comment only
/// belongs to the header when no blank line separates it from the header.
fn header_end(lines: &[String]) -> usize {
    let mut end = 0;
    let mut index = 0;
    let mut gap = false;
    let mut docstring_allowed = true;
    while index < lines.len() {
        let trimmed = lines[index].trim();
        if trimmed.is_empty() {
            gap = true;
            index += 1;
        } else if trimmed.starts_with('#') {
            index += 1;
            if !gap {
                end = index;
            }
        } else if let Some(statement) = import_at(lines, index) {
            index = statement.end;
            end = index;
            gap = false;
            docstring_allowed = false;
        } else if let Some(close) = docstring_allowed.then(|| docstring_at(lines, index)).flatten() {
            index = close;
            end = index;
            gap = false;
            docstring_allowed = false;
        } else {
            break;
        }
    }
    end
}

/// Line after the end of a triple-quoted string starting at `start`
fn docstring_at(lines: &[String], start: usize) -> Option<usize> {
    let first = lines[start].trim_start();
    let quote = ["\"\"\"", "'''"]
        .into_iter()
        .find(|quote| first.starts_with(quote))?;
    if first[quote.len()..].contains(quote) {
        return Some(start + 1);
    }
    let close = lines[start + 1..]
        .iter()
        .position(|line| line.contains(quote))
        .map(|offset| start + 2 + offset)
        .unwrap_or(lines.len());
    Some(close)
}

/// The import statement starting at line `start`, if there is one
///
/// Parenthesized name lists and backslash continuations are followed to
/// the line that closes the statement.
fn import_at(lines: &[String], start: usize) -> Option<ImportStatement> {
    if !is_import(code_part(&lines[start]).trim()) {
        return None;
    }
    let mut text = String::new();
    let mut depth = 0usize;
    let mut end = start;
    while end < lines.len() {
        let code = code_part(&lines[end]).trim();
        end += 1;
        depth += code.matches('(').count();
        depth = depth.saturating_sub(code.matches(')').count());
        let continued = code.ends_with('\\');
        text.push_str(code.trim_end_matches('\\'));
        text.push(' ');
        if depth == 0 && !continued {
            break;
        }
    }
    Some(ImportStatement {
        end,
        names: imported_names(&text),
    })
}

/// A line without its trailing comment
fn code_part(line: &str) -> &str {
    match line.find('#') {
        Some(hash) => &line[..hash],
        None => line,
    }
}

fn is_import(line: &str) -> bool {
    line.starts_with("import ") || (line.starts_with("from ") && line.contains(" import "))
}

/// Names bound by an import statement
fn imported_names(statement: &str) -> Vec<String> {
    let statement = code_part(statement).trim();
    let bound = if statement.starts_with("from ") {
        match statement.split_once(" import ") {
            Some((_, names)) => names,
            None => return Vec::new(),
        }
    } else if let Some(modules) = statement.strip_prefix("import ") {
        modules
    } else {
        return Vec::new();
    };

    bound
        .trim()
        .trim_matches(|c: char| c == '(' || c == ')')
        .split(',')
        .filter_map(|item| {
            let item = item.trim();
            let name = match item.split_once(" as ") {
                Some((_, alias)) => alias.trim(),
                None => item.split('.').next().unwrap_or(item),
            };
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}

/// `"key": value` → `(key, value)`
fn parse_entry(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let quote = line.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &line[1..];
    let close = rest.find(quote)?;
    let key = &rest[..close];
    let value = rest[close + 1..].trim_start().strip_prefix(':')?;
    Some((key, value.trim()))
}

fn unquote(value: &str) -> Option<&str> {
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    value.strip_prefix(quote)?.strip_suffix(quote)
}

/// Register a class in the registry file at `path`
///
/// A missing registry file is created with empty mapping sections. The file
/// is only rewritten when something was inserted. There is no locking: two
/// processes patching the same registry at once can lose entries.
pub fn patch(path: &Path, class_name: &str, display_name: &str) -> Result<PatchReport> {
    let mut registry = if path.exists() {
        Registry::load(path)?
    } else {
        tracing::info!("[TDNC] Creating registry {}", path.display());
        Registry::empty()
    };

    let report = registry.register(class_name, display_name)?;
    if report.changed() {
        artifact::write_atomic(path, registry.render().as_bytes())?;
    }

    tracing::info!(
        "[TDNC] Registry {}: import {:?}, class mapping {:?}, display name {:?}",
        path.display(),
        report.import,
        report.class_mapping,
        report.display_name
    );
    for issue in registry.check() {
        tracing::warn!("[TDNC] Registry {}: {}", path.display(), issue);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REGISTRY: &str = "\
from .dynamic_node import DynamicNode
from .TOP_flipflop_node import TOP_flipflop

NODE_CLASS_MAPPINGS = {
    \"TOP_flipflop\": TOP_flipflop,
    \"DynamicNode\": DynamicNode
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"TOP_flipflop\": \"TOP_flipflop Node\",
    \"DynamicNode\": \"Dynamic Node\"
}
";

    #[test]
    fn register_inserts_three_entries() {
        let mut registry = Registry::parse(REGISTRY);
        let report = registry.register("TOP_flip", "TOP_flip Node").unwrap();

        assert_eq!(report.import, InsertOutcome::Inserted);
        assert_eq!(report.class_mapping, InsertOutcome::Inserted);
        assert_eq!(report.display_name, InsertOutcome::Inserted);
        assert_eq!(
            registry.render(),
            "\
from .dynamic_node import DynamicNode
from .TOP_flipflop_node import TOP_flipflop
from .TOP_flip_node import TOP_flip

NODE_CLASS_MAPPINGS = {
    \"TOP_flip\": TOP_flip,
    \"TOP_flipflop\": TOP_flipflop,
    \"DynamicNode\": DynamicNode
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"TOP_flip\": \"TOP_flip Node\",
    \"TOP_flipflop\": \"TOP_flipflop Node\",
    \"DynamicNode\": \"Dynamic Node\"
}
"
        );
        assert!(registry.check().is_empty());
    }

    #[test]
    fn registering_twice_is_a_no_op() {
        let mut registry = Registry::parse(REGISTRY);
        registry.register("TOP_flip", "TOP_flip Node").unwrap();
        let once = registry.render();

        let report = registry.register("TOP_flip", "TOP_flip Node").unwrap();
        assert!(!report.changed());
        assert!(report.is_complete());
        assert_eq!(report.import, InsertOutcome::AlreadyPresent);
        assert_eq!(registry.render(), once);
        assert_eq!(once.matches("import TOP_flip\n").count(), 1);
        assert_eq!(once.matches("\"TOP_flip\":").count(), 2);
    }

    #[test]
    fn existing_classes_are_recognized() {
        let mut registry = Registry::parse(REGISTRY);
        assert_eq!(registry.class_names(), ["TOP_flipflop", "DynamicNode"]);
        assert!(registry.contains_class("DynamicNode"));
        assert_eq!(registry.display_name("DynamicNode").as_deref(), Some("Dynamic Node"));

        let report = registry.register("DynamicNode", "Another Name").unwrap();
        assert!(!report.changed());
        assert_eq!(registry.render(), REGISTRY);
    }

    #[test]
    fn missing_marker_skips_only_that_insertion() {
        let text = "from .a_node import a\n\nNODE_CLASS_MAPPINGS = {\n    \"a\": a,\n}\n";
        let mut registry = Registry::parse(text);
        assert!(!registry.has_display_section());

        let report = registry.register("b", "b Node").unwrap();
        assert_eq!(report.import, InsertOutcome::Inserted);
        assert_eq!(report.class_mapping, InsertOutcome::Inserted);
        assert_eq!(report.display_name, InsertOutcome::MarkerMissing);
        assert!(!report.is_complete());
        assert_eq!(
            registry.render(),
            "from .a_node import a\nfrom .b_node import b\n\nNODE_CLASS_MAPPINGS = {\n    \"b\": b,\n    \"a\": a,\n}\n"
        );
    }

    #[test]
    fn import_goes_after_leading_comments_when_there_are_no_imports() {
        let mut registry = Registry::parse("# generated nodes\n\nNODE_CLASS_MAPPINGS = {\n}\n");
        registry.register("x", "x Node").unwrap();
        assert!(registry.render().starts_with("# generated nodes\nfrom .x_node import x\n\n"));
    }

    #[test]
    fn marker_match_ignores_trailing_whitespace_only() {
        let registry = Registry::parse("NODE_CLASS_MAPPINGS = {   \n}\n");
        assert!(registry.has_class_section());
        let registry = Registry::parse("NODE_CLASS_MAPPINGS = {}\n");
        assert!(!registry.has_class_section());
    }

    #[test]
    fn crlf_line_endings_are_preserved() {
        let mut registry = Registry::parse(&REGISTRY.replace('\n', "\r\n"));
        registry.register("TOP_flip", "TOP_flip Node").unwrap();
        let text = registry.render();
        assert!(text.contains("from .TOP_flip_node import TOP_flip\r\n"));
        assert!(!text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn empty_registry_has_both_sections() {
        let mut registry = Registry::empty();
        let report = registry.register("TOP_flip", "TOP_flip Node").unwrap();
        assert!(report.is_complete());
        assert_eq!(
            registry.render(),
            "from .TOP_flip_node import TOP_flip\n\nNODE_CLASS_MAPPINGS = {\n    \"TOP_flip\": TOP_flip,\n}\n\nNODE_DISPLAY_NAME_MAPPINGS = {\n    \"TOP_flip\": \"TOP_flip Node\",\n}\n"
        );
    }

    #[test]
    fn check_reports_broken_invariants() {
        let text = "\
from .a_node import a
from .a_node import a

NODE_CLASS_MAPPINGS = {
    \"a\": a,
    \"b\": b,
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"a\": \"A\",
}
";
        let issues = Registry::parse(text).check();
        assert_eq!(
            issues,
            vec![
                RegistryIssue::DuplicateImport("a".to_string()),
                RegistryIssue::MissingImport("b".to_string()),
                RegistryIssue::MissingDisplayName("b".to_string()),
            ]
        );
    }

    #[test]
    fn imported_names_handle_aliases_and_lists() {
        assert_eq!(imported_names("from .x_node import x"), ["x"]);
        assert_eq!(imported_names("from .m import (a, b as c)"), ["a", "c"]);
        assert_eq!(imported_names("import os.path"), ["os"]);
        assert!(imported_names("NODE_CLASS_MAPPINGS = {").is_empty());
    }

    #[test]
    fn imported_names_ignore_trailing_comments() {
        assert_eq!(imported_names("from .a_node import a  # noqa: F401"), ["a"]);
        assert_eq!(imported_names("import os # path helpers"), ["os"]);
    }

    /// Register `class_name` twice and return the text after the first pass
    fn register_twice(registry: &mut Registry, class_name: &str) -> String {
        let display = format!("{} Node", class_name);
        registry.register(class_name, &display).unwrap();
        let once = registry.render();
        let report = registry.register(class_name, &display).unwrap();
        assert!(!report.changed());
        assert_eq!(registry.render(), once);
        once
    }

    #[test]
    fn parenthesized_import_is_one_statement() {
        let text = "\
from .a_node import (
    a,
)

NODE_CLASS_MAPPINGS = {
    \"a\": a,
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"a\": \"A\",
}
";
        let mut registry = Registry::parse(text);
        assert!(registry.check().is_empty());

        let report = registry.register("a", "A").unwrap();
        assert_eq!(report.import, InsertOutcome::AlreadyPresent);

        let once = register_twice(&mut registry, "b");
        assert_eq!(
            once,
            "\
from .a_node import (
    a,
)
from .b_node import b

NODE_CLASS_MAPPINGS = {
    \"b\": b,
    \"a\": a,
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"b\": \"b Node\",
    \"a\": \"A\",
}
"
        );
        assert!(registry.check().is_empty());
    }

    #[test]
    fn backslash_continued_import_is_one_statement() {
        let text = "from .pair_node import a, \\\n    b\n\nNODE_CLASS_MAPPINGS = {\n    \"b\": b,\n}\n";
        let mut registry = Registry::parse(text);
        assert_eq!(registry.import_count("b"), 1);

        let once = register_twice(&mut registry, "c");
        assert!(once.starts_with("from .pair_node import a, \\\n    b\nfrom .c_node import c\n\n"));
    }

    #[test]
    fn import_with_trailing_comment_is_already_present() {
        let text = "\
from .a_node import a  # noqa: F401

NODE_CLASS_MAPPINGS = {
    \"a\": a,
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"a\": \"A\",
}
";
        let mut registry = Registry::parse(text);
        let report = registry.register("a", "A").unwrap();
        assert_eq!(report.import, InsertOutcome::AlreadyPresent);
        assert!(!report.changed());
        assert_eq!(registry.render(), text);
        assert!(registry.check().is_empty());

        let once = register_twice(&mut registry, "b");
        assert!(once.starts_with("from .a_node import a  # noqa: F401\nfrom .b_node import b\n\n"));
        assert_eq!(once.matches("import a").count(), 1);
    }

    #[test]
    fn import_goes_after_module_docstring() {
        let text = "\
\"\"\"Generated nodes.

Edited by hand.
\"\"\"

NODE_CLASS_MAPPINGS = {
}

NODE_DISPLAY_NAME_MAPPINGS = {
}
";
        let mut registry = Registry::parse(text);
        let once = register_twice(&mut registry, "x");
        assert!(once.starts_with(
            "\"\"\"Generated nodes.\n\nEdited by hand.\n\"\"\"\nfrom .x_node import x\n\nNODE_CLASS_MAPPINGS"
        ));
        assert!(registry.check().is_empty());
    }

    #[test]
    fn import_goes_after_imports_that_follow_a_docstring() {
        let text = "\
# -*- coding: utf-8 -*-
\"\"\"Node package.\"\"\"

from .a_node import a

# Mappings
NODE_CLASS_MAPPINGS = {
    \"a\": a,
}

NODE_DISPLAY_NAME_MAPPINGS = {
    \"a\": \"A\",
}
";
        let mut registry = Registry::parse(text);
        let once = register_twice(&mut registry, "b");
        assert!(once.starts_with(
            "# -*- coding: utf-8 -*-\n\"\"\"Node package.\"\"\"\n\nfrom .a_node import a\nfrom .b_node import b\n\n# Mappings\n"
        ));
        assert!(registry.check().is_empty());
    }

    #[test]
    fn control_characters_in_display_name_stay_on_one_line() {
        let mut registry = Registry::empty();
        registry.register("x", "x\r\nNode").unwrap();
        let text = registry.render();
        assert!(text.contains("    \"x\": \"x\\r\\nNode\",\n"));
        assert_eq!(text.lines().count(), Registry::empty().render().lines().count() + 3);
    }

    #[test]
    fn invalid_class_name_leaves_registry_untouched() {
        let mut registry = Registry::parse(REGISTRY);
        assert!(registry.register("not valid", "x").is_err());
        assert_eq!(registry.render(), REGISTRY);
    }

    #[test]
    fn patch_creates_and_updates_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("__init__.py");

        let first = patch(&path, "TOP_flip", "TOP_flip Node").unwrap();
        assert!(first.changed());
        let second = patch(&path, "TOP_flip", "TOP_flip Node").unwrap();
        assert!(!second.changed());

        let registry = Registry::load(&path).unwrap();
        assert_eq!(registry.class_names(), ["TOP_flip"]);
        assert!(registry.check().is_empty());
    }
}
