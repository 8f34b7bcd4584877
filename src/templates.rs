//! # Templates Module
//!
//! This module loads and renders the `.jinja2` templates used for license
//! headers and for the files generated by the tech review.
//!
//! Only a small subset of Jinja is supported:
//! - `{{ name }}` substitutes a string variable
//! - `{% for item in list %}` ... `{% endfor %}` repeats the enclosed lines for
//!   each element of a list variable
//!
//! Block tags must sit on their own line, and those lines produce no output.
//!
//! ## Example
//!
//! ```rust
//! use compliance_hooks::templates::{Context, Template};
//!
//! # fn main() -> anyhow::Result<()> {
//! let template = Template::from_source(
//!   "header",
//!   "{% for line in copyright_lines %}\n{{ line }}\n{% endfor %}\nSPDX-License-Identifier: {{ license }}\n",
//! );
//!
//! let context = Context::new()
//!   .insert_list("copyright_lines", vec!["Copyright (C) 2025 Acme".to_string()])
//!   .insert("license", "MIT");
//!
//! assert_eq!(
//!   template.render(&context)?,
//!   "Copyright (C) 2025 Acme\nSPDX-License-Identifier: MIT\n"
//! );
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context as _, Result};
use regex::Regex;

use crate::verbose_log;

/// Directory, relative to the repository root, holding header templates.
pub const HEADER_TEMPLATE_DIR: &str = ".reuse/templates";

const TEMPLATE_EXTENSION: &str = "jinja2";

static VARIABLE_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("variable regex must compile"));

static FOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^\{%-?\s*for\s+(\w+)\s+in\s+(\w+)\s*-?%\}$").expect("for tag regex must compile")
});

static ENDFOR_REGEX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\{%-?\s*endfor\s*-?%\}$").expect("endfor tag regex must compile"));

/// Error type for template loading and rendering.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
  #[error("Template '{name}' could not be found in {path}")]
  NotFound { name: String, path: PathBuf },

  #[error("Template '{template}' uses undefined variable '{variable}'")]
  UndefinedVariable { template: String, variable: String },

  #[error("Template '{template}' has a for block that is never closed")]
  UnterminatedBlock { template: String },

  #[error("Template '{template}' has an unsupported or unexpected tag on line {line}")]
  UnexpectedTag { template: String, line: usize },
}

/// A value that can be referenced from a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
  Str(String),
  List(Vec<String>),
}

/// Variables available while rendering.
#[derive(Debug, Clone, Default)]
pub struct Context {
  values: BTreeMap<String, Value>,
}

impl Context {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a string variable.
  pub fn insert(mut self, name: &str, value: impl Into<String>) -> Self {
    self.values.insert(name.to_string(), Value::Str(value.into()));
    self
  }

  /// Adds a list variable, usable in `{% for %}` blocks.
  pub fn insert_list(mut self, name: &str, values: Vec<String>) -> Self {
    self.values.insert(name.to_string(), Value::List(values));
    self
  }

  pub fn get(&self, name: &str) -> Option<&Value> {
    self.values.get(name)
  }
}

#[derive(Debug)]
enum Node {
  Text(String),
  For { item: String, list: String, body: Vec<Node> },
}

/// A loaded template.
#[derive(Debug, Clone)]
pub struct Template {
  name: String,
  source: String,
}

impl Template {
  /// Creates a template from in-memory source.
  pub fn from_source(name: &str, source: &str) -> Self {
    Self {
      name: name.to_string(),
      source: source.to_string(),
    }
  }

  /// Loads a template from a file.
  pub fn load(path: &Path) -> Result<Self> {
    verbose_log!("Loading template from: {}", path.display());

    let source = fs::read_to_string(path).with_context(|| format!("Failed to read template file: {}", path.display()))?;
    let name = path
      .file_stem()
      .and_then(|s| s.to_str())
      .unwrap_or_default()
      .to_string();

    Ok(Self { name, source })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Renders the template with `context`.
  pub fn render(&self, context: &Context) -> Result<String, TemplateError> {
    let nodes = self.parse()?;
    let mut output = String::with_capacity(self.source.len());
    let mut scope = Vec::new();
    self.render_nodes(&nodes, context, &mut scope, &mut output)?;
    Ok(output)
  }

  fn parse(&self) -> Result<Vec<Node>, TemplateError> {
    // Each frame holds the nodes of one open block.
    let mut frames: Vec<(Option<(String, String)>, Vec<Node>)> = vec![(None, Vec::new())];

    for (index, line) in self.source.split_inclusive('\n').enumerate() {
      let tag = line.trim();

      if let Some(caps) = FOR_REGEX.captures(tag) {
        frames.push((Some((caps[1].to_string(), caps[2].to_string())), Vec::new()));
      } else if ENDFOR_REGEX.is_match(tag) {
        let (header, body) = frames.pop().ok_or_else(|| self.unexpected_tag(index))?;
        let (item, list) = header.ok_or_else(|| self.unexpected_tag(index))?;
        let parent = frames.last_mut().ok_or_else(|| self.unexpected_tag(index))?;
        parent.1.push(Node::For { item, list, body });
      } else if tag.contains("{%") {
        return Err(self.unexpected_tag(index));
      } else if let Some(frame) = frames.last_mut() {
        frame.1.push(Node::Text(line.to_string()));
      }
    }

    if frames.len() != 1 {
      return Err(TemplateError::UnterminatedBlock {
        template: self.name.clone(),
      });
    }

    Ok(frames.pop().map(|(_, nodes)| nodes).unwrap_or_default())
  }

  fn render_nodes(
    &self,
    nodes: &[Node],
    context: &Context,
    scope: &mut Vec<(String, String)>,
    output: &mut String,
  ) -> Result<(), TemplateError> {
    for node in nodes {
      match node {
        Node::Text(line) => output.push_str(&self.substitute(line, context, scope)?),
        Node::For { item, list, body } => {
          let values = match context.get(list) {
            Some(Value::List(values)) => values,
            _ => return Err(self.undefined(list)),
          };

          for value in values {
            scope.push((item.clone(), value.clone()));
            let result = self.render_nodes(body, context, scope, output);
            scope.pop();
            result?;
          }
        }
      }
    }

    Ok(())
  }

  fn substitute(&self, line: &str, context: &Context, scope: &[(String, String)]) -> Result<String, TemplateError> {
    let mut result = String::with_capacity(line.len());
    let mut last = 0;

    for caps in VARIABLE_REGEX.captures_iter(line) {
      let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
        continue;
      };
      let name = name.as_str();

      let value = scope
        .iter()
        .rev()
        .find(|(item, _)| item == name)
        .map(|(_, value)| value.as_str())
        .or_else(|| match context.get(name) {
          Some(Value::Str(value)) => Some(value.as_str()),
          _ => None,
        })
        .ok_or_else(|| self.undefined(name))?;

      result.push_str(&line[last..whole.start()]);
      result.push_str(value);
      last = whole.end();
    }

    result.push_str(&line[last..]);
    Ok(result)
  }

  fn undefined(&self, variable: &str) -> TemplateError {
    TemplateError::UndefinedVariable {
      template: self.name.clone(),
      variable: variable.to_string(),
    }
  }

  fn unexpected_tag(&self, index: usize) -> TemplateError {
    TemplateError::UnexpectedTag {
      template: self.name.clone(),
      line: index + 1,
    }
  }
}

/// Locates the header template `name` in the repository.
///
/// `name` may be given with or without the `.jinja2` extension.
pub fn find_header_template(repo_root: &Path, name: &str) -> Result<PathBuf, TemplateError> {
  let dir = repo_root.join(HEADER_TEMPLATE_DIR);
  let file_name = if name.ends_with(&format!(".{TEMPLATE_EXTENSION}")) {
    name.to_string()
  } else {
    format!("{name}.{TEMPLATE_EXTENSION}")
  };

  let path = dir.join(file_name);
  if path.is_file() {
    Ok(path)
  } else {
    Err(TemplateError::NotFound {
      name: name.to_string(),
      path: dir,
    })
  }
}

/// Loads the header template `name` from the repository.
pub fn load_header_template(repo_root: &Path, name: &str) -> Result<Template> {
  let path = find_header_template(repo_root, name)?;
  Template::load(&path)
}
