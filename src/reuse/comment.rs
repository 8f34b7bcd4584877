//! # Comment Style Module
//!
//! This module decides how a header is commented for a given file and how an
//! existing leading comment block is located.
//!
//! Styles come from a built-in table keyed by extension or filename, which the
//! `[comment-styles]` and `[filenames]` sections of the config file can
//! override. Files whose type is not recognised resolve to `None` and are
//! skipped by the processor.

use std::collections::HashMap;
use std::path::Path;

use crate::config::{CommentStyleConfig, Config};
use crate::verbose_log;

/// Defines the comment style for a file type.
///
/// Line styles only set `middle` (e.g. `"# "`). Block styles also set a `top`
/// and `bottom` marker (e.g. `"/*"`, `" * "`, `" */"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
  /// The string to use at the top of a comment block
  pub top: String,

  /// The string to use at the beginning of each line in the comment block
  pub middle: String,

  /// The string to use at the bottom of a comment block
  pub bottom: String,
}

impl CommentStyle {
  /// Create a line-comment style (no top/bottom markers).
  pub fn line(prefix: &str) -> Self {
    Self {
      top: String::new(),
      middle: prefix.to_string(),
      bottom: String::new(),
    }
  }

  /// Create a block-comment style.
  pub fn block(top: &str, middle: &str, bottom: &str) -> Self {
    Self {
      top: top.to_string(),
      middle: middle.to_string(),
      bottom: bottom.to_string(),
    }
  }

  pub fn is_block(&self) -> bool {
    !self.top.is_empty()
  }

  /// Comments `text` line by line.
  ///
  /// Blank lines get the trimmed middle marker so no trailing whitespace is
  /// produced. The result always ends with a newline.
  pub fn comment(&self, text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 64);

    if self.is_block() {
      result.push_str(&self.top);
      result.push('\n');
    }

    for line in text.lines() {
      if line.is_empty() {
        result.push_str(self.middle.trim_end());
      } else {
        result.push_str(&self.middle);
        result.push_str(line);
      }
      result.push('\n');
    }

    if self.is_block() {
      result.push_str(&self.bottom);
      result.push('\n');
    }

    result
  }

  /// Returns the byte length of the comment block at the start of `content`.
  ///
  /// For line styles this is the run of lines starting with the trimmed
  /// middle marker. For block styles it runs from the opening marker to the
  /// line holding the closing marker. Returns `None` when `content` does not
  /// start with a comment.
  pub fn leading_block_len(&self, content: &str) -> Option<usize> {
    if self.is_block() {
      self.leading_block_comment_len(content)
    } else {
      self.leading_line_comment_len(content)
    }
  }

  fn leading_line_comment_len(&self, content: &str) -> Option<usize> {
    let marker = self.middle.trim();
    if marker.is_empty() {
      return None;
    }

    let mut len = 0;
    for line in content.split_inclusive('\n') {
      if !line.trim_start().starts_with(marker) {
        break;
      }
      len += line.len();
    }

    (len > 0).then_some(len)
  }

  fn leading_block_comment_len(&self, content: &str) -> Option<usize> {
    let opener = self.top.trim();
    let closer = self.bottom.trim();

    let mut lines = content.split_inclusive('\n');
    let first = lines.next()?;
    let first_trimmed = first.trim();

    // "/*" and "/**" open the same kind of comment.
    let short_opener: String = opener.chars().take(2).collect();
    let Some(after_opener) = first_trimmed.strip_prefix(short_opener.as_str()) else {
      return None;
    };

    let mut len = first.len();
    if after_opener.contains(closer) {
      return Some(len);
    }

    for line in lines {
      len += line.len();
      if line.contains(closer) {
        return Some(len);
      }
    }

    // Unterminated block comments are not treated as a header.
    None
  }
}

impl From<&CommentStyleConfig> for CommentStyle {
  fn from(config: &CommentStyleConfig) -> Self {
    Self {
      top: config.top.clone(),
      middle: config.middle.clone(),
      bottom: config.bottom.clone(),
    }
  }
}

/// Trait for resolving comment styles for file paths.
///
/// Implementations can use built-in mappings, user configuration, or both.
pub trait CommentStyleResolver: Send + Sync {
  /// Resolve the comment style for the given file path, or `None` when the
  /// file type is not recognised.
  fn resolve(&self, path: &Path) -> Option<CommentStyle>;
}

/// Default resolver using built-in mappings.
#[derive(Debug, Default)]
pub struct BuiltinResolver;

impl CommentStyleResolver for BuiltinResolver {
  fn resolve(&self, path: &Path) -> Option<CommentStyle> {
    get_comment_style_for_file(path)
  }
}

/// Resolver that checks the user's config first, then falls back to the
/// built-in table.
#[derive(Debug, Default)]
pub struct ConfigurableResolver {
  comment_styles: HashMap<String, CommentStyle>,
  filenames: HashMap<String, CommentStyle>,
}

impl ConfigurableResolver {
  /// Create a new configurable resolver from a loaded config.
  pub fn new(config: &Config) -> Self {
    Self {
      comment_styles: config
        .comment_styles
        .iter()
        .map(|(k, v)| (k.clone(), CommentStyle::from(v)))
        .collect(),
      filenames: config
        .filenames
        .iter()
        .map(|(k, v)| (k.clone(), CommentStyle::from(v)))
        .collect(),
    }
  }
}

impl CommentStyleResolver for ConfigurableResolver {
  fn resolve(&self, path: &Path) -> Option<CommentStyle> {
    let file_name = path
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or("")
      .to_lowercase();

    // 1. Exact filename match
    if let Some(style) = self.filenames.get(&file_name) {
      verbose_log!("Using config filename override for: {}", file_name);
      return Some(style.clone());
    }

    // 2. Filename glob match
    for (pattern, style) in &self.filenames {
      if pattern.contains('*')
        && let Ok(glob_pattern) = glob::Pattern::new(pattern)
        && glob_pattern.matches(&file_name)
      {
        verbose_log!("Using config filename glob override '{}' for: {}", pattern, file_name);
        return Some(style.clone());
      }
    }

    // 3. Extension override
    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .unwrap_or("")
      .to_lowercase();

    if let Some(style) = self.comment_styles.get(&extension) {
      verbose_log!("Using config extension override for: .{}", extension);
      return Some(style.clone());
    }

    get_comment_style_for_file(path)
  }
}

/// Create a comment style resolver based on the provided configuration.
///
/// With a config file present, user overrides are checked first. Otherwise
/// only the built-in table is used.
pub fn create_resolver(config: Option<&Config>) -> Box<dyn CommentStyleResolver> {
  match config {
    Some(cfg) if cfg.has_overrides() => Box::new(ConfigurableResolver::new(cfg)),
    _ => Box::new(BuiltinResolver),
  }
}

/// Determines the comment style for a file based on its extension or name.
fn get_comment_style_for_file(path: &Path) -> Option<CommentStyle> {
  let file_name = path
    .file_name()
    .and_then(|name| name.to_str())
    .unwrap_or("")
    .to_lowercase();

  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or("")
    .to_lowercase();

  let style = match extension.as_str() {
    "c" | "h" | "gv" | "java" | "scala" | "kt" | "kts" => CommentStyle::block("/*", " * ", " */"),
    "js" | "mjs" | "cjs" | "jsx" | "tsx" | "css" | "scss" | "sass" | "ts" => CommentStyle::block("/**", " * ", " */"),
    "cc" | "cpp" | "cxx" | "cs" | "go" | "hcl" | "hh" | "hpp" | "m" | "mm" | "proto" | "rs" | "swift" | "dart"
    | "groovy" | "v" | "sv" | "php" => CommentStyle::line("// "),
    "py" | "pyi" | "pyx" | "pxd" | "sh" | "bash" | "zsh" | "ps1" | "yaml" | "yml" | "rb" | "tcl" | "tf" | "bzl"
    | "pl" | "pp" | "toml" | "cfg" | "r" | "jl" | "cmake" | "mk" => CommentStyle::line("# "),
    "el" | "lisp" => CommentStyle::line(";; "),
    "erl" => CommentStyle::line("% "),
    "f90" | "f95" | "f03" => CommentStyle::line("! "),
    "bat" | "cmd" => CommentStyle::line("REM "),
    "hs" | "sql" | "sdl" | "lua" => CommentStyle::line("-- "),
    "html" | "xml" | "vue" | "wxi" | "wxl" | "wxs" | "xsd" => CommentStyle::block("<!--", "", "-->"),
    "md" | "markdown" => CommentStyle::block("<!--", "", "-->"),
    "rst" => CommentStyle::line(".. "),
    "j2" | "jinja" | "jinja2" => CommentStyle::block("{#", "", "#}"),
    "ml" | "mli" | "mll" | "mly" => CommentStyle::block("(**", "   ", "*)"),
    _ => {
      if file_name == "cmakelists.txt"
        || file_name == "dockerfile"
        || file_name.ends_with(".dockerfile")
        || file_name == "makefile"
        || file_name == "gemfile"
        || file_name == "rakefile"
      {
        CommentStyle::line("# ")
      } else {
        return None;
      }
    }
  };

  Some(style)
}
