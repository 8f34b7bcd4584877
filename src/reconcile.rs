//! # Reconcile Module
//!
//! Merges a freshly annotated file with the content it had before the
//! annotator ran. The new header block is kept, and everything after the
//! header is restored from the earlier snapshot so that edits made by other
//! hooks earlier in the same pre-commit run are not lost.

use crate::processor::line_ending;

/// Merges `after` (annotated) with `before` (pre-annotation snapshot).
///
/// `is_header_line` decides whether a line belongs to the copyright/license
/// metadata block. The output is the header block of `after` followed by the
/// remainder of `before`, starting where `before`'s own header ended. Lines
/// are compared without their terminators. The restored body is
/// byte-for-byte identical, and the lines taken from `after` are written
/// with the terminator of `before`'s first line.
///
/// When `after` carries no header metadata at all, it is returned unchanged.
pub fn reconcile<F>(before: &str, after: &str, is_header_line: F) -> String
where
  F: Fn(&str) -> bool,
{
  let before_lines: Vec<&str> = before.split_inclusive('\n').collect();
  let after_lines: Vec<&str> = after.split_inclusive('\n').collect();

  let newline = line_ending(before).or_else(|| line_ending(after)).unwrap_or("\n");
  let mut output = String::with_capacity(after.len().max(before.len()));
  let mut count = 0usize;
  let mut found_header = false;

  for line in &after_lines {
    let content = strip_terminator(line);

    if is_header_line(content) {
      if !found_header {
        found_header = true;
        while before_lines.get(count).is_some_and(|b| is_header_line(strip_terminator(b))) {
          count += 1;
        }
      }
      push_terminated(&mut output, line, newline);
      continue;
    }

    if !found_header {
      push_terminated(&mut output, line, newline);
      count += 1;
      continue;
    }

    // First line after the header block.
    if let Some(previous) = before_lines.get(count)
      && strip_terminator(previous) != content
    {
      output.push_str(strip_terminator(line));
      output.push_str(newline);
    }
    append_remaining(&mut output, &before_lines, count, newline);
    return output;
  }

  if found_header {
    append_remaining(&mut output, &before_lines, count, newline);
    return output;
  }

  after.to_string()
}

fn strip_terminator(line: &str) -> &str {
  line.strip_suffix('\n').map(|l| l.strip_suffix('\r').unwrap_or(l)).unwrap_or(line)
}

/// Pushes `line` with its terminator replaced by `newline`. An unterminated
/// last line stays unterminated.
fn push_terminated(output: &mut String, line: &str, newline: &str) {
  output.push_str(strip_terminator(line));
  if line.ends_with('\n') {
    output.push_str(newline);
  }
}

fn append_remaining(output: &mut String, before_lines: &[&str], count: usize, newline: &str) {
  if count >= before_lines.len() {
    return;
  }
  if !output.is_empty() && !output.ends_with('\n') {
    output.push_str(newline);
  }
  for line in &before_lines[count..] {
    output.push_str(line);
  }
}
