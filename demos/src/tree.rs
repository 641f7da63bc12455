// SPDX-License-Identifier: Apache-2.0

//! Hierarchy view of a parsed document.
//!
//! Values are printed as they appear in the input, escapes included. Long
//! arrays and objects are cut short and deep subtrees are elided.

use core::fmt;

use flatjson::{Grow, JsonStr, Parser, Span, TokenIndex, Value, ROOT};

/// Limits applied when rendering the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Containers deeper than this are shown as `...`
    pub max_depth: usize,
    /// Array elements shown per array
    pub array_children: u32,
    /// Members shown per object
    pub object_children: u32,
    /// Children of containers larger than this are annotated with `i/n`
    pub annotate_size: u32,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            max_depth: 100,
            array_children: 20,
            object_children: 100,
            annotate_size: 20,
        }
    }
}

/// Position within one open container.
#[derive(Debug, Clone, Copy, Default)]
struct Location {
    children: u32,
    /// 1-based index of the child being shown
    index: u32,
}

/// Writes the tree branches for a value at `depth`. `last` forces the
/// closing branch.
fn indent<W: fmt::Write>(out: &mut W, loc: &[Location], depth: usize, last: bool) -> fmt::Result {
    for level in loc.iter().take(depth).skip(1) {
        out.write_str(if level.index == level.children {
            "   "
        } else {
            "│  "
        })?;
    }
    if depth > 0 {
        let last = last || loc[depth].index == loc[depth].children;
        out.write_str(if last { "└─" } else { "├─" })?;
    }
    Ok(())
}

fn raw<'a>(input: &'a [u8], span: Span) -> JsonStr<'a, 'a> {
    JsonStr::Borrowed(input.get(span.range()).unwrap_or(&[]))
}

/// Depth of the most deeply nested token. Parents precede their children.
fn deepest<G: Grow>(parser: &Parser<'_, '_, G>) -> usize {
    let tokens = parser.tokens();
    let mut depths = vec![0usize; tokens.len()];
    for idx in (ROOT as usize + 1)..tokens.len() {
        let parent = tokens[idx].parent as usize;
        depths[idx] = depths.get(parent).map_or(0, |d| d + 1);
    }
    depths.into_iter().max().unwrap_or(0)
}

/// Renders the tokens of the last parse, complete or not, one value per line.
pub fn render<G: Grow, W: fmt::Write>(
    parser: &Parser<'_, '_, G>,
    options: &TreeOptions,
    out: &mut W,
) -> fmt::Result {
    let input = parser.input();
    let end = parser.tokens().len() as TokenIndex;
    let shown = options.max_depth.min(deepest(parser));
    let mut loc = vec![Location::default(); shown.saturating_add(2)];
    let mut idx = ROOT;

    while idx < end {
        let token = parser.token(idx);
        let depth = parser.depth(idx);
        loc[depth].index += 1;
        indent(out, &loc, depth, false)?;

        if depth != 0 && loc[depth].children > options.annotate_size {
            write!(out, "{}/{}─", loc[depth].index, loc[depth].children)?;
        }
        if token.name.is_some_and(|name| name.escaped) {
            out.write_str("*─")?;
        }
        if token.value.span().is_some_and(|span| span.escaped) {
            out.write_str("#─")?;
        }
        out.write_char(' ')?;

        if let Some(name) = token.name {
            write!(out, "{}", raw(input, name))?;
            if !token.is_container() {
                out.write_str(": ")?;
            }
        }

        match token.value {
            Value::None | Value::Null => out.write_str("null")?,
            Value::Bool(b) => write!(out, "{b}")?,
            Value::Number(span) => write!(out, "{}", raw(input, span))?,
            Value::String(span) => write!(out, "\"{}\"", raw(input, span))?,
            Value::Object(c) => write!(out, "{{{}}}", c.children)?,
            Value::Array(c) => write!(out, "[{}]", c.children)?,
        }
        writeln!(out)?;

        let mut next = idx + 1;
        if let Some(container) = token.value.container() {
            if depth >= options.max_depth {
                if container.children > 0 {
                    indent(out, &loc, depth + 1, true)?;
                    writeln!(out, "...")?;
                }
                next = parser.next(idx);
            } else {
                loc[depth + 1] = Location {
                    children: container.children,
                    index: 0,
                };
            }
        }
        idx = next;

        // Close every container whose display limit has been reached
        while idx < end {
            let parent = parser.token(idx).parent;
            let depth = parser.depth(idx);
            let limit = match parser.token(parent).value {
                Value::Array(_) => options.array_children,
                Value::Object(_) => options.object_children,
                _ => break,
            };
            if loc[depth].index < limit {
                break;
            }
            let remaining = loc[depth].children.saturating_sub(loc[depth].index);
            if remaining > 0 {
                indent(out, &loc, depth, true)?;
                writeln!(out, "... ({remaining} more, {} total)", loc[depth].children)?;
            }
            idx = parser.next(parent);
        }
    }
    Ok(())
}
