//! HTML to Markdown conversion.
//!
//! - [`escape`]: pure string utilities for Markdown escaping
//! - [`Conversion`]: per-call walk state (footnotes, depth, skipped nodes)
//! - [`Transpiler`]: runs a [`RuleSet`](crate::rules::RuleSet) over a tree
//!   and post-processes the result
//!
//! ## Design Notes
//!
//! The walk is post-order: a node's children are converted and joined
//! before the node's rule sees them. Joining merges the newlines where two
//! outputs meet into at most one blank line, so block rules can simply wrap
//! their content in `\n\n` on both sides.
//!
//! Footnotes found during the walk are held in a [`FootnoteContext`] owned
//! by the conversion and appended after a `---` rule once the walk ends.

mod conversion;
mod escape;
mod footnotes;
mod postprocess;
mod transpiler;

pub use conversion::{Conversion, MAX_DEPTH, join};
pub use escape::{
    calculate_inline_code_ticks, collapse_whitespace, escape_double_quotes, escape_markdown,
};
pub use footnotes::FootnoteContext;
pub use postprocess::{collapse_blank_lines, finish, remove_empty_links, strip_title};
pub use transpiler::{Transpiler, html_to_markdown, transpile};
