//! # clipmark
//!
//! Turns a fetched web page and a list of note properties into the exact
//! text of a Markdown note: a YAML frontmatter header followed by the page
//! converted to Obsidian-flavoured Markdown.
//!
//! ## Features
//!
//! - Rule-driven HTML to Markdown conversion with explicit priorities
//! - Lists with tab indentation and task items, pipe tables, raw HTML for
//!   tables with merged cells
//! - MathJax, KaTeX, MediaWiki and MathML math as `$…$` / `$$…$$`
//! - Footnotes collected into a trailing definitions block
//! - Callouts, highlights, YouTube and X embeds
//! - Typed frontmatter serialization
//!
//! ## Quick Start
//!
//! ```
//! use clipmark::html_to_markdown;
//!
//! let md = html_to_markdown("<h1>Title</h1><p>Hello <mark>world</mark></p>", "");
//! assert_eq!(md, "Hello ==world==");
//! ```
//!
//! ## Notes
//!
//! ```
//! use clipmark::{Note, Property, TypeRegistry};
//!
//! let props = vec![Property::new("title", "Example")];
//! let note = Note::clip("<p>Body</p>", &props, &TypeRegistry::new());
//! assert_eq!(note.content(), "---\ntitle: \"Example\"\n---\nBody");
//! ```
//!
//! ## Custom rules
//!
//! The built-in [`RuleSet`](rules::RuleSet) can be extended or overridden
//! before it is handed to a [`Transpiler`]; see [`rules`].

pub mod dom;
pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod note;
pub(crate) mod patterns;
pub mod rules;
pub mod util;

pub use error::{Error, Result};
pub use frontmatter::{
    FrontmatterDocument, Property, PropertyType, PropertyValue, TypeRegistry, serialize,
};
pub use markdown::{Transpiler, html_to_markdown, transpile};
pub use note::Note;
pub use rules::{Rule, RuleError, RuleSet};
