//! Read-only HTML document model.
//!
//! Pages are parsed with html5ever into an arena [`Dom`]; rules inspect it
//! through [`NodeRef`] handles and, where a selector reads better than
//! navigation, through [`Selector`].
//!
//! # Example
//!
//! ```
//! use clipmark::dom::{parse_html, NodeRef, Selector};
//!
//! let dom = parse_html(r#"<div class="markdown-alert"><p>Careful</p></div>"#);
//! let root = NodeRef::document(&dom);
//! let alert = root
//!     .select_first(&Selector::parse("div.markdown-alert").unwrap())
//!     .unwrap();
//! assert_eq!(alert.text_content(), "Careful");
//! ```

mod arena;
mod node;
pub mod predicates;
mod select;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, Children, Dom, DomNode, NodeData, NodeId};
pub use node::{Ancestors, Descendants, NodeKind, NodeRef};
pub use select::{ClipSelectors, Selector};
pub use serialize::{inner_html, outer_html, outer_html_filtered};
pub use tree_sink::{DomSink, SinkHandle};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document (or fragment) into a [`Dom`].
///
/// Parsing never fails: html5ever recovers from malformed markup the way
/// browsers do, synthesizing `html`/`head`/`body` as needed.
pub fn parse_html(html: &str) -> Dom {
    parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
