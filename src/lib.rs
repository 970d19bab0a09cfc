//! Bounds-checked decoder for the OpenType advanced layout tables.
//!
//! The crate decodes the `GSUB`, `GPOS` and `GDEF` tables of an OpenType
//! font into a navigable, strongly typed graph for a downstream shaper,
//! together with the sibling tables needed to validate them. Every offset
//! and count is checked against the byte image before use; problems are
//! collected as diagnostics on the font rather than panicking.
//!
//! ```no_run
//! use otlayout::{Font, Tag};
//!
//! # fn load() -> Vec<u8> { Vec::new() }
//! let data = load();
//! let font = Font::parse(&data)?;
//! if let Some(gsub) = font.gsub() {
//!     if let Some(script) = gsub.script(Tag::new(b"latn")) {
//!         for lang_sys in script.language_systems() {
//!             println!("{}: {} features", lang_sys.tag, lang_sys.feature_indices().len());
//!         }
//!     }
//! }
//! # Ok::<(), otlayout::Error>(())
//! ```
//!
//! The decoded graph borrows the input buffer for its entire lifetime and
//! is safe to share across threads; script, language system, feature and
//! subtable nodes are decoded on first demand and memoized.

pub mod cmap;
pub mod diag;
pub mod gdef;
pub mod gpos;
pub mod gsub;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod layout;
pub mod limits;
pub mod loca;
pub mod maxp;
pub mod name;
pub mod os2;
pub mod parse;
pub mod post;
pub mod types;

mod font;
mod validate;

pub use diag::{Diagnostic, Error, IssueKind, Severity, Warning};
pub use font::{Font, Options};
pub use types::{GlyphId, Tag};
