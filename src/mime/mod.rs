//! Media type parsing and media-type keyed maps.
//!
//! - **`parser`**: parses `type/subtype[+suffix][;key=value]*` into a
//!   normalized [`MimeType`] with a canonical string form
//! - **`map`**: [`MimeTypeMap`], a map that canonicalizes its keys through
//!   the parser so equivalent spellings share one entry
//!
//! Coders and event formats are both looked up by content type through a
//! [`MimeTypeMap`].

pub mod map;
pub mod parser;

pub use map::MimeTypeMap;
pub use parser::{DEFAULT_CHARSET, MimeType, parse_mime_type};
