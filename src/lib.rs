//! Streaming GEDCOM parser.
//!
//! GEDCOM encodes genealogical records as level-numbered lines; the numeric
//! prefix of each line gives its nesting depth, and level 0 opens a new
//! top-level record. This crate reconstructs the implicit trees
//! incrementally: chunks of arbitrary size go in, fully assembled top-level
//! records come out as soon as they are complete, without buffering the
//! document and without lookahead beyond one line.
//!
//! The pipeline is [`LineSplitter`] → [`LineParser`] → [`TreeBuilder`],
//! glued together by [`GedStream`] (push) and [`GedReader`] (pull).
//! Malformed lines never abort a stream; they are dropped and parsing
//! continues with the next line.
//!
//! ```
//! use rsged::GedStream;
//!
//! let mut stream = GedStream::new();
//! let mut trees = stream.feed(b"0 HEAD\n1 SOUR rsged\n0 TRLR\n");
//! trees.extend(stream.finish());
//!
//! assert_eq!(trees.len(), 2);
//! assert_eq!(trees[0].root_tag(), Some("HEAD"));
//! assert_eq!(trees[1].root_tag(), Some("TRLR"));
//! ```

pub mod cli;
pub mod domain;
pub mod errors;
pub mod exitcode;
pub mod stream;
pub mod util;

pub use domain::{GedLine, LineParser, LineSplitter, RecordNode, RecordTree, TreeBuilder, TreeData};
pub use errors::{GedError, GedResult};
pub use stream::{from_file, parse_file, parse_str, GedReader, GedStream};
