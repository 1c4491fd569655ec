//! Typed length-prefixed binary frame codec for the SQL/DB bridge IPC
//! channel (spec §4.3), grounded in `original_source/contract/db_msg.c`'s
//! wire protocol and the teacher's `neo-io` writer/reader pairing.

mod error;
mod item;
mod reader;
mod writer;

pub use error::{IpcError, Result};
pub use item::Item;
pub use reader::FrameReader;
pub use writer::FrameWriter;
