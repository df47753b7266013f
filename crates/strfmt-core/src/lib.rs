//! # strfmt-core
//!
//! String-only printf engine: a format-string compiler, a token renderer that
//! reproduces Go `fmt` diagnostic text, and pooled growable byte buffers.
//!
//! Everything here is total. Malformed directives never fail; they render as
//! `%!...` markers in the output instead.
//!
//! The free rendering functions draw buffers from a process-wide pool that
//! is not reachable from outside the crate; use a [`BufferPool`] of your own
//! to observe pool behaviour:
//!
//! ```compile_fail
//! strfmt_core::buffer::global_pool();
//! ```

#![deny(unsafe_code)]

pub mod buffer;
pub mod parser;
pub mod render;
pub mod token;
pub mod verbs;

pub use buffer::{ArenaBuffer, BufferPool, PoolStats, PooledBuffer};
pub use parser::compile;
pub use render::{concat_to_string, concat_to_writer, render, render_to_string, render_to_writer};
pub use token::{CompiledFormat, Flags, MAX_NUM, Token, Verb};
