//! Integration test crate for the quixc toolchain, mirroring the teacher's
//! separate `inference-tests` crate: test code that wants to exercise a
//! whole pipeline phase (or several crates together) lives here rather than
//! as a `#[cfg(test)]` module inside a leaf crate.

mod ast;
mod ir;
mod parser;
mod utils;
