//! Embedded level pack
//!
//! Levels compiled into the binary at build time from `data/levels.txt`.

include!(concat!(env!("OUT_DIR"), "/levels.rs"));
