pub mod asm;
pub mod config;
pub mod error;
pub mod interp;
pub mod program;
pub mod types;
pub mod vm;

pub use crate::config::Config;
pub use crate::error::Error;
pub use crate::program::{run, Interpreter};
