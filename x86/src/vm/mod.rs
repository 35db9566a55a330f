pub mod mem;
pub mod regfile;
pub mod symbol;

use crate::vm::mem::Memory;
use crate::vm::regfile::RegFile;


/// Register bank and global memory of one interpretation run.
#[derive(Debug)]
pub struct Machine {
    pub reg: RegFile,
    pub mem: Memory,
}

impl Machine {
    // Stack grows down from the last byte of memory
    pub fn new(memory_size: u32) -> Machine {
        Machine {
            reg: RegFile::new(memory_size.saturating_sub(1)),
            mem: Memory::new(memory_size),
        }
    }
}
