// Default global memory size in bytes
pub const MEMORY_SIZE: u32 = 4096;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Capacity of global memory, esp starts at its last byte.
    pub memory_size: u32,

    /// Maximum number of text statements executed in a run.
    pub step_limit: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            memory_size: MEMORY_SIZE,
            step_limit: None,
        }
    }
}
