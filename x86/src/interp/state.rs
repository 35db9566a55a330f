use crate::error::Error;
use crate::interp::labels::GlobalLabels;


/// Which section interpreter owns the lines being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Unset,
    Data,
    Text,
}

/// Outcome of running text statements.
///
/// `JumpTo` carries a 0-based global source line and is handled by the
/// program driver, it is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    JumpTo(usize),
}


/// State shared by every section interpreter of a run.
#[derive(Debug)]
pub struct ProgramState {
    pub mode: Mode,
    pub labels: GlobalLabels,
    // 0-based global line of the text block being run
    pub line_offset: usize,
    steps: u64,
    step_limit: Option<u64>,
}

impl ProgramState {
    pub fn new(step_limit: Option<u64>) -> ProgramState {
        ProgramState {
            mode: Mode::Unset,
            labels: GlobalLabels::new(),
            line_offset: 0,
            steps: 0,
            step_limit,
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    // Count one executed statement
    pub fn tick(&mut self) -> Result<(), Error> {
        if let Some(limit) = self.step_limit {
            if self.steps >= limit {
                return Err(Error::StepLimit { limit });
            }
        }
        self.steps += 1;
        Ok(())
    }
}
