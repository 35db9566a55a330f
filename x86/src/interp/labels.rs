use std::collections::HashMap;

use crate::error::SymbolError;


/// Label name to 0-based source line, across the whole program.
#[derive(Debug, Default)]
pub struct GlobalLabels {
    labels: HashMap<String, usize>,
}

impl GlobalLabels {
    pub fn new() -> GlobalLabels {
        GlobalLabels { labels: HashMap::new() }
    }

    // Passing over the same declaration again (after a jump) is fine
    pub fn declare(&mut self, name: &str, line: usize) -> Result<(), SymbolError> {
        match self.labels.get(name) {
            Some(&existing) if existing == line => Ok(()),
            Some(_) => Err(SymbolError::DuplicateLabel(name.to_string())),
            None => {
                self.labels.insert(name.to_string(), line);
                Ok(())
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}


/// Label name to token cursor position, within one text section.
#[derive(Debug, Default)]
pub struct LocalLabels {
    labels: HashMap<String, usize>,
}

impl LocalLabels {
    pub fn new() -> LocalLabels {
        LocalLabels { labels: HashMap::new() }
    }

    pub fn declare(&mut self, name: &str, position: usize) {
        self.labels.insert(name.to_string(), position);
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }
}
