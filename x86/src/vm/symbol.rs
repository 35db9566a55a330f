use crate::error::SymbolError;
use crate::types::Width;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub address: u32,
    pub width: Width,
}

/// Append-only table of declared data variables.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable { symbols: vec![] }
    }

    pub fn declare(&mut self, name: &str, address: u32, width: Width) -> Result<&Symbol, SymbolError> {
        if self.get(name).is_some() {
            return Err(SymbolError::DuplicateVariable(name.to_string()));
        }

        self.symbols.push(Symbol { name: name.to_string(), address, width });
        Ok(&self.symbols[self.symbols.len() - 1])
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }
}
