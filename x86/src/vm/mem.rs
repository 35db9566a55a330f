use std::fmt;
use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{AddressError, SymbolError};
use crate::types::Width;
use crate::vm::symbol::{Symbol, SymbolTable};


// Memory access stuff
//
// NOTE:
// - Multi-byte values are stored big-endian, the most significant byte lives at the
//   lowest address, regardless of the host.
// - The address space is NOT circular, every access is checked against the capacity
//   and the whole range touched must fit.
pub trait Mem {
    fn capacity(&self) -> u32;

    fn load_byte(&self, idx: u32) -> Result<u32, AddressError>;
    fn load_word(&self, idx: u32) -> Result<u32, AddressError>;
    fn load_dword(&self, idx: u32) -> Result<u32, AddressError>;

    fn store_byte(&mut self, idx: u32, data: u32) -> Result<(), AddressError>;
    fn store_word(&mut self, idx: u32, data: u32) -> Result<(), AddressError>;
    fn store_dword(&mut self, idx: u32, data: u32) -> Result<(), AddressError>;

    fn load(&self, width: Width, idx: u32) -> Result<u32, AddressError> {
        match width {
            Width::Byte  => self.load_byte(idx),
            Width::Word  => self.load_word(idx),
            Width::Dword => self.load_dword(idx),
        }
    }

    fn store(&mut self, width: Width, idx: u32, data: u32) -> Result<(), AddressError> {
        match width {
            Width::Byte  => self.store_byte(idx, data),
            Width::Word  => self.store_word(idx, data),
            Width::Dword => self.store_dword(idx, data),
        }
    }
}


/// Global memory: a fixed block of bytes, the variables declared in it and the
/// top of the data laid out so far.
#[derive(Debug)]
pub struct Memory {
    bytes: Vec<u8>,
    symbols: SymbolTable,
    top: u32,
}

impl Memory {
    pub fn new(capacity: u32) -> Memory {
        Memory {
            bytes: vec![0; capacity as usize],
            symbols: SymbolTable::new(),
            top: 0,
        }
    }

    fn range(&self, idx: u32, width: Width) -> Result<Range<usize>, AddressError> {
        let start = idx as usize;
        let end = start + width.bytes() as usize;

        if end > self.bytes.len() {
            Err(AddressError::OutOfBounds { address: idx, width, capacity: self.capacity() })
        } else {
            Ok(start..end)
        }
    }

    pub fn top(&self) -> u32 {
        self.top
    }

    pub fn advance_top(&mut self, width: Width) {
        self.top = self.top.wrapping_add(width.bytes());
    }

    /// Register a variable at the current top of data.
    pub fn declare(&mut self, name: &str, width: Width) -> Result<&Symbol, SymbolError> {
        self.symbols.declare(name, self.top, width)
    }

    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl Mem for Memory {
    fn capacity(&self) -> u32 {
        self.bytes.len() as u32
    }

    fn load_byte(&self, idx: u32) -> Result<u32, AddressError> {
        let r = self.range(idx, Width::Byte)?;
        Ok(self.bytes[r.start] as u32)
    }

    fn load_word(&self, idx: u32) -> Result<u32, AddressError> {
        let r = self.range(idx, Width::Word)?;
        Ok(BigEndian::read_u16(&self.bytes[r]) as u32)
    }

    fn load_dword(&self, idx: u32) -> Result<u32, AddressError> {
        let r = self.range(idx, Width::Dword)?;
        Ok(BigEndian::read_u32(&self.bytes[r]))
    }

    fn store_byte(&mut self, idx: u32, data: u32) -> Result<(), AddressError> {
        let r = self.range(idx, Width::Byte)?;
        self.bytes[r.start] = (data & 0x00_00_00_FF) as u8;
        Ok(())
    }

    fn store_word(&mut self, idx: u32, data: u32) -> Result<(), AddressError> {
        let r = self.range(idx, Width::Word)?;
        BigEndian::write_u16(&mut self.bytes[r], (data & 0x00_00_FF_FF) as u16);
        Ok(())
    }

    fn store_dword(&mut self, idx: u32, data: u32) -> Result<(), AddressError> {
        let r = self.range(idx, Width::Dword)?;
        BigEndian::write_u32(&mut self.bytes[r], data);
        Ok(())
    }
}

// Hexdump, 16 bytes a row, then the symbols
impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.bytes.chunks(16).enumerate() {
            write!(f, "{:08X}:", row * 16)?;
            for b in chunk {
                write!(f, " {:02X}", b)?;
            }
            writeln!(f)?;
        }

        for s in self.symbols.iter() {
            writeln!(f, "{} @ 0x{:08X} ({})", s.name, s.address, s.width)?;
        }
        Ok(())
    }
}
