use std::fmt;
use std::ops::{Index, IndexMut};

use bitfield_struct::bitfield;
use twiddle::Twiddle;

use crate::error::SymbolError;
use crate::types::Width;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reg {
    Eax = 0,
    Ebx = 1,
    Ecx = 2,
    Edx = 3,
    Esi = 4,
    Edi = 5,
    Esp = 6,
    Ebp = 7,
}

impl Reg {
    pub const ALL: [Reg; 8] = [
        Reg::Eax, Reg::Ebx, Reg::Ecx, Reg::Edx,
        Reg::Esi, Reg::Edi, Reg::Esp, Reg::Ebp,
    ];

    // (dword, word, low byte, high byte)
    fn names(self) -> (&'static str, &'static str, &'static str, Option<&'static str>) {
        match self {
            Reg::Eax => ("eax", "ax", "al", Some("ah")),
            Reg::Ebx => ("ebx", "bx", "bl", Some("bh")),
            Reg::Ecx => ("ecx", "cx", "cl", Some("ch")),
            Reg::Edx => ("edx", "dx", "dl", Some("dh")),
            Reg::Esi => ("esi", "si", "sil", None),
            Reg::Edi => ("edi", "di", "dil", None),
            Reg::Esp => ("esp", "sp", "spl", None),
            Reg::Ebp => ("ebp", "bp", "bpl", None),
        }
    }
}

/// A window onto one register cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dword,
    Word,
    Low,
    High,
}

impl View {
    pub fn width(self) -> Width {
        match self {
            View::Dword => Width::Dword,
            View::Word  => Width::Word,
            View::Low   => Width::Byte,
            View::High  => Width::Byte,
        }
    }

    fn shift(self) -> usize {
        match self {
            View::High => 8,
            _          => 0,
        }
    }

    fn mask(self) -> u32 {
        match self {
            View::Dword => u32::mask(31..=0),
            View::Word  => u32::mask(15..=0),
            View::Low   => u32::mask(7..=0),
            View::High  => u32::mask(15..=8),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegRef {
    pub reg: Reg,
    pub view: View,
}

impl RegRef {
    pub fn width(self) -> Width {
        self.view.width()
    }

    pub fn name(self) -> &'static str {
        let (dword, word, low, high) = self.reg.names();
        match self.view {
            View::Dword => dword,
            View::Word  => word,
            View::Low   => low,
            View::High  => high.unwrap_or(low),
        }
    }
}

impl fmt::Display for RegRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}


// Generated register name table
include!(concat!(env!("OUT_DIR"), "/registers.rs"));

pub fn lookup(name: &str) -> Option<RegRef> {
    REGISTERS.get(name).copied()
}


#[bitfield(u32)]
#[derive(PartialEq, Eq)]
pub struct Flags {
    #[bits(6)]
    __: u8,
    pub zf: bool, // 0b0100_0000
    #[bits(25)]
    __: u32,
}


pub struct RegFile {
    reg: [u32; 8],
    pub flags: Flags,
}

impl RegFile {
    pub fn new(stack_top: u32) -> RegFile {
        let mut reg = [0; 8];
        reg[Reg::Esp as usize] = stack_top;

        RegFile {
            reg,
            flags: Flags::new(),
        }
    }

    pub fn resolve(name: &str) -> Result<RegRef, SymbolError> {
        lookup(name).ok_or_else(|| SymbolError::UnknownRegister(name.to_string()))
    }

    pub fn read(&self, r: RegRef) -> u32 {
        (self.reg[r.reg as usize] & r.view.mask()) >> r.view.shift()
    }

    // Only the bits under the view change
    pub fn write(&mut self, r: RegRef, value: u32) {
        let mask = r.view.mask();
        let cell = &mut self.reg[r.reg as usize];
        *cell = (*cell & !mask) | ((value << r.view.shift()) & mask);
    }

    pub fn read_named(&self, name: &str) -> Result<u32, SymbolError> {
        Ok(self.read(RegFile::resolve(name)?))
    }
}

impl Index<Reg> for RegFile {
    type Output = u32;

    fn index(&self, idx: Reg) -> &Self::Output {
        &self.reg[idx as usize]
    }
}

impl IndexMut<Reg> for RegFile {
    fn index_mut(&mut self, idx: Reg) -> &mut Self::Output {
        &mut self.reg[idx as usize]
    }
}

impl fmt::Debug for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RegFile {{ eax: {:08X} ebx: {:08X} ecx: {:08X} edx: {:08X} esi: {:08X} edi: {:08X} esp: {:08X} ebp: {:08X}, zf: {} }}",
            self[Reg::Eax], self[Reg::Ebx], self[Reg::Ecx], self[Reg::Edx],
            self[Reg::Esi], self[Reg::Edi], self[Reg::Esp], self[Reg::Ebp],
            self.flags.zf(),
        )
    }
}

// Register dump: every view in hex and binary
impl fmt::Display for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for reg in Reg::ALL {
            let (dword, word, low, high) = reg.names();
            let cell = self[reg];

            writeln!(f, "{:>3}: 0x{:08X} 0b{:032b}", dword, cell, cell)?;

            let value = self.read(RegRef { reg, view: View::Word });
            writeln!(f, "  {:>3}: 0x{:04X} 0b{:016b}", word, value, value)?;

            let value = self.read(RegRef { reg, view: View::Low });
            writeln!(f, "  {:>3}: 0x{:02X} 0b{:08b}", low, value, value)?;

            if let Some(high) = high {
                let value = self.read(RegRef { reg, view: View::High });
                writeln!(f, "  {:>3}: 0x{:02X} 0b{:08b}", high, value, value)?;
            }
        }
        write!(f, " zf: {}", self.flags.zf() as u8)
    }
}
