use std::fmt;
use std::str::FromStr;

use twiddle::Twiddle;


/// Size of a register view, a memory access or a declared data unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    Byte  = 1,
    Word  = 2,
    Dword = 4,
}

impl Width {
    pub fn bytes(self) -> u32 {
        self as u32
    }

    pub fn bits(self) -> usize {
        (self as usize) * 8
    }

    pub fn mask(self) -> u32 {
        u32::mask((self.bits() - 1)..=0)
    }

    pub fn truncate(self, value: u32) -> u32 {
        value & self.mask()
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Width::Byte  => write!(f, "byte"),
            Width::Word  => write!(f, "word"),
            Width::Dword => write!(f, "dword"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWidthError { _priv: () }

// Size markers used in the text section
impl FromStr for Width {
    type Err = ParseWidthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BYTE"  => Ok(Width::Byte),
            "WORD"  => Ok(Width::Word),
            "DWORD" => Ok(Width::Dword),
            _       => Err(ParseWidthError { _priv: () }),
        }
    }
}

// Data directives
pub fn directive_width(s: &str) -> Option<Width> {
    match s {
        "DB" => Some(Width::Byte),
        "DW" => Some(Width::Word),
        "DD" => Some(Width::Dword),
        _    => None,
    }
}
