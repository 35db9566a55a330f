use std::fmt;
use std::str::FromStr;

use crate::error::{Error, OperandError};
use crate::interp::operand::Argument;
use crate::types::Width;
use crate::vm::mem::Mem;
use crate::vm::regfile::{Reg, RegRef, View};
use crate::vm::Machine;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mnemonic {
    Mov,
    Add,
    Push,
    Cmp,
    Jmp,
    Je,
}

// Generated mnemonic table
include!(concat!(env!("OUT_DIR"), "/mnemonic.rs"));

impl Mnemonic {
    pub fn name(self) -> &'static str {
        match self {
            Mnemonic::Mov  => "mov",
            Mnemonic::Add  => "add",
            Mnemonic::Push => "push",
            Mnemonic::Cmp  => "cmp",
            Mnemonic::Jmp  => "jmp",
            Mnemonic::Je   => "je",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMnemonicError { _priv: () }

impl FromStr for Mnemonic {
    type Err = ParseMnemonicError;

    // Mnemonics match in any case, registers and size markers do not
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MNEMONICS.get(s.to_ascii_lowercase().as_str()).copied().ok_or(ParseMnemonicError { _priv: () })
    }
}


/// What the text interpreter does after an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Next,
    Branch(String),
}


// A register view or a memory cell with its access width settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Place {
    Reg(RegRef),
    Mem { address: u32, width: Width },
}

impl Place {
    fn width(self) -> Width {
        match self {
            Place::Reg(r)            => r.width(),
            Place::Mem { width, .. } => width,
        }
    }

    fn read(self, machine: &Machine) -> Result<u32, Error> {
        match self {
            Place::Reg(r)                  => Ok(machine.reg.read(r)),
            Place::Mem { address, width }  => Ok(machine.mem.load(width, address)?),
        }
    }

    fn write(self, machine: &mut Machine, value: u32) -> Result<(), Error> {
        match self {
            Place::Reg(r) => machine.reg.write(r, value),
            Place::Mem { address, width } => machine.mem.store(width, address, width.truncate(value))?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Place(Place),
    Imm(u32),
}

impl Source {
    fn read(self, machine: &Machine, width: Width) -> Result<u32, Error> {
        match self {
            Source::Place(p) => p.read(machine),
            Source::Imm(v)   => Ok(width.truncate(v)),
        }
    }
}

// Unresolved shape of a register or memory operand
enum Loc {
    Reg(RegRef),
    Mem { address: u32, size: Option<Width> },
}

fn loc(arg: &Argument) -> Option<Loc> {
    match arg {
        Argument::Register(r)                => Some(Loc::Reg(*r)),
        Argument::Memory { address, size }   => Some(Loc::Mem { address: *address, size: *size }),
        Argument::Variable(s)                => Some(Loc::Mem { address: s.address, size: Some(s.width) }),
        _                                    => None,
    }
}


/// Execute one instruction against the machine.
pub fn execute(mnemonic: Mnemonic, args: &[Argument], machine: &mut Machine) -> Result<Effect, Error> {
    tracing::trace!("{} with {} operand(s)", mnemonic, args.len());

    match mnemonic {
        Mnemonic::Mov => {
            let (dst, src) = pair(mnemonic, args, true)?;
            let value = src.read(machine, dst.width())?;
            dst.write(machine, value)?;
            Ok(Effect::Next)
        },
        Mnemonic::Add => {
            let (dst, src) = pair(mnemonic, args, true)?;
            let width = dst.width();
            let value = dst.read(machine)?.wrapping_add(src.read(machine, width)?);
            dst.write(machine, width.truncate(value))?;
            Ok(Effect::Next)
        },
        Mnemonic::Cmp => {
            let (a, b) = pair(mnemonic, args, false)?;
            let equal = a.read(machine)? == b.read(machine, a.width())?;
            machine.reg.flags.set_zf(equal);
            Ok(Effect::Next)
        },
        Mnemonic::Push => {
            let value = push_source(mnemonic, args)?.read(machine, Width::Dword)?;

            // Commit esp only once the write went through
            let esp = machine.reg[Reg::Esp].wrapping_sub(4);
            machine.mem.store_dword(esp, value)?;
            machine.reg[Reg::Esp] = esp;
            Ok(Effect::Next)
        },
        Mnemonic::Jmp => {
            let label = label(mnemonic, args)?;
            Ok(Effect::Branch(label.to_string()))
        },
        Mnemonic::Je => {
            let label = label(mnemonic, args)?;
            if machine.reg.flags.zf() {
                Ok(Effect::Branch(label.to_string()))
            } else {
                Ok(Effect::Next)
            }
        },
    }
}

fn count(mnemonic: Mnemonic, args: &[Argument], expected: usize) -> Result<(), OperandError> {
    if args.len() != expected {
        return Err(OperandError::Count { mnemonic: mnemonic.name(), expected, found: args.len() });
    }
    Ok(())
}

fn shape(mnemonic: Mnemonic, args: &[Argument]) -> OperandError {
    let operands: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    OperandError::Shape { mnemonic: mnemonic.name(), operands: operands.join(", ") }
}

fn check_width(mnemonic: Mnemonic, left: Width, right: Option<Width>) -> Result<(), OperandError> {
    match right {
        Some(right) if right != left => Err(OperandError::WidthMismatch { mnemonic: mnemonic.name(), left, right }),
        _ => Ok(()),
    }
}

// Two operand forms. `imm` allows a constant source, without it two memory
// operands are allowed instead (cmp).
fn pair(mnemonic: Mnemonic, args: &[Argument], imm: bool) -> Result<(Place, Source), Error> {
    count(mnemonic, args, 2)?;
    let name = mnemonic.name();

    let dst = loc(&args[0]).ok_or_else(|| shape(mnemonic, args))?;

    if let Argument::Constant(c) = args[1] {
        if !imm {
            return Err(shape(mnemonic, args).into());
        }

        let dst = match dst {
            Loc::Reg(r) => Place::Reg(r),
            Loc::Mem { address, size } => Place::Mem { address, width: size.unwrap_or(Width::Dword) },
        };
        return Ok((dst, Source::Imm(c)));
    }

    let src = loc(&args[1]).ok_or_else(|| shape(mnemonic, args))?;

    match (dst, src) {
        (Loc::Reg(a), Loc::Reg(b)) => {
            if a.width() != b.width() {
                return Err(OperandError::WidthMismatch { mnemonic: name, left: a.width(), right: b.width() }.into());
            }
            Ok((Place::Reg(a), Source::Place(Place::Reg(b))))
        },
        (Loc::Reg(a), Loc::Mem { address, size }) => {
            check_width(mnemonic, a.width(), size)?;
            Ok((Place::Reg(a), Source::Place(Place::Mem { address, width: a.width() })))
        },
        (Loc::Mem { address, size }, Loc::Reg(b)) => {
            check_width(mnemonic, b.width(), size)?;
            Ok((Place::Mem { address, width: b.width() }, Source::Place(Place::Reg(b))))
        },
        (Loc::Mem { address: a, size: sa }, Loc::Mem { address: b, size: sb }) => {
            if imm {
                return Err(shape(mnemonic, args).into());
            }

            let width = match (sa, sb) {
                (Some(l), Some(r)) if l != r => {
                    return Err(OperandError::WidthMismatch { mnemonic: name, left: l, right: r }.into());
                },
                _ => sa.or(sb).unwrap_or(Width::Dword),
            };
            Ok((Place::Mem { address: a, width }, Source::Place(Place::Mem { address: b, width })))
        },
    }
}

fn push_source(mnemonic: Mnemonic, args: &[Argument]) -> Result<Source, Error> {
    count(mnemonic, args, 1)?;

    match &args[0] {
        Argument::Register(r) => {
            if r.view != View::Dword {
                return Err(OperandError::NotDword { mnemonic: mnemonic.name(), register: r.name().to_string() }.into());
            }
            Ok(Source::Place(Place::Reg(*r)))
        },
        Argument::Constant(c) => Ok(Source::Imm(*c)),
        arg => match loc(arg) {
            Some(Loc::Mem { address, size }) => {
                check_width(mnemonic, Width::Dword, size)?;
                Ok(Source::Place(Place::Mem { address, width: Width::Dword }))
            },
            _ => Err(shape(mnemonic, args).into()),
        },
    }
}

fn label(mnemonic: Mnemonic, args: &[Argument]) -> Result<&str, Error> {
    count(mnemonic, args, 1)?;

    match &args[0] {
        Argument::Label(l) => Ok(l.as_str()),
        _ => Err(shape(mnemonic, args).into()),
    }
}
