use std::env;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

// Register name -> (cell, view)
const REGISTERS: &[(&str, &str, &str)] = &[
    ("eax", "Eax", "Dword"), ("ax", "Eax", "Word"), ("al",  "Eax", "Low"), ("ah", "Eax", "High"),
    ("ebx", "Ebx", "Dword"), ("bx", "Ebx", "Word"), ("bl",  "Ebx", "Low"), ("bh", "Ebx", "High"),
    ("ecx", "Ecx", "Dword"), ("cx", "Ecx", "Word"), ("cl",  "Ecx", "Low"), ("ch", "Ecx", "High"),
    ("edx", "Edx", "Dword"), ("dx", "Edx", "Word"), ("dl",  "Edx", "Low"), ("dh", "Edx", "High"),
    ("esi", "Esi", "Dword"), ("si", "Esi", "Word"), ("sil", "Esi", "Low"),
    ("edi", "Edi", "Dword"), ("di", "Edi", "Word"), ("dil", "Edi", "Low"),
    ("esp", "Esp", "Dword"), ("sp", "Esp", "Word"), ("spl", "Esp", "Low"),
    ("ebp", "Ebp", "Dword"), ("bp", "Ebp", "Word"), ("bpl", "Ebp", "Low"),
];

const MNEMONICS: &[(&str, &str)] = &[
    ("mov",  "Mov"),
    ("add",  "Add"),
    ("push", "Push"),
    ("cmp",  "Cmp"),
    ("jmp",  "Jmp"),
    ("je",   "Je"),
];

fn main() -> io::Result<()> {
    let out_dir = env::var_os("OUT_DIR")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))?;

    // phf_codegen for register names
    let path = Path::new(&out_dir).join("registers.rs");
    let mut file = BufWriter::new(File::create(&path)?);

    let mut map = phf_codegen::Map::new();
    for (name, reg, view) in REGISTERS {
        map.entry(*name, &format!("RegRef {{ reg: Reg::{}, view: View::{} }}", reg, view));
    }
    writeln!(&mut file, "static REGISTERS: phf::Map<&'static str, RegRef> = {};", map.build())?;

    // phf_codegen for mnemonics
    let path = Path::new(&out_dir).join("mnemonic.rs");
    let mut file = BufWriter::new(File::create(&path)?);

    let mut map = phf_codegen::Map::new();
    for (name, mnemonic) in MNEMONICS {
        map.entry(*name, &format!("Mnemonic::{}", mnemonic));
    }
    writeln!(&mut file, "static MNEMONICS: phf::Map<&'static str, Mnemonic> = {};", map.build())?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
