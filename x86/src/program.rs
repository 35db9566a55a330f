use std::collections::HashSet;

use crate::asm::lexer;
use crate::config::Config;
use crate::error::{Error, TokenError};
use crate::interp::{DataInterpreter, Flow, Mode, ProgramState, TextInterpreter};
use crate::vm::Machine;


const DATA_MARKER: &str = "data:";
const TEXT_MARKER: &str = "text:";

fn marker(line: &str) -> Option<Mode> {
    match lexer::strip_line_comment(line).trim() {
        DATA_MARKER => Some(Mode::Data),
        TEXT_MARKER => Some(Mode::Text),
        _           => None,
    }
}

fn is_blank(line: &str) -> bool {
    lexer::strip_line_comment(line).trim().is_empty()
}


/// Program driver: splits the source into section blocks and hands each
/// one to the data or text interpreter.
pub struct Interpreter {
    pub machine: Machine,
    pub state: ProgramState,
    // First line of every data block already laid out
    laid_out: HashSet<usize>,
}

impl Interpreter {
    pub fn new(config: &Config) -> Interpreter {
        Interpreter {
            machine: Machine::new(config.memory_size),
            state: ProgramState::new(config.step_limit),
            laid_out: HashSet::new(),
        }
    }

    pub fn run(&mut self, source: &str) -> Result<(), Error> {
        let lines: Vec<&str> = source.lines().collect();
        let mut cursor = 0;

        while cursor < lines.len() {
            if let Some(mode) = marker(lines[cursor]) {
                self.state.mode = mode;
                cursor += 1;
                continue;
            }
            if is_blank(lines[cursor]) {
                cursor += 1;
                continue;
            }

            // Block runs up to the next section marker
            let end = (cursor..lines.len())
                .find(|&i| marker(lines[i]).is_some())
                .unwrap_or(lines.len());
            let block = lines[cursor..end].join("\n");

            match self.state.mode {
                Mode::Unset => return Err(TokenError::MissingSection { line: cursor }.into()),
                Mode::Data => {
                    if self.laid_out.insert(cursor) {
                        tracing::debug!("data section at line {}", cursor);
                        DataInterpreter::new(&mut self.machine.mem).interpret_section(&block)?;
                    }
                    cursor = end;
                },
                Mode::Text => {
                    tracing::debug!("text section at line {}", cursor);
                    self.state.line_offset = cursor;

                    let mut text = TextInterpreter::new(&block)?;
                    match text.run(&mut self.machine, &mut self.state)? {
                        Flow::Continue => cursor = end,
                        Flow::JumpTo(line) => {
                            self.state.mode = Mode::Text;
                            cursor = line;
                        },
                    }
                },
            }
        }
        Ok(())
    }
}

/// Run a whole program on a fresh machine.
pub fn run(source: &str, config: &Config) -> Result<Machine, Error> {
    let mut interpreter = Interpreter::new(config);
    interpreter.run(source)?;
    Ok(interpreter.machine)
}


#[cfg(test)]
mod test_program {
    use super::*;
    use crate::error::SymbolError;
    use crate::vm::mem::Mem;
    use crate::vm::regfile::Reg;

    fn exec(source: &str) -> Result<Machine, Error> {
        run(source, &Config { memory_size: 64, step_limit: Some(1000) })
    }

    #[test]
    fn test_empty() {
        let m = exec("").unwrap();
        assert_eq!(m.reg[Reg::Esp], 63);
        assert!(exec("\n; nothing\n   \n").is_ok());
    }

    #[test]
    fn test_data_then_text() {
        let source = "\
            data:\n\
            var DB 64 ; one byte\n\
            num DD 10\n\
            text:\n\
            mov al, var\n\
            add eax, num\n";
        let m = exec(source).unwrap();

        assert_eq!(m.mem.load_byte(0).unwrap(), 64);
        assert_eq!(m.mem.symbol("num").unwrap().address, 1);
        assert_eq!(m.reg[Reg::Eax], 74);
    }

    #[test]
    fn test_missing_section() {
        assert_eq!(
            exec("\n; header\nmov eax, 1").err(),
            Some(TokenError::MissingSection { line: 2 }.into()),
        );
    }

    #[test]
    fn test_marker_with_comment() {
        let m = exec("text: ; code\nmov eax, 1").unwrap();
        assert_eq!(m.reg[Reg::Eax], 1);
    }

    #[test]
    fn test_cross_section_jump() {
        // Back into the first text block, the data block is not laid out again
        let source = "\
            text:\n\
            .again\n\
            add ecx, 1\n\
            data:\n\
            x DB 1\n\
            text:\n\
            add eax, 1\n\
            cmp eax, ecx\n\
            add eax, 5\n\
            je .again\n\
            add edx, 1\n";
        let m = exec(source).unwrap();

        assert_eq!(m.reg[Reg::Ecx], 2);
        assert_eq!(m.reg[Reg::Eax], 12);
        assert_eq!(m.reg[Reg::Edx], 1);
        assert_eq!(m.mem.top(), 1);
    }

    #[test]
    fn test_duplicate_label_across_sections() {
        assert_eq!(
            exec("text:\n.a\nmov eax, 1\ntext:\n.a").err(),
            Some(SymbolError::DuplicateLabel(".a".to_string()).into()),
        );
    }

    #[test]
    fn test_label_in_later_section_unknown() {
        assert_eq!(
            exec("text:\njmp .b\ntext:\n.b").err(),
            Some(SymbolError::UnknownLabel(".b".to_string()).into()),
        );
    }

    #[test]
    fn test_step_limit() {
        assert_eq!(
            exec("text:\n.a\njmp .a").err(),
            Some(Error::StepLimit { limit: 1000 }),
        );
    }

    #[test]
    fn test_crlf() {
        let m = exec("data:\r\nv DW 7\r\ntext:\r\nmov ax, v\r\n").unwrap();
        assert_eq!(m.reg[Reg::Eax], 7);
    }

    #[test]
    fn test_interpreter_state() {
        let mut interpreter = Interpreter::new(&Config::default());
        interpreter.run("text:\nmov eax, 1\n.end\n").unwrap();

        assert_eq!(interpreter.state.mode, Mode::Text);
        assert_eq!(interpreter.state.labels.get(".end"), Some(2));
        assert_eq!(interpreter.state.steps(), 1);
    }
}
