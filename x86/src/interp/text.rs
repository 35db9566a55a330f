use crate::asm::text::{self, TextKind};
use crate::asm::TokenStream;
use crate::error::{Error, InstructionError, ScanError, SymbolError, TokenError};
use crate::interp::inst::{self, Effect, Mnemonic};
use crate::interp::labels::LocalLabels;
use crate::interp::operand;
use crate::interp::state::{Flow, ProgramState};
use crate::vm::Machine;


/// Executes one text section block.
///
/// The block is scanned up front. Labels get their program wide line from
/// the block's first line, `ProgramState::line_offset`.
pub struct TextInterpreter {
    tokens: TokenStream<TextKind>,
    locals: LocalLabels,
}

impl TextInterpreter {
    pub fn new(source: &str) -> Result<TextInterpreter, ScanError> {
        Ok(TextInterpreter {
            tokens: text::scan(source)?,
            locals: LocalLabels::new(),
        })
    }

    /// Run statements until the block ends or control leaves it.
    pub fn run(&mut self, machine: &mut Machine, state: &mut ProgramState) -> Result<Flow, Error> {
        while let Some(flow) = self.step(machine, state)? {
            if let Flow::JumpTo(_) = flow {
                return Ok(flow);
            }
        }
        Ok(Flow::Continue)
    }

    /// Execute the next instruction, declaring any labels on the way.
    ///
    /// Returns `None` once the block is exhausted.
    pub fn step(&mut self, machine: &mut Machine, state: &mut ProgramState) -> Result<Option<Flow>, Error> {
        loop {
            let t = self.tokens.next_token();

            match t.kind {
                TextKind::Newline => continue,
                TextKind::Eof => return Ok(None),
                TextKind::Label => {
                    let line = t.line + state.line_offset - 1;
                    state.labels.declare(&t.lexeme, line)?;
                    self.locals.declare(&t.lexeme, self.tokens.position());

                    tracing::debug!("label {} declared at line {}", t.lexeme, line);
                },
                TextKind::Word => {
                    let mnemonic = t.lexeme.parse::<Mnemonic>().map_err(|_| InstructionError::Unknown {
                        name: t.lexeme.clone(),
                        line: t.line,
                        column: t.column,
                    })?;
                    state.tick()?;

                    let args = operand::parse_arguments(&mut self.tokens, machine)?;
                    let flow = match inst::execute(mnemonic, &args, machine)? {
                        Effect::Next => Flow::Continue,
                        Effect::Branch(label) => self.branch(&label, state)?,
                    };
                    return Ok(Some(flow));
                },
                _ => {
                    return Err(TokenError::Unexpected {
                        expected: "instruction or label",
                        found: t.lexeme,
                        line: t.line,
                        column: t.column,
                    }.into());
                },
            }
        }
    }

    // Local labels first, then the ones from already interpreted sections
    fn branch(&mut self, label: &str, state: &ProgramState) -> Result<Flow, SymbolError> {
        if let Some(position) = self.locals.get(label) {
            self.tokens.seek(position);
            return Ok(Flow::Continue);
        }

        match state.labels.get(label) {
            Some(line) => {
                tracing::debug!("jump to {} leaves the section for line {}", label, line);
                Ok(Flow::JumpTo(line))
            },
            None => Err(SymbolError::UnknownLabel(label.to_string())),
        }
    }
}
