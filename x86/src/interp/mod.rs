pub mod address;
pub mod data;
pub mod inst;
pub mod labels;
pub mod operand;
pub mod state;
pub mod text;

pub use self::data::DataInterpreter;
pub use self::state::{Flow, Mode, ProgramState};
pub use self::text::TextInterpreter;
