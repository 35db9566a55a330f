pub mod data;
pub mod lexer;
pub mod text;
pub mod token;

pub use self::token::{Token, TokenStream};
