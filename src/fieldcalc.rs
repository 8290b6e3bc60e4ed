//! Main module for the expression evaluator

pub mod error;
pub mod evaluator;
pub mod host;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod plugin;
pub mod semantics;
pub mod value;
