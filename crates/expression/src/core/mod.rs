//! Core types: the expression tree and the error type

pub mod ast;
pub mod error;
