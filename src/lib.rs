pub mod analyzers;
pub mod error;
pub mod matrix;
pub mod output;
pub mod parser;
pub mod render;
