pub mod parse;
pub mod words;
