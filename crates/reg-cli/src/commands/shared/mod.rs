pub mod parse;
pub mod payload;
