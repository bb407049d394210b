pub mod assign;
pub mod config;
pub mod lead;
pub mod replay;
