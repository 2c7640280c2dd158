mod book;
mod root;

pub use root::Cli;
