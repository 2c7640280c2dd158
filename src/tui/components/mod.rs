pub mod dialog;
pub mod input;
