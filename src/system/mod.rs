pub mod collector;
pub mod command;
pub mod mock;
pub mod parse;
pub mod platform;
pub mod process;
pub mod snapshot;
