pub mod remote;
pub mod shell;
