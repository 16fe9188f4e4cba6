pub mod command_runner;
pub mod control_plane;

#[cfg(test)]
pub mod fakes;
