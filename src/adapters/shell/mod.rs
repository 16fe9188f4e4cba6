pub mod shell_runner;
