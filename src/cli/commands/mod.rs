pub mod bucket;
pub mod bump;
pub mod db;
pub mod init;
pub mod publish;
pub mod show;
pub mod sync;
