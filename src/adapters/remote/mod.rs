pub mod remote_client;
