pub mod bucket_provisioner;
pub mod command_builder;
pub mod config_syncer;
pub mod database_provisioner;
pub mod project_initializer;
pub mod validation;
pub mod version_bumper;
