pub mod api_response;
pub mod deployment_config;
pub mod environment;
pub mod variable_spec;
