pub mod network_config;
pub mod network_status;
pub mod token;
pub mod transaction;
