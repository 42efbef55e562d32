pub mod blockchain_service;
pub mod contracts;
pub mod funding_service;
pub mod network_config;
pub mod transaction_service;
pub mod wallet_service;
