pub mod dian_api;
pub mod environment;

pub use dian_api::DianApiClient;
pub use environment::{set_production, EnvironmentChange};
