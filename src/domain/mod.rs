pub mod constants;
pub mod request;
pub mod types;
