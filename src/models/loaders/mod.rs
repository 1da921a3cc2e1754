pub mod secrets_loader;
pub mod toml_loader;

pub use secrets_loader::load_credentials;
pub use toml_loader::load_question_catalog;
