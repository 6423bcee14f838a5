pub mod codegen;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod maker;
pub mod resolution;
pub mod sources;
pub mod types;

pub use config::MakerConfig;
pub use maker::Maker;
