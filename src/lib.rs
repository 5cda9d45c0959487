pub mod config;
pub mod liturgy;
pub mod overlay;
pub mod provider;
pub mod title;
