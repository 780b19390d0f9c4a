pub mod api;
pub mod cli;
pub mod config;
pub mod places;
pub mod setup;

pub use config::Config;
pub use places::GooglePlacesClient;
