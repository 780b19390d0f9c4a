pub mod env;
pub mod error;
pub mod ports;

pub use env::consensus::types::RankedPlace;
pub use env::place::{Parameters, Place, PlacesQuery};
pub use env::session::{Session, SessionSnapshot};
pub use env::vote_table::VoteTable;
pub use error::{DineError, Result};
