pub mod consensus;
pub mod place;
pub mod session;
pub mod vote_table;
