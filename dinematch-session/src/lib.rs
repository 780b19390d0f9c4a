pub mod core;

pub use crate::core::store::SessionStore;
