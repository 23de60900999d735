mod cascade;
pub mod database;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod traits;
