//! Repository layer mapping score records to rows

pub mod sqlite_repo;

pub use sqlite_repo::ScoreRepo;
