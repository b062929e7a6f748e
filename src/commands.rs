mod createdb;

pub use createdb::{createdb, createdb_with};
