//! Driven adapters: storage and password hashing behind the domain ports.

pub mod hashing;
pub mod memory;
pub mod persistence;
