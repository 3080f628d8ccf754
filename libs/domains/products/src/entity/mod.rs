//! Sea-ORM entities mirroring the PostgreSQL schema.

pub mod category;
pub mod product;
pub mod purchase;
pub mod sale;
