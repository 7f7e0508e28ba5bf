//! # Repository Layer
//!
//! One repository per aggregate. Each wraps the shared [`sqlx::SqlitePool`]
//! and exposes typed operations; SQL never leaks above this module.

pub mod credit;
pub mod customer;
pub mod draft;
pub mod logbook;
pub mod product;
pub mod sale;
