//! Repository implementations.
//!
//! One repository per aggregate. Each holds a clone of the shared pool and
//! exposes async CRUD methods returning `DbResult`.
//!
//! Methods that must participate in the checkout's atomic unit take a
//! `&mut SqliteConnection` instead of using the pool, so the checkout engine
//! can run them inside a single transaction.

pub mod category;
pub mod product;
pub mod report;
pub mod transaction;
