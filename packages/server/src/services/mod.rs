//! Domain managers. Each one borrows an explicit connection handle and is
//! constructed per request by the handlers.

pub mod class;
pub mod enrollment;
pub mod participant;
