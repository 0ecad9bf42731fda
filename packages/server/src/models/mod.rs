pub mod class;
pub mod enrollment;
pub mod participant;
pub mod shared;
