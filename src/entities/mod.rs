//! SeaORM entity definitions for the `spp` schema.

pub mod prelude;

pub mod bills;
pub mod classes;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod students;
pub mod users;
