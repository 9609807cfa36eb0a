//! `SeaORM` entity definitions.

pub mod accounts;
pub mod fiscal_years;
pub mod move_lines;
pub mod moves;
pub mod parties;
pub mod periods;
pub mod sea_orm_active_enums;
