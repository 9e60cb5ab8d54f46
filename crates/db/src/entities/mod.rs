//! `SeaORM` entity definitions.

pub mod banks;
pub mod cheque_history;
pub mod cheques;
pub mod invoices;
pub mod sea_orm_active_enums;
pub mod users;
