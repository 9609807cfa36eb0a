//! `SeaORM` active enums.

use ledgerview_core::statement::AccountKind as CoreAccountKind;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Database representation of an account kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_kind")]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    #[sea_orm(string_value = "receivable")]
    Receivable,
    #[sea_orm(string_value = "payable")]
    Payable,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "stock")]
    Stock,
    #[sea_orm(string_value = "other")]
    Other,
    #[sea_orm(string_value = "view")]
    View,
}

impl From<AccountKind> for CoreAccountKind {
    fn from(kind: AccountKind) -> Self {
        match kind {
            AccountKind::Receivable => Self::Receivable,
            AccountKind::Payable => Self::Payable,
            AccountKind::Revenue => Self::Revenue,
            AccountKind::Expense => Self::Expense,
            AccountKind::Stock => Self::Stock,
            AccountKind::Other => Self::Other,
            AccountKind::View => Self::View,
        }
    }
}

impl From<CoreAccountKind> for AccountKind {
    fn from(kind: CoreAccountKind) -> Self {
        match kind {
            CoreAccountKind::Receivable => Self::Receivable,
            CoreAccountKind::Payable => Self::Payable,
            CoreAccountKind::Revenue => Self::Revenue,
            CoreAccountKind::Expense => Self::Expense,
            CoreAccountKind::Stock => Self::Stock,
            CoreAccountKind::Other => Self::Other,
            CoreAccountKind::View => Self::View,
        }
    }
}
