//! Postgres enum types and their conversions to core types.

use bukubesar_core::auth::UserRole as CoreUserRole;
use bukubesar_core::ledger::{AccountType as CoreAccountType, JournalStatus as CoreJournalStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_type")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_status")]
pub enum JournalStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "user")]
    User,
}

impl From<AccountType> for CoreAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<CoreAccountType> for AccountType {
    fn from(value: CoreAccountType) -> Self {
        match value {
            CoreAccountType::Asset => Self::Asset,
            CoreAccountType::Liability => Self::Liability,
            CoreAccountType::Equity => Self::Equity,
            CoreAccountType::Revenue => Self::Revenue,
            CoreAccountType::Expense => Self::Expense,
        }
    }
}

impl From<JournalStatus> for CoreJournalStatus {
    fn from(value: JournalStatus) -> Self {
        match value {
            JournalStatus::Draft => Self::Draft,
            JournalStatus::Posted => Self::Posted,
        }
    }
}

impl From<UserRole> for CoreUserRole {
    fn from(value: UserRole) -> Self {
        match value {
            UserRole::Admin => Self::Admin,
            UserRole::User => Self::User,
        }
    }
}

impl From<CoreUserRole> for UserRole {
    fn from(value: CoreUserRole) -> Self {
        match value {
            CoreUserRole::Admin => Self::Admin,
            CoreUserRole::User => Self::User,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_conversion_is_lossless() {
        for t in CoreAccountType::ALL {
            assert_eq!(CoreAccountType::from(AccountType::from(t)), t);
        }
    }

    #[test]
    fn test_string_values_match_core_names() {
        for t in CoreAccountType::ALL {
            assert_eq!(AccountType::from(t).to_value(), t.as_str());
        }
        assert_eq!(JournalStatus::Posted.to_value(), CoreJournalStatus::Posted.as_str());
        assert_eq!(UserRole::from(CoreUserRole::Admin).to_value(), "admin");
    }
}
