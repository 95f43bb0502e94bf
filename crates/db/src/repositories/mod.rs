//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod journal;
pub mod report;
pub mod user;

pub use account::{
    AccountError, AccountRepository, AccountWithChildren, CreateAccountInput, UpdateAccountInput,
};
pub use journal::{JournalDetailLine, JournalDetailed, JournalError, JournalRepository, JournalSummary};
pub use report::{ReportError, ReportRepository};
pub use user::{CreateUserInput, UserError, UserRepository};

use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};

/// Case-insensitive `LIKE` on a column. `pattern` escapes with a backslash.
pub(crate) fn ilike<C: IntoColumnRef>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .like(LikeExpr::new(pattern.to_lowercase()).escape('\\'))
}
