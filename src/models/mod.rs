mod expense;
mod recurring;
mod user;

pub(crate) use expense::Expense;
pub(crate) use recurring::RecurringExpense;
pub(crate) use user::AuthUser;
