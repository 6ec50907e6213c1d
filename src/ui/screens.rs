pub(crate) mod expenses;
pub(crate) mod form;
pub(crate) mod login;
pub(crate) mod recurring;
