pub mod account;
pub mod invoke;
