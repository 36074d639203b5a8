pub mod bivec;
pub mod cursor;
pub mod ledger;
