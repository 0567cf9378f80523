pub mod advances;
pub mod balance;
pub mod setup;
pub mod transfer;
pub mod ui;
pub mod withdraw;
