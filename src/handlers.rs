pub mod auth;
pub mod clients;
pub mod company;
pub mod orders;
