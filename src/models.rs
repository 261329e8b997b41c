pub mod auth;
pub mod client;
pub mod company;
pub mod dates;
pub mod order;
