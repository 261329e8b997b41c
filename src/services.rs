pub mod auth;
pub use auth::AuthService;
pub mod client_service;
pub use client_service::ClientService;
pub mod company_service;
pub use company_service::CompanyService;
pub mod ledger;
pub mod order_service;
pub use order_service::OrderService;
