pub mod store;
pub use store::{ClientStore, CompanyStore, OrderStore, UserStore};
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod memory;
pub use memory::MemoryStore;

/// Padrão ILIKE de "contém", com `\`, `%` e `_` do termo tratados como literais.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
