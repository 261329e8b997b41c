// src/common/listing.rs
//
// Paginação e filtros repetidos entre clientes e pedidos.

use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Página pedida (1-based) já normalizada.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Satura em i64::MAX: uma página absurda devolve lista vazia, não estoura.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageInfo {
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 20)]
    pub limit: i64,
    #[schema(example = 3)]
    pub pages: i64,
}

impl PageInfo {
    pub fn new(total: i64, request: PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            limit: request.limit,
            // ceil(total / limit)
            pages: (total + request.limit - 1) / request.limit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            data,
            pagination: PageInfo::new(total, request),
        }
    }
}

/// Filtro do flag `activo`. Ausente ou vazio = todos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActiveFilter {
    #[default]
    All,
    Only(bool),
}

impl ActiveFilter {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim) {
            None | Some("") | Some("todos") | Some("all") => Ok(ActiveFilter::All),
            Some("true") => Ok(ActiveFilter::Only(true)),
            Some("false") => Ok(ActiveFilter::Only(false)),
            Some(other) => Err(AppError::BadRequest(format!(
                "Valor inválido para 'activo': {other}"
            ))),
        }
    }

    pub fn as_option(self) -> Option<bool> {
        match self {
            ActiveFilter::All => None,
            ActiveFilter::Only(v) => Some(v),
        }
    }

    pub fn matches(self, activo: bool) -> bool {
        self.as_option().is_none_or(|wanted| wanted == activo)
    }
}

/// Termo de busca normalizado: `None` quando vazio.
pub fn normalize_search(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Busca por substring sem diferenciar maiúsculas (mesma regra do ILIKE no Postgres).
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
