// src/models/company.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::client::{
    validate_not_blank_name, validate_optional_email, validate_tax_condition, DEFAULT_PROVINCE,
};

pub const DEFAULT_COMPANY_NAME: &str = "BM Iluminación";

// Registro único com os dados fiscais da empresa (usado no cabeçalho dos pedidos impressos).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Company {
    #[serde(rename = "razon_social")]
    #[schema(example = "BM Iluminación")]
    pub name: String,
    #[serde(rename = "cuit")]
    pub tax_id: String,
    #[serde(rename = "condicion_iva")]
    pub tax_condition: String,
    #[serde(rename = "domicilio_fiscal")]
    pub fiscal_address: String,
    #[serde(rename = "localidad")]
    pub city: String,
    #[serde(rename = "provincia")]
    pub province: String,
    #[serde(rename = "codigo_postal")]
    pub postal_code: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "contacto")]
    pub contact: String,
    #[serde(rename = "notas")]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            name: DEFAULT_COMPANY_NAME.to_string(),
            tax_id: String::new(),
            tax_condition: String::new(),
            fiscal_address: String::new(),
            city: String::new(),
            province: DEFAULT_PROVINCE.to_string(),
            postal_code: String::new(),
            email: String::new(),
            phone: String::new(),
            contact: String::new(),
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyPayload {
    #[serde(rename = "razon_social")]
    #[validate(custom(function = "validate_not_blank_name"))]
    #[schema(example = "BM Iluminación")]
    pub name: Option<String>,
    #[serde(rename = "cuit")]
    #[schema(example = "30-12345678-9")]
    pub tax_id: Option<String>,
    #[serde(rename = "condicion_iva")]
    #[validate(custom(function = "validate_tax_condition"))]
    pub tax_condition: Option<String>,
    #[serde(rename = "domicilio_fiscal")]
    pub fiscal_address: Option<String>,
    #[serde(rename = "localidad")]
    pub city: Option<String>,
    #[serde(rename = "provincia")]
    pub province: Option<String>,
    #[serde(rename = "codigo_postal")]
    pub postal_code: Option<String>,
    #[validate(custom(function = "validate_optional_email"))]
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "contacto")]
    pub contact: Option<String>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
}

impl UpdateCompanyPayload {
    pub fn apply_to(&self, company: &mut Company) {
        let fields: [(&Option<String>, &mut String); 11] = [
            (&self.name, &mut company.name),
            (&self.tax_id, &mut company.tax_id),
            (&self.tax_condition, &mut company.tax_condition),
            (&self.fiscal_address, &mut company.fiscal_address),
            (&self.city, &mut company.city),
            (&self.province, &mut company.province),
            (&self.postal_code, &mut company.postal_code),
            (&self.email, &mut company.email),
            (&self.phone, &mut company.phone),
            (&self.contact, &mut company.contact),
            (&self.notes, &mut company.notes),
        ];
        for (value, target) in fields {
            if let Some(value) = value {
                *target = value.trim().to_string();
            }
        }
    }
}
