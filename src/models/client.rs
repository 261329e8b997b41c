// src/models/client.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::common::listing::{contains_ci, ActiveFilter};

/// Condições de IVA aceitas (AFIP). Vazio = não informado.
pub const TAX_CONDITIONS: [&str; 5] = [
    "Responsable Inscripto",
    "Monotributista",
    "Exento",
    "Consumidor Final",
    "",
];

pub const DEFAULT_PROVINCE: &str = "Buenos Aires";

pub(crate) fn validate_tax_condition(val: &str) -> Result<(), ValidationError> {
    if !TAX_CONDITIONS.contains(&val.trim()) {
        let mut err = ValidationError::new("invalid_tax_condition");
        err.message = Some("Condición de IVA inválida.".into());
        return Err(err);
    }
    Ok(())
}

// E-mail é opcional: vazio passa, preenchido precisa ser válido.
pub(crate) fn validate_optional_email(val: &str) -> Result<(), ValidationError> {
    let val = val.trim();
    if !val.is_empty() && !val.validate_email() {
        let mut err = ValidationError::new("email");
        err.message = Some("El e-mail no es válido.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_not_blank_name(val: &str) -> Result<(), ValidationError> {
    if val.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("La razón social es obligatoria.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: Uuid,
    #[serde(rename = "razon_social")]
    #[schema(example = "Electricidad López S.R.L.")]
    pub name: String,
    #[serde(rename = "cuit")]
    #[schema(example = "30-71234567-0")]
    pub tax_id: String,
    #[serde(rename = "condicion_iva")]
    #[schema(example = "Responsable Inscripto")]
    pub tax_condition: String,
    #[serde(rename = "domicilio_fiscal")]
    pub fiscal_address: String,
    #[serde(rename = "localidad")]
    #[schema(example = "Morón")]
    pub city: String,
    #[serde(rename = "provincia")]
    #[schema(example = "Buenos Aires")]
    pub province: String,
    #[serde(rename = "codigo_postal")]
    pub postal_code: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "contacto")]
    pub contact: String,
    #[serde(rename = "transporte")]
    pub carrier: String,
    #[serde(rename = "notas")]
    pub notes: String,
    #[serde(rename = "activo")]
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Client {
    // Campos cobertos pela busca livre da listagem.
    pub fn matches_search(&self, term: &str) -> bool {
        [&self.name, &self.tax_id, &self.email, &self.contact, &self.city]
            .into_iter()
            .any(|field| contains_ci(field, term))
    }
}

/// Payload de criação e de update (parcial). Na criação `razon_social` é exigida pelo service.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ClientPayload {
    #[serde(rename = "razon_social")]
    #[validate(custom(function = "validate_not_blank_name"))]
    #[schema(example = "Decoración Interior BA")]
    pub name: Option<String>,
    #[serde(rename = "cuit")]
    #[schema(example = "20-34567890-5")]
    pub tax_id: Option<String>,
    #[serde(rename = "condicion_iva")]
    #[validate(custom(function = "validate_tax_condition"))]
    #[schema(example = "Monotributista")]
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
    #[schema(example = "contacto@decoracionba.com.ar")]
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "contacto")]
    pub contact: Option<String>,
    #[serde(rename = "transporte")]
    pub carrier: Option<String>,
    #[serde(rename = "notas")]
    pub notes: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_ref().map(|v| v.trim().to_string())
}

impl ClientPayload {
    /// Remove espaços das pontas de todos os campos presentes.
    pub fn trimmed(&self) -> Self {
        Self {
            name: trimmed(&self.name),
            tax_id: trimmed(&self.tax_id),
            tax_condition: trimmed(&self.tax_condition),
            fiscal_address: trimmed(&self.fiscal_address),
            city: trimmed(&self.city),
            province: trimmed(&self.province),
            postal_code: trimmed(&self.postal_code),
            email: trimmed(&self.email),
            phone: trimmed(&self.phone),
            contact: trimmed(&self.contact),
            carrier: trimmed(&self.carrier),
            notes: trimmed(&self.notes),
        }
    }

    pub fn apply_to(&self, client: &mut Client) {
        let fields: [(&Option<String>, &mut String); 12] = [
            (&self.name, &mut client.name),
            (&self.tax_id, &mut client.tax_id),
            (&self.tax_condition, &mut client.tax_condition),
            (&self.fiscal_address, &mut client.fiscal_address),
            (&self.city, &mut client.city),
            (&self.province, &mut client.province),
            (&self.postal_code, &mut client.postal_code),
            (&self.email, &mut client.email),
            (&self.phone, &mut client.phone),
            (&self.contact, &mut client.contact),
            (&self.carrier, &mut client.carrier),
            (&self.notes, &mut client.notes),
        ];
        for (value, target) in fields {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
    }
}

/// Cliente novo com os padrões do cadastro aplicados.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub tax_id: String,
    pub tax_condition: String,
    pub fiscal_address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub email: String,
    pub phone: String,
    pub contact: String,
    pub carrier: String,
    pub notes: String,
}

impl NewClient {
    pub fn from_payload(name: String, payload: ClientPayload) -> Self {
        Self {
            name,
            tax_id: payload.tax_id.unwrap_or_default(),
            tax_condition: payload.tax_condition.unwrap_or_default(),
            fiscal_address: payload.fiscal_address.unwrap_or_default(),
            city: payload.city.unwrap_or_default(),
            province: payload.province.unwrap_or_else(|| DEFAULT_PROVINCE.to_string()),
            postal_code: payload.postal_code.unwrap_or_default(),
            email: payload.email.unwrap_or_default(),
            phone: payload.phone.unwrap_or_default(),
            contact: payload.contact.unwrap_or_default(),
            carrier: payload.carrier.unwrap_or_default(),
            notes: payload.notes.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ClientFilter {
    pub search: Option<String>,
    pub active: ActiveFilter,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        self.active.matches(client.active)
            && self
                .search
                .as_deref()
                .is_none_or(|term| client.matches_search(term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tax_condition_must_be_known() {
        assert!(validate_tax_condition("Monotributista").is_ok());
        assert!(validate_tax_condition("").is_ok());
        assert!(validate_tax_condition("Autónomo").is_err());
    }

    #[test]
    fn email_is_optional_but_checked() {
        assert!(validate_optional_email("").is_ok());
        assert!(validate_optional_email("info@lopez.com.ar").is_ok());
        assert!(validate_optional_email("no-es-mail").is_err());
    }

    #[test]
    fn payload_reads_spanish_keys_and_defaults_province() {
        let payload: ClientPayload = serde_json::from_value(json!({
            "razon_social": "  Construcciones Roca S.A. ",
            "cuit": "30-98765432-1",
            "localidad": "Quilmes"
        }))
        .unwrap();
        assert!(payload.validate().is_ok());

        let payload = payload.trimmed();
        let name = payload.name.clone().unwrap();
        assert_eq!(name, "Construcciones Roca S.A.");

        let new_client = NewClient::from_payload(name, payload);
        assert_eq!(new_client.province, DEFAULT_PROVINCE);
        assert_eq!(new_client.city, "Quilmes");
        assert_eq!(new_client.tax_condition, "");
    }

    #[test]
    fn blank_name_is_rejected() {
        let payload = ClientPayload {
            name: Some("   ".into()),
            ..Default::default()
        };
        assert!(payload.validate().is_err());
    }
}
