// src/models/dates.rs
//
// O front manda datas de <input type="date"> ("2026-10-19"), vazias ("") ou
// ISO completas ("2026-10-19T13:00:00.000Z"). Tudo vira DateTime<Utc>.
// Datas sem hora são interpretadas no fuso local do servidor, o mesmo usado
// nos limites do mês do dashboard e nos filtros de período.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

use crate::common::error::AppError;

/// Converte um horário "de parede" do fuso `tz` para UTC.
/// Em horário de verão ambíguo fica com o primeiro instante.
pub fn wall_clock_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 00:00:00 do dia no fuso `tz`.
pub fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    wall_clock_to_utc(tz, date.and_hms_opt(0, 0, 0)?)
}

/// 23:59:59 do dia no fuso `tz` (limite superior inclusivo).
pub fn end_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    wall_clock_to_utc(tz, date.and_hms_opt(23, 59, 59)?)
}

/// Interpreta uma data do front. Data sem hora = meia-noite local.
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| start_of_day(&Local, d))
}

/// Filtro de período (`fecha_desde` / `fecha_hasta`): "YYYY-MM-DD", vazio = sem filtro.
pub fn parse_day(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Fecha inválida en '{field}': {value}"))),
    }
}

pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_flexible(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("fecha inválida: {value}"))),
    }
}

/// Para updates parciais: campo ausente = `None` (via `#[serde(default)]`),
/// `null` ou `""` = `Some(None)` (limpar), data = `Some(Some(_))`.
pub fn deserialize_patch<'de, D>(deserializer: D) -> Result<Option<Option<DateTime<Utc>>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_opt(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_opt")]
        fecha: Option<DateTime<Utc>>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_patch")]
        fecha: Option<Option<DateTime<Utc>>>,
    }

    #[test]
    fn accepts_date_only_and_rfc3339() {
        let expected = Local
            .with_ymd_and_hms(2026, 10, 19, 0, 0, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parse_flexible("2026-10-19"), Some(expected));

        let full = parse_flexible("2026-10-19T13:45:00.000Z").unwrap();
        assert_eq!(full.hour(), 13);
        assert_eq!(parse_flexible("19/10/2026"), None);
    }

    #[test]
    fn day_bounds_respect_the_offset() {
        // Buenos Aires, UTC-3
        let art = FixedOffset::west_opt(3 * 3600).unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(
            start_of_day(&art, day).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 19, 3, 0, 0).unwrap()
        );
        assert_eq!(
            end_of_day(&art, day).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 20, 2, 59, 59).unwrap()
        );
    }

    #[test]
    fn parse_day_handles_empty_and_garbage() {
        assert_eq!(parse_day("fecha_desde", None).unwrap(), None);
        assert_eq!(parse_day("fecha_desde", Some("")).unwrap(), None);
        assert_eq!(
            parse_day("fecha_desde", Some("2026-01-31")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31)
        );
        assert!(parse_day("fecha_hasta", Some("31-01-2026")).is_err());
    }

    #[test]
    fn empty_and_missing_are_none() {
        let p: Form = serde_json::from_str(r#"{"fecha": ""}"#).unwrap();
        assert!(p.fecha.is_none());
        let p: Form = serde_json::from_str(r#"{}"#).unwrap();
        assert!(p.fecha.is_none());
        let p: Form = serde_json::from_str(r#"{"fecha": null}"#).unwrap();
        assert!(p.fecha.is_none());
        assert!(serde_json::from_str::<Form>(r#"{"fecha": "ayer"}"#).is_err());
    }

    #[test]
    fn patch_distinguishes_missing_from_cleared() {
        let p: Patch = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(p.fecha, None);
        let p: Patch = serde_json::from_str(r#"{"fecha": ""}"#).unwrap();
        assert_eq!(p.fecha, Some(None));
        let p: Patch = serde_json::from_str(r#"{"fecha": null}"#).unwrap();
        assert_eq!(p.fecha, Some(None));
        let p: Patch = serde_json::from_str(r#"{"fecha": "2026-10-26T12:00:00Z"}"#).unwrap();
        assert!(matches!(p.fecha, Some(Some(_))));
        assert!(serde_json::from_str::<Patch>(r#"{"fecha": "ayer"}"#).is_err());
    }
}
