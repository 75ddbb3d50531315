//! Input validation for the welcome step.
//!
//! Dates are strict `DD/MM/YYYY` checked against a plausible birth window;
//! times are optional `HH:MM` defaulting to noon. Every failure is a
//! [`CoreError::Validation`] so the user stays on the step and resubmits.

use chrono::{NaiveDate, NaiveTime};

use crate::error::CoreError;

/// Earliest accepted birth year.
pub const MIN_BIRTH_DATE: (i32, u32, u32) = (1930, 1, 1);

/// Maximum accepted display-name length.
pub const MAX_NAME_LEN: usize = 80;

/// Trim and require a non-empty display name.
pub fn require_name(raw: &str) -> Result<String, CoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(CoreError::Validation(
            "O Oráculo aguarda seu nome para criar a conexão.".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "O nome não pode exceder {MAX_NAME_LEN} caracteres."
        )));
    }
    Ok(name.to_string())
}

/// Trim and require a non-empty free-text description (dream flow).
pub fn require_description(raw: &str) -> Result<String, CoreError> {
    let description = raw.trim();
    if description.is_empty() {
        return Err(CoreError::Validation(
            "Por favor, descreva seu sonho para que ele possa ser interpretado.".to_string(),
        ));
    }
    Ok(description.to_string())
}

/// Parse a strict `DD/MM/YYYY` birth date and range-check it against
/// `[1930-01-01, today]`.
///
/// `today` is passed in rather than read from the clock so the rule is
/// testable with fixed dates.
pub fn parse_birth_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::Validation(
            "Por favor, preencha sua data de nascimento.".to_string(),
        ));
    }

    let dob = NaiveDate::parse_from_str(raw, "%d/%m/%Y").map_err(|_| {
        CoreError::Validation("Formato de data inválido. Use DD/MM/AAAA.".to_string())
    })?;

    let (y, m, d) = MIN_BIRTH_DATE;
    let min = NaiveDate::from_ymd_opt(y, m, d).expect("static minimum date is valid");
    if dob < min || dob > today {
        return Err(CoreError::Validation(
            "Insira uma data de nascimento válida (entre 1930 e hoje).".to_string(),
        ));
    }
    Ok(dob)
}

/// Parse an optional `HH:MM` birth time. Empty input defaults to `12:00`;
/// malformed input is rejected.
pub fn parse_birth_time(raw: &str) -> Result<NaiveTime, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(NaiveTime::from_hms_opt(12, 0, 0).expect("noon is a valid time"));
    }
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| {
        CoreError::Validation("Formato de hora inválido. Use HH:MM ou deixe em branco.".to_string())
    })
}
