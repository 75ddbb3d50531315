//! Configuration snapshots carried through payment metadata.
//!
//! The payment provider is the only state that survives the checkout
//! redirect, so the full reading configuration is flattened into its
//! string-to-string metadata map before checkout and rebuilt from it on
//! return. Restore re-validates everything against the catalogs; a
//! tampered or truncated snapshot fails instead of producing a half-formed
//! session.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};

use crate::analysis;
use crate::error::CoreError;
use crate::session::{
    AstroSession, DreamSession, ReadingKind, ReadingSession, SessionCommon, TarotSession,
    UNTITLED_DREAM,
};
use crate::spread;
use crate::styles;
use crate::validate::{MIN_BIRTH_DATE, MAX_NAME_LEN};

/// Provider-imposed ceiling on a single metadata value.
pub const MAX_VALUE_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Capture
// ---------------------------------------------------------------------------

/// Flatten a configured session into a metadata map.
///
/// Fails with [`CoreError::Validation`] if a required configuration field
/// is still unset, which means the wizard let the user reach checkout too
/// early.
pub fn capture(session: &ReadingSession) -> Result<BTreeMap<String, String>, CoreError> {
    let mut map = BTreeMap::new();
    map.insert("flow".to_string(), session.kind().as_str().to_string());
    map.insert("user_name".to_string(), clip(session.display_name()));

    match session {
        ReadingSession::Tarot(s) => {
            map.insert("spread_choice".to_string(), clip(required(&s.spread, "spread")?));
            map.insert("reading_style".to_string(), clip(required(&s.style, "reading style")?));
            map.insert("question".to_string(), clip(&s.question));
        }
        ReadingSession::Astro(s) => {
            let dob = s.dob.ok_or_else(|| missing("birth date"))?;
            let tob = s.tob.ok_or_else(|| missing("birth time"))?;
            map.insert("dob".to_string(), dob.format("%Y-%m-%d").to_string());
            map.insert("tob".to_string(), tob.format("%H:%M").to_string());
            map.insert("city".to_string(), clip(required(&s.city, "birth city")?));
            map.insert("analysis_choice".to_string(), clip(required(&s.analysis, "analysis")?));
            map.insert("reading_style".to_string(), clip(required(&s.style, "reading style")?));
        }
        ReadingSession::Dream(s) => {
            map.insert(
                "dream_title".to_string(),
                clip(s.dream_title.as_deref().unwrap_or(UNTITLED_DREAM)),
            );
            map.insert(
                "dream_description".to_string(),
                clip(required(&s.dream_description, "dream description")?),
            );
            map.insert("reading_style".to_string(), clip(required(&s.style, "reading style")?));
        }
    }
    Ok(map)
}

fn required<'a>(field: &'a Option<String>, what: &str) -> Result<&'a str, CoreError> {
    field.as_deref().ok_or_else(|| missing(what))
}

fn missing(what: &str) -> CoreError {
    CoreError::Validation(format!("Session is missing its {what}; cannot start checkout"))
}

/// Truncate to the provider's value ceiling on a char boundary.
fn clip(value: &str) -> String {
    if value.chars().count() <= MAX_VALUE_LEN {
        value.to_string()
    } else {
        value.chars().take(MAX_VALUE_LEN).collect()
    }
}

// ---------------------------------------------------------------------------
// Restore
// ---------------------------------------------------------------------------

/// Rebuild a session from payment metadata, validating every field against
/// the flow's catalogs. The restored session carries default lifecycle
/// state; the caller decides step and payment flags.
pub fn restore(
    expected: ReadingKind,
    metadata: &BTreeMap<String, String>,
) -> Result<ReadingSession, CoreError> {
    let flow = get(metadata, "flow")?;
    if flow != expected.as_str() {
        return Err(CoreError::Validation(format!(
            "Payment metadata belongs to flow '{flow}', expected '{}'",
            expected.as_str()
        )));
    }

    let user_name = get(metadata, "user_name")?;
    if user_name.is_empty() || user_name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(
            "Payment metadata carries an invalid user name".to_string(),
        ));
    }
    let common = SessionCommon {
        user_name: Some(user_name.to_string()),
        ..SessionCommon::default()
    };

    match expected {
        ReadingKind::Tarot => {
            let spread_choice = get(metadata, "spread_choice")?;
            spread::find(spread_choice)?;
            let style = get(metadata, "reading_style")?;
            styles::find(ReadingKind::Tarot, style)?;
            Ok(ReadingSession::Tarot(TarotSession {
                common,
                spread: Some(spread_choice.to_string()),
                style: Some(style.to_string()),
                question: metadata.get("question").cloned().unwrap_or_default(),
                drawn: Vec::new(),
            }))
        }
        ReadingKind::Astro => {
            let dob = NaiveDate::parse_from_str(get(metadata, "dob")?, "%Y-%m-%d")
                .map_err(|_| bad_field("dob"))?;
            let (y, m, d) = MIN_BIRTH_DATE;
            let min = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| bad_field("dob"))?;
            if dob < min || dob > chrono::Utc::now().date_naive() {
                return Err(bad_field("dob"));
            }
            let tob = NaiveTime::parse_from_str(get(metadata, "tob")?, "%H:%M")
                .map_err(|_| bad_field("tob"))?;
            let city = get(metadata, "city")?;
            if city.is_empty() {
                return Err(bad_field("city"));
            }
            let analysis_choice = get(metadata, "analysis_choice")?;
            analysis::find(analysis_choice)?;
            let style = get(metadata, "reading_style")?;
            styles::find(ReadingKind::Astro, style)?;
            Ok(ReadingSession::Astro(AstroSession {
                common,
                dob: Some(dob),
                tob: Some(tob),
                city: Some(city.to_string()),
                analysis: Some(analysis_choice.to_string()),
                style: Some(style.to_string()),
                chart: BTreeMap::new(),
            }))
        }
        ReadingKind::Dream => {
            let description = get(metadata, "dream_description")?;
            if description.is_empty() {
                return Err(bad_field("dream_description"));
            }
            let style = get(metadata, "reading_style")?;
            styles::find(ReadingKind::Dream, style)?;
            let title = metadata
                .get("dream_title")
                .filter(|t| !t.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| UNTITLED_DREAM.to_string());
            Ok(ReadingSession::Dream(DreamSession {
                common,
                dream_title: Some(title),
                dream_description: Some(description.to_string()),
                style: Some(style.to_string()),
            }))
        }
    }
}

fn get<'a>(metadata: &'a BTreeMap<String, String>, key: &'static str) -> Result<&'a str, CoreError> {
    metadata
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| CoreError::Validation(format!("Payment metadata is missing '{key}'")))
}

fn bad_field(key: &str) -> CoreError {
    CoreError::Validation(format!("Payment metadata carries an invalid '{key}'"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn tarot_session() -> ReadingSession {
        ReadingSession::Tarot(TarotSession {
            common: SessionCommon {
                user_name: Some("Luna".to_string()),
                ..SessionCommon::default()
            },
            spread: Some("Passado, Presente e Futuro".to_string()),
            style: Some("Mística e Inspiradora".to_string()),
            question: "Devo mudar de cidade?".to_string(),
            drawn: Vec::new(),
        })
    }

    fn astro_session() -> ReadingSession {
        ReadingSession::Astro(AstroSession {
            common: SessionCommon {
                user_name: Some("Luna".to_string()),
                ..SessionCommon::default()
            },
            dob: NaiveDate::from_ymd_opt(1990, 6, 15),
            tob: NaiveTime::from_hms_opt(17, 48, 0),
            city: Some("Lisboa".to_string()),
            analysis: Some("A Chama da Sua Alma (Análise do Sol)".to_string()),
            style: Some("Poeta Estelar".to_string()),
            chart: BTreeMap::new(),
        })
    }

    // -- Capture --

    #[test]
    fn tarot_capture_carries_the_full_configuration() {
        let map = capture(&tarot_session()).unwrap();
        assert_eq!(map.get("flow").unwrap(), "tarot");
        assert_eq!(map.get("user_name").unwrap(), "Luna");
        assert_eq!(map.get("spread_choice").unwrap(), "Passado, Presente e Futuro");
        assert_eq!(map.get("reading_style").unwrap(), "Mística e Inspiradora");
        assert_eq!(map.get("question").unwrap(), "Devo mudar de cidade?");
    }

    #[test]
    fn astro_capture_uses_iso_dates() {
        let map = capture(&astro_session()).unwrap();
        assert_eq!(map.get("dob").unwrap(), "1990-06-15");
        assert_eq!(map.get("tob").unwrap(), "17:48");
    }

    #[test]
    fn capture_fails_when_configuration_is_incomplete() {
        let mut session = tarot_session();
        if let ReadingSession::Tarot(s) = &mut session {
            s.style = None;
        }
        assert!(capture(&session).is_err());
    }

    #[test]
    fn long_values_are_clipped() {
        let mut session = tarot_session();
        if let ReadingSession::Tarot(s) = &mut session {
            s.question = "ã".repeat(MAX_VALUE_LEN + 50);
        }
        let map = capture(&session).unwrap();
        assert_eq!(map.get("question").unwrap().chars().count(), MAX_VALUE_LEN);
    }

    // -- Restore --

    #[test]
    fn tarot_roundtrip() {
        let original = tarot_session();
        let restored = restore(ReadingKind::Tarot, &capture(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn astro_roundtrip() {
        let original = astro_session();
        let restored = restore(ReadingKind::Astro, &capture(&original).unwrap()).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn dream_blank_title_restores_to_default() {
        let session = ReadingSession::Dream(DreamSession {
            common: SessionCommon {
                user_name: Some("Luna".to_string()),
                ..SessionCommon::default()
            },
            dream_title: None,
            dream_description: Some("Voava sobre o mar.".to_string()),
            style: Some("Xamânico-Espiritual".to_string()),
        });
        let restored = restore(ReadingKind::Dream, &capture(&session).unwrap()).unwrap();
        if let ReadingSession::Dream(s) = restored {
            assert_eq!(s.dream_title.as_deref(), Some(UNTITLED_DREAM));
        } else {
            panic!("wrong flow restored");
        }
    }

    #[test]
    fn cross_flow_metadata_is_rejected() {
        let map = capture(&tarot_session()).unwrap();
        assert!(restore(ReadingKind::Astro, &map).is_err());
    }

    #[test]
    fn unknown_catalog_labels_are_rejected() {
        let mut map = capture(&tarot_session()).unwrap();
        map.insert("spread_choice".to_string(), "Tiragem Inventada".to_string());
        assert!(restore(ReadingKind::Tarot, &map).is_err());
    }

    #[test]
    fn out_of_window_birth_dates_are_rejected() {
        let mut map = capture(&astro_session()).unwrap();
        map.insert("dob".to_string(), "1925-01-01".to_string());
        assert!(restore(ReadingKind::Astro, &map).is_err());

        let future = chrono::Utc::now().date_naive() + chrono::Days::new(1);
        map.insert("dob".to_string(), future.format("%Y-%m-%d").to_string());
        assert!(restore(ReadingKind::Astro, &map).is_err());
    }

    #[test]
    fn missing_key_is_rejected() {
        let mut map = capture(&tarot_session()).unwrap();
        map.remove("reading_style");
        assert!(restore(ReadingKind::Tarot, &map).is_err());
    }

    #[test]
    fn restored_session_carries_no_lifecycle_state() {
        let restored = restore(ReadingKind::Tarot, &capture(&tarot_session()).unwrap()).unwrap();
        assert!(!restored.common().payment_verified);
        assert!(restored.common().final_result.is_none());
    }
}
