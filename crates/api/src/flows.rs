//! The wizard engine: every operation a flow supports.
//!
//! Handlers stay thin; all session manipulation lives here. Each operation
//! loads the caller's session for the flow, applies the step machine, and
//! persists the outcome. Payment returns trust the provider's metadata
//! snapshot over whatever local state survived the redirect.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use arcana_core::error::CoreError;
use arcana_core::session::{ReadingKind, ReadingSession, UNTITLED_DREAM};
use arcana_core::step::{self, StepEvent, WizardStep};
use arcana_core::{analysis, deck, prompt, snapshot, spread, styles, validate};
use arcana_export as export;
use arcana_payments::reconcile::{reconcile, ReconcileOutcome, VERIFY_FAILED_MESSAGE};
use arcana_payments::CheckoutRequest;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Result text stored when the generation service fails. Stored like a
/// real result so the paid reading stays idempotent.
pub const GENERATION_FAILED_TEXT: &str = "### O Oráculo Silenciou\n\n\
    As energias não puderam ser canalizadas neste momento. \
    Respire fundo e tente novamente em instantes.";

/// Message shown when the provider reports the checkout as unpaid.
pub const NOT_CONFIRMED_MESSAGE: &str =
    "Seu pagamento ainda não foi confirmado. Conclua o pagamento para revelar sua leitura.";

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SpreadInfo {
    pub name: &'static str,
    pub card_count: usize,
    pub positions: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct StyleInfo {
    pub label: &'static str,
    pub explanation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AnalysisInfo {
    pub label: &'static str,
    pub explanation: &'static str,
}

/// Static catalogs a client needs to render the configure step.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub styles: Vec<StyleInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreads: Option<Vec<SpreadInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyses: Option<Vec<AnalysisInfo>>,
}

/// The wizard's state as seen by the client.
#[derive(Debug, Serialize)]
pub struct FlowView {
    pub flow: &'static str,
    pub title: &'static str,
    pub step: WizardStep,
    pub user_name: Option<String>,
    pub payment_verified: bool,
    pub has_result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub checkout_id: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct UnitViewDto {
    pub heading: String,
    pub detail: String,
}

/// The finished reading.
#[derive(Debug, Serialize)]
pub struct ResultView {
    pub title: String,
    pub user_name: String,
    pub config_lines: Vec<(String, String)>,
    pub units: Vec<UnitViewDto>,
    /// The generated text, markdown-flavoured.
    pub text: String,
}

fn flow_view(session: &ReadingSession, message: Option<String>) -> FlowView {
    let common = session.common();
    FlowView {
        flow: session.kind().as_str(),
        title: session.kind().title(),
        step: common.step,
        user_name: common.user_name.clone(),
        payment_verified: common.payment_verified,
        has_result: common.final_result.is_some(),
        message,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct WelcomeRequest {
    #[validate(length(max = 120))]
    pub user_name: String,
    /// Astro flow: `DD/MM/AAAA`.
    pub birth_date: Option<String>,
    /// Astro flow: `HH:MM`, blank means noon.
    pub birth_time: Option<String>,
    /// Astro flow: free-text birth city.
    #[validate(length(max = 120))]
    pub birth_city: Option<String>,
    /// Dream flow.
    #[validate(length(max = 120))]
    pub dream_title: Option<String>,
    #[validate(length(max = 4000))]
    pub dream_description: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ConfigureRequest {
    /// Tarot flow.
    pub spread_choice: Option<String>,
    /// Tarot flow; blank falls back to a general guidance question.
    #[validate(length(max = 500))]
    pub question: Option<String>,
    /// Astro flow.
    pub analysis_choice: Option<String>,
    pub reading_style: String,
}

fn check(request: &impl Validate) -> AppResult<()> {
    request
        .validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

/// Current wizard state plus the catalogs for this flow.
pub async fn view(state: &AppState, caller: Uuid, kind: ReadingKind) -> FlowView {
    let session = state.store.load(caller, kind).await;
    flow_view(&session, None)
}

/// The static catalogs for a flow.
pub fn catalog(kind: ReadingKind) -> CatalogView {
    let style_infos = styles::catalog(kind)
        .iter()
        .map(|s| StyleInfo {
            label: s.label,
            explanation: s.explanation,
        })
        .collect();

    CatalogView {
        styles: style_infos,
        spreads: (kind == ReadingKind::Tarot).then(|| {
            spread::SPREADS
                .iter()
                .map(|s| SpreadInfo {
                    name: s.name,
                    card_count: s.card_count(),
                    positions: s.positions,
                })
                .collect()
        }),
        analyses: (kind == ReadingKind::Astro).then(|| {
            analysis::ANALYSES
                .iter()
                .map(|a| AnalysisInfo {
                    label: a.label,
                    explanation: a.explanation,
                })
                .collect()
        }),
    }
}

// ---------------------------------------------------------------------------
// Welcome
// ---------------------------------------------------------------------------

/// Accept the welcome form and advance to the configure step.
pub async fn welcome(
    state: &AppState,
    caller: Uuid,
    kind: ReadingKind,
    request: WelcomeRequest,
) -> AppResult<FlowView> {
    check(&request)?;
    let mut session = state.store.load(caller, kind).await;
    let name = validate::require_name(&request.user_name)?;

    match &mut session {
        ReadingSession::Tarot(_) => {}
        ReadingSession::Astro(s) => {
            let today = chrono::Utc::now().date_naive();
            let dob = validate::parse_birth_date(
                request.birth_date.as_deref().unwrap_or_default(),
                today,
            )?;
            let tob = validate::parse_birth_time(request.birth_time.as_deref().unwrap_or_default())?;
            let city = request
                .birth_city
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or_else(|| {
                    CoreError::Validation(
                        "Por favor, informe a cidade de nascimento.".to_string(),
                    )
                })?;
            // Resolve the city now so a typo surfaces before any payment.
            state.charts.validate_city(city).await?;
            s.dob = Some(dob);
            s.tob = Some(tob);
            s.city = Some(city.to_string());
        }
        ReadingSession::Dream(s) => {
            let description = validate::require_description(
                request.dream_description.as_deref().unwrap_or_default(),
            )?;
            let title = request
                .dream_title
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED_DREAM);
            s.dream_title = Some(title.to_string());
            s.dream_description = Some(description);
        }
    }

    session.common_mut().user_name = Some(name);
    let next = step::apply(session.common().step, StepEvent::InputAccepted)?;
    session.common_mut().step = next;

    state.store.save(caller, kind, session.clone()).await;
    Ok(flow_view(&session, None))
}

// ---------------------------------------------------------------------------
// Configure
// ---------------------------------------------------------------------------

/// Accept the reading configuration and advance to the payment step.
pub async fn configure(
    state: &AppState,
    caller: Uuid,
    kind: ReadingKind,
    request: ConfigureRequest,
) -> AppResult<FlowView> {
    check(&request)?;
    let mut session = state.store.load(caller, kind).await;
    let style = styles::find(kind, &request.reading_style)?;

    match &mut session {
        ReadingSession::Tarot(s) => {
            let choice = request.spread_choice.as_deref().ok_or_else(|| {
                CoreError::Validation("Por favor, escolha uma tiragem.".to_string())
            })?;
            let chosen = spread::find(choice)?;
            s.spread = Some(chosen.name.to_string());
            s.style = Some(style.label.to_string());
            s.question = request
                .question
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string();
        }
        ReadingSession::Astro(s) => {
            let choice = request.analysis_choice.as_deref().ok_or_else(|| {
                CoreError::Validation("Por favor, escolha uma análise.".to_string())
            })?;
            let chosen = analysis::find(choice)?;
            s.analysis = Some(chosen.label.to_string());
            s.style = Some(style.label.to_string());
        }
        ReadingSession::Dream(s) => {
            s.style = Some(style.label.to_string());
        }
    }

    let next = step::apply(session.common().step, StepEvent::Confirm)?;
    session.common_mut().step = next;

    state.store.save(caller, kind, session.clone()).await;
    Ok(flow_view(&session, None))
}

/// Step back one wizard step, keeping everything entered so far.
pub async fn back(state: &AppState, caller: Uuid, kind: ReadingKind) -> AppResult<FlowView> {
    let mut session = state.store.load(caller, kind).await;
    let next = step::apply(session.common().step, StepEvent::Back)?;
    session.common_mut().step = next;
    state.store.save(caller, kind, session.clone()).await;
    Ok(flow_view(&session, None))
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// Open a checkout session carrying the configuration snapshot.
pub async fn checkout(
    state: &AppState,
    caller: Uuid,
    kind: ReadingKind,
) -> AppResult<CheckoutView> {
    let session = state.store.load(caller, kind).await;
    if session.common().step != WizardStep::Payment {
        return Err(CoreError::Conflict(
            "Checkout is only available from the payment step".to_string(),
        )
        .into());
    }

    let metadata = snapshot::capture(&session)?;
    let base = state.config.public_base_url.trim_end_matches('/');
    let flow = kind.as_str();
    let request = CheckoutRequest {
        price_id: state.config.price_for(kind).to_string(),
        success_url: format!(
            "{base}/api/v1/readings/{flow}/return?session_id={{CHECKOUT_SESSION_ID}}"
        ),
        cancel_url: format!("{base}/api/v1/readings/{flow}"),
        // Fresh reference per attempt so retries are distinguishable
        // provider-side.
        reference_id: Uuid::new_v4().to_string(),
        metadata,
    };

    let handle = state.gateway.create_checkout(&request).await?;
    tracing::info!(flow, checkout_id = %handle.id, "checkout session created");
    Ok(CheckoutView {
        checkout_id: handle.id,
        url: handle.url,
    })
}

// ---------------------------------------------------------------------------
// Payment return
// ---------------------------------------------------------------------------

/// Reconcile the return redirect from the payment page.
///
/// The local session may not have survived the redirect; on a paid record
/// the metadata snapshot is the source of truth and fully rebuilds it.
pub async fn payment_return(
    state: &AppState,
    caller: Uuid,
    kind: ReadingKind,
    checkout_id: Option<String>,
) -> AppResult<FlowView> {
    let session = state.store.load(caller, kind).await;

    // A replayed return URL must not touch an already verified session.
    if session.common().payment_verified {
        return Ok(flow_view(&session, None));
    }

    let outcome = match checkout_id {
        Some(id) => reconcile(kind, state.gateway.fetch_checkout(&id).await),
        None => ReconcileOutcome::Error(VERIFY_FAILED_MESSAGE.to_string()),
    };

    match outcome {
        ReconcileOutcome::Paid(mut restored) => {
            restored.common_mut().payment_verified = true;
            restored.common_mut().step = step::apply(session.common().step, StepEvent::ReturnPaid)
                .unwrap_or(WizardStep::Result);
            // A result generated earlier for this session stays.
            restored.common_mut().final_result = session.common().final_result.clone();
            prepare_content(state, &mut restored).await;
            state.store.save(caller, kind, restored.clone()).await;
            Ok(flow_view(&restored, None))
        }
        ReconcileOutcome::NotPaid => {
            let mut session = session;
            session.common_mut().step =
                step::apply(session.common().step, StepEvent::ReturnNotPaid)
                    .unwrap_or(WizardStep::Payment);
            state.store.save(caller, kind, session.clone()).await;
            Ok(flow_view(&session, Some(NOT_CONFIRMED_MESSAGE.to_string())))
        }
        ReconcileOutcome::Error(message) => {
            let mut session = session;
            session.common_mut().step =
                step::apply(session.common().step, StepEvent::ReturnLookupFailed)
                    .unwrap_or(WizardStep::Welcome);
            state.store.save(caller, kind, session.clone()).await;
            Ok(flow_view(&session, Some(message)))
        }
    }
}

/// Materialize the reading's content units right after payment, so the
/// result is fixed from the first render on.
async fn prepare_content(state: &AppState, session: &mut ReadingSession) {
    match session {
        ReadingSession::Tarot(s) => {
            if s.drawn.is_empty() {
                let count = s
                    .spread
                    .as_deref()
                    .and_then(|name| spread::find(name).ok())
                    .map(|sp| sp.card_count())
                    .unwrap_or(1);
                match deck::draw(count) {
                    Ok(drawn) => s.drawn = drawn,
                    Err(err) => tracing::error!(error = %err, "card draw failed"),
                }
            }
        }
        ReadingSession::Astro(s) => {
            if s.chart.is_empty() {
                if let (Some(dob), Some(tob), Some(city)) = (s.dob, s.tob, s.city.clone()) {
                    match state.charts.compute(dob, tob, &city).await {
                        Ok(chart) => s.chart = chart,
                        // The result fetch retries the computation.
                        Err(err) => tracing::warn!(error = %err, "chart computation failed"),
                    }
                }
            }
        }
        ReadingSession::Dream(_) => {}
    }
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

fn require_paid_result(session: &ReadingSession) -> AppResult<()> {
    let common = session.common();
    if common.step != WizardStep::Result || !common.payment_verified {
        return Err(AppError::Forbidden(
            "O resultado só fica disponível após a confirmação do pagamento.".to_string(),
        ));
    }
    Ok(())
}

/// Fetch the reading result, generating it on first access.
pub async fn result(state: &AppState, caller: Uuid, kind: ReadingKind) -> AppResult<ResultView> {
    let mut session = state.store.load(caller, kind).await;
    require_paid_result(&session)?;

    if session.common().final_result.is_none() {
        let generation_prompt = build_prompt(state, &mut session).await?;
        let text = match state.oracle.generate(&generation_prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(flow = kind.as_str(), error = %err, "generation failed");
                GENERATION_FAILED_TEXT.to_string()
            }
        };
        session.store_result(text)?;
        state.store.save(caller, kind, session.clone()).await;
    }

    let model = export::render(&session);
    Ok(ResultView {
        title: model.title,
        user_name: model.user_name,
        config_lines: model.config_lines,
        units: model
            .units
            .into_iter()
            .map(|u| UnitViewDto {
                heading: u.heading,
                detail: u.detail,
            })
            .collect(),
        text: session.common().final_result.clone().unwrap_or_default(),
    })
}

/// Assemble the generation prompt, materializing any content the payment
/// return could not (e.g. a chart the service failed to compute then).
async fn build_prompt(
    state: &AppState,
    session: &mut ReadingSession,
) -> AppResult<arcana_core::prompt::GenerationPrompt> {
    let user_name = session.display_name().to_string();
    match session {
        ReadingSession::Tarot(s) => {
            let chosen = spread::find(s.spread.as_deref().ok_or_else(config_lost)?)?;
            let style = styles::find(ReadingKind::Tarot, s.style.as_deref().ok_or_else(config_lost)?)?;
            if s.drawn.is_empty() {
                s.drawn = deck::draw(chosen.card_count())?;
            }
            Ok(prompt::tarot_prompt(
                &user_name, chosen, &s.drawn, style, &s.question,
            )?)
        }
        ReadingSession::Astro(s) => {
            let chosen = analysis::find(s.analysis.as_deref().ok_or_else(config_lost)?)?;
            let style = styles::find(ReadingKind::Astro, s.style.as_deref().ok_or_else(config_lost)?)?;
            if !s.chart.contains_key(chosen.point) {
                let (dob, tob, city) = match (s.dob, s.tob, s.city.clone()) {
                    (Some(dob), Some(tob), Some(city)) => (dob, tob, city),
                    _ => return Err(config_lost().into()),
                };
                s.chart = state.charts.compute(dob, tob, &city).await?;
            }
            let placement = s
                .chart
                .get(chosen.point)
                .ok_or_else(config_lost)?
                .clone();
            Ok(prompt::astro_prompt(&user_name, chosen, &placement, style))
        }
        ReadingSession::Dream(s) => {
            let style = styles::find(ReadingKind::Dream, s.style.as_deref().ok_or_else(config_lost)?)?;
            let title = s.dream_title.clone().unwrap_or_else(|| UNTITLED_DREAM.to_string());
            let description = s.dream_description.clone().ok_or_else(config_lost)?;
            Ok(prompt::dream_prompt(&user_name, &title, &description, style))
        }
    }
}

fn config_lost() -> CoreError {
    CoreError::Internal("paid session lost its reading configuration".to_string())
}

// ---------------------------------------------------------------------------
// Export / reset
// ---------------------------------------------------------------------------

/// Export the finished reading as a PDF.
pub async fn export_pdf(
    state: &AppState,
    caller: Uuid,
    kind: ReadingKind,
) -> AppResult<(String, Vec<u8>)> {
    let session = state.store.load(caller, kind).await;
    require_paid_result(&session)?;
    if session.common().final_result.is_none() {
        return Err(AppError::Forbidden(
            "A leitura ainda não foi gerada. Acesse o resultado primeiro.".to_string(),
        ));
    }

    let model = export::render(&session);
    let bytes = export::render_pdf(&model);
    let slug = filename_slug(&model.user_name);
    let name = if slug.is_empty() {
        format!("leitura-{}.pdf", kind.as_str())
    } else {
        format!("leitura-{slug}.pdf")
    };
    Ok((name, bytes))
}

/// ASCII-safe filename fragment from the user's display name.
fn filename_slug(name: &str) -> String {
    let mut slug = String::new();
    for c in name.chars() {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            'A'..='Z' => slug.push(c.to_ascii_lowercase()),
            ' ' | '-' | '_' | '.' => {
                if !slug.ends_with('-') && !slug.is_empty() {
                    slug.push('-');
                }
            }
            _ => {}
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Discard the flow's session entirely and return to the welcome step.
pub async fn reset(state: &AppState, caller: Uuid, kind: ReadingKind) -> FlowView {
    let mut session = state.store.load(caller, kind).await;
    session.reset();
    state.store.save(caller, kind, session.clone()).await;
    flow_view(&session, None)
}
