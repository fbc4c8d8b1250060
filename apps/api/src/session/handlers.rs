//! Axum route handlers for the interview session API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::assistant::prompts::{DRAFT_QUESTIONS_SYSTEM_TEMPLATE, DRAFT_QUESTIONS_USER_TURN};
use crate::assistant::ChatMessage;
use crate::catalog::Level;
use crate::errors::AppError;
use crate::extractor;
use crate::report::{self, Decision, ReportInput};
use crate::session::{SessionState, SessionView};
use crate::state::AppState;

/// Panel text shown when the selected position is missing from the workbook.
pub const UNKNOWN_POSITION_PLACEHOLDER: &str = "(position not found in the current workbook)";

/// Maximum number of résumé characters interpolated into the hidden prompt.
const RESUME_PROMPT_LIMIT: usize = 4000;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Optional chat API credential, held in memory for this session only.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub position: String,
    pub level: Level,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub position: String,
    pub level: Level,
    pub jd: String,
    pub question: String,
    /// False when the position was unknown and placeholder text is shown.
    pub known_position: bool,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_name: String,
    pub extracted_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantTurnResponse {
    pub reply: String,
    pub session: SessionView,
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub comments: String,
    pub decision: Decision,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Starts a session, seeded with the assistant welcome message. The optional
/// credential lives only inside this session.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let api_key = request.api_key.filter(|key| !key.trim().is_empty());
    let session = state.sessions.create(api_key).await;
    let session = session.lock().await;

    info!("Session {} created", session.id);
    Ok(Json(SessionResponse {
        session: session.snapshot(),
    }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = lookup_session(&state, id).await?;
    let session = session.lock().await;
    Ok(Json(SessionResponse {
        session: session.snapshot(),
    }))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        info!("Session {id} ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// POST /api/v1/sessions/:id/selection
///
/// Validates the position against the catalog key set and stores the
/// selection. An unknown position keeps the session usable and answers with
/// placeholder panel text instead of failing the interaction.
pub async fn handle_selection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let catalog = state.catalog()?;
    let session = lookup_session(&state, id).await?;
    let mut session = session.lock().await;

    session.position = Some(request.position.clone());
    session.level = request.level;

    let response = match catalog.get(&request.position) {
        Some(record) => SelectionResponse {
            position: request.position,
            level: request.level,
            jd: record.jd.clone(),
            question: record.question(request.level).to_string(),
            known_position: true,
        },
        None => SelectionResponse {
            position: request.position,
            level: request.level,
            jd: UNKNOWN_POSITION_PLACEHOLDER.to_string(),
            question: UNKNOWN_POSITION_PLACEHOLDER.to_string(),
            known_position: false,
        },
    };

    Ok(Json(response))
}

/// POST /api/v1/sessions/:id/resume
///
/// Multipart upload of one résumé file. The file is read fully into memory,
/// text-extracted, and the bytes dropped; only the extracted text stays on
/// the session.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let session = lookup_session(&state, id).await?;

    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(ToOwned::to_owned) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("No file field in upload".to_string()))?;

    let extracted_text = extractor::extract(&data, &file_name);
    info!(
        "Session {id}: extracted {} chars from '{file_name}'",
        extracted_text.chars().count()
    );

    let mut session = session.lock().await;
    session.resume_text = extracted_text.clone();

    Ok(Json(UploadResponse {
        file_name,
        extracted_text,
    }))
}

/// POST /api/v1/sessions/:id/questions/draft
///
/// Composes the hidden system prompt from the current job description and
/// résumé text, queues it, records a synthetic user turn, expands the
/// assistant panel, then runs the one assistant turn that consumes the
/// prompt.
pub async fn handle_draft_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AssistantTurnResponse>, AppError> {
    let catalog = state.catalog()?;
    let session = lookup_session(&state, id).await?;
    let mut session = session.lock().await;

    let position = session
        .position
        .clone()
        .ok_or_else(|| AppError::Validation("No position selected".to_string()))?;
    let record = catalog
        .get(&position)
        .ok_or_else(|| AppError::Validation(format!("Unknown position: {position}")))?;

    let resume_text: String = session
        .resume_text
        .chars()
        .take(RESUME_PROMPT_LIMIT)
        .collect();
    let prompt = DRAFT_QUESTIONS_SYSTEM_TEMPLATE
        .replace("{jd_text}", &record.jd)
        .replace("{resume_text}", &resume_text);

    session.queue_hidden_prompt(prompt);
    session
        .messages
        .push(ChatMessage::user(DRAFT_QUESTIONS_USER_TURN));
    session.assistant_expanded = true;

    let reply = session.run_assistant_turn(&state.assistant).await;

    Ok(Json(AssistantTurnResponse {
        reply,
        session: session.snapshot(),
    }))
}

/// POST /api/v1/sessions/:id/chat
///
/// Appends the user message and runs one assistant turn.
pub async fn handle_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<AssistantTurnResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let session = lookup_session(&state, id).await?;
    let mut session = session.lock().await;

    session.messages.push(ChatMessage::user(request.message));
    let reply = session.run_assistant_turn(&state.assistant).await;

    Ok(Json(AssistantTurnResponse {
        reply,
        session: session.snapshot(),
    }))
}

/// POST /api/v1/sessions/:id/report
///
/// Assembles the report from the session and the submitted form fields and
/// returns the document as a download.
pub async fn handle_export_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let session = lookup_session(&state, id).await?;
    let session = session.lock().await;

    let position = session
        .position
        .clone()
        .ok_or_else(|| AppError::Validation("No position selected".to_string()))?;
    let question = state
        .catalog
        .as_deref()
        .and_then(|catalog| catalog.get(&position))
        .map(|record| record.question(session.level).to_string())
        .unwrap_or_else(|| UNKNOWN_POSITION_PLACEHOLDER.to_string());

    let input = ReportInput {
        position: &position,
        level: session.level,
        comments: &request.comments,
        decision: request.decision,
        question: &question,
        resume_excerpt: Some(session.resume_text.as_str()).filter(|text| !text.is_empty()),
    };
    let document = report::build(&input)?;
    let file_name = report::file_name(&position, Local::now().date_naive());

    info!("Session {id}: exported report '{file_name}'");

    Ok((
        [
            (header::CONTENT_TYPE, report::DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        document,
    ))
}

async fn lookup_session(
    state: &AppState,
    id: Uuid,
) -> Result<Arc<Mutex<SessionState>>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}
