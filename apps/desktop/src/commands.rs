//! Page-action command surface: one command per user action the pages
//! perform. Each guarded command rechecks authentication itself and fails
//! with `Unauthorized` before any HTTP is attempted; the webview does
//! rendering and navigation only.

use std::sync::Arc;
use std::time::Duration;

use tauri::{command, State};
use uuid::Uuid;

use crate::api::ResumeStore;
use crate::auth::validation::validate_registration;
use crate::editor::preview::render_preview;
use crate::editor::sync::{SyncHandle, SyncStatus};
use crate::editor::{EditorSession, EditorView, EntryId};
use crate::errors::AppError;
use crate::models::resume::{
    Education, Language, PersonalInfo, Resume, ResumeCreate, ResumeUpdate, ResumeVersion, Skill,
    WorkExperience,
};
use crate::models::user::{LoginRequest, RegisterRequest, User};
use crate::state::AppState;

fn require_auth(state: &AppState) -> Result<(), AppError> {
    if state.auth.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

async fn with_session<T>(
    state: &AppState,
    f: impl FnOnce(&mut EditorSession) -> Result<T, AppError>,
) -> Result<T, AppError> {
    let mut guard = state.editor.lock().await;
    match guard.as_mut() {
        Some(session) => f(session),
        None => Err(AppError::NotFound(
            "No resume is open in the editor".to_string(),
        )),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Auth
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn register_user(
    state: &AppState,
    request: RegisterRequest,
) -> Result<User, AppError> {
    let errors = validate_registration(&request);
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(state.api.register(&request).await?)
}

/// Registers a new account. Validates client-side first; a short password or
/// malformed email is rejected with field errors and no network call.
#[command]
pub async fn register(
    state: State<'_, AppState>,
    request: RegisterRequest,
) -> Result<User, AppError> {
    register_user(&state, request).await
}

/// Logs in and stores the returned bearer token in persisted auth state.
#[command]
pub async fn login(state: State<'_, AppState>, request: LoginRequest) -> Result<(), AppError> {
    let token = state.api.login(&request).await?;
    state.auth.set(token.access_token)?;
    Ok(())
}

/// Clears the persisted token and disposes any open editing session without
/// flushing — a logged-out client must not write.
#[command]
pub async fn logout(state: State<'_, AppState>) -> Result<(), AppError> {
    state.editor.lock().await.take();
    state.auth.clear()?;
    Ok(())
}

/// Backs the pages' redirect-if-unauthenticated guard.
#[command]
pub async fn is_authenticated(state: State<'_, AppState>) -> Result<bool, AppError> {
    Ok(state.auth.is_authenticated())
}

// ────────────────────────────────────────────────────────────────────────────
// Dashboard
// ────────────────────────────────────────────────────────────────────────────

pub(crate) async fn fetch_resumes(state: &AppState) -> Result<Vec<Resume>, AppError> {
    require_auth(state)?;
    Ok(state.api.list_resumes().await?)
}

/// GET /api/v1/resumes/ — the dashboard's list.
#[command]
pub async fn list_resumes(state: State<'_, AppState>) -> Result<Vec<Resume>, AppError> {
    fetch_resumes(&state).await
}

/// Creates a resume. Always starts as "Untitled Resume" in English with
/// empty content; the server fills in the rest.
#[command]
pub async fn create_resume(state: State<'_, AppState>) -> Result<Resume, AppError> {
    require_auth(&state)?;
    Ok(state.api.create_resume(&ResumeCreate::default()).await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Editor lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// Fetches a resume and starts an editing session bound to it. Any previous
/// session is replaced, canceling its pending flush.
#[command]
pub async fn open_resume(
    state: State<'_, AppState>,
    resume_id: Uuid,
) -> Result<EditorView, AppError> {
    require_auth(&state)?;
    let resume = state.api.get_resume(resume_id).await?;

    let store: Arc<dyn ResumeStore> = state.api.clone();
    let sync = SyncHandle::spawn(
        resume.id,
        store,
        Duration::from_millis(state.config.save_debounce_ms),
    );
    let session = EditorSession::open(resume, sync);
    let view = session.view();

    *state.editor.lock().await = Some(session);
    Ok(view)
}

/// Flushes outstanding edits, then disposes the session.
#[command]
pub async fn close_editor(state: State<'_, AppState>) -> Result<(), AppError> {
    if let Some(session) = state.editor.lock().await.take() {
        session.close().await;
    }
    Ok(())
}

/// Forces a flush of any pending edits, bypassing the debounce delay.
#[command]
pub async fn save_now(state: State<'_, AppState>) -> Result<(), AppError> {
    let guard = state.editor.lock().await;
    match guard.as_ref() {
        Some(session) => {
            session.sync().flush_now().await;
            Ok(())
        }
        None => Err(AppError::NotFound(
            "No resume is open in the editor".to_string(),
        )),
    }
}

/// The sync controller's observable state; the editor polls this to drive
/// its "Saving…" indicator.
#[command]
pub async fn sync_status(state: State<'_, AppState>) -> Result<SyncStatus, AppError> {
    with_session(&state, |session| Ok(session.sync().status())).await
}

pub(crate) async fn rename_open_resume(
    state: &AppState,
    title: String,
) -> Result<Resume, AppError> {
    require_auth(state)?;
    let resume_id = state
        .editor
        .lock()
        .await
        .as_ref()
        .map(|session| session.resume_id())
        .ok_or_else(|| AppError::NotFound("No resume is open in the editor".to_string()))?;

    // The lock is released during the PUT so content mutations keep flowing.
    let resume = state
        .api
        .update_resume(resume_id, &ResumeUpdate::title(title))
        .await?;

    // The session may have been replaced while the PUT was in flight; only
    // retitle the one the PUT was issued for.
    let mut guard = state.editor.lock().await;
    if let Some(session) = guard.as_mut() {
        if session.resume_id() == resume.id {
            session.set_title(resume.title.clone());
        }
    }
    Ok(resume)
}

/// Saves the title through a discrete PUT, outside the debounced content
/// path.
#[command]
pub async fn rename_resume(state: State<'_, AppState>, title: String) -> Result<Resume, AppError> {
    rename_open_resume(&state, title).await
}

/// GET /api/v1/resumes/{id}/versions — the server-side version history.
#[command]
pub async fn resume_versions(
    state: State<'_, AppState>,
    resume_id: Uuid,
) -> Result<Vec<ResumeVersion>, AppError> {
    require_auth(&state)?;
    Ok(state.api.list_versions(resume_id).await?)
}

/// Renders the preview pane from the current working copy.
#[command]
pub async fn preview_html(state: State<'_, AppState>) -> Result<String, AppError> {
    with_session(&state, |session| Ok(render_preview(&session.snapshot()))).await
}

// ────────────────────────────────────────────────────────────────────────────
// Content mutations. Each applies synchronously to the working copy and
// feeds the sync controller; the form always reflects the latest keystroke.
// ────────────────────────────────────────────────────────────────────────────

#[command]
pub async fn set_personal_info(
    state: State<'_, AppState>,
    info: PersonalInfo,
) -> Result<(), AppError> {
    with_session(&state, |session| {
        session.set_personal_info(info);
        Ok(())
    })
    .await
}

#[command]
pub async fn add_experience(
    state: State<'_, AppState>,
    entry: WorkExperience,
) -> Result<EntryId, AppError> {
    with_session(&state, |session| Ok(session.add_experience(entry))).await
}

#[command]
pub async fn update_experience(
    state: State<'_, AppState>,
    entry_id: EntryId,
    entry: WorkExperience,
) -> Result<(), AppError> {
    with_session(&state, |session| session.update_experience(entry_id, entry)).await
}

#[command]
pub async fn remove_experience(
    state: State<'_, AppState>,
    entry_id: EntryId,
) -> Result<(), AppError> {
    with_session(&state, |session| session.remove_experience(entry_id)).await
}

#[command]
pub async fn add_education(
    state: State<'_, AppState>,
    entry: Education,
) -> Result<EntryId, AppError> {
    with_session(&state, |session| Ok(session.add_education(entry))).await
}

#[command]
pub async fn update_education(
    state: State<'_, AppState>,
    entry_id: EntryId,
    entry: Education,
) -> Result<(), AppError> {
    with_session(&state, |session| session.update_education(entry_id, entry)).await
}

#[command]
pub async fn remove_education(
    state: State<'_, AppState>,
    entry_id: EntryId,
) -> Result<(), AppError> {
    with_session(&state, |session| session.remove_education(entry_id)).await
}

#[command]
pub async fn add_skill(state: State<'_, AppState>, entry: Skill) -> Result<EntryId, AppError> {
    with_session(&state, |session| Ok(session.add_skill(entry))).await
}

#[command]
pub async fn update_skill(
    state: State<'_, AppState>,
    entry_id: EntryId,
    entry: Skill,
) -> Result<(), AppError> {
    with_session(&state, |session| session.update_skill(entry_id, entry)).await
}

#[command]
pub async fn remove_skill(state: State<'_, AppState>, entry_id: EntryId) -> Result<(), AppError> {
    with_session(&state, |session| session.remove_skill(entry_id)).await
}

#[command]
pub async fn add_language(state: State<'_, AppState>, entry: Language) -> Result<EntryId, AppError> {
    with_session(&state, |session| Ok(session.add_language(entry))).await
}

#[command]
pub async fn update_language(
    state: State<'_, AppState>,
    entry_id: EntryId,
    entry: Language,
) -> Result<(), AppError> {
    with_session(&state, |session| session.update_language(entry_id, entry)).await
}

#[command]
pub async fn remove_language(
    state: State<'_, AppState>,
    entry_id: EntryId,
) -> Result<(), AppError> {
    with_session(&state, |session| session.remove_language(entry_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiError};
    use crate::auth::AuthStore;
    use crate::config::Config;
    use crate::editor::sync::SyncHandle;
    use crate::models::resume::{ResumeContent, ResumeLanguage};
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    // Nothing listens on this base URL, so any attempted HTTP call surfaces
    // as a network error. A typed guard or validation error therefore proves
    // the command short-circuited before any request was made.
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    struct NullStore;

    #[async_trait]
    impl ResumeStore for NullStore {
        async fn put_content(
            &self,
            _resume_id: Uuid,
            _content: &ResumeContent,
        ) -> Result<Resume, ApiError> {
            Err(ApiError::Api {
                status: 500,
                message: "unused".to_string(),
            })
        }
    }

    fn state_with(dir: &tempfile::TempDir) -> AppState {
        let auth = Arc::new(AuthStore::hydrate(dir.path().join("auth-storage.json")));
        let api = Arc::new(ApiClient::new(UNREACHABLE.to_string(), auth.clone()));
        AppState {
            api,
            auth,
            config: Config {
                api_base_url: UNREACHABLE.to_string(),
                save_debounce_ms: 1000,
                rust_log: "info".to_string(),
            },
            editor: Mutex::new(None),
        }
    }

    fn sample_resume() -> Resume {
        let epoch = chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        Resume {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Untitled Resume".to_string(),
            language: ResumeLanguage::En,
            template_id: "default".to_string(),
            content: ResumeContent::default(),
            current_version: 1,
            created_at: epoch,
            updated_at: epoch,
        }
    }

    fn register_request(password: &str) -> RegisterRequest {
        RegisterRequest {
            email: "user@example.com".to_string(),
            password: password.to_string(),
            full_name: "Test User".to_string(),
        }
    }

    #[test]
    fn test_require_auth_tracks_token_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir);
        assert!(matches!(
            require_auth(&state),
            Err(AppError::Unauthorized)
        ));
        state.auth.set("tok-123".to_string()).unwrap();
        assert!(require_auth(&state).is_ok());
    }

    #[tokio::test]
    async fn test_unauthenticated_list_fails_before_any_fetch() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir);
        let err = fetch_resumes(&state).await.unwrap_err();
        // A network error would mean a request went out despite the guard.
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[tokio::test]
    async fn test_short_password_registration_makes_no_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir);
        let err = register_user(&state, register_request("short"))
            .await
            .unwrap_err();
        match err {
            AppError::Validation(fields) => {
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].field, "password");
            }
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_rename_without_open_session_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir);
        state.auth.set("tok-123".to_string()).unwrap();
        let err = rename_open_resume(&state, "New Title".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_rename_leaves_session_title_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(&dir);
        state.auth.set("tok-123".to_string()).unwrap();

        let resume = sample_resume();
        let sync = SyncHandle::spawn(
            resume.id,
            Arc::new(NullStore),
            Duration::from_millis(1000),
        );
        *state.editor.lock().await = Some(EditorSession::open(resume, sync));

        let err = rename_open_resume(&state, "New Title".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Network(_)));

        let guard = state.editor.lock().await;
        assert_eq!(guard.as_ref().unwrap().view().title, "Untitled Resume");
    }
}
