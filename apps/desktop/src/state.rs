use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::auth::AuthStore;
use crate::config::Config;
use crate::editor::EditorSession;

/// Shared application state, managed by the Tauri builder and injected into
/// every command.
pub struct AppState {
    pub api: Arc<ApiClient>,
    pub auth: Arc<AuthStore>,
    pub config: Config,
    /// The one open editing session, if any. Replacing it drops the old
    /// session, which cancels its pending flush.
    pub editor: Mutex<Option<EditorSession>>,
}
