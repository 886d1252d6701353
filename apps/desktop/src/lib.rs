pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod editor;
pub mod errors;
pub mod models;
pub mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use tauri::Manager;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::ApiClient;
use crate::auth::{AuthStore, AUTH_STORAGE_FILE};
use crate::config::Config;
use crate::state::AppState;

pub fn run() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder v{}", env!("CARGO_PKG_VERSION"));

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(move |app| {
            let config_dir = app.path().app_config_dir()?;
            std::fs::create_dir_all(&config_dir)?;

            let auth = Arc::new(AuthStore::hydrate(config_dir.join(AUTH_STORAGE_FILE)));
            let api = Arc::new(ApiClient::new(config.api_base_url.clone(), auth.clone()));
            info!("API client initialized (base url: {})", config.api_base_url);

            app.manage(AppState {
                api,
                auth,
                config,
                editor: Mutex::new(None),
            });
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::register,
            commands::login,
            commands::logout,
            commands::is_authenticated,
            commands::list_resumes,
            commands::create_resume,
            commands::open_resume,
            commands::close_editor,
            commands::save_now,
            commands::sync_status,
            commands::rename_resume,
            commands::resume_versions,
            commands::preview_html,
            commands::set_personal_info,
            commands::add_experience,
            commands::update_experience,
            commands::remove_experience,
            commands::add_education,
            commands::update_education,
            commands::remove_education,
            commands::add_skill,
            commands::update_skill,
            commands::remove_skill,
            commands::add_language,
            commands::update_language,
            commands::remove_language
        ])
        .run(tauri::generate_context!())
        .context("Failed to run tauri application")?;

    Ok(())
}
