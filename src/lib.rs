pub mod analysis;
pub mod catalog;
pub mod comparison;
pub mod db;
pub mod error;
pub mod feedback;
pub mod history;
pub mod imaging;
pub mod oracle;
pub mod prediction;
pub mod settings;
pub mod storage;
mod utils;

#[cfg(feature = "desktop")]
mod commands;

pub use analysis::AnalysisService;
pub use catalog::{Label, StyleName, StyleRecord};
pub use error::{IkaraError, Result};
pub use prediction::Prediction;

#[cfg(feature = "desktop")]
pub(crate) use desktop::AppState;
#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;

    use tauri::Manager;
    use tokio::sync::Mutex;

    use crate::{
        analysis::AnalysisService,
        commands::{
            analyze_image, clear_history, clear_prediction, compare_predictions,
            comparison_add_slot, comparison_analyze, comparison_remove_slot,
            comparison_set_image, comparison_state, comparison_submit_feedback,
            current_prediction, delete_history_item, get_history, get_settings,
            get_style_catalog, history_summary, set_dark_mode, share_prediction,
            submit_feedback, update_settings,
        },
        comparison::ComparisonSession,
        db::Database,
        oracle::{ClassificationOracle, HttpOracle},
        settings::SettingsStore,
        storage::KeyValueStore,
    };

    pub(crate) struct AppState {
        pub(crate) analysis: AnalysisService,
        pub(crate) comparison: Mutex<ComparisonSession>,
        pub(crate) oracle: Arc<dyn ClassificationOracle>,
        pub(crate) settings: SettingsStore,
    }

    #[cfg_attr(mobile, tauri::mobile_entry_point)]
    pub fn run() {
        // Initialize logging (reads RUST_LOG env var)
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();

        log::info!("IKARA starting up...");

        tauri::Builder::default()
            .plugin(tauri_plugin_opener::init())
            .setup(|app| {
                let result = (|| -> anyhow::Result<()> {
                    let app_data_dir = app
                        .path()
                        .app_data_dir()
                        .map_err(|err| anyhow::anyhow!(err))?;
                    std::fs::create_dir_all(&app_data_dir)?;

                    let database = Database::new(app_data_dir.join("ikara.sqlite3"))?;
                    let store: Arc<dyn KeyValueStore> = Arc::new(database);

                    let settings_store = SettingsStore::new(app_data_dir.join("settings.json"))?;
                    let oracle_settings = settings_store.oracle();
                    log::info!("Using art analysis endpoint {}", oracle_settings.endpoint);
                    let oracle: Arc<dyn ClassificationOracle> =
                        Arc::new(HttpOracle::new(&oracle_settings)?);

                    app.manage(AppState {
                        analysis: AnalysisService::new(Arc::clone(&oracle), store),
                        comparison: Mutex::new(ComparisonSession::new()),
                        oracle,
                        settings: settings_store,
                    });

                    Ok(())
                })();

                result.map_err(|err| err.into())
            })
            .invoke_handler(tauri::generate_handler![
                analyze_image,
                current_prediction,
                clear_prediction,
                submit_feedback,
                share_prediction,
                get_history,
                delete_history_item,
                clear_history,
                history_summary,
                get_style_catalog,
                comparison_state,
                comparison_add_slot,
                comparison_remove_slot,
                comparison_set_image,
                comparison_analyze,
                comparison_submit_feedback,
                compare_predictions,
                get_settings,
                update_settings,
                set_dark_mode,
            ])
            .run(tauri::generate_context!())
            .expect("error while running tauri application");
    }
}
