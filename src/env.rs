use std::path::PathBuf;

use dotenv::dotenv;

pub struct EnvironmentVariables {
    pub snapshot_path: Option<PathBuf>
}

/// Loads `.env` (when present) into the process environment, so argument
/// parsing sees it too
pub fn get_env() -> EnvironmentVariables {
    dotenv().ok();

    let snapshot_path = std::env::var("AGEGRADE_SNAPSHOT")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    EnvironmentVariables { snapshot_path }
}
