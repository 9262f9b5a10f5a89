/*
 * Utility functions for resolving the per-user directories this application
 * stores data in. Centralizes the directory logic so the catalog does not
 * repeat it.
 */
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;

const PROFILES_SUBFOLDER_NAME: &str = "profiles";

/*
 * Retrieves the application's local (non-roaming) configuration directory,
 * creating it if necessary. The path is derived without an organization
 * qualifier, placing it directly under the user's local application data
 * structure (e.g. AppData/Local on Windows). Returns `None` when the
 * directory cannot be determined or created.
 */
pub fn get_base_app_config_local_dir(app_name: &str) -> Option<PathBuf> {
    log::trace!("PathUtils: Resolving base app config local dir for '{app_name}'");
    ProjectDirs::from("", "", app_name).and_then(|proj_dirs| {
        let config_path = proj_dirs.config_local_dir();
        if !config_path.exists() {
            if let Err(e) = fs::create_dir_all(config_path) {
                log::error!(
                    "PathUtils: Failed to create base app config directory {config_path:?}: {e}"
                );
                return None;
            }
            log::debug!("PathUtils: Created base app config directory: {config_path:?}");
        }
        Some(config_path.to_path_buf())
    })
}

/*
 * Retrieves the directory that custom profile documents are stored in,
 * `<config>/profiles`, creating it if necessary.
 */
pub fn get_profile_storage_dir(app_name: &str) -> Option<PathBuf> {
    let config_dir = get_base_app_config_local_dir(app_name)?;
    let profiles_path = config_dir.join(PROFILES_SUBFOLDER_NAME);
    if !profiles_path.exists() {
        if let Err(e) = fs::create_dir_all(&profiles_path) {
            log::error!("PathUtils: Failed to create profile storage directory {profiles_path:?}: {e}");
            return None;
        }
        log::debug!("PathUtils: Created profile storage directory: {profiles_path:?}");
    }
    Some(profiles_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    // ProjectDirs behavior is environment-dependent; these tests assume a
    // typical user environment and clean up after themselves.

    fn remove_config_dir(app_name: &str) {
        if let Some(proj_dirs) = ProjectDirs::from("", "", app_name) {
            let dir = proj_dirs.config_local_dir();
            if dir.exists()
                && let Err(e) = fs::remove_dir_all(dir)
            {
                eprintln!("Test cleanup error for '{app_name}': {e}");
            }
        }
    }

    #[test]
    fn test_base_config_dir_is_created_and_contains_app_name() {
        let unique_app_name = format!("TestApp_AssocPaths_Base_{}", rand::random::<u128>());

        let path_opt = get_base_app_config_local_dir(&unique_app_name);

        assert!(path_opt.is_some(), "Should return a path for a new app name");
        let path = path_opt.unwrap();
        assert!(path.exists(), "Directory should have been created at {path:?}");
        assert!(path.is_dir());
        assert!(
            path.to_string_lossy()
                .to_lowercase()
                .contains(&unique_app_name.to_lowercase()),
            "Path should contain the app name. Path: {path:?}"
        );

        remove_config_dir(&unique_app_name);
    }

    #[test]
    fn test_profile_storage_dir_is_profiles_subfolder() {
        let unique_app_name = format!("TestApp_AssocPaths_Profiles_{}", rand::random::<u128>());

        let dir_opt = get_profile_storage_dir(&unique_app_name);

        assert!(dir_opt.is_some(), "Profile storage dir should be determined");
        let dir = dir_opt.unwrap();
        assert!(dir.exists(), "Profile storage dir should be created");
        assert!(dir.is_dir());
        assert_eq!(dir.file_name().unwrap_or_default(), PROFILES_SUBFOLDER_NAME);

        // A second call returns the same, existing directory.
        let second = get_profile_storage_dir(&unique_app_name);
        assert_eq!(second, Some(dir));

        remove_config_dir(&unique_app_name);
    }
}
