/*
 * The catalog owns the process-wide collections the controller reads:
 * the ordered extension records and the two ordered profile collections
 * (built-in, custom). Built-in profiles are constructed in code at startup
 * and never change; custom profiles are JSON documents in the per-user
 * `profiles` directory and may be added or removed over the session.
 *
 * The controller consumes the read-only `CatalogOperations` trait; the
 * mutating operations (add/remove custom profiles) are inherent methods of
 * `CoreCatalog` for the profile-editing side of the application.
 */
use super::models::{DetailNode, ExtensionHandle, ExtensionRecord, ProfileHandle, ProfileRecord};
use super::path_utils;
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const PROFILE_FILE_EXTENSION: &str = "json";

#[derive(Debug)]
pub enum CatalogError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoStorageDirectory,
    ProfileNotFound(String),
    InvalidProfileName(String),
    DuplicateProfileName(String),
    BuiltInProfile(String),
}

impl From<io::Error> for CatalogError {
    fn from(err: io::Error) -> Self {
        CatalogError::Io(err)
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Serde(err)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "I/O error: {e}"),
            CatalogError::Serde(e) => write!(f, "Serialization/Deserialization error: {e}"),
            CatalogError::NoStorageDirectory => {
                write!(f, "Could not determine storage directory for custom profiles")
            }
            CatalogError::ProfileNotFound(name) => write!(f, "Profile not found: {name}"),
            CatalogError::InvalidProfileName(name) => write!(
                f,
                "Invalid profile name: {name}. Contains invalid characters or is empty."
            ),
            CatalogError::DuplicateProfileName(name) => {
                write!(f, "A profile named {name} already exists")
            }
            CatalogError::BuiltInProfile(name) => {
                write!(f, "Profile {name} is built in and cannot be removed")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Io(e) => Some(e),
            CatalogError::Serde(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

pub fn sanitize_profile_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

pub fn is_valid_profile_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == ' '
}

/*
 * Read-only view of the catalog, as consumed by the controller. Collections
 * are returned in catalog order; the controller re-reads them on every
 * notification cycle instead of caching.
 */
pub trait CatalogOperations {
    /// Ordered, immutable, non-empty.
    fn built_in_profiles(&self) -> Vec<ProfileHandle>;
    /// Ordered; may change length over the session.
    fn custom_profiles(&self) -> Vec<ProfileHandle>;
    /// Ordered extension records, for enumeration and display.
    fn extensions(&self) -> Vec<ExtensionHandle>;
}

pub struct CoreCatalog {
    built_ins: Vec<ProfileHandle>,
    customs: RefCell<Vec<ProfileHandle>>,
    extensions: Vec<ExtensionHandle>,
    profile_dir: Option<PathBuf>,
}

impl CoreCatalog {
    /*
     * Builds the catalog for the given application: constructs the built-in
     * profiles, loads custom profiles from the per-user profile storage
     * directory, and takes ownership of the supplied extension records.
     */
    pub fn new(app_name: &str, extensions: Vec<ExtensionRecord>) -> Self {
        let profile_dir = path_utils::get_profile_storage_dir(app_name);
        if profile_dir.is_none() {
            log::error!(
                "CoreCatalog: No profile storage directory for app '{app_name}'; custom profiles unavailable."
            );
        }
        Self::build(profile_dir, extensions)
    }

    /// Builds the catalog against an explicit profile storage directory.
    pub fn with_profile_dir(profile_dir: PathBuf, extensions: Vec<ExtensionRecord>) -> Self {
        Self::build(Some(profile_dir), extensions)
    }

    fn build(profile_dir: Option<PathBuf>, extensions: Vec<ExtensionRecord>) -> Self {
        let customs = match &profile_dir {
            Some(dir) => Self::load_custom_profiles(dir),
            None => Vec::new(),
        };
        CoreCatalog {
            built_ins: built_in_profiles(),
            customs: RefCell::new(customs),
            extensions: extensions
                .into_iter()
                .map(ExtensionRecord::into_handle)
                .collect(),
            profile_dir,
        }
    }

    /*
     * Loads every readable custom profile document from `dir`, sorted by
     * profile name. An unreadable or malformed file is logged and skipped;
     * a bad document must never take the whole catalog down.
     */
    fn load_custom_profiles(dir: &Path) -> Vec<ProfileHandle> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("CoreCatalog: Failed to read profile directory {dir:?}: {e}");
                return Vec::new();
            }
        };

        let mut profiles: Vec<ProfileHandle> = Vec::new();
        for entry_result in entries {
            let Ok(entry) = entry_result else { continue };
            let path = entry.path();
            if path.is_file()
                && let Some(ext) = path.extension()
                && ext == PROFILE_FILE_EXTENSION
            {
                match Self::read_profile_file(&path) {
                    Ok(profile) => profiles.push(Rc::new(profile)),
                    Err(e) => {
                        log::warn!("CoreCatalog: Skipping unreadable profile file {path:?}: {e}");
                    }
                }
            }
        }
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        log::debug!("CoreCatalog: Loaded {} custom profiles.", profiles.len());
        profiles
    }

    fn read_profile_file(path: &Path) -> Result<ProfileRecord> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut profile: ProfileRecord = serde_json::from_reader(reader)?;
        profile.is_built_in = false;
        Ok(profile)
    }

    fn profile_file_path(&self, profile_name: &str) -> Result<PathBuf> {
        let dir = self
            .profile_dir
            .as_ref()
            .ok_or(CatalogError::NoStorageDirectory)?;
        let sanitized = sanitize_profile_name(profile_name);
        Ok(dir.join(format!("{sanitized}.{PROFILE_FILE_EXTENSION}")))
    }

    /*
     * Adds a custom profile to the catalog and persists it. The name must be
     * valid and unique across both profile collections; the built-in flag is
     * forced off regardless of what the caller supplied.
     */
    pub fn add_custom_profile(&self, mut profile: ProfileRecord) -> Result<ProfileHandle> {
        if profile.name.trim().is_empty() || !profile.name.chars().all(is_valid_profile_name_char) {
            return Err(CatalogError::InvalidProfileName(profile.name));
        }
        if self.find_profile(&profile.name).is_some() {
            return Err(CatalogError::DuplicateProfileName(profile.name));
        }
        profile.is_built_in = false;

        let file_path = self.profile_file_path(&profile.name)?;
        let file = File::create(&file_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &profile)?;
        log::debug!(
            "CoreCatalog: Saved custom profile '{}' to {file_path:?}.",
            profile.name
        );

        let handle = Rc::new(profile);
        self.customs.borrow_mut().push(Rc::clone(&handle));
        Ok(handle)
    }

    /*
     * Removes a custom profile from the catalog and deletes its document.
     * Built-in profiles cannot be removed. Callers are responsible for not
     * removing a profile that extensions are still bound to.
     */
    pub fn remove_custom_profile(&self, name: &str) -> Result<()> {
        if self.built_ins.iter().any(|p| p.name == name) {
            return Err(CatalogError::BuiltInProfile(name.to_string()));
        }
        let index = {
            let customs = self.customs.borrow();
            customs
                .iter()
                .position(|p| p.name == name)
                .ok_or_else(|| CatalogError::ProfileNotFound(name.to_string()))?
        };
        self.customs.borrow_mut().remove(index);

        let file_path = self.profile_file_path(name)?;
        if file_path.exists() {
            fs::remove_file(&file_path)?;
            log::debug!("CoreCatalog: Deleted custom profile document {file_path:?}.");
        }
        Ok(())
    }

    /// Looks a profile up by name, built-ins first.
    pub fn find_profile(&self, name: &str) -> Option<ProfileHandle> {
        if let Some(found) = self.built_ins.iter().find(|p| p.name == name) {
            return Some(Rc::clone(found));
        }
        self.customs
            .borrow()
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }
}

impl CatalogOperations for CoreCatalog {
    fn built_in_profiles(&self) -> Vec<ProfileHandle> {
        self.built_ins.clone()
    }

    fn custom_profiles(&self) -> Vec<ProfileHandle> {
        self.customs.borrow().clone()
    }

    fn extensions(&self) -> Vec<ExtensionHandle> {
        self.extensions.clone()
    }
}

/*
 * The built-in profile set. "Simple" covers the common description
 * properties; "Extended" adds origin and content groups. The first entry
 * doubles as the default the controller falls back to when the user is free
 * to choose and nothing is selected yet, so "Simple" stays first.
 */
fn built_in_profiles() -> Vec<ProfileHandle> {
    let description_group = || {
        DetailNode::group(
            "Description",
            vec![
                DetailNode::leaf("Title"),
                DetailNode::leaf("Subject"),
                DetailNode::leaf("Tags"),
                DetailNode::leaf("Categories"),
                DetailNode::leaf("Comments"),
            ],
        )
    };

    let simple = ProfileRecord::built_in(
        "Simple",
        vec![description_group()],
        vec!["Title".to_string(), "Tags".to_string(), "Comments".to_string()],
    );

    let extended = ProfileRecord::built_in(
        "Extended",
        vec![
            description_group(),
            DetailNode::group(
                "Origin",
                vec![
                    DetailNode::leaf("Authors"),
                    DetailNode::leaf("Date taken"),
                    DetailNode::leaf("Date acquired"),
                    DetailNode::leaf("Copyright"),
                ],
            ),
            DetailNode::group(
                "Content",
                vec![
                    DetailNode::leaf("Content status"),
                    DetailNode::leaf("Content type"),
                ],
            ),
        ],
        vec![
            "Title".to_string(),
            "Authors".to_string(),
            "Tags".to_string(),
            "Comments".to_string(),
        ],
    );

    vec![Rc::new(simple), Rc::new(extended)]
}

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use tempfile::TempDir;

    fn empty_catalog(dir: &TempDir) -> CoreCatalog {
        CoreCatalog::with_profile_dir(dir.path().to_path_buf(), Vec::new())
    }

    fn custom_profile(name: &str) -> ProfileRecord {
        let mut profile = ProfileRecord::new(name);
        profile.full_details = vec![DetailNode::group(
            "Description",
            vec![DetailNode::leaf("Title")],
        )];
        profile.preview_details = vec!["Title".to_string()];
        profile
    }

    #[test]
    fn test_built_ins_are_non_empty_and_simple_is_first() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);

        let built_ins = catalog.built_in_profiles();
        assert!(!built_ins.is_empty());
        assert_eq!(built_ins[0].name, "Simple");
        assert!(built_ins.iter().all(|p| p.is_built_in));
    }

    #[test]
    fn test_add_custom_profile_persists_and_reloads() -> Result<()> {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);

        catalog.add_custom_profile(custom_profile("Music Library"))?;
        catalog.add_custom_profile(custom_profile("Archive"))?;

        // A fresh catalog over the same directory sees both, sorted by name.
        let reloaded = empty_catalog(&temp_dir);
        let customs = reloaded.custom_profiles();
        let names: Vec<&str> = customs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Archive", "Music Library"]);
        assert!(customs.iter().all(|p| !p.is_built_in));
        Ok(())
    }

    #[test]
    fn test_add_custom_profile_rejects_invalid_and_duplicate_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);

        assert!(matches!(
            catalog.add_custom_profile(custom_profile("")),
            Err(CatalogError::InvalidProfileName(_))
        ));
        assert!(matches!(
            catalog.add_custom_profile(custom_profile("My/Profile")),
            Err(CatalogError::InvalidProfileName(_))
        ));
        // Colliding with a built-in name is a duplicate, not an override.
        assert!(matches!(
            catalog.add_custom_profile(custom_profile("Simple")),
            Err(CatalogError::DuplicateProfileName(_))
        ));

        catalog
            .add_custom_profile(custom_profile("Photos"))
            .expect("first add should succeed");
        assert!(matches!(
            catalog.add_custom_profile(custom_profile("Photos")),
            Err(CatalogError::DuplicateProfileName(_))
        ));
    }

    #[test]
    fn test_remove_custom_profile_deletes_document() -> Result<()> {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);

        catalog.add_custom_profile(custom_profile("Transient"))?;
        let file_path = temp_dir
            .path()
            .join(format!("Transient.{PROFILE_FILE_EXTENSION}"));
        assert!(file_path.exists());

        catalog.remove_custom_profile("Transient")?;
        assert!(!file_path.exists());
        assert!(catalog.custom_profiles().is_empty());
        Ok(())
    }

    #[test]
    fn test_remove_rejects_built_ins_and_unknown_names() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);

        assert!(matches!(
            catalog.remove_custom_profile("Simple"),
            Err(CatalogError::BuiltInProfile(_))
        ));
        assert!(matches!(
            catalog.remove_custom_profile("No Such Profile"),
            Err(CatalogError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_load_skips_malformed_documents() -> Result<()> {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);
        catalog.add_custom_profile(custom_profile("Good"))?;

        fs::write(
            temp_dir.path().join(format!("bad.{PROFILE_FILE_EXTENSION}")),
            "not json {",
        )
        .expect("Failed to write malformed profile file");

        let reloaded = empty_catalog(&temp_dir);
        let names: Vec<String> = reloaded
            .custom_profiles()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        assert_eq!(names, vec!["Good".to_string()]);
        Ok(())
    }

    #[test]
    fn test_find_profile_searches_both_collections() -> Result<()> {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = empty_catalog(&temp_dir);
        catalog.add_custom_profile(custom_profile("Photos"))?;

        assert!(catalog.find_profile("Extended").is_some());
        assert!(catalog.find_profile("Photos").is_some());
        assert!(catalog.find_profile("Missing").is_none());
        Ok(())
    }

    #[test]
    fn test_extensions_preserve_insertion_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir for test");
        let catalog = CoreCatalog::with_profile_dir(
            temp_dir.path().to_path_buf(),
            vec![
                ExtensionRecord::unhandled(".txt"),
                ExtensionRecord::foreign(".docx"),
                ExtensionRecord::unhandled(".log"),
            ],
        );

        let extensions = catalog.extensions();
        let names: Vec<String> = extensions
            .iter()
            .map(|e| e.borrow().extension.clone())
            .collect();
        assert_eq!(names, vec![".txt", ".docx", ".log"]);
    }

    #[test]
    fn test_sanitize_profile_name_variations() {
        assert_eq!(sanitize_profile_name("Music Library"), "MusicLibrary");
        assert_eq!(sanitize_profile_name("My_Profile-1"), "My_Profile-1");
        assert_eq!(sanitize_profile_name("!@#$%^&*()"), "");
        assert_eq!(sanitize_profile_name("dots.in.name"), "dotsinname");
    }
}
