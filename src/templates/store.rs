//! Flat-file template storage: one `{name}.json` per template.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{default_templates, PostTemplate};
use crate::error::{PostError, Result};

/// A directory of template JSON files.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    dir: PathBuf,
}

impl TemplateStore {
    /// Open the store at `dir`, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PostError::Io {
            path: dir.clone(),
            message: format!("Failed to create template directory: {}", e),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a template with this name is stored at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn load(&self, name: &str) -> Result<PostTemplate> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(PostError::TemplateNotFound {
                name: name.to_string(),
                path,
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| PostError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&content).map_err(|e| PostError::Parse {
            message: format!("{}: {}", path.display(), e),
            help: Some("Template files are JSON objects; see `postgen templates show`".to_string()),
        })
    }

    /// Write the template as pretty JSON, replacing any existing file.
    pub fn save(&self, template: &PostTemplate) -> Result<PathBuf> {
        let path = self.path_for(&template.name);
        let json = serde_json::to_string_pretty(template).map_err(|e| PostError::Parse {
            message: e.to_string(),
            help: None,
        })?;
        fs::write(&path, json).map_err(|e| PostError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::info!(template = %template.name, path = %path.display(), "saved template");
        Ok(path)
    }

    /// Names of stored templates, in directory order.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| PostError::Io {
                path: self.dir.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(PostError::TemplateNotFound {
                name: name.to_string(),
                path,
            });
        }
        fs::remove_file(&path).map_err(|e| PostError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        tracing::info!(template = name, "deleted template");
        Ok(())
    }

    /// Write the built-in templates, overwriting same-named files.
    pub fn create_defaults(&self) -> Result<usize> {
        let templates = default_templates();
        for template in &templates {
            self.save(template)?;
        }
        Ok(templates.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::BackgroundType;
    use crate::types::Dimension;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn store() -> (tempfile::TempDir, TemplateStore) {
        let dir = tempdir().unwrap();
        let store = TemplateStore::new(dir.path().join("templates")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_new_creates_directory() {
        let (_dir, store) = store();
        assert!(store.dir().is_dir());
    }

    #[test]
    fn test_save_load_round_trip() {
        let (_dir, store) = store();
        let mut template =
            PostTemplate::new("mine", Dimension::custom(800, 600), BackgroundType::Gradient, "bold_orange");
        template.headline_shadow = true;
        template.headline_max_width = None;

        let path = store.save(&template).unwrap();
        assert_eq!(path, store.dir().join("mine.json"));
        assert_eq!(store.load("mine").unwrap(), template);
    }

    #[test]
    fn test_load_missing() {
        let (_dir, store) = store();
        match store.load("ghost").unwrap_err() {
            PostError::TemplateNotFound { name, path } => {
                assert_eq!(name, "ghost");
                assert!(path.ends_with("ghost.json"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_load_malformed() {
        let (_dir, store) = store();
        fs::write(store.path_for("broken"), "{ not json").unwrap();
        assert!(matches!(store.load("broken"), Err(PostError::Parse { .. })));
    }

    #[test]
    fn test_list_only_json() {
        let (_dir, store) = store();
        fs::write(store.dir().join("notes.txt"), "x").unwrap();
        fs::create_dir(store.dir().join("nested.json")).unwrap();
        store.create_defaults().unwrap();

        let mut names = store.list().unwrap();
        names.sort();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "bold_purple_modern");
    }

    #[test]
    fn test_delete() {
        let (_dir, store) = store();
        store.create_defaults().unwrap();
        store.delete("minimal_clean").unwrap();
        assert!(!store.list().unwrap().contains(&"minimal_clean".to_string()));
        assert!(matches!(
            store.delete("minimal_clean"),
            Err(PostError::TemplateNotFound { .. })
        ));
    }

    #[test]
    fn test_create_defaults_overwrites() {
        let (_dir, store) = store();
        fs::write(store.path_for("minimal_clean"), "garbage").unwrap();
        assert_eq!(store.create_defaults().unwrap(), 10);
        assert_eq!(store.load("minimal_clean").unwrap().headline_size, 65);
    }
}
