//! Loading, saving and atomic section updates of the config file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

/// Errors that can occur during config operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Failed to parse config for editing: {0}")]
    EditParseError(#[from] toml_edit::TomlError),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file and its in-memory copy.
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Create a manager for `config_path`. Nothing is read yet.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings. Changes stay in memory until saved.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load the file; fails if it does not exist.
    pub fn load(&mut self) -> ConfigResult<()> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound(self.config_path.clone()));
        }

        let content = fs::read_to_string(&self.config_path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load the file, or write one with defaults when it is missing.
    ///
    /// A file with unknown tables or missing keys is rewritten in full.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        if self.config_path.exists() {
            let content = fs::read_to_string(&self.config_path)?;
            let (settings, was_modified) = parse_and_check(&content)?;
            self.settings = settings;

            if was_modified {
                tracing::debug!("Normalizing config file {}", self.config_path.display());
                self.save()?;
            }
        } else {
            self.settings = Settings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Create the output and log folders if missing.
    ///
    /// The temp root is created per run by the working directory.
    pub fn ensure_dirs_exist(&self) -> ConfigResult<()> {
        for dir in [
            &self.settings.paths.output_folder,
            &self.settings.paths.logs_folder,
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    pub fn logs_folder(&self) -> PathBuf {
        PathBuf::from(&self.settings.paths.logs_folder)
    }

    /// Write the whole file atomically.
    pub fn save(&self) -> ConfigResult<()> {
        let content = self.render_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Rewrite one table from memory, keeping the rest of the file as it
    /// is on disk.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        let current_content = if self.config_path.exists() {
            fs::read_to_string(&self.config_path)?
        } else {
            String::new()
        };

        let mut doc: DocumentMut = if current_content.is_empty() {
            DocumentMut::new()
        } else {
            current_content.parse()?
        };

        let section_doc: DocumentMut = self.section_toml(section)?.parse()?;
        doc[section.table_name()] = Item::Table(section_doc.as_table().clone());

        self.atomic_write(&doc.to_string())?;
        Ok(())
    }

    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        let s = &self.settings;
        let rendered = match section {
            ConfigSection::Paths => toml::to_string_pretty(&s.paths)?,
            ConfigSection::Tools => toml::to_string_pretty(&s.tools)?,
            ConfigSection::Photos => toml::to_string_pretty(&s.photos)?,
            ConfigSection::Discovery => toml::to_string_pretty(&s.discovery)?,
            ConfigSection::Logging => toml::to_string_pretty(&s.logging)?,
        };
        Ok(rendered)
    }

    fn render_with_comments(&self) -> ConfigResult<String> {
        let mut output = String::new();
        output.push_str("# story-reel configuration\n");
        output.push_str("# Missing keys are filled with defaults on load.\n");

        for section in ConfigSection::ALL {
            output.push('\n');
            output.push_str(&format!("# {}\n", section.description()));
            output.push_str(&format!("[{}]\n", section.table_name()));
            for line in self.section_toml(section)?.lines() {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Same directory, so the rename cannot cross filesystems
        let temp_path = self.config_path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.config_path)
    }
}

/// Parse settings and report whether the file needs normalizing.
fn parse_and_check(content: &str) -> ConfigResult<(Settings, bool)> {
    let doc: DocumentMut = content.parse()?;
    let settings: Settings = toml::from_str(content)?;

    let known: Vec<&str> = ConfigSection::ALL.iter().map(|s| s.table_name()).collect();
    let has_unknown = doc.iter().any(|(key, _)| !known.contains(&key));

    // Round-trip through the typed settings; any difference means a key
    // was missing or unknown inside a table
    let reparsed: toml::Table = toml::from_str(&toml::to_string_pretty(&settings)?)?;
    let original: toml::Table = toml::from_str(content)?;

    Ok((settings, has_unknown || reparsed != original))
}
