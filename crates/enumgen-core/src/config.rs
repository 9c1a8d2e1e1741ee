use crate::errors::GenerateError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Visibility given to generated methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Visibility {
    #[serde(rename = "pub")]
    #[default]
    Public,
    #[serde(rename = "pub(crate)")]
    Crate,
    #[serde(rename = "private")]
    Private,
}

impl Visibility {
    /// Prefix written before `fn`, including the trailing space.
    pub fn prefix(self) -> &'static str {
        match self {
            Visibility::Public => "pub ",
            Visibility::Crate => "pub(crate) ",
            Visibility::Private => "",
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Spaces per indentation level (default: 4)
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Visibility of generated methods (default: pub)
    #[serde(default)]
    pub visibility: Visibility,

    /// Name of the generated validity method (default: is_valid)
    #[serde(default = "default_valid_method")]
    pub valid_method: String,

    /// Name of the generated reverse lookup (default: from_label)
    #[serde(default = "default_from_label_method")]
    pub from_label_method: String,

    /// Emit doc comments on generated items (default: true)
    #[serde(default = "default_true")]
    pub doc_comments: bool,

    /// Emit the "generated code" banner at the top of a file (default: true)
    #[serde(default = "default_true")]
    pub header: bool,

    /// Prefix stripped from constant names when deriving labels
    #[serde(default)]
    pub trim_prefix: Option<String>,
}

fn default_indent() -> usize {
    4
}

fn default_valid_method() -> String {
    "is_valid".to_string()
}

fn default_from_label_method() -> String {
    "from_label".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            visibility: Visibility::default(),
            valid_method: default_valid_method(),
            from_label_method: default_from_label_method(),
            doc_comments: true,
            header: true,
            trim_prefix: None,
        }
    }
}

/// Command-line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub indent: Option<usize>,
    pub visibility: Option<Visibility>,
    pub valid_method: Option<String>,
    pub from_label_method: Option<String>,
    pub doc_comments: Option<bool>,
    pub header: Option<bool>,
    pub trim_prefix: Option<String>,
}

impl GeneratorConfig {
    /// Load configuration from a YAML or JSON file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self, GenerateError> {
        let content = std::fs::read_to_string(path)?;
        let config = if is_json(path) {
            serde_json::from_str(&content).map_err(|e| GenerateError::Config(e.to_string()))?
        } else {
            serde_yaml::from_str(&content).map_err(|e| GenerateError::Config(e.to_string()))?
        };
        Ok(config)
    }

    /// Create a default configuration and write it to a file
    pub fn init_file(path: &Path) -> Result<(), GenerateError> {
        let config = GeneratorConfig::default();
        let text = if is_json(path) {
            serde_json::to_string_pretty(&config)
                .map_err(|e| GenerateError::Config(e.to_string()))?
        } else {
            serde_yaml::to_string(&config).map_err(|e| GenerateError::Config(e.to_string()))?
        };
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Merge CLI overrides into this configuration
    pub fn merge(&mut self, overrides: &CliOverrides) {
        if let Some(indent) = overrides.indent {
            self.indent = indent;
        }
        if let Some(visibility) = overrides.visibility {
            self.visibility = visibility;
        }
        if let Some(ref name) = overrides.valid_method {
            self.valid_method = name.clone();
        }
        if let Some(ref name) = overrides.from_label_method {
            self.from_label_method = name.clone();
        }
        if let Some(doc_comments) = overrides.doc_comments {
            self.doc_comments = doc_comments;
        }
        if let Some(header) = overrides.header {
            self.header = header;
        }
        if let Some(ref prefix) = overrides.trim_prefix {
            self.trim_prefix = Some(prefix.clone());
        }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}
