//! Builder pattern for CodeGenerator configuration
//!
//! Provides a fluent API for creating configured CodeGenerator instances
//! without spelling out a whole [`GeneratorConfig`].
//!
//! # Example
//!
//! ```rust
//! use enumgen_core::codegen::CodeGeneratorBuilder;
//! use enumgen_core::config::Visibility;
//!
//! let generator = CodeGeneratorBuilder::new()
//!     .indent(2)
//!     .visibility(Visibility::Crate)
//!     .valid_method("is_known")
//!     .build();
//! assert_eq!(generator.config().valid_method, "is_known");
//! ```

use super::CodeGenerator;
use crate::config::{GeneratorConfig, Visibility};

/// Builder for configuring and constructing a [`CodeGenerator`] instance.
///
/// Every setting starts from [`GeneratorConfig::default`]; use
/// [`CodeGeneratorBuilder::config`] to start from a loaded configuration
/// instead and adjust individual settings afterwards.
#[derive(Debug, Clone, Default)]
pub struct CodeGeneratorBuilder {
    config: GeneratorConfig,
}

impl CodeGeneratorBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every setting with those of `config`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use enumgen_core::codegen::CodeGeneratorBuilder;
    /// use enumgen_core::config::GeneratorConfig;
    ///
    /// let config = GeneratorConfig {
    ///     doc_comments: false,
    ///     ..GeneratorConfig::default()
    /// };
    /// let generator = CodeGeneratorBuilder::new().config(config).indent(8).build();
    /// assert!(!generator.config().doc_comments);
    /// assert_eq!(generator.config().indent, 8);
    /// ```
    pub fn config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the number of spaces per indentation level.
    pub fn indent(mut self, spaces: usize) -> Self {
        self.config.indent = spaces;
        self
    }

    /// Sets the visibility of generated methods.
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.config.visibility = visibility;
        self
    }

    /// Sets the name of the generated validity method.
    pub fn valid_method(mut self, name: impl Into<String>) -> Self {
        self.config.valid_method = name.into();
        self
    }

    /// Sets the name of the generated reverse lookup.
    pub fn from_label_method(mut self, name: impl Into<String>) -> Self {
        self.config.from_label_method = name.into();
        self
    }

    /// Enables or disables `///` comments on generated items.
    pub fn doc_comments(mut self, enabled: bool) -> Self {
        self.config.doc_comments = enabled;
        self
    }

    /// Builds and returns a configured [`CodeGenerator`] instance.
    pub fn build(self) -> CodeGenerator {
        CodeGenerator::new(self.config)
    }
}
