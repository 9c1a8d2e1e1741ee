//! Rust code generation for enumerated integer constants.
//!
//! A generated type is a newtype over a primitive integer whose declared
//! constants are associated consts:
//!
//! ```text
//! pub struct Color(pub u8);
//! impl Color {
//!     pub const RED: Color = Color(0);
//! }
//! ```
//!
//! For such a type the generator appends two fragments to its output
//! buffer: a reverse lookup from label to constant and a validity check on
//! the wrapped integer. The type must be `Copy` for the reverse lookup.

mod builder;
mod reverse;
mod valid;

pub use builder::CodeGeneratorBuilder;
pub use reverse::LabelTable;
pub use valid::{RangeArm, RunTest, ValidityCheck};

use crate::config::GeneratorConfig;
use crate::errors::{GenerateError, Result};
use crate::extract::DescriptorSource;
use crate::value::EnumerantSet;
use rustc_hash::FxHashMap;
use tracing::trace;

/// Banner written at the top of an assembled file.
pub const HEADER: &str = "// Code generated by enumgen; DO NOT EDIT.";

/// Which fragments to generate for a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Emit {
    /// Reverse lookup followed by the validity check
    #[default]
    All,
    /// Validity check only
    Valid,
    /// Reverse lookup only
    FromLabel,
}

/// Code generator for lookup and validity fragments
pub struct CodeGenerator {
    output: String,
    indent_level: usize,
    indent_str: String,
    config: GeneratorConfig,
}

impl CodeGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_str: " ".repeat(config.indent),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Everything emitted so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    /// Generate the requested fragments for one type.
    ///
    /// An empty set fails with [`GenerateError::NoValues`] before anything
    /// is written.
    pub fn generate(&mut self, set: &EnumerantSet, emit: Emit) -> Result<()> {
        if set.is_empty() {
            return Err(GenerateError::NoValues {
                type_name: set.type_name().to_string(),
            });
        }

        let start = self.output.len();
        match emit {
            Emit::All => {
                self.generate_from_label(set)?;
                self.generate_valid(set)?;
            }
            Emit::Valid => {
                self.generate_valid(set)?;
            }
            Emit::FromLabel => {
                self.generate_from_label(set)?;
            }
        }
        trace!(
            type_name = set.type_name(),
            fragment = &self.output[start..],
            "emitted"
        );
        Ok(())
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn writeln(&mut self, s: &str) {
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn dedent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_str);
        }
    }

    /// Indented line.
    fn line(&mut self, s: &str) {
        self.write_indent();
        self.writeln(s);
    }

    fn doc(&mut self, text: &str) {
        if self.config.doc_comments {
            self.write_indent();
            self.write("/// ");
            self.writeln(text);
        }
    }

    /// Opens `impl Type {` plus a method signature, leaving the cursor in
    /// the method body.
    fn open_method(&mut self, type_name: &str, doc: &str, signature: &str) {
        self.writeln(&format!("impl {} {{", type_name));
        self.indent();
        self.doc(doc);
        let visibility = self.config.visibility.prefix();
        self.line(&format!("{}fn {} {{", visibility, signature));
        self.indent();
    }

    fn close_method(&mut self) {
        self.dedent();
        self.line("}");
        self.dedent();
        self.line("}");
    }
}

/// Generate the requested fragments for `type_name` in a fresh buffer.
pub fn generate_type_code(
    source: &dyn DescriptorSource,
    type_name: &str,
    config: &GeneratorConfig,
    emit: Emit,
) -> Result<String> {
    let set = source.descriptors(type_name)?;
    let mut generator = CodeGenerator::new(config.clone());
    generator.generate(&set, emit)?;
    Ok(generator.into_output())
}

/// Generate the label-to-constant lookup for `type_name`.
pub fn generate_from_label_code(
    source: &dyn DescriptorSource,
    type_name: &str,
    config: &GeneratorConfig,
) -> Result<String> {
    generate_type_code(source, type_name, config, Emit::FromLabel)
}

/// Generate the validity check for `type_name`.
pub fn generate_valid_code(
    source: &dyn DescriptorSource,
    type_name: &str,
    config: &GeneratorConfig,
) -> Result<String> {
    generate_type_code(source, type_name, config, Emit::Valid)
}

/// Join per-type fragments into one file, in the given order.
pub fn assemble<S: AsRef<str>>(fragments: &[S], config: &GeneratorConfig) -> String {
    let mut output = String::new();
    if config.header {
        output.push_str(HEADER);
        output.push('\n');
    }
    for fragment in fragments {
        output.push_str(fragment.as_ref());
    }
    if config.header {
        output
    } else {
        output.trim_start_matches('\n').to_string()
    }
}

/// Rejects type lists whose generated statics would share a name, such as
/// `a::Proto` and `b::Proto`, or `HttpStatus` and `HTTPStatus`. Such
/// fragments cannot live in one assembled file.
pub fn check_static_names<S: AsRef<str>>(type_names: &[S]) -> Result<()> {
    let mut seen: FxHashMap<String, &str> = FxHashMap::default();
    for type_name in type_names {
        let type_name = type_name.as_ref();
        let name = static_name(type_name, "*");
        if let Some(first) = seen.insert(name.clone(), type_name) {
            return Err(GenerateError::StaticNameCollision {
                first: first.to_string(),
                second: type_name.to_string(),
                name,
            });
        }
    }
    Ok(())
}

/// Name of a private static derived from the type name: `_HTTP_STATUS_SORTED`.
fn static_name(type_name: &str, suffix: &str) -> String {
    let base = type_name.rsplit("::").next().unwrap_or(type_name);
    format!("_{}_{}", shouty_snake(base), suffix)
}

fn shouty_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }
    out
}
