use super::{static_name, CodeGenerator};
use crate::errors::{GenerateError, Result};
use crate::value::{Enumerant, EnumerantSet};
use tracing::debug;

/// Enumerants ordered by label, the table behind the generated reverse
/// lookup.
///
/// The sort is stable: enumerants sharing a label keep extraction order, and
/// a lookup of that label lands on the first of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable<'a> {
    entries: Vec<&'a Enumerant>,
}

impl<'a> LabelTable<'a> {
    pub fn new(set: &'a EnumerantSet) -> Result<Self> {
        if set.is_empty() {
            return Err(GenerateError::NoValues {
                type_name: set.type_name().to_string(),
            });
        }
        let mut entries: Vec<&Enumerant> = set.iter().collect();
        entries.sort_by(|a, b| a.label().cmp(b.label()));
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[&'a Enumerant] {
        &self.entries
    }

    /// Binary search for `label`, mirroring the generated lookup: find the
    /// first entry not less than `label`, then confirm it is equal.
    pub fn lookup(&self, label: &str) -> Option<&'a Enumerant> {
        let i = self.entries.partition_point(|e| e.label() < label);
        self.entries
            .get(i)
            .copied()
            .filter(|e| e.label() == label)
    }
}

impl CodeGenerator {
    /// Append the sorted label table and reverse lookup for `set`.
    pub fn generate_from_label<'a>(&mut self, set: &'a EnumerantSet) -> Result<LabelTable<'a>> {
        let table = LabelTable::new(set)?;
        debug!(
            type_name = set.type_name(),
            entries = table.entries().len(),
            "generating reverse lookup"
        );

        let type_name = set.type_name();
        let sorted = static_name(type_name, "SORTED");

        self.writeln("");
        self.line(&format!(
            "static {}: [(&str, {}); {}] = [",
            sorted,
            type_name,
            table.entries().len()
        ));
        self.indent();
        for entry in table.entries() {
            self.line(&format!(
                "({:?}, {}::{}),",
                entry.label(),
                type_name,
                entry.original_name()
            ));
        }
        self.dedent();
        self.line("];");
        self.writeln("");

        let doc = format!(
            "Returns the `{}` constant whose label is `s`, if any.",
            type_name
        );
        let signature = format!(
            "{}(s: &str) -> Option<Self>",
            self.config.from_label_method
        );
        self.open_method(type_name, &doc, &signature);
        self.line(&format!(
            "let i = {}.partition_point(|&(label, _)| label < s);",
            sorted
        ));
        self.line(&format!("match {}.get(i) {{", sorted));
        self.indent();
        self.line("Some(&(label, value)) if label == s => Some(value),");
        self.line("_ => None,");
        self.dedent();
        self.line("}");
        self.close_method();

        Ok(table)
    }
}
