use super::{static_name, CodeGenerator};
use crate::analysis::{compute_runs, select_strategy, Run, Strategy};
use crate::errors::Result;
use crate::value::{EnumerantSet, Repr, Value};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Values per line in a sparse value list.
const VALUES_PER_LINE: usize = 8;

/// One arm of a multi-run range match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeArm {
    /// A run holding a single value.
    Exact(Value),
    /// An unsigned run starting at zero; the type supplies the lower bound.
    UpTo(Value),
    /// Inclusive range.
    Between(Value, Value),
}

impl RangeArm {
    fn for_run(run: &Run<'_>, index: usize, signed: bool) -> Self {
        if run.is_singleton() {
            RangeArm::Exact(run.lo())
        } else if index == 0 && run.lo().is_zero() && !signed {
            RangeArm::UpTo(run.hi())
        } else {
            RangeArm::Between(run.lo(), run.hi())
        }
    }

    pub fn matches(self, value: Value) -> bool {
        match self {
            RangeArm::Exact(v) => value == v,
            RangeArm::UpTo(hi) => value <= hi,
            RangeArm::Between(lo, hi) => lo <= value && value <= hi,
        }
    }

    fn pattern(self) -> String {
        match self {
            RangeArm::Exact(v) => v.to_string(),
            RangeArm::UpTo(hi) => format!("..={}", hi),
            RangeArm::Between(lo, hi) => format!("{}..={}", lo, hi),
        }
    }
}

/// Comparison rendered for a single run, with every operand at its
/// type's limit already dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunTest {
    /// The run covers the whole type.
    Always,
    /// `lo <= i && i <= hi` on the unshifted value. A side at the type's
    /// limit is `None`.
    Direct { lo: Option<Value>, hi: Option<Value> },
    /// `i = self.0.wrapping_sub(offset)`, then the bound on `i`.
    Shifted {
        offset: Value,
        /// `i >= 0`, for signed types
        guard: bool,
        /// `i < count`. Absent when the run spans the positive half of a
        /// signed type, where the guard alone decides.
        count: Option<Value>,
    },
}

impl RunTest {
    /// Chooses the comparison for the run `lo..=hi` of a `repr` type.
    pub fn for_run(repr: Repr, lo: Value, hi: Value) -> Self {
        let min = repr.min_value();
        let max = repr.max_value();
        if lo == min && hi == max {
            return RunTest::Always;
        }

        let span = hi.get() - lo.get();
        // A signed run wider than the positive half cannot be shifted to
        // zero without overflow.
        if span > max.get() {
            return RunTest::Direct {
                lo: (lo != min).then_some(lo),
                hi: (hi != max).then_some(hi),
            };
        }

        // An unsigned run with `span == max` covers the whole type, so only
        // a signed run gets here without a count.
        let count = (span < max.get()).then(|| Value::new(span + 1));
        RunTest::Shifted {
            offset: lo,
            guard: repr.is_signed(),
            count,
        }
    }

    /// Evaluates the rendered comparison for `value`, with the type's
    /// wrapping arithmetic.
    pub fn evaluate(self, repr: Repr, value: Value) -> bool {
        match self {
            RunTest::Always => true,
            RunTest::Direct { lo, hi } => {
                lo.is_none_or(|lo| lo <= value) && hi.is_none_or(|hi| value <= hi)
            }
            RunTest::Shifted {
                offset,
                guard,
                count,
            } => {
                let i = repr.wrap(value.get() - offset.get());
                (!guard || i.get() >= 0) && count.is_none_or(|n| i < n)
            }
        }
    }

    fn render(self) -> Vec<String> {
        match self {
            RunTest::Always => vec!["true".to_string()],
            RunTest::Direct { lo, hi } => {
                let mut terms = Vec::with_capacity(2);
                if let Some(lo) = lo {
                    terms.push(format!("{} <= i", lo));
                }
                if let Some(hi) = hi {
                    terms.push(format!("i <= {}", hi));
                }
                vec!["let i = self.0;".to_string(), terms.join(" && ")]
            }
            RunTest::Shifted {
                offset,
                guard,
                count,
            } => {
                let shift = if offset.is_zero() {
                    "let i = self.0;".to_string()
                } else {
                    format!("let i = self.0.wrapping_sub({});", offset)
                };
                let mut terms = Vec::with_capacity(2);
                if guard {
                    terms.push("i >= 0".to_string());
                }
                if let Some(n) = count {
                    terms.push(format!("i < {}", n));
                }
                vec![shift, terms.join(" && ")]
            }
        }
    }
}

/// The validity check chosen for a type, before rendering.
///
/// [`ValidityCheck::accepts`] evaluates the same logic the rendered code
/// performs, for values representable in the type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityCheck {
    /// `lo..=hi` as one comparison, usually on the shifted value.
    SingleRun {
        lo: Value,
        hi: Value,
        repr: Repr,
        test: RunTest,
    },
    /// First matching arm wins; no match is invalid.
    MultiRun { arms: Vec<RangeArm> },
    /// Membership in a set of every declared value.
    SparseMap {
        values: Vec<Value>,
        members: FxHashSet<Value>,
    },
}

impl ValidityCheck {
    /// Build the check for non-empty `runs`, as returned by
    /// [`compute_runs`].
    pub fn plan(runs: &[Run<'_>], repr: Repr) -> Self {
        let signed = repr.is_signed();
        match select_strategy(runs) {
            Strategy::SingleRun => {
                let (lo, hi) = (runs[0].lo(), runs[0].hi());
                ValidityCheck::SingleRun {
                    lo,
                    hi,
                    repr,
                    test: RunTest::for_run(repr, lo, hi),
                }
            }
            Strategy::MultiRun => ValidityCheck::MultiRun {
                arms: runs
                    .iter()
                    .enumerate()
                    .map(|(i, run)| RangeArm::for_run(run, i, signed))
                    .collect(),
            },
            Strategy::SparseMap => {
                let mut values: Vec<Value> = runs
                    .iter()
                    .flat_map(|run| run.members().iter().map(|e| e.value()))
                    .collect();
                values.dedup();
                let members = values.iter().copied().collect();
                ValidityCheck::SparseMap { values, members }
            }
        }
    }

    pub fn strategy(&self) -> Strategy {
        match self {
            ValidityCheck::SingleRun { .. } => Strategy::SingleRun,
            ValidityCheck::MultiRun { .. } => Strategy::MultiRun,
            ValidityCheck::SparseMap { .. } => Strategy::SparseMap,
        }
    }

    pub fn accepts(&self, value: Value) -> bool {
        match self {
            ValidityCheck::SingleRun { repr, test, .. } => test.evaluate(*repr, value),
            ValidityCheck::MultiRun { arms } => arms.iter().any(|arm| arm.matches(value)),
            ValidityCheck::SparseMap { members, .. } => members.contains(&value),
        }
    }
}

impl CodeGenerator {
    /// Append the validity method for `set`.
    pub fn generate_valid(&mut self, set: &EnumerantSet) -> Result<ValidityCheck> {
        let runs = compute_runs(set)?;
        let check = ValidityCheck::plan(&runs, set.repr());
        debug!(
            type_name = set.type_name(),
            runs = runs.len(),
            strategy = ?check.strategy(),
            "selected validity strategy"
        );

        self.writeln("");
        if let ValidityCheck::SparseMap { values, .. } = &check {
            self.emit_value_set(set, values);
            self.writeln("");
        }

        let type_name = set.type_name();
        let doc = format!(
            "Reports whether `self` is one of the declared `{}` constants.",
            type_name
        );
        let signature = format!("{}(self) -> bool", self.config.valid_method);
        self.open_method(type_name, &doc, &signature);
        match &check {
            ValidityCheck::SingleRun { test, .. } => {
                for line in test.render() {
                    self.line(&line);
                }
            }
            ValidityCheck::MultiRun { arms } => self.emit_multi_run(arms),
            ValidityCheck::SparseMap { .. } => {
                let name = static_name(type_name, "VALUES");
                self.line(&format!("{}.contains(&self.0)", name));
            }
        }
        self.close_method();
        Ok(check)
    }

    fn emit_multi_run(&mut self, arms: &[RangeArm]) {
        self.line("match self.0 {");
        self.indent();
        for arm in arms {
            self.line(&format!("{} => true,", arm.pattern()));
        }
        self.line("_ => false,");
        self.dedent();
        self.line("}");
    }

    fn emit_value_set(&mut self, set: &EnumerantSet, values: &[Value]) {
        let name = static_name(set.type_name(), "VALUES");
        self.line(&format!(
            "static {}: std::sync::LazyLock<std::collections::HashSet<{}>> =",
            name,
            set.repr()
        ));
        self.indent();
        self.line("std::sync::LazyLock::new(|| {");
        self.indent();
        self.line("std::collections::HashSet::from([");
        self.indent();
        for chunk in values.chunks(VALUES_PER_LINE) {
            let joined: Vec<String> = chunk.iter().map(Value::to_string).collect();
            self.line(&format!("{},", joined.join(", ")));
        }
        self.dedent();
        self.line("])");
        self.dedent();
        self.line("});");
        self.dedent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::value::{Enumerant, Repr};

    fn set_of(repr: Repr, values: &[i128]) -> EnumerantSet {
        let enumerants = values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let name = format!("V{}", i);
                Enumerant::new(name.clone(), Value::new(v), repr.is_signed(), name)
            })
            .collect();
        EnumerantSet::new("T", repr, enumerants).unwrap()
    }

    fn valid(set: &EnumerantSet) -> (ValidityCheck, String) {
        let mut generator = CodeGenerator::new(GeneratorConfig::default());
        let check = generator.generate_valid(set).unwrap();
        (check, generator.into_output())
    }

    #[test]
    fn test_single_run_from_zero_unsigned() {
        let set = set_of(Repr::U8, &[0, 1, 2]);
        let (check, output) = valid(&set);
        assert_eq!(check.strategy(), Strategy::SingleRun);
        assert!(!check.accepts(Value::new(3)));
        assert!(check.accepts(Value::new(1)));
        insta::assert_snapshot!(output, @r#"
        impl T {
            /// Reports whether `self` is one of the declared `T` constants.
            pub fn is_valid(self) -> bool {
                let i = self.0;
                i < 3
            }
        }
        "#);
    }

    #[test]
    fn test_single_run_with_offset_signed() {
        let set = set_of(Repr::I32, &[5, 6, 7]);
        let (check, output) = valid(&set);
        assert_eq!(check.strategy(), Strategy::SingleRun);
        assert!(!check.accepts(Value::new(4)));
        assert!(!check.accepts(Value::new(-1)));
        assert!(check.accepts(Value::new(6)));
        insta::assert_snapshot!(output, @r#"
        impl T {
            /// Reports whether `self` is one of the declared `T` constants.
            pub fn is_valid(self) -> bool {
                let i = self.0.wrapping_sub(5);
                i >= 0 && i < 3
            }
        }
        "#);
    }

    #[test]
    fn test_single_run_negative_offset() {
        let set = set_of(Repr::I8, &[-1, 0, 1]);
        let (_, output) = valid(&set);
        assert!(output.contains("let i = self.0.wrapping_sub(-1);"));
        assert!(output.contains("i >= 0 && i < 3"));
    }

    #[test]
    fn test_single_run_covering_unsigned_range() {
        let values: Vec<i128> = (0..=255).collect();
        let set = set_of(Repr::U8, &values);
        let (check, output) = valid(&set);
        assert_eq!(check.strategy(), Strategy::SingleRun);
        assert!(output.contains("fn is_valid(self) -> bool {\n        true\n    }"));
        assert!(!output.contains("let i"));
    }

    fn body(set: &EnumerantSet) -> Vec<String> {
        let (_, output) = valid(set);
        output
            .lines()
            .skip_while(|line| !line.contains("fn is_valid"))
            .skip(1)
            .take_while(|line| line.starts_with("        "))
            .map(|line| line.trim().to_string())
            .collect()
    }

    #[test]
    fn test_single_run_at_type_limits_drops_useless_comparisons() {
        let cases: [(Repr, i128, i128, &[&str]); 6] = [
            (Repr::I8, -128, 127, &["true"]),
            (Repr::I8, 0, 127, &["let i = self.0;", "i >= 0"]),
            (Repr::I8, -128, -1, &["let i = self.0.wrapping_sub(-128);", "i >= 0"]),
            (Repr::I8, -128, 5, &["let i = self.0;", "i <= 5"]),
            (Repr::I8, -5, 127, &["let i = self.0;", "-5 <= i"]),
            (Repr::U8, 3, 255, &["let i = self.0.wrapping_sub(3);", "i < 253"]),
        ];
        for (repr, lo, hi, expected) in cases {
            let values: Vec<i128> = (lo..=hi).collect();
            assert_eq!(body(&set_of(repr, &values)), expected, "{}..={} in {}", lo, hi, repr);
        }
    }

    #[test]
    fn test_single_run_evaluates_like_rendered_code_over_whole_type() {
        for repr in [Repr::I8, Repr::U8] {
            let (min, max) = (repr.min_value().get(), repr.max_value().get());
            let edges = [min, min + 1, -1, 0, 1, 5, max - 1, max];
            for &lo in &edges {
                for &hi in &edges {
                    if lo > hi || !repr.contains(Value::new(lo)) || !repr.contains(Value::new(hi)) {
                        continue;
                    }
                    let values: Vec<i128> = (lo..=hi).collect();
                    let set = set_of(repr, &values);
                    let (check, _) = valid(&set);
                    for v in min..=max {
                        assert_eq!(
                            check.accepts(Value::new(v)),
                            lo <= v && v <= hi,
                            "{} against {}..={} in {}",
                            v,
                            lo,
                            hi,
                            repr
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_shifted_test_wraps_like_primitive() {
        let test = RunTest::for_run(Repr::I8, Value::new(100), Value::new(120));
        assert_eq!(
            test,
            RunTest::Shifted {
                offset: Value::new(100),
                guard: true,
                count: Some(Value::new(21)),
            }
        );
        for v in i8::MIN..=i8::MAX {
            let i = v.wrapping_sub(100);
            let rendered = i >= 0 && i < 21;
            assert_eq!(test.evaluate(Repr::I8, Value::new(v as i128)), rendered);
        }
    }

    #[test]
    fn test_single_run_wider_than_signed_half() {
        let values: Vec<i128> = (-100..=100).collect();
        let set = set_of(Repr::I8, &values);
        let (check, output) = valid(&set);
        assert!(check.accepts(Value::new(-100)));
        assert!(!check.accepts(Value::new(101)));
        assert!(output.contains("-100 <= i && i <= 100"));
        assert!(!output.contains("wrapping_sub"));
    }

    #[test]
    fn test_multi_run_unsigned() {
        let set = set_of(Repr::U16, &[0, 1, 5, 6, 9]);
        let (check, output) = valid(&set);
        assert_eq!(check.strategy(), Strategy::MultiRun);
        assert!(!check.accepts(Value::new(2)));
        assert!(check.accepts(Value::new(5)));
        assert!(check.accepts(Value::new(9)));
        insta::assert_snapshot!(output, @r#"
        impl T {
            /// Reports whether `self` is one of the declared `T` constants.
            pub fn is_valid(self) -> bool {
                match self.0 {
                    ..=1 => true,
                    5..=6 => true,
                    9 => true,
                    _ => false,
                }
            }
        }
        "#);
    }

    #[test]
    fn test_multi_run_signed_keeps_lower_bound() {
        let set = set_of(Repr::I64, &[0, 1, -7, 10, 11]);
        let (check, output) = valid(&set);
        assert_eq!(
            check,
            ValidityCheck::MultiRun {
                arms: vec![
                    RangeArm::Exact(Value::new(-7)),
                    RangeArm::Between(Value::new(0), Value::new(1)),
                    RangeArm::Between(Value::new(10), Value::new(11)),
                ]
            }
        );
        assert!(output.contains("-7 => true,"));
        assert!(output.contains("0..=1 => true,"));
    }

    #[test]
    fn test_multi_run_zero_singleton_is_exact() {
        let set = set_of(Repr::U8, &[0, 4, 5]);
        let (check, _) = valid(&set);
        assert_eq!(
            check,
            ValidityCheck::MultiRun {
                arms: vec![
                    RangeArm::Exact(Value::new(0)),
                    RangeArm::Between(Value::new(4), Value::new(5)),
                ]
            }
        );
    }

    #[test]
    fn test_sparse_map() {
        let values: Vec<i128> = (0..12).map(|i| i * 10).collect();
        let set = set_of(Repr::U32, &values);
        let (check, output) = valid(&set);
        assert_eq!(check.strategy(), Strategy::SparseMap);
        assert!(!check.accepts(Value::new(55)));
        assert!(check.accepts(Value::new(50)));
        insta::assert_snapshot!(output, @r#"
        static _T_VALUES: std::sync::LazyLock<std::collections::HashSet<u32>> =
            std::sync::LazyLock::new(|| {
                std::collections::HashSet::from([
                    0, 10, 20, 30, 40, 50, 60, 70,
                    80, 90, 100, 110,
                ])
            });

        impl T {
            /// Reports whether `self` is one of the declared `T` constants.
            pub fn is_valid(self) -> bool {
                _T_VALUES.contains(&self.0)
            }
        }
        "#);
    }

    #[test]
    fn test_custom_method_and_visibility() {
        let set = set_of(Repr::U8, &[0, 1]);
        let config = GeneratorConfig {
            valid_method: "is_known".to_string(),
            visibility: crate::config::Visibility::Crate,
            doc_comments: false,
            indent: 2,
            ..GeneratorConfig::default()
        };
        let mut generator = CodeGenerator::new(config);
        generator.generate_valid(&set).unwrap();
        assert_eq!(
            generator.output(),
            "\nimpl T {\n  pub(crate) fn is_known(self) -> bool {\n    let i = self.0;\n    i < 2\n  }\n}\n"
        );
    }
}
