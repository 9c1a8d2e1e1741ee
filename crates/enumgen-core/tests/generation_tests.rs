use enumgen_core::codegen::{generate_type_code, Emit};
use enumgen_core::{
    compute_runs, select_strategy, CodeGenerator, GenerateError, GeneratorConfig, LabelTable,
    Manifest, ManifestSource, Strategy, TrimPrefix, Value,
};
use enumgen_test_helpers::fixtures;
use enumgen_test_helpers::mocks::MockSource;

fn valid_check(set: &enumgen_core::EnumerantSet) -> enumgen_core::ValidityCheck {
    let mut generator = CodeGenerator::new(GeneratorConfig::default());
    generator.generate_valid(set).unwrap()
}

// ============================================================================
// Validity scenarios
// ============================================================================

#[test]
fn test_single_contiguous_run_unsigned() {
    let set = fixtures::single_run_unsigned();
    let check = valid_check(&set);
    assert_eq!(check.strategy(), Strategy::SingleRun);
    assert!(!check.accepts(Value::new(3)));
    assert!(check.accepts(Value::new(1)));
}

#[test]
fn test_offset_run_signed() {
    let set = fixtures::offset_run_signed();
    let check = valid_check(&set);
    assert_eq!(check.strategy(), Strategy::SingleRun);
    assert!(!check.accepts(Value::new(4)));
    assert!(!check.accepts(Value::new(-1)));
    assert!(check.accepts(Value::new(6)));
}

#[test]
fn test_two_runs_unsigned() {
    let set = fixtures::two_runs_unsigned();
    let check = valid_check(&set);
    assert_eq!(check.strategy(), Strategy::MultiRun);
    assert!(!check.accepts(Value::new(2)));
    assert!(check.accepts(Value::new(5)));
}

#[test]
fn test_twelve_singletons_use_sparse_map() {
    let set = fixtures::twelve_sparse();
    let runs = compute_runs(&set).unwrap();
    assert_eq!(runs.len(), 12);
    assert_eq!(select_strategy(&runs), Strategy::SparseMap);

    let check = valid_check(&set);
    assert!(!check.accepts(Value::new(55)));
    assert!(check.accepts(Value::new(50)));
}

// ============================================================================
// Reverse lookup scenarios
// ============================================================================

#[test]
fn test_from_label_hit_and_miss() {
    let set = fixtures::fruit();
    let table = LabelTable::new(&set).unwrap();
    let banana = table.lookup("banana").expect("banana is declared");
    assert_eq!(banana.original_name(), "B");
    assert_eq!(banana.value(), Value::new(1));
    assert!(table.lookup("date").is_none());
}

// ============================================================================
// Failure
// ============================================================================

#[test]
fn test_empty_type_fails_without_output() {
    let source = MockSource::new(vec![fixtures::empty()]);
    let config = GeneratorConfig::default();
    for emit in [Emit::All, Emit::Valid, Emit::FromLabel] {
        let err = generate_type_code(&source, "Empty", &config, emit).unwrap_err();
        assert!(matches!(err, GenerateError::NoValues { ref type_name } if type_name == "Empty"));
    }

    let set = fixtures::empty();
    let mut generator = CodeGenerator::new(config);
    assert!(generator.generate_valid(&set).is_err());
    assert!(generator.generate_from_label(&set).is_err());
    assert!(generator.output().is_empty());
}

#[test]
fn test_unknown_type_reported() {
    let source = MockSource::new(vec![fixtures::fruit()]);
    let err =
        generate_type_code(&source, "Vegetable", &GeneratorConfig::default(), Emit::All).unwrap_err();
    assert_eq!(err.to_string(), "type Vegetable is not declared in the manifest");
    assert_eq!(source.requests(), 1);
}

// ============================================================================
// Golden output
// ============================================================================

fn manifest_source() -> ManifestSource {
    ManifestSource::new(Manifest::from_yaml(fixtures::manifest_yaml()).unwrap())
        .unwrap()
        .with_stringify(TrimPrefix::new(Some("Color".to_string())))
}

#[test]
fn test_golden_color() {
    let output = generate_type_code(
        &manifest_source(),
        "Color",
        &GeneratorConfig::default(),
        Emit::All,
    )
    .unwrap();
    insta::assert_snapshot!(output, @r#"
    static _COLOR_SORTED: [(&str, Color); 3] = [
        ("Blue", Color::ColorBlue),
        ("Green", Color::ColorGreen),
        ("Red", Color::ColorRed),
    ];

    impl Color {
        /// Returns the `Color` constant whose label is `s`, if any.
        pub fn from_label(s: &str) -> Option<Self> {
            let i = _COLOR_SORTED.partition_point(|&(label, _)| label < s);
            match _COLOR_SORTED.get(i) {
                Some(&(label, value)) if label == s => Some(value),
                _ => None,
            }
        }
    }

    impl Color {
        /// Reports whether `self` is one of the declared `Color` constants.
        pub fn is_valid(self) -> bool {
            let i = self.0;
            i < 3
        }
    }
    "#);
}

#[test]
fn test_golden_errno_multi_run_signed() {
    let output = generate_type_code(
        &manifest_source(),
        "Errno",
        &GeneratorConfig::default(),
        Emit::Valid,
    )
    .unwrap();
    insta::assert_snapshot!(output, @r#"
    impl Errno {
        /// Reports whether `self` is one of the declared `Errno` constants.
        pub fn is_valid(self) -> bool {
            match self.0 {
                1..=2 => true,
                5 => true,
                _ => false,
            }
        }
    }
    "#);
}

#[test]
fn test_golden_port_sparse() {
    let output = generate_type_code(
        &manifest_source(),
        "Port",
        &GeneratorConfig::default(),
        Emit::Valid,
    )
    .unwrap();
    insta::assert_snapshot!(output, @r#"
    static _PORT_VALUES: std::sync::LazyLock<std::collections::HashSet<u16>> =
        std::sync::LazyLock::new(|| {
            std::collections::HashSet::from([
                21, 22, 25, 53, 80, 110, 123, 143,
                161, 194, 389, 443,
            ])
        });

    impl Port {
        /// Reports whether `self` is one of the declared `Port` constants.
        pub fn is_valid(self) -> bool {
            _PORT_VALUES.contains(&self.0)
        }
    }
    "#);
}

#[test]
fn test_golden_errno_labels_sorted() {
    let output = generate_type_code(
        &manifest_source(),
        "Errno",
        &GeneratorConfig::default(),
        Emit::FromLabel,
    )
    .unwrap();
    assert!(output.contains(
        "static _ERRNO_SORTED: [(&str, Errno); 3] = [\n    (\"i/o error\", Errno::EIO),\n    (\"no such file or directory\", Errno::ENOENT),\n    (\"operation not permitted\", Errno::EPERM),\n];\n"
    ));
}

#[test]
fn test_pipeline_is_idempotent() {
    let source = manifest_source();
    let config = GeneratorConfig::default();
    for name in ["Color", "Errno", "Port"] {
        let first = generate_type_code(&source, name, &config, Emit::All).unwrap();
        let second = generate_type_code(&source, name, &config, Emit::All).unwrap();
        assert_eq!(first, second, "output for {} changed between runs", name);
    }
}

#[test]
fn test_manifest_loaded_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decls.yaml");
    std::fs::write(&path, fixtures::manifest_yaml()).unwrap();

    let source = ManifestSource::new(Manifest::from_file(&path).unwrap()).unwrap();
    let names: Vec<&str> = source.type_names().collect();
    assert_eq!(names, vec!["Color", "Errno", "Port", "Nothing"]);

    let output = generate_type_code(&source, "Errno", &GeneratorConfig::default(), Emit::All).unwrap();
    assert!(output.contains("(\"operation not permitted\", Errno::EPERM),"));
    assert!(output.contains("5 => true,"));
}

#[test]
fn test_missing_manifest_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::from_file(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, GenerateError::Io(_)));
}

#[test]
fn test_assembled_file_keeps_request_order() {
    let source = manifest_source();
    let config = GeneratorConfig::default();
    let fragments: Vec<String> = ["Port", "Color"]
        .iter()
        .map(|name| generate_type_code(&source, name, &config, Emit::Valid).unwrap())
        .collect();
    let file = enumgen_core::assemble(&fragments, &config);
    assert!(file.starts_with(enumgen_core::codegen::HEADER));
    let port = file.find("impl Port").unwrap();
    let color = file.find("impl Color").unwrap();
    assert!(port < color);
}
