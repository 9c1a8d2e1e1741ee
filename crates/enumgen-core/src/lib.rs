pub mod analysis;
pub mod codegen;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod extract;
pub mod value;

pub use analysis::{compute_runs, select_strategy, Run, Strategy, MAX_MULTI_RUNS};
pub use codegen::{
    assemble, check_static_names, generate_from_label_code, generate_type_code,
    generate_valid_code, CodeGenerator, CodeGeneratorBuilder, Emit, LabelTable, RangeArm,
    RunTest, ValidityCheck,
};
pub use config::{CliOverrides, GeneratorConfig, Visibility};
pub use diagnostics::{
    CollectingDiagnosticHandler, ConsoleDiagnosticHandler, Diagnostic, DiagnosticHandler,
    DiagnosticLevel,
};
pub use errors::GenerateError;
pub use extract::{DescriptorSource, Manifest, ManifestSource, Stringify, TrimPrefix};
pub use value::{Enumerant, EnumerantSet, Repr, Value};
