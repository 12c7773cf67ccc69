use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lexical shape of the statement that produced a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImportSyntax {
    /// `import x from "mod"`, `import { a } from "mod"`, `import * as ns from "mod"`
    ImportFrom,
    /// `import "mod"`
    SideEffectImport,
    /// `export { a } from "mod"`, `export * from "mod"`
    ExportFrom,
    /// `import("mod")`
    DynamicImport,
    /// `require("mod")`
    Require,
}

impl ImportSyntax {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportSyntax::ImportFrom => "import_from",
            ImportSyntax::SideEffectImport => "side_effect_import",
            ImportSyntax::ExportFrom => "export_from",
            ImportSyntax::DynamicImport => "dynamic_import",
            ImportSyntax::Require => "require",
        }
    }
}
