//! `[tools]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [tools]
//! less = ["lessc", "{input}", "{output}"]
//! template = ["node", "build/compile-template.js", "{input}"]
//! css = "native"
//! js = ["terser", "{input}", "-c", "-m", "-o", "{output}"]
//! ```
//!
//! Each value is `"native"` (minifiers only), `"copy"`, or a command line.
//! Relative programs resolve against the directory holding `frappe.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::toolchain::{BuiltinTool, Operation, ToolSpec, find_program};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// LESS compiler.
    pub less: ToolSpec,

    /// JavaScript-from-HTML template compiler. Unset means `.js.html`
    /// includes fail to build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<ToolSpec>,

    pub css: ToolSpec,
    pub js: ToolSpec,
}

pub struct ToolsConfigFields {
    pub less: FieldPath,
    pub template: FieldPath,
    pub css: FieldPath,
    pub js: FieldPath,
}

impl ToolsConfig {
    pub const FIELDS: ToolsConfigFields = ToolsConfigFields {
        less: FieldPath::new("tools.less"),
        template: FieldPath::new("tools.template"),
        css: FieldPath::new("tools.css"),
        js: FieldPath::new("tools.js"),
    };

    /// `root` is where relative programs are looked up.
    pub fn validate(&self, root: Option<&Path>, diag: &mut ConfigDiagnostics) {
        let specs = [
            (Operation::Less, Some(&self.less), Self::FIELDS.less),
            (Operation::Template, self.template.as_ref(), Self::FIELDS.template),
            (Operation::Css, Some(&self.css), Self::FIELDS.css),
            (Operation::Js, Some(&self.js), Self::FIELDS.js),
        ];
        for (op, spec, field) in specs {
            if let Some(spec) = spec {
                Self::validate_spec(op, spec, field, root, diag);
            }
        }
    }

    fn validate_spec(
        op: Operation,
        spec: &ToolSpec,
        field: FieldPath,
        root: Option<&Path>,
        diag: &mut ConfigDiagnostics,
    ) {
        match spec {
            ToolSpec::Builtin(_) if spec.is_native() && !op.supports_native() => {
                diag.error_with_hint(
                    field,
                    format!("`native` is not available for {}", op.name()),
                    "use a command line such as [\"lessc\", \"{input}\", \"{output}\"]",
                );
            }
            ToolSpec::Builtin(_) => {}
            ToolSpec::Command(argv) => {
                let Some(program) = argv.first().filter(|p| !p.is_empty()) else {
                    diag.error(field, "command is empty");
                    return;
                };
                // A missing program only fails the includes that need it
                if find_program(program, root).is_err() {
                    diag.hint(field, format!("`{program}` not found"));
                }
            }
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            less: ToolSpec::command(["lessc", "{input}", "{output}"]),
            template: None,
            css: ToolSpec::Builtin(BuiltinTool::Native),
            js: ToolSpec::Builtin(BuiltinTool::Native),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_tools_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(
            config.tools.less,
            ToolSpec::command(["lessc", "{input}", "{output}"])
        );
        assert_eq!(config.tools.template, None);
        assert!(config.tools.css.is_native());
        assert!(config.tools.js.is_native());
    }

    #[test]
    fn test_tools_config() {
        let config = test_parse_config(
            "[tools]\ntemplate = \"copy\"\njs = [\"terser\", \"{input}\", \"-o\", \"{output}\"]",
        );
        assert_eq!(config.tools.template, Some(ToolSpec::Builtin(BuiltinTool::Copy)));
        assert_eq!(
            config.tools.js,
            ToolSpec::command(["terser", "{input}", "-o", "{output}"])
        );
        assert!(config.tools.css.is_native());
    }

    #[test]
    fn test_native_less_is_invalid() {
        let config = test_parse_config("[tools]\nless = \"native\"");
        let mut diag = ConfigDiagnostics::new();
        config.tools.validate(None, &mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, ToolsConfig::FIELDS.less);
    }

    #[test]
    fn test_empty_command_is_invalid() {
        let config = test_parse_config("[tools]\ncss = []");
        let mut diag = ConfigDiagnostics::new();
        config.tools.validate(None, &mut diag);
        assert_eq!(diag.errors().len(), 1);
        assert_eq!(diag.errors()[0].field, ToolsConfig::FIELDS.css);
    }

    #[test]
    fn test_missing_program_is_only_a_hint() {
        let config = test_parse_config("[tools]\nless = [\"frappe-no-such-lessc\", \"{input}\"]");
        let mut diag = ConfigDiagnostics::new();
        config.tools.validate(None, &mut diag);
        assert!(diag.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_program_found_under_root() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let program = dir.path().join("bin/lessc");
        std::fs::create_dir_all(program.parent().unwrap()).unwrap();
        std::fs::write(&program, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        let config = test_parse_config("[tools]\nless = [\"./bin/lessc\", \"{input}\"]");
        let mut diag = ConfigDiagnostics::new();
        config.tools.validate(Some(dir.path()), &mut diag);
        assert!(diag.is_empty());
        assert!(find_program("./bin/lessc", Some(dir.path())).is_ok());
        assert!(find_program("./bin/frappe-no-such-lessc", Some(dir.path())).is_err());
    }

    #[test]
    fn test_unknown_builtin_rejected() {
        let result: Result<crate::config::FrappeConfig, _> =
            toml::from_str("[tools]\ncss = \"fastest\"");
        assert!(result.is_err());
    }
}
