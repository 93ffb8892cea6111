use super::*;
use std::fs;
use tempfile::TempDir;

fn tools(less: ToolSpec, template: Option<ToolSpec>, css: ToolSpec, js: ToolSpec) -> ToolsConfig {
    ToolsConfig {
        less,
        template,
        css,
        js,
    }
}

#[test]
fn test_tool_spec_from_toml() {
    #[derive(Deserialize)]
    struct Specs {
        a: ToolSpec,
        b: ToolSpec,
        c: ToolSpec,
    }
    let specs: Specs = toml::from_str(
        r#"
        a = "native"
        b = "copy"
        c = ["lessc", "--strict-math=on", "{input}", "{output}"]
        "#,
    )
    .unwrap();
    assert_eq!(specs.a, ToolSpec::Builtin(BuiltinTool::Native));
    assert_eq!(specs.b, ToolSpec::Builtin(BuiltinTool::Copy));
    assert_eq!(
        specs.c,
        ToolSpec::command(["lessc", "--strict-math=on", "{input}", "{output}"])
    );
}

#[test]
fn test_passthrough_copies_and_creates_dirs() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.css");
    let output = dir.path().join("out/deep/a.min.css");
    fs::write(&input, ".a { color: red; }").unwrap();

    Passthrough.minify_css(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), ".a { color: red; }");
}

#[test]
fn test_native_minifiers() {
    let dir = TempDir::new().unwrap();
    let css_in = dir.path().join("a.css");
    let css_out = dir.path().join("a.min.css");
    fs::write(&css_in, ".a {\n  color: #ffffff;\n}\n").unwrap();

    let toolchain = ConfiguredToolchain::default();
    toolchain.minify_css(&css_in, &css_out).unwrap();
    assert_eq!(fs::read_to_string(&css_out).unwrap(), ".a{color:#fff}");

    let js_in = dir.path().join("a.js");
    let js_out = dir.path().join("a.min.js");
    fs::write(&js_in, "var answer = 40 + 2;\nwindow.answer = answer;\n").unwrap();
    toolchain.minify_js(&js_in, &js_out).unwrap();
    let js = fs::read_to_string(&js_out).unwrap();
    assert!(js.contains("window.answer"), "{js}");
}

#[test]
fn test_native_parse_error_is_failure() {
    let dir = TempDir::new().unwrap();
    let js_in = dir.path().join("broken.js");
    fs::write(&js_in, "function ( {").unwrap();

    let err = ConfiguredToolchain::default()
        .minify_js(&js_in, &dir.path().join("broken.min.js"))
        .unwrap_err();
    assert!(err.to_string().contains("parse failed"), "{err}");
    assert!(!dir.path().join("broken.min.js").exists());
}

#[test]
fn test_native_less_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.less");
    fs::write(&input, "@c: red;").unwrap();

    let toolchain = ConfiguredToolchain::new(&tools(
        ToolSpec::Builtin(BuiltinTool::Native),
        None,
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::Builtin(BuiltinTool::Copy),
    ));
    let err = toolchain
        .compile_less(&input, &dir.path().join("a.less.css"))
        .unwrap_err();
    assert!(err.to_string().contains("`native` is not available"), "{err}");
}

#[test]
fn test_missing_template_tool() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("view.js.html");
    fs::write(&input, "<p></p>").unwrap();

    let err = ConfiguredToolchain::default()
        .compile_template(&input, &dir.path().join("view.js.html.js"))
        .unwrap_err();
    assert!(err.to_string().contains("no `template` tool configured"), "{err}");
}

#[test]
fn test_unknown_program() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.less");
    fs::write(&input, "").unwrap();

    let toolchain = ConfiguredToolchain::new(&tools(
        ToolSpec::command(["frappe-no-such-compiler", "{input}", "{output}"]),
        None,
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::Builtin(BuiltinTool::Copy),
    ));
    let err = toolchain
        .compile_less(&input, &dir.path().join("a.less.css"))
        .unwrap_err();
    assert!(err.to_string().contains("frappe-no-such-compiler"), "{err}");
}

#[cfg(unix)]
#[test]
fn test_command_with_output_placeholder() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.less");
    let output = dir.path().join("a.less.css");
    fs::write(&input, ".a{}").unwrap();

    let toolchain = ConfiguredToolchain::new(&tools(
        ToolSpec::command(["cp", "{input}", "{output}"]),
        None,
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::Builtin(BuiltinTool::Copy),
    ));
    toolchain.compile_less(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), ".a{}");
}

#[cfg(unix)]
#[test]
fn test_command_stdout_becomes_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("view.js.html");
    let output = dir.path().join("view.js.html.js");
    fs::write(&input, "<p>hi</p>").unwrap();

    let toolchain = ConfiguredToolchain::new(&tools(
        ToolSpec::Builtin(BuiltinTool::Copy),
        Some(ToolSpec::command(["cat", "{input}"])),
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::Builtin(BuiltinTool::Copy),
    ));
    toolchain.compile_template(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "<p>hi</p>");
}

#[cfg(unix)]
#[test]
fn test_command_failure_carries_stderr() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("a.less");
    fs::write(&input, "").unwrap();

    let toolchain = ConfiguredToolchain::new(&tools(
        ToolSpec::command(["sh", "-c", "echo 'ParseError: unexpected token' >&2; exit 1"]),
        None,
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::Builtin(BuiltinTool::Copy),
    ));
    let err = toolchain
        .compile_less(&input, &dir.path().join("a.less.css"))
        .unwrap_err();
    assert!(format!("{err:#}").contains("ParseError: unexpected token"), "{err:#}");
}

#[cfg(unix)]
#[test]
fn test_script_path_resolves_from_root() {
    let root = TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("scripts")).unwrap();
    fs::write(root.path().join("scripts/wrap.sh"), "printf '/*w*/'; cat \"$1\"\n").unwrap();

    let site = TempDir::new().unwrap();
    let input = site.path().join("a.js");
    let output = site.path().join("out/a.min.js");
    fs::write(&input, "var a;").unwrap();

    let toolchain = ConfiguredToolchain::new(&tools(
        ToolSpec::Builtin(BuiltinTool::Copy),
        None,
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::command(["sh", "scripts/wrap.sh", "{input}"]),
    ))
    .with_root(root.path());
    toolchain.minify_js(&input, &output).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "/*w*/var a;");
}

#[cfg(unix)]
#[test]
fn test_relative_program_resolves_from_root() {
    use std::os::unix::fs::PermissionsExt;

    let root = TempDir::new().unwrap();
    let program = root.path().join("bin/copy");
    fs::create_dir_all(program.parent().unwrap()).unwrap();
    fs::write(&program, "#!/bin/sh\ncp \"$1\" \"$2\"\n").unwrap();
    fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

    let site = TempDir::new().unwrap();
    let input = site.path().join("a.less");
    let output = site.path().join("a.less.css");
    fs::write(&input, ".a{}").unwrap();

    let spec = ToolSpec::command(["./bin/copy", "{input}", "{output}"]);
    let toolchain = ConfiguredToolchain::new(&tools(
        spec,
        None,
        ToolSpec::Builtin(BuiltinTool::Copy),
        ToolSpec::Builtin(BuiltinTool::Copy),
    ));
    toolchain
        .clone()
        .with_root(root.path())
        .compile_less(&input, &output)
        .unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), ".a{}");

    // Without a root the program is looked up from the process directory
    let err = toolchain.compile_less(&input, &output).unwrap_err();
    assert!(err.to_string().contains("./bin/copy"), "{err}");
}
