//! Fix tests - reorder output, golden files, and convergence

use setup_order_core::{fix_source, lint_path, lint_source, LintOptions, ResolvedConfig, Spacing};
use std::fs;
use std::path::PathBuf;

fn repo_path(dir: &str, name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join(dir)
        .join(name)
}

fn read(dir: &str, name: &str) -> String {
    let path = repo_path(dir, name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn config() -> ResolvedConfig {
    ResolvedConfig::defaults().unwrap()
}

fn fix(source: &str, filename: &str) -> String {
    fix_source(source, filename, &config()).unwrap()
}

#[test]
fn test_golden_mixed_order() {
    let source = read("fixtures", "mixed-order.vue");
    let expected = read("golden", "mixed-order.vue");
    assert_eq!(fix(&source, "mixed-order.vue"), expected);
}

#[test]
fn test_fix_in_place_converges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed-order.vue");
    fs::write(&path, read("fixtures", "mixed-order.vue")).unwrap();

    let reports = lint_path(&path, &config(), &LintOptions { fix: true }).unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].fixed);
    assert!(reports[0].diagnostics.is_empty());
    assert_eq!(fs::read_to_string(&path).unwrap(), read("golden", "mixed-order.vue"));

    // A second pass has nothing left to do
    let again = lint_path(&path, &config(), &LintOptions { fix: true }).unwrap();
    assert!(!again[0].fixed);
    assert!(again[0].diagnostics.is_empty());
}

#[test]
fn test_fix_leaves_clean_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("canonical.vue");
    let original = read("fixtures", "canonical.vue");
    fs::write(&path, &original).unwrap();

    let reports = lint_path(&path, &config(), &LintOptions { fix: true }).unwrap();
    assert!(!reports[0].fixed);
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_declaration_moves_after_import() {
    assert_eq!(
        fix("const a = 1; import x from 'm'; function f(){}; onLoad(()=>{})", "a.js"),
        "import x from 'm'; const a = 1; function f(){}; onLoad(()=>{})"
    );
}

#[test]
fn test_function_moves_after_declaration() {
    assert_eq!(
        fix("function f(){}; const a = 1; onLoad(()=>{})", "a.js"),
        "const a = 1; function f(){}; onLoad(()=>{})"
    );
}

#[test]
fn test_lifecycle_moves_after_function() {
    assert_eq!(fix("onLoad(()=>{}); function f(){}", "a.js"), "function f(){} onLoad(()=>{});");
}

#[test]
fn test_leading_comment_travels_with_statement() {
    let source = "// counter state\nconst count = 0\nimport x from 'm'\n";
    assert_eq!(
        fix(source, "a.ts"),
        "import x from 'm'\n\n\n// counter state\nconst count = 0\n"
    );
}

#[test]
fn test_trailing_comment_travels_with_statement() {
    let source = "const limit = 10 // max rows\nimport { ref } from 'vue'\n";
    let fixed = fix(source, "a.ts");
    assert_eq!(fixed, "import { ref } from 'vue'\n\n\nconst limit = 10 // max rows\n");
}

#[test]
fn test_unclassified_statement_stays_in_place() {
    let source = "function f() {}\nexport default {}\nconst a = 1\n";
    assert_eq!(fix(source, "a.js"), "const a = 1\nexport default {}\nfunction f() {}\n");
}

#[test]
fn test_indentation_is_kept() {
    let source = "<script setup>\n  const a = 1\n\n  import x from 'm'\n</script>\n";
    assert_eq!(
        fix(source, "a.vue"),
        "<script setup>\n  import x from 'm'\n\n\n  const a = 1\n</script>\n"
    );
}

#[test]
fn test_crlf_line_endings() {
    let source = "const a = 1\r\nimport x from 'm'\r\n";
    assert_eq!(fix(source, "a.js"), "import x from 'm'\r\n\r\n\r\nconst a = 1\r\n");
}

#[test]
fn test_configured_spacing() {
    let mut config = config();
    config.spacing = Spacing {
        within_group: 0,
        between_groups: 0,
    };
    let source = "function f() {}\nconst a = 1\nconst b = 2\n";
    let fixed = fix_source(source, "a.js", &config).unwrap();
    assert_eq!(fixed, "const a = 1\nconst b = 2\nfunction f() {}\n");
}

#[test]
fn test_fix_is_stable_within_categories() {
    let source = "function b() {}\nconst y = 2\nfunction a() {}\nconst x = 1\nimport m from 'm'\n";
    let fixed = fix(source, "a.js");
    let order: Vec<usize> = ["import m", "const y", "const x", "function b", "function a"]
        .iter()
        .map(|needle| fixed.find(needle).unwrap())
        .collect();
    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(order, sorted);
    assert!(lint_source(&fixed, "a.js", &config()).unwrap().is_empty());
}

#[test]
fn test_fixed_output_parses_and_is_clean() {
    let cases: &[(&str, &str)] = &[
        ("const a = 1; import x from 'm'", "a.ts"),
        ("onLoad(()=>{}); function f(){}; const a = 1", "a.ts"),
        ("function f(){} const a = 1", "a.js"),
        ("let x; function f() {} import y from 'y'", "a.js"),
        ("const f = () => {}; const a = 1; import x from 'm'", "a.ts"),
        ("export const a = 1; import x from 'm'", "a.ts"),
        ("const a = 1; import x from 'm' /* dep */", "a.ts"),
        ("const b = 2 /* note */\nimport x from 'm'", "a.ts"),
        ("onShow(() => {})\nconst a = 1 // note\nimport x from 'm'", "a.js"),
        ("const a = 1\r\nimport x from 'm' // dep\r\nfoo()", "a.js"),
        ("<script setup>const a = 1; import x from 'm'</script>", "a.vue"),
        ("<script setup lang=\"ts\">\nonLoad(() => {}); function f(): void {}\n</script>", "a.vue"),
    ];

    for (source, filename) in cases {
        let before = lint_source(source, filename, &config()).unwrap();
        assert!(!before.is_empty(), "expected problems in {:?}", source);

        let fixed = fix(source, filename);
        assert_ne!(fixed.as_str(), *source,"no fix applied to {:?}", source);
        let after = lint_source(&fixed, filename, &config())
            .unwrap_or_else(|e| panic!("fix of {:?} does not parse: {:#}\n{}", source, e, fixed));
        assert!(after.is_empty(), "fix of {:?} left problems:\n{}", source, fixed);
    }
}
