//! End-to-end tests for the analysis engine
//!
//! Drive `SlopDetector` against fixture files and temp directories and check
//! the verdicts, not the internals of each metric.

use slop_detector::config::Config;
use slop_detector::engine::SlopDetector;
use slop_detector::models::{HallucinationStatus, InflationStatus, SlopStatus};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn detector() -> SlopDetector {
    SlopDetector::new(Config::default()).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

fn has_issue(result: &slop_detector::FileAnalysis, id: &str) -> bool {
    result.pattern_issues.iter().any(|i| i.pattern_id == id)
}

#[test]
fn test_todo_and_bare_except_is_flagged() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "sync.py",
        "def sync():\n    # TODO: implement\n    pass\n\n\ntry:\n    sync()\nexcept:\n    pass\n",
    );

    let result = detector().analyze_file(&path).unwrap();
    assert!(has_issue(&result, "todo_comment"));
    assert!(has_issue(&result, "bare_except"));
    assert!(
        matches!(result.status, SlopStatus::Suspicious | SlopStatus::CriticalDeficit),
        "status was {}",
        result.status
    );
}

#[test]
fn test_unused_heavy_imports_are_dependency_noise() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "stats.py",
        "import numpy\nimport pandas\nimport requests\nimport torch\nimport flask\n\n\ndef total(values):\n    result = 0\n    for v in values:\n        result += v\n    return numpy.sqrt(result)\n",
    );

    let result = detector().analyze_file(&path).unwrap();
    assert!((result.ddc.usage_ratio - 0.2).abs() < 1e-9);
    assert!(result.deficit_score < 70.0);
    assert_eq!(result.status, SlopStatus::DependencyNoise);
    assert_eq!(result.ddc.fake_imports.len(), 4);
    assert!(!result.ddc.fake_imports.contains("numpy"));
}

#[test]
fn test_syntax_error_is_critical() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "broken.py",
        "def broken_function(\n    \"\"\"Missing closing parenthesis.\"\"\"\n    pass\n",
    );

    let result = detector().analyze_file(&path).unwrap();
    assert_eq!(result.deficit_score, 100.0);
    assert_eq!(result.ldr.score, 0.0);
    assert_eq!(result.status, SlopStatus::CriticalDeficit);
    assert_eq!(result.file_path, path);
    assert!(result.parse_error.is_some());
}

#[test]
fn test_dense_logic_is_clean() {
    let source = "def running_sum(values):\n    total = 0\n    for value in values:\n        total += value\n    return total\n\n\nprint(running_sum([1, 2, 3]))\n";
    let result = detector().analyze_source(Path::new("sum.py"), source);
    assert_eq!(result.status, SlopStatus::Clean);
    assert!(result.deficit_score < 30.0);
    assert_eq!(result.ddc.usage_ratio, 1.0);
    assert!(result.pattern_issues.is_empty());
}

#[test]
fn test_unannotated_ellipsis_module_is_not_a_stub() {
    let source = "def load(path): ...\ndef save(data): ...\ndef process(x): ...\n";
    let result = detector().analyze_source(Path::new("service.py"), source);
    assert!(!result.ldr.is_type_stub);
    assert_eq!(result.ldr.score, 0.0);
    assert!(result.deficit_score >= 30.0, "deficit was {}", result.deficit_score);
    assert!(
        matches!(result.status, SlopStatus::Suspicious | SlopStatus::CriticalDeficit),
        "status was {}",
        result.status
    );
    assert_eq!(
        result.pattern_issues.iter().filter(|i| i.pattern_id == "ellipsis_placeholder").count(),
        3
    );
}

#[test]
fn test_import_fallback_placeholder_is_flagged() {
    let source = "try:\n    from fast import parse\nexcept ImportError:\n    def parse(text):\n        pass\n\n\nprint(parse('x'))\n";
    let result = detector().analyze_source(Path::new("compat.py"), source);
    assert!(has_issue(&result, "pass_placeholder"));
    assert_eq!(result.ldr.placeholder_lines, 1);
}

#[test]
fn test_fully_used_imports_carry_no_dependency_penalty() {
    let source = "import os\nimport sys\n\nprint(os.getcwd(), sys.argv)\n";
    let result = detector().analyze_source(Path::new("used.py"), source);
    assert_eq!(result.ddc.usage_ratio, 1.0);
    assert!(result.ddc.unused.is_empty());
    assert!(result.warnings.iter().all(|w| !w.contains("imports")));
}

#[test]
fn test_analysis_is_idempotent() {
    let detector = detector();
    let path = fixtures_path().join("hyped_comments.py");
    let first = detector.analyze_file(&path).unwrap();
    let second = detector.analyze_file(&path).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_deficit_always_in_range() {
    let detector = detector();
    for entry in std::fs::read_dir(fixtures_path()).unwrap() {
        let path = entry.unwrap().path();
        let result = detector.analyze_file(&path).unwrap();
        assert!(
            (0.0..=100.0).contains(&result.deficit_score),
            "{} scored {}",
            path.display(),
            result.deficit_score
        );
        assert!((0.0..=1.0).contains(&result.ldr.score));
        assert!((0.0..=1.0).contains(&result.ddc.usage_ratio));
    }
}

#[test]
fn test_ai_slop_fixture() {
    let result = detector()
        .analyze_file(&fixtures_path().join("ai_slop.py"))
        .unwrap();
    assert_eq!(result.status, SlopStatus::CriticalDeficit);
    assert!(result.deficit_score >= 70.0);
    for id in [
        "bare_except",
        "pass_placeholder",
        "ellipsis_placeholder",
        "todo_comment",
        "fixme_comment",
        "xxx_comment",
    ] {
        assert!(has_issue(&result, id), "missing {id}");
    }
    assert_eq!(result.inflation.status, InflationStatus::Fail);
}

#[test]
fn test_fake_docs_fixture() {
    let result = detector()
        .analyze_file(&fixtures_path().join("fake_docs.py"))
        .unwrap();
    assert!(has_issue(&result, "mutable_default_arg"));
    assert_eq!(result.ddc.usage_ratio, 0.0);
    assert!(result.ddc.unused.contains("os"));
    assert!(result.ddc.unused.contains("sys"));
    assert!(result.ddc.fake_imports.is_empty());
    assert_eq!(result.status, SlopStatus::CriticalDeficit);

    let docstrings = result.docstring_inflation.unwrap();
    assert!(docstrings.critical_count > 0);
    assert!(docstrings
        .findings
        .iter()
        .any(|f| f.name == "neural_transform"));
}

#[test]
fn test_hyped_comments_fixture() {
    let result = detector()
        .analyze_file(&fixtures_path().join("hyped_comments.py"))
        .unwrap();
    assert_eq!(result.inflation.status, InflationStatus::Fail);
    assert!(result.inflation.score > 1.0);
    assert!(has_issue(&result, "hack_comment"));
    assert!(matches!(
        result.status,
        SlopStatus::CriticalDeficit | SlopStatus::InflatedSignal
    ));
}

#[test]
fn test_hallucinated_deps_fixture() {
    let result = detector()
        .analyze_file(&fixtures_path().join("hallucinated_deps.py"))
        .unwrap();
    assert!((result.ddc.usage_ratio - 0.1).abs() < 1e-9);
    assert!(result.ddc.actually_used.contains("json"));

    let deps = result.hallucination_deps.unwrap();
    assert_eq!(deps.total_hallucinated, 9);
    assert_eq!(deps.status, HallucinationStatus::Critical);
    assert_eq!(deps.category_counts.get("ml"), Some(&3));
    assert_eq!(deps.category_counts.get("database"), Some(&2));
    assert!(deps.hallucinated.iter().all(|d| d.name != "json"));
}

#[test]
fn test_context_jargon_fixture() {
    let result = detector()
        .analyze_file(&fixtures_path().join("context_jargon.py"))
        .unwrap();
    let context = result.context_jargon.unwrap();
    assert!(context.unsupported_count > 0);
    assert!(context
        .hits
        .iter()
        .any(|h| h.context == "process_data" && !h.supported));
    assert!(context.hits.iter().any(|h| h.context == "<module>"));
}

#[test]
fn test_clean_fixture() {
    let result = detector()
        .analyze_file(&fixtures_path().join("clean.py"))
        .unwrap();
    assert_eq!(result.status, SlopStatus::Clean);
    assert_eq!(result.ddc.usage_ratio, 1.0);
    assert_eq!(result.inflation.jargon_count, 0);
}

#[test]
fn test_project_scan_honors_ignore_globs() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "app/main.py", "def run(x):\n    return x + 1\n\n\nprint(run(1))\n");
    write(dir.path(), "app/util.py", "import os\n\nprint(os.sep)\n");
    write(dir.path(), "vendor/lib.py", "def f():\n    pass\n");
    write(dir.path(), "notes.txt", "not python\n");

    let config = Config {
        ignore: vec!["vendor/**".to_string()],
        ..Config::default()
    };
    let project = SlopDetector::new(config)
        .unwrap()
        .analyze_project(dir.path())
        .unwrap();

    assert_eq!(project.total_files, 2);
    let names: Vec<_> = project
        .file_results
        .iter()
        .map(|f| f.file_path.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["main.py", "util.py"]);
    assert_eq!(project.clean_files + project.deficit_files, 2);
    assert_eq!(project.project_path, dir.path());
}

#[test]
fn test_project_weighting_and_status() {
    let dir = TempDir::new().unwrap();
    for name in ["clean.py", "ai_slop.py", "fake_docs.py"] {
        std::fs::copy(fixtures_path().join(name), dir.path().join(name)).unwrap();
    }

    let project = detector().analyze_project(dir.path()).unwrap();
    assert_eq!(project.total_files, 3);
    assert!(project.deficit_files >= 2);
    assert!(project.weighted_deficit_score > 0.0);
    assert!(project.weighted_deficit_score <= 100.0);
    assert!(project.avg_inflation.is_finite());

    let unweighted = SlopDetector::new(Config {
        use_weighted_analysis: false,
        ..Config::default()
    })
    .unwrap()
    .analyze_project(dir.path())
    .unwrap();
    assert_eq!(unweighted.weighted_deficit_score, unweighted.avg_deficit_score);
}

#[test]
fn test_single_file_as_project() {
    let path = fixtures_path().join("clean.py");
    let project = detector().analyze_project(&path).unwrap();
    assert_eq!(project.total_files, 1);
    assert_eq!(project.overall_status, SlopStatus::Clean);
}
