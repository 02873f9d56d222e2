//! Project roll-up

use crate::config::Config;
use crate::models::{FileAnalysis, ProjectAnalysis, SlopStatus};
use std::path::Path;

/// Project thresholds are looser than the per-file ones
pub const PROJECT_CRITICAL_DEFICIT: f64 = 50.0;
pub const PROJECT_SUSPICIOUS_DEFICIT: f64 = 30.0;

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Deficit averaged by line count, falling back to the plain mean when no
/// file has any lines
fn weighted_deficit(files: &[FileAnalysis], unweighted: f64) -> f64 {
    let total_loc: usize = files.iter().map(|f| f.ldr.total_lines).sum();
    if total_loc == 0 {
        return unweighted;
    }
    files
        .iter()
        .map(|f| f.deficit_score * f.ldr.total_lines as f64 / total_loc as f64)
        .sum()
}

/// Combine per-file results into a project verdict
pub fn aggregate_project(root: &Path, file_results: Vec<FileAnalysis>, config: &Config) -> ProjectAnalysis {
    let total_files = file_results.len();
    let clean_files = file_results
        .iter()
        .filter(|f| f.status == SlopStatus::Clean)
        .count();

    let avg_deficit_score = mean(file_results.iter().map(|f| f.deficit_score));
    let weighted_deficit_score = if config.use_weighted_analysis {
        weighted_deficit(&file_results, avg_deficit_score)
    } else {
        avg_deficit_score
    };

    let overall_status = if weighted_deficit_score >= PROJECT_CRITICAL_DEFICIT {
        SlopStatus::CriticalDeficit
    } else if weighted_deficit_score >= PROJECT_SUSPICIOUS_DEFICIT {
        SlopStatus::Suspicious
    } else {
        SlopStatus::Clean
    };

    ProjectAnalysis {
        project_path: root.to_path_buf(),
        total_files,
        deficit_files: total_files - clean_files,
        clean_files,
        avg_deficit_score,
        weighted_deficit_score,
        avg_ldr: mean(file_results.iter().map(|f| f.ldr.score)),
        avg_inflation: mean(
            file_results
                .iter()
                .map(|f| f.inflation.score)
                .filter(|s| s.is_finite()),
        ),
        avg_ddc: mean(file_results.iter().map(|f| f.ddc.usage_ratio)),
        overall_status,
        file_results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DdcResult, InflationResult, LdrResult};
    use std::path::PathBuf;

    fn file(name: &str, deficit: f64, lines: usize, status: SlopStatus) -> FileAnalysis {
        FileAnalysis {
            file_path: PathBuf::from(name),
            ldr: LdrResult {
                total_lines: lines,
                score: 0.5,
                ..LdrResult::degenerate()
            },
            inflation: InflationResult::degenerate(),
            ddc: DdcResult {
                usage_ratio: 1.0,
                ..DdcResult::degenerate()
            },
            deficit_score: deficit,
            status,
            warnings: Vec::new(),
            pattern_issues: Vec::new(),
            docstring_inflation: None,
            hallucination_deps: None,
            context_jargon: None,
            parse_error: None,
        }
    }

    #[test]
    fn test_empty_project_is_clean() {
        let project = aggregate_project(Path::new("."), Vec::new(), &Config::default());
        assert_eq!(project.total_files, 0);
        assert_eq!(project.avg_deficit_score, 0.0);
        assert_eq!(project.overall_status, SlopStatus::Clean);
    }

    #[test]
    fn test_weighted_by_line_count() {
        let files = vec![
            file("big.py", 10.0, 300, SlopStatus::Clean),
            file("small.py", 90.0, 100, SlopStatus::CriticalDeficit),
        ];
        let project = aggregate_project(Path::new("."), files, &Config::default());
        assert_eq!(project.avg_deficit_score, 50.0);
        assert!((project.weighted_deficit_score - 30.0).abs() < 1e-9);
        assert_eq!(project.overall_status, SlopStatus::Suspicious);
        assert_eq!(project.clean_files, 1);
        assert_eq!(project.deficit_files, 1);
    }

    #[test]
    fn test_unweighted_when_disabled() {
        let config = Config {
            use_weighted_analysis: false,
            ..Config::default()
        };
        let files = vec![
            file("big.py", 10.0, 300, SlopStatus::Clean),
            file("small.py", 90.0, 100, SlopStatus::CriticalDeficit),
        ];
        let project = aggregate_project(Path::new("."), files, &config);
        assert_eq!(project.weighted_deficit_score, 50.0);
        assert_eq!(project.overall_status, SlopStatus::CriticalDeficit);
    }

    #[test]
    fn test_infinite_inflation_excluded_from_average() {
        let mut a = file("a.py", 0.0, 10, SlopStatus::Clean);
        a.inflation.score = f64::INFINITY;
        let mut b = file("b.py", 0.0, 10, SlopStatus::Clean);
        b.inflation.score = 0.4;
        let project = aggregate_project(Path::new("."), vec![a, b], &Config::default());
        assert!((project.avg_inflation - 0.4).abs() < 1e-9);
    }
}
