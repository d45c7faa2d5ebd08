use crate::error::Result;
use crate::runner::CaseResult;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static CASE_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([+-]) ?(.*)$").unwrap());

/// Rewrite the `+`/`-` marker of each failing case so the file agrees with
/// what the pattern actually did. Cases whose pattern failed to compile are
/// left alone. Returns how many lines changed.
pub fn update_benchmark_file(file_path: &Path, results: &[&CaseResult]) -> Result<usize> {
    let content = std::fs::read_to_string(file_path)?;
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let mut changed = 0;

    for result in results {
        if result.passed || result.outcome.error.is_some() {
            continue;
        }

        let Some(line) = result.case.line.checked_sub(1).and_then(|i| lines.get_mut(i)) else {
            continue;
        };
        let Some(caps) = CASE_LINE.captures(line) else {
            tracing::warn!(
                path = %file_path.display(),
                line = result.case.line,
                "case line no longer looks like a case, skipping"
            );
            continue;
        };
        if caps[2] != result.case.test.input {
            tracing::warn!(
                path = %file_path.display(),
                line = result.case.line,
                "case input changed on disk, skipping"
            );
            continue;
        }

        let marker = if result.outcome.matched { '+' } else { '-' };
        if caps[1].starts_with(marker) {
            continue;
        }
        *line = format!("{}{}", marker, &line[1..]);
        changed += 1;
    }

    if changed > 0 {
        std::fs::write(file_path, lines.join("\n") + "\n")?;
        tracing::info!(path = %file_path.display(), changed, "updated benchmark file");
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::run_workbench;
    use crate::parse_benchmark_file;
    use std::fs;
    use tempfile::TempDir;

    fn failing_cases(path: &Path, source: &str, flags: &str) -> Vec<CaseResult> {
        let benchmarks = parse_benchmark_file(path).unwrap();
        run_workbench(source, flags, &benchmarks)
            .cases
            .into_iter()
            .filter(|c| !c.passed)
            .collect()
    }

    #[test]
    fn test_update_flips_failing_markers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("digits.txt");
        fs::write(
            &path,
            "===\ndigits\n===\n---\n+ 123\n+ abc\n- 42\n-  x\n",
        )
        .unwrap();

        let failed = failing_cases(&path, r"^\d+$", "");
        assert_eq!(failed.len(), 2);
        let refs: Vec<&CaseResult> = failed.iter().collect();
        assert_eq!(update_benchmark_file(&path, &refs).unwrap(), 2);

        let updated = fs::read_to_string(&path).unwrap();
        assert_eq!(updated, "===\ndigits\n===\n---\n+ 123\n- abc\n+ 42\n-  x\n");

        // The file now agrees with the pattern.
        assert!(failing_cases(&path, r"^\d+$", "").is_empty());
    }

    #[test]
    fn test_update_skips_compile_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("b.txt");
        let content = "===\nb\n===\n---\n+ a\n- b\n";
        fs::write(&path, content).unwrap();

        let failed = failing_cases(&path, "(", "");
        assert_eq!(failed.len(), 2);
        let refs: Vec<&CaseResult> = failed.iter().collect();
        assert_eq!(update_benchmark_file(&path, &refs).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_update_skips_lines_edited_since_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("b.txt");
        fs::write(&path, "===\nb\n===\n---\n+ abc\n").unwrap();

        let failed = failing_cases(&path, "x", "");
        fs::write(&path, "===\nb\n===\n---\n+ xyz\n").unwrap();

        let refs: Vec<&CaseResult> = failed.iter().collect();
        assert_eq!(update_benchmark_file(&path, &refs).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "===\nb\n===\n---\n+ xyz\n");
    }
}
