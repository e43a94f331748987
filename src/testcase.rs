//! Test case discovery
//!
//! A test case is an input program and a reference output sharing a base
//! name, e.g. `lambda.scm` and `lambda.output`.

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::SuiteConfig;
use crate::error::{HarnessError, HarnessResult};

/// Test case input/output pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Base name shared by both files
    pub name: String,
    /// Path to the input program
    pub input_path: PathBuf,
    /// Path to the reference output
    pub expected_path: PathBuf,
}

impl TestCase {
    /// Read the reference output verbatim
    pub async fn load_expected(&self) -> HarnessResult<String> {
        fs::read_to_string(&self.expected_path)
            .await
            .map_err(|source| HarnessError::ReferenceOutput {
                path: self.expected_path.clone(),
                source,
            })
    }
}

/// List the test cases in the suite directory, sorted by name.
///
/// Inputs without a matching reference output are skipped with a warning.
pub async fn discover_testcases(suite: &SuiteConfig) -> HarnessResult<Vec<TestCase>> {
    let dir = &suite.test_dir;
    let listing_error = |source| HarnessError::TestDirectory {
        path: dir.clone(),
        source,
    };

    let mut entries = fs::read_dir(dir).await.map_err(listing_error)?;
    let mut testcases = Vec::new();

    while let Some(entry) = entries.next_entry().await.map_err(listing_error)? {
        let input_path = entry.path();
        let Some(name) = test_name(&input_path, &suite.input_extension) else {
            continue;
        };

        match fs::metadata(&input_path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!(input = %input_path.display(), error = %e, "Skipping unreadable test input");
                continue;
            }
        }

        let expected_path = dir.join(format!("{}.{}", name, suite.expected_extension));
        match fs::try_exists(&expected_path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    input = %input_path.display(),
                    expected = %expected_path.display(),
                    "Skipping test input without expected output"
                );
                continue;
            }
            Err(e) => {
                tracing::warn!(expected = %expected_path.display(), error = %e, "Skipping test with unreadable expected output");
                continue;
            }
        }

        if name.contains('.') {
            tracing::warn!(name = %name, "Test name contains extra dots; using everything before the last one");
        }

        testcases.push(TestCase {
            name,
            input_path,
            expected_path,
        });
    }

    testcases.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!("Discovered {} test cases in {}", testcases.len(), dir.display());
    Ok(testcases)
}

/// Base name of `path` if its extension is `input_extension`
fn test_name(path: &Path, input_extension: &str) -> Option<String> {
    if path.extension()?.to_str()? != input_extension {
        return None;
    }
    path.file_stem()?.to_str().map(str::to_string)
}
