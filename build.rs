use grep::regex::RegexMatcher;
use grep::searcher::{Searcher, Sink, SinkMatch};
use std::error::Error;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// Only the crate's own sources are policed.
const SOURCE_DIRS: [&str; 4] = ["quadrature", "src", "tests", "benches"];

// Which policy a collector enforces; decides how matches are filtered and reported.
#[derive(Clone, Copy)]
enum Policy {
    UnderscorePrefix,
    ForbiddenWords,
    StarsInComments,
    AllowDeadCode,
}

impl Policy {
    fn pattern(self) -> &'static str {
        match self {
            Policy::UnderscorePrefix => r"\b(_[a-zA-Z0-9_]+)\b",
            Policy::ForbiddenWords => {
                r"(//|/\*|///).*(?:FIXED|CORRECTED|FIX|FIXES|NEW|CHANGED|CHANGES|CHANGE|MODIFIED|MODIFIES|MODIFY|UPDATED|UPDATES|UPDATE)"
            }
            Policy::StarsInComments => r"(//|/\*).*\*\*",
            Policy::AllowDeadCode => r"#\s*\[\s*allow\s*\(\s*dead_code\s*\)\s*\]",
        }
    }

    fn headline(self) -> &'static str {
        match self {
            Policy::UnderscorePrefix => "underscore-prefixed variables",
            Policy::ForbiddenWords => "forbidden comment patterns",
            Policy::StarsInComments => "'**' patterns in regular comments",
            Policy::AllowDeadCode => "#[allow(dead_code)] attributes",
        }
    }

    fn advice(self) -> &'static str {
        match self {
            Policy::UnderscorePrefix => {
                "Underscore-prefixed variable names are not allowed in this project.\n   Either use the variable (removing the underscore) or remove it completely."
            }
            Policy::ForbiddenWords => {
                "Comments containing 'FIXED', 'CORRECTED', 'FIX', 'NEW', 'CHANGE', 'MODIFY', 'UPDATE' or their variants are STRICTLY FORBIDDEN in this project.\n   Remove them completely rather than commenting them out."
            }
            Policy::StarsInComments => {
                "The '**' pattern is not allowed in regular comments (but is allowed in doc comments)."
            }
            Policy::AllowDeadCode => {
                "#[allow(dead_code)] attributes are STRICTLY FORBIDDEN in this project.\n   Either use the code (removing the attribute) or remove it completely."
            }
        }
    }

    // The build script necessarily spells out the patterns it forbids.
    fn skips_build_script(self) -> bool {
        !matches!(self, Policy::UnderscorePrefix)
    }
}

// Collects every matching line of one file that the policy really counts as a violation.
struct PolicyCollector {
    policy: Policy,
    violations: Vec<String>,
    file_path: PathBuf,
}

impl PolicyCollector {
    fn new(policy: Policy, file_path: &Path) -> Self {
        Self {
            policy,
            violations: Vec::new(),
            file_path: file_path.to_path_buf(),
        }
    }

    fn is_violation(&self, line_text: &str) -> bool {
        match self.policy {
            Policy::UnderscorePrefix => {
                let is_pure_comment = line_text.trim_start().starts_with("//")
                    || (line_text.contains("/*")
                        && !line_text.contains("*/match")
                        && !line_text.contains("*/let"));
                // Odd-numbered segments between quotes are inside string literals.
                let is_in_string = line_text
                    .split('"')
                    .enumerate()
                    .any(|(i, part)| i % 2 == 1 && part.contains('_'));
                !is_pure_comment && !is_in_string
            }
            Policy::StarsInComments => !is_doc_comment(line_text),
            Policy::ForbiddenWords | Policy::AllowDeadCode => true,
        }
    }

    fn check_and_get_error_message(&self) -> Option<String> {
        if self.violations.is_empty() {
            return None;
        }

        let file_name = self.file_path.to_str().unwrap_or("?");
        let mut error_msg = format!(
            "\n❌ ERROR: Found {} {} in {}:\n",
            self.violations.len(),
            self.policy.headline(),
            file_name
        );
        for violation in &self.violations {
            error_msg.push_str(&format!("   {violation}\n"));
        }
        error_msg.push_str(&format!("\n⚠️ {}\n", self.policy.advice()));
        Some(error_msg)
    }
}

impl Sink for PolicyCollector {
    type Error = std::io::Error;

    fn matched(&mut self, _: &Searcher, mat: &SinkMatch) -> Result<bool, Self::Error> {
        let line_number = mat.line_number().unwrap_or(0);
        let line_text = std::str::from_utf8(mat.bytes()).unwrap_or("").trim_end();

        if self.is_violation(line_text) {
            self.violations.push(format!("{line_number}:{line_text}"));
        }

        Ok(true)
    }
}

fn is_doc_comment(line: &str) -> bool {
    line.trim_start().starts_with("///")
}

fn rust_sources() -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = SOURCE_DIRS
        .iter()
        .filter(|dir| Path::new(dir).is_dir())
        .flat_map(|dir| {
            WalkDir::new(dir)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
                .map(|e| e.into_path())
        })
        .collect();
    files.push(PathBuf::from("build.rs"));
    files
}

fn scan(policy: Policy, files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let matcher = RegexMatcher::new_line_matcher(policy.pattern())?;
    let mut searcher = Searcher::new();

    for path in files {
        if policy.skips_build_script() && path.file_name().is_some_and(|f| f == "build.rs") {
            continue;
        }
        let mut collector = PolicyCollector::new(policy, path);
        searcher.search_path(&matcher, path, &mut collector)?;
        if let Some(error_message) = collector.check_and_get_error_message() {
            return Err(error_message.into());
        }
    }

    Ok(())
}

// Compiles this script on its own with the strict lints, since cargo does not apply
// the crate's lint table to build scripts.
fn check_build_script_lints() {
    let status = std::process::Command::new("rustc")
        .args([
            "--edition",
            "2021",
            "-D",
            "unused_variables",
            "-D",
            "dead_code",
            "-D",
            "unused_imports",
            "--crate-type",
            "bin",
            "--error-format",
            "human",
            "build.rs",
        ])
        .output();

    match status {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("unused variable")
                || stderr.contains("is never used")
                || stderr.contains("unused import")
            {
                eprintln!("\n❌ ERROR: Unused code detected in build.rs!");
                eprintln!("{stderr}");
                std::process::exit(1);
            }
        }
        Ok(_) => {}
        Err(_) => {
            eprintln!("cargo:warning=Could not check build.rs for unused code");
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for dir in SOURCE_DIRS {
        println!("cargo:rerun-if-changed={dir}");
    }

    check_build_script_lints();

    let files = rust_sources();
    for policy in [
        Policy::UnderscorePrefix,
        Policy::ForbiddenWords,
        Policy::StarsInComments,
        Policy::AllowDeadCode,
    ] {
        if let Err(e) = scan(policy, &files) {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
