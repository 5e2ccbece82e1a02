//! Integration tests for repopack


use harness::{TestRepo, run_repopack};
use repopack::test_utils::{
    KeywordSecretScanner, RecordingOutputWriter, StaticContentProcessor, StaticIgnoreFileReader,
    test_collaborators,
};
use repopack::{
    Collaborators, DirectoryWalker, GlobCompiler, IgnoreFilter, IncludeFilter, PackConfig, pack,
};

fn walk(repo: &TestRepo, config: &PackConfig) -> Vec<String> {
    let reader = repopack::FsIgnoreFileReader::new(config.ignore.use_gitignore);
    let ignore = IgnoreFilter::build(repo.path(), config, &reader, &GlobCompiler).unwrap();
    let include = IncludeFilter::build(repo.path(), config, &GlobCompiler);
    let mut files: Vec<String> = DirectoryWalker::new(&ignore, &include)
        .walk(repo.path())
        .unwrap()
        .into_iter()
        .map(|p| p.to_string())
        .collect();
    files.sort();
    files
}

fn recording(writer: &RecordingOutputWriter) -> Collaborators {
    test_collaborators(
        StaticIgnoreFileReader::default(),
        StaticContentProcessor::new("content"),
        KeywordSecretScanner::new("SECRET"),
        writer.clone(),
    )
}

// ============================================================================
// File selection
// ============================================================================

#[test]
fn test_default_patterns_exclude_secret_file() {
    let repo = TestRepo::new();
    repo.add_file("src/index.ts", "export {};");
    repo.add_file("src/.secret", "token");
    repo.add_file("README.md", "# Demo");

    assert_eq!(
        walk(&repo, &PackConfig::default()),
        vec!["README.md", "src/index.ts"]
    );
}

#[test]
fn test_custom_patterns_without_defaults() {
    let repo = TestRepo::new();
    repo.add_file("app.log", "log");
    repo.add_file("app.txt", "text");
    repo.add_file("node_modules/pkg/index.js", "module.exports = {};");

    let mut config = PackConfig::default();
    config.ignore.use_default_patterns = false;
    config.ignore.custom_patterns = vec!["*.log".to_string()];

    assert_eq!(
        walk(&repo, &config),
        vec!["app.txt", "node_modules/pkg/index.js"]
    );
}

#[test]
fn test_gitignore_and_repopackignore_are_honored() {
    let repo = TestRepo::new();
    repo.add_file(".gitignore", "*.gen.rs\n");
    repo.add_file(".repopackignore", "docs/\n");
    repo.add_file("web/.gitignore", "/static\n");
    repo.add_file("src/schema.gen.rs", "");
    repo.add_file("src/lib.rs", "");
    repo.add_file("docs/guide.md", "");
    repo.add_file("web/static/app.js", "");
    repo.add_file("web/index.html", "");

    let files = walk(&repo, &PackConfig::default());
    assert_eq!(
        files,
        vec![".gitignore", ".repopackignore", "src/lib.rs", "web/.gitignore", "web/index.html"]
    );

    let mut config = PackConfig::default();
    config.ignore.use_gitignore = false;
    let files = walk(&repo, &config);
    assert!(files.contains(&"src/schema.gen.rs".to_string()));
    assert!(!files.contains(&"docs/guide.md".to_string()));
}

#[test]
fn test_include_restricts_and_ignore_wins() {
    let repo = TestRepo::new();
    repo.add_file("src/main.rs", "");
    repo.add_file("src/util.rs", "");
    repo.add_file("src/.env", "");
    repo.add_file("Cargo.toml", "");

    let config = PackConfig {
        include: vec!["src/**".to_string()],
        ..PackConfig::default()
    };
    assert_eq!(walk(&repo, &config), vec!["src/main.rs", "src/util.rs"]);
}

#[test]
fn test_absolute_include_is_made_relative() {
    let repo = TestRepo::new();
    repo.add_file("a/b.txt", "");
    repo.add_file("a/c.txt", "");

    let config = PackConfig {
        include: vec![repo.path().join("a/b.txt").to_string_lossy().to_string()],
        ..PackConfig::default()
    };
    assert_eq!(walk(&repo, &config), vec!["a/b.txt"]);
}

#[test]
fn test_previous_output_is_never_repacked() {
    let repo = TestRepo::new();
    repo.add_file("main.rs", "fn main() {}");
    repo.add_file("repopack-output.txt", "old output");

    let mut config = PackConfig::default();
    config.ignore.use_default_patterns = false;
    assert_eq!(walk(&repo, &config), vec!["main.rs"]);
}

// ============================================================================
// Pack pipeline
// ============================================================================

#[test]
fn test_pack_reports_metrics_and_tree() {
    let repo = TestRepo::new();
    repo.add_file("src/index.ts", "export {};");
    repo.add_file("src/.secret", "token");
    repo.add_file("README.md", "# Demo");

    let writer = RecordingOutputWriter::new();
    let result = pack(repo.path(), &PackConfig::default(), &recording(&writer)).unwrap();

    assert_eq!(result.total_files, 2);
    assert_eq!(result.total_characters, 2 * "content".len());
    assert_eq!(result.file_char_counts.len(), 2);
    assert_eq!(result.file_char_counts["README.md"], 7);

    let records = writer.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].tree, "src/\n  index.ts\nREADME.md");
}

#[test]
fn test_skipped_files_stay_in_tree_but_not_in_output() {
    let repo = TestRepo::new();
    repo.add_file("logo.png", "binary");
    repo.add_file("main.rs", "fn main() {}");

    let writer = RecordingOutputWriter::new();
    let collaborators = test_collaborators(
        StaticIgnoreFileReader::default(),
        StaticContentProcessor::new("content").skipping("logo.png"),
        KeywordSecretScanner::new("SECRET"),
        writer.clone(),
    );
    let result = pack(repo.path(), &PackConfig::default(), &collaborators).unwrap();

    assert_eq!(result.total_files, 1);
    let records = writer.records();
    assert_eq!(records[0].files, vec![("main.rs".to_string(), "content".to_string())]);
    assert_eq!(records[0].tree, "logo.png\nmain.rs");
}

#[test]
fn test_suspicious_findings_do_not_change_selection() {
    let repo = TestRepo::new();
    repo.add_file("config.js", "const key = 'SECRET';\n");
    repo.add_file("index.js", "console.log('hi');\n");

    let writer = RecordingOutputWriter::new();
    let result = pack(repo.path(), &PackConfig::default(), &recording(&writer)).unwrap();

    assert_eq!(result.total_files, 2);
    assert_eq!(result.suspicious_files_results.len(), 1);
    let finding = &result.suspicious_files_results[0];
    assert_eq!(finding.file_path, "config.js");
    assert_eq!(finding.messages[0].line, 1);
}

#[test]
fn test_static_ignore_reader_patterns_apply() {
    let repo = TestRepo::new();
    repo.add_file("keep.rs", "");
    repo.add_file("drop/me.rs", "");

    let writer = RecordingOutputWriter::new();
    let collaborators = test_collaborators(
        StaticIgnoreFileReader::new(["drop/"]),
        StaticContentProcessor::new("x"),
        KeywordSecretScanner::new("SECRET"),
        writer.clone(),
    );
    let result = pack(repo.path(), &PackConfig::default(), &collaborators).unwrap();
    assert_eq!(result.file_char_counts.keys().collect::<Vec<_>>(), vec!["keep.rs"]);
}

#[test]
fn test_production_pack_writes_document() {
    let repo = TestRepo::new();
    repo.add_file("src/lib.rs", "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n");
    repo.add_file("README.md", "# Adder\n");

    let config = PackConfig::default();
    let result = pack(repo.path(), &config, &Collaborators::production(&config.ignore)).unwrap();
    assert_eq!(result.total_files, 2);

    let doc = repo.read("repopack-output.txt");
    assert!(doc.contains("Repository Structure"));
    assert!(doc.contains("src/\n  lib.rs\nREADME.md"));
    assert!(doc.contains("File: src/lib.rs\n================\npub fn add"));

    // A second run must not pick up the document it just wrote
    let again = pack(repo.path(), &config, &Collaborators::production(&config.ignore)).unwrap();
    assert_eq!(again, result);
}

#[test]
fn test_gitignore_with_loose_double_star_still_packs() {
    let repo = TestRepo::new();
    repo.add_file(".gitignore", "build**\n**.bak\n");
    repo.add_file("main.rs", "fn main() {}");
    repo.add_file("build-cache/blob.rs", "fn blob() {}");
    repo.add_file("notes.bak", "old");

    let config = PackConfig::default();
    let result = pack(repo.path(), &config, &Collaborators::production(&config.ignore)).unwrap();
    assert_eq!(
        result.file_char_counts.keys().collect::<Vec<_>>(),
        vec![".gitignore", "main.rs"]
    );
}

// ============================================================================
// CLI
// ============================================================================

#[test]
fn test_cli_packs_directory() {
    let repo = TestRepo::new();
    repo.add_file("main.rs", "fn main() {}");

    let (stdout, stderr, success) = run_repopack(repo.path(), &[]);
    assert!(success, "repopack should succeed: {}", stderr);
    assert!(stdout.contains("Total Files: 1"), "summary missing: {}", stdout);
    assert!(repo.exists("repopack-output.txt"));
}

#[test]
fn test_cli_json_output() {
    let repo = TestRepo::new();
    repo.add_file("a.txt", "hello");
    repo.add_file("b.log", "ignored by default");

    let (stdout, _stderr, success) = run_repopack(repo.path(), &["--json", "-o", "packed.txt"]);
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["totalFiles"], 1);
    assert_eq!(json["totalCharacters"], 5);
    assert_eq!(json["fileCharCounts"]["a.txt"], 5);
    assert!(repo.exists("packed.txt"));
}

#[test]
fn test_cli_reads_config_file() {
    let repo = TestRepo::new();
    repo.add_file(
        "repopack.config.json",
        r#"{ "output": { "filePath": "bundle.txt" }, "include": ["src/**"] }"#,
    );
    repo.add_file("src/a.rs", "fn a() {}");
    repo.add_file("other.rs", "fn other() {}");

    let (stdout, _stderr, success) = run_repopack(repo.path(), &["--json"]);
    assert!(success);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["totalFiles"], 1);
    assert!(repo.exists("bundle.txt"));
}
