//! Built-in ignore patterns

/// Patterns ignored unless `ignore.useDefaultPatterns` is turned off.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Version control
    ".git",
    ".hg",
    ".svn",
    // Dependencies
    "node_modules/",
    "bower_components/",
    "jspm_packages/",
    ".venv/",
    "venv/",
    "__pycache__/",
    ".pnpm-store/",
    // Build output
    "dist/",
    "build/",
    "target/",
    "out/",
    ".next/",
    ".nuxt/",
    ".cache/",
    "coverage/",
    ".nyc_output/",
    // Logs and temporary files
    "*.log",
    "*.tmp",
    "*.swp",
    "tmp/",
    "temp/",
    // Lock files
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Cargo.lock",
    "poetry.lock",
    "Pipfile.lock",
    "composer.lock",
    "Gemfile.lock",
    // Editors and OS
    ".idea/",
    ".vscode/",
    ".DS_Store",
    "Thumbs.db",
    // Local credentials
    ".env",
    ".env.*",
    ".secret",
    ".secrets",
    "*.pem",
    "*.key",
    // Compiled artifacts
    "*.pyc",
    "*.class",
    "*.o",
    "*.so",
    "*.dll",
    "*.exe",
];
