//! Secret scanning of packed files
//!
//! The scan only reports. It never changes which files are packed.

use regex::Regex;
use serde::Serialize;
use tracing::trace;

/// One suspicious match inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretFinding {
    pub rule_id: &'static str,
    pub message: &'static str,
    /// 1-based line number
    pub line: usize,
}

/// Scan outcome for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretScanResult {
    /// Root-relative path of the scanned file.
    pub file_path: String,
    pub messages: Vec<SecretFinding>,
}

impl SecretScanResult {
    pub fn is_suspicious(&self) -> bool {
        !self.messages.is_empty()
    }
}

/// Inspects raw file content for likely credentials.
pub trait SecretScanner: Send + Sync {
    fn scan(&self, file_path: &str, content: &str) -> SecretScanResult;
}

struct SecretRule {
    id: &'static str,
    message: &'static str,
    pattern: Regex,
}

/// Line-oriented scanner backed by a fixed table of regex rules.
pub struct RegexSecretScanner {
    rules: Vec<SecretRule>,
}

impl RegexSecretScanner {
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }
}

impl Default for RegexSecretScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RegexSecretScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegexSecretScanner")
            .field("rules", &self.rules.iter().map(|r| r.id).collect::<Vec<_>>())
            .finish()
    }
}

impl SecretScanner for RegexSecretScanner {
    fn scan(&self, file_path: &str, content: &str) -> SecretScanResult {
        let mut messages = Vec::new();
        for (index, line) in content.lines().enumerate() {
            for rule in &self.rules {
                if rule.pattern.is_match(line) {
                    messages.push(SecretFinding {
                        rule_id: rule.id,
                        message: rule.message,
                        line: index + 1,
                    });
                }
            }
        }

        if !messages.is_empty() {
            trace!(path = file_path, count = messages.len(), "found suspicious content");
            for finding in &messages {
                trace!(rule = finding.rule_id, line = finding.line, "  - {}", finding.message);
            }
        }

        SecretScanResult {
            file_path: file_path.to_string(),
            messages,
        }
    }
}

fn builtin_rules() -> Vec<SecretRule> {
    let rule = |id: &'static str, message: &'static str, pattern: &str| SecretRule {
        id,
        message,
        pattern: Regex::new(pattern).expect("built-in secret rule must compile"),
    };
    vec![
        rule(
            "aws-access-key-id",
            "AWS access key ID found",
            r"\b(?:AKIA|ASIA)[0-9A-Z]{16}\b",
        ),
        rule(
            "github-token",
            "GitHub token found",
            r"\b(?:gh[pousr]_[A-Za-z0-9]{36}|github_pat_[A-Za-z0-9]{22}_[A-Za-z0-9]{59})\b",
        ),
        rule(
            "slack-token",
            "Slack token found",
            r"\bxox[abposr]-[A-Za-z0-9-]{10,}",
        ),
        rule(
            "private-key",
            "Private key found",
            r"-----BEGIN (?:[A-Z]+ )?PRIVATE KEY-----",
        ),
        rule(
            "basic-auth-url",
            "Credentials embedded in URL",
            r"[a-zA-Z][a-zA-Z0-9+.-]*://[^/\s:@]+:[^/\s:@]+@[^/\s]+",
        ),
        rule(
            "generic-credential",
            "Hard-coded credential assignment",
            r#"(?i)\b(?:password|passwd|secret|api[_-]?key|access[_-]?token)\b\s*[:=]\s*["'][^"'\s]{8,}["']"#,
        ),
    ]
}
