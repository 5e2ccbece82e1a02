//! Console summary of a pack run

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::packager::PackResult;

/// Print the summary to stdout with optional color.
pub fn print_summary(
    result: &PackResult,
    output_path: &str,
    top_files_length: usize,
    use_color: bool,
) -> io::Result<()> {
    let color_choice = if use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color_choice);
    write_summary(&mut stdout, result, output_path, top_files_length)
}

/// Write the summary: largest files, totals, output path and security findings.
pub fn write_summary<W: WriteColor>(
    out: &mut W,
    result: &PackResult,
    output_path: &str,
    top_files_length: usize,
) -> io::Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    let mut dim = ColorSpec::new();
    dim.set_dimmed(true);

    let top = result.top_files(top_files_length);
    if !top.is_empty() {
        out.set_color(&bold)?;
        writeln!(out, "Top {} Files by Character Count:", top.len())?;
        out.reset()?;
        writeln!(out, "──────────────────────────────────")?;
        for (i, (path, count)) in top.iter().enumerate() {
            write!(out, "{}. {} ", i + 1, path)?;
            out.set_color(&dim)?;
            writeln!(out, "({} chars)", format_number(*count))?;
            out.reset()?;
        }
        writeln!(out)?;
    }

    out.set_color(&bold)?;
    writeln!(out, "Pack Summary:")?;
    out.reset()?;
    writeln!(out, "─────────────")?;
    writeln!(out, "  Total Files: {}", format_number(result.total_files))?;
    writeln!(out, "  Total Chars: {}", format_number(result.total_characters))?;
    writeln!(out, "       Output: {}", output_path)?;
    writeln!(out)?;

    out.set_color(&bold)?;
    writeln!(out, "Security Check:")?;
    out.reset()?;
    writeln!(out, "───────────────")?;
    if result.suspicious_files_results.is_empty() {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(out, "✔ No suspicious files detected.")?;
        out.reset()?;
    } else {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
        writeln!(
            out,
            "{} suspicious file(s) detected:",
            result.suspicious_files_results.len()
        )?;
        out.reset()?;
        for (i, scan) in result.suspicious_files_results.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, scan.file_path)?;
            for finding in &scan.messages {
                out.set_color(&dim)?;
                writeln!(out, "   - line {}: {}", finding.line, finding.message)?;
                out.reset()?;
            }
        }
        writeln!(
            out,
            "\nThese files may contain sensitive information. Review the output before sharing it."
        )?;
    }

    Ok(())
}

/// Print the pack result as pretty-printed JSON to stdout.
pub fn print_json(result: &PackResult) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
    println!("{}", json);
    Ok(())
}

/// Format a count with thousands separators (e.g. 12,345).
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::{SecretFinding, SecretScanResult};
    use std::collections::BTreeMap;
    use termcolor::NoColor;

    fn result() -> PackResult {
        let mut counts = BTreeMap::new();
        counts.insert("src/lib.rs".to_string(), 1200);
        counts.insert("README.md".to_string(), 300);
        PackResult {
            total_files: 2,
            total_characters: 1500,
            file_char_counts: counts,
            suspicious_files_results: Vec::new(),
        }
    }

    fn render(result: &PackResult, top: usize) -> String {
        let mut out = NoColor::new(Vec::new());
        write_summary(&mut out, result, "repopack-output.txt", top).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_summary_lists_top_files_and_totals() {
        let text = render(&result(), 5);
        assert!(text.contains("Top 2 Files by Character Count:"));
        assert!(text.contains("1. src/lib.rs (1,200 chars)"));
        assert!(text.contains("2. README.md (300 chars)"));
        assert!(text.contains("Total Files: 2"));
        assert!(text.contains("Total Chars: 1,500"));
        assert!(text.contains("Output: repopack-output.txt"));
        assert!(text.contains("No suspicious files detected."));
    }

    #[test]
    fn test_summary_lists_suspicious_files() {
        let mut r = result();
        r.suspicious_files_results.push(SecretScanResult {
            file_path: "config/.env.local".to_string(),
            messages: vec![SecretFinding {
                rule_id: "aws-access-key-id",
                message: "AWS access key ID found",
                line: 3,
            }],
        });
        let text = render(&r, 0);
        assert!(!text.contains("Top "));
        assert!(text.contains("1 suspicious file(s) detected:"));
        assert!(text.contains("1. config/.env.local"));
        assert!(text.contains("line 3: AWS access key ID found"));
    }
}
