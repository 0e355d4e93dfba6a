//! CLI Application logic
//!
//! Argument parsing, document discovery, the interactive selection prompt
//! and the mapping of errors to console messages.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use glob::{glob_with, MatchOptions, Pattern};
use tracing::debug;

use gongwen_core::{
    default_output_path, format_document, FooterOutcome, FormatError, FormatOptions, StyleTable,
    Verification, DEFAULT_ORGANIZATION, OUTPUT_SUFFIX,
};

use crate::error::CliError;

/// Extensions offered by discovery, in listing order
const DOCUMENT_EXTENSIONS: [&str; 2] = ["docx", "doc"];

#[derive(Parser, Debug)]
#[command(name = "gongwen")]
#[command(author, version, about = "Format Word documents to the official-document layout", long_about = None)]
struct Cli {
    /// Input Word document (prompted from the working directory if omitted)
    input: Option<PathBuf>,

    /// Output document (defaults to <input-stem>_格式化.docx)
    output: Option<PathBuf>,

    /// Signature line appended after the content
    #[arg(short, long, default_value = DEFAULT_ORGANIZATION)]
    organization: String,

    /// Skip reopening the output to check the page numbers
    #[arg(long)]
    no_verify: bool,

    /// Print the style table as TOML and exit
    #[arg(long)]
    print_style_table: bool,
}

/// Run the CLI application
///
/// Parses arguments, resolves the input (prompting when none is given) and
/// formats it.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let table = StyleTable::official();

    if cli.print_style_table {
        let text = toml::to_string(&table).context("Failed to serialize style table")?;
        print!("{}", text);
        return Ok(());
    }

    let input = match cli.input {
        Some(input) => input,
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            let files = discover_documents(&cwd)?;
            if files.is_empty() {
                return Err(CliError::NoDocuments(cwd).into());
            }
            let stdin = io::stdin();
            select_document(&files, &mut stdin.lock(), &mut io::stdout())?
        }
    };
    if !input.exists() {
        return Err(CliError::InputNotFound(input).into());
    }

    let output = cli.output.unwrap_or_else(|| default_output_path(&input));
    let options = FormatOptions {
        organization: cli.organization,
        verify: !cli.no_verify,
    };
    format_command(&input, &output, &options, &table)
}

/// Execute one formatting run and print its summary
pub fn format_command(
    input: &Path,
    output: &Path,
    options: &FormatOptions,
    table: &StyleTable,
) -> Result<()> {
    println!("gongwen v{}", gongwen_core::VERSION);
    println!("Formatting: {}", input.display());

    let report = format_document(input, output, options, table)
        .with_context(|| format!("Failed to format document: {}", input.display()))?;

    println!("  Paragraphs: {}", report.paragraphs);
    println!("  Sections: {}", report.sections);
    if report.footer == FooterOutcome::Fallback {
        println!("  Page numbers: static \"- N -\" per section (not per page)");
    }
    match report.verification {
        Some(Verification::Present) => println!("✓ Page numbers added"),
        Some(Verification::Missing) | Some(Verification::Unreadable) => {
            println!("⚠ Page numbers may be missing, check the footer manually")
        }
        None => {}
    }

    println!();
    println!("Created: {}", output.display());
    Ok(())
}

/// Word documents in `dir` that have not been formatted yet
///
/// Lists `*.docx` then `*.doc`, each alphabetically, skipping files whose
/// name already ends in the output suffix. Hidden files are not listed.
pub fn discover_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let base = Pattern::escape(&dir.to_string_lossy());
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let mut files = Vec::new();

    for extension in DOCUMENT_EXTENSIONS {
        let pattern = format!("{}/*.{}", base, extension);
        let entries = glob_with(&pattern, options)
            .with_context(|| format!("Invalid glob pattern: {}", pattern))?;
        for entry in entries {
            let path = entry.context("Failed to read directory entry")?;
            if path.is_file() && !is_formatted_output(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn is_formatted_output(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    DOCUMENT_EXTENSIONS
        .iter()
        .any(|ext| name.ends_with(&format!("{}.{}", OUTPUT_SUFFIX, ext)))
}

/// Print the numbered list and read a 1-based choice
pub fn select_document<R, W>(
    files: &[PathBuf],
    input: &mut R,
    output: &mut W,
) -> std::result::Result<PathBuf, CliError>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "Word documents in the current directory:")?;
    for (i, file) in files.iter().enumerate() {
        let name = file.file_name().unwrap_or(file.as_os_str());
        writeln!(output, "{}. {}", i + 1, name.to_string_lossy())?;
    }
    write!(output, "Select a document number: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| files.get(i))
        .cloned()
        .ok_or_else(|| CliError::InvalidSelection(answer.to_string()))
}

/// Print a failure to stderr
///
/// Environment errors get a one-line message; processing errors are
/// printed with their full cause chain.
pub fn report_error(err: &anyhow::Error) {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        eprintln!("Error: {}", cli_err);
        if matches!(cli_err, CliError::NoDocuments(_)) {
            eprintln!("Pass an input path, or run in a directory that contains Word documents");
        }
        return;
    }

    match err.downcast_ref::<FormatError>() {
        Some(FormatError::InputNotFound(path)) => {
            eprintln!("Error: Input file not found: {}", path.display());
        }
        _ => {
            debug!(error = ?err, "formatting failed");
            eprintln!("Error: {:#}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn files() -> Vec<PathBuf> {
        vec![PathBuf::from("a.docx"), PathBuf::from("b.doc")]
    }

    #[test]
    fn test_select_document() {
        let mut out = Vec::new();
        let chosen = select_document(&files(), &mut Cursor::new("2\n"), &mut out).unwrap();
        assert_eq!(chosen, PathBuf::from("b.doc"));

        let listing = String::from_utf8(out).unwrap();
        assert!(listing.contains("1. a.docx"));
        assert!(listing.contains("2. b.doc"));
    }

    #[test]
    fn test_select_out_of_range() {
        for answer in ["0\n", "3\n", "-1\n"] {
            let err = select_document(&files(), &mut Cursor::new(answer), &mut Vec::new()).unwrap_err();
            assert!(matches!(err, CliError::InvalidSelection(_)));
        }
    }

    #[test]
    fn test_select_not_a_number() {
        let err = select_document(&files(), &mut Cursor::new("abc\n"), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::InvalidSelection(ref s) if s == "abc"));

        let err = select_document(&files(), &mut Cursor::new(""), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::InvalidSelection(_)));
    }

    #[test]
    fn test_discover_documents() {
        let dir = TempDir::new().unwrap();
        for name in [
            "b.docx",
            "a.docx",
            "旧.doc",
            "a_格式化.docx",
            "c_格式化.doc",
            "notes.txt",
            ".draft.docx",
            ".~lock.a.docx",
        ] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        fs::create_dir(dir.path().join("folder.docx")).unwrap();

        let names: Vec<String> = discover_documents(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.docx", "b.docx", "旧.doc"]);
    }

    #[test]
    fn test_discover_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(discover_documents(dir.path()).unwrap().is_empty());
    }
}
