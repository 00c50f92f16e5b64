//! The `gradebook init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("gradebook.toml").exists() {
        println!("gradebook.toml already exists, skipping.");
    } else {
        std::fs::write("gradebook.toml", SAMPLE_CONFIG)?;
        println!("Created gradebook.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point api_base at your student service (or set GRADEBOOK_API_BASE)");
    println!("  2. Run: gradebook grade \"Anna Lee\" 90 85 77 92 68");
    println!("  3. Run: gradebook list");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradebook configuration

# Base URL of the student-record API.
api_base = "http://localhost:8080/api"

# Per-request timeout in seconds.
timeout_secs = 30

# "lexicographic" keeps the classic dashboard value; "academic" shows the
# best grade present.
top_grade = "lexicographic"

# One of: name, total, average, grade, studentId, unsorted
default_sort = "unsorted"

# Where `gradebook export` writes files.
export_dir = "."
"#;
