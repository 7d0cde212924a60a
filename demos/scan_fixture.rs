// Example: scan a throw-away database shaped like Warp's
// Run with: cargo run --example scan_fixture

use rusqlite::Connection;
use warpdb_inspect::{Filter, OutputFormat, Preset, ReadOnlySelect, Scanner, TableSource};

fn main() -> anyhow::Result<()> {
    println!("=== warpdb-inspect fixture scan ===\n");

    // 1. Build a small database in a temporary directory
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("warp.sqlite");
    {
        let conn = Connection::open(&path)?;
        conn.execute_batch(
            "CREATE TABLE generic_string_objects (id INTEGER PRIMARY KEY, data TEXT);
             INSERT INTO generic_string_objects VALUES
               (1, '{\"name\": \"Default\", \"base_model\": \"claude-sonnet\"}'),
               (2, '{\"theme\": \"dark\"}'),
               (3, 'not json'),
               (4, '{\"kind\": \"AgentProfile\", \"tools\": [\"shell\"]}');",
        )?;
    }

    // 2. Open it read-only and fetch every row
    let source = TableSource::open(&path)?;
    let select = ReadOnlySelect::table("generic_string_objects", "id", "data")?;
    let rows = source.rows(&select)?;
    println!("Fetched {} row(s) from {}\n", rows.len(), select.source());

    // 3. Filter with the agent profile preset and print the matches
    let preset = Preset::Profiles;
    let scanner = Scanner::new(Filter::new(preset.terms()), preset.max_chars(), OutputFormat::Text)
        .with_id_line(preset.id_line());
    let report = scanner.scan(rows);

    println!("{}", preset.header(select.source()));
    for m in &report.matches {
        println!("{}", scanner.render(m));
    }

    println!(
        "\n{} matched, {} skipped as invalid JSON",
        report.matches.len(),
        report.skipped
    );

    source.close()?;
    Ok(())
}
