//! `skillsync list` — show installed skills and their provenance.

use anyhow::Result;
use serde_json::json;

use super::common;

pub fn cmd_list(json_output: bool) -> Result<()> {
    let engine = common::build_engine();
    let skills = engine.list()?;

    if json_output {
        let entries: Vec<_> = skills
            .iter()
            .map(|(filename, record)| {
                json!({
                    "filename": filename,
                    "source": record.source,
                    "branch": record.branch,
                    "fetched_at": record.fetched_at.to_rfc3339(),
                    "checksum": record.checksum,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if skills.is_empty() {
        eprintln!("No skills installed yet.");
        eprintln!("  Use `skillsync fetch <skill-name>` to install skills.");
        return Ok(());
    }

    eprintln!("Installed skills ({}):", skills.len());
    eprintln!();
    let name_width = skills.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
    for (filename, record) in &skills {
        eprintln!(
            "  {:name_width$}  {} (branch: {})  fetched {}",
            filename,
            record.source,
            record.branch,
            record.fetched_at.format("%Y-%m-%d %H:%M:%S"),
        );
    }
    Ok(())
}
