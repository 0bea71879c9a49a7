//! Ps command implementation

use anyhow::{Context, Result};
use dockman_registry::{ContainerCollection, ContainerRecord, ContainerRegistry, ProcessRunner};

pub fn execute<R: ProcessRunner>(
    registry: &mut ContainerRegistry<R>,
    running_only: bool,
    json: bool,
) -> Result<()> {
    tracing::debug!(running_only, "Listing containers");

    let containers = registry.containers().context("Failed to list containers")?;
    let containers = if running_only {
        ContainerCollection::from(containers.running().cloned().collect::<Vec<_>>())
    } else {
        containers
    };

    if json {
        let out = serde_json::to_string_pretty(&containers)
            .context("Failed to serialize containers")?;
        println!("{out}");
        return Ok(());
    }

    if containers.is_empty() {
        println!("No containers");
        return Ok(());
    }

    print_table(&containers);
    println!("Total: {} container(s)", containers.len());

    Ok(())
}

fn print_table(containers: &ContainerCollection) {
    let Some(first) = containers.iter().next() else {
        return;
    };

    let mut header: Vec<String> = first.columns().names().map(str::to_string).collect();
    header.push("RUNNING".to_string());

    let rows: Vec<Vec<String>> = containers.iter().map(row_cells).collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|i| {
            rows.iter()
                .map(|row| row.get(i).map_or(0, |cell| cell.chars().count()))
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    println!("{}", format_line(&header, &widths));
    for row in &rows {
        println!("{}", format_line(row, &widths));
    }
}

fn row_cells(record: &ContainerRecord) -> Vec<String> {
    let marker = if record.is_running() { "yes" } else { "no" };
    record
        .fields()
        .map(|(_, value)| value.to_string())
        .chain(std::iter::once(marker.to_string()))
        .collect()
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
