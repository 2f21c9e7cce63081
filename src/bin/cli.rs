use chrono::NaiveDate;
use clap::Parser;
use polars::prelude::{AnyValue, DataFrame};
use progress_curve::{
    ChartSpec, Direction, ProgressReport, ProjectSession, TaskId, TaskRecord, export_progress_to_csv,
    export_tasks_to_csv, import_tasks_into, logging, sample_tasks, save_report_to_json,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "progress-curve",
    version,
    about = "Edit construction tasks and inspect the daily cost/progress curve."
)]
struct CliArgs {
    /// Task CSV to load instead of the sample tasks.
    #[arg(long, value_name = "PATH")]
    import: Option<PathBuf>,

    /// Start with an empty task list.
    #[arg(long, conflicts_with = "import")]
    empty: bool,

    /// Show per-bar labels in `chart` output.
    #[arg(long)]
    labels: bool,

    /// Logging level (error, warn, info, debug, trace).
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float64(v) => format!("{v:.2}"),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(s.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let push_row = |out: &mut String, values: &[String]| {
        out.push('|');
        for (ci, s) in values.iter().enumerate() {
            out.push(' ');
            out.push_str(s);
            out.push_str(&" ".repeat(widths[ci].saturating_sub(s.chars().count())));
            out.push_str(" |");
        }
        out.push('\n');
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &col_names);
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        push_row(&mut out, row);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                        Show this help\n  show                                        Show tasks and selection\n  series                                      Show the daily cost/progress series\n  add  <cost> <YYYY-MM-DD> <days> <name...>   Append a task\n  edit <id> <cost> <YYYY-MM-DD> <days> <name...>\n                                              Replace a task\n  delete <id>                                 Delete a task\n  select <id...>                              Mark tasks for moving\n  deselect <id...>                            Unmark tasks\n  clear                                       Clear the selection\n  up | down                                   Move selected tasks one slot\n  labels <on|off>                             Toggle bar labels in chart output\n  chart                                       Describe the Gantt chart and curve\n  import <path>                               Replace tasks from a CSV file\n  export <tasks|progress|report> <path>       Write tasks/progress CSV or report JSON\n  sample                                      Reload the sample tasks\n  quit|exit                                   Exit"
    );
}

fn print_tasks(session: &ProjectSession) {
    match ProgressReport::tasks_dataframe(session.tasks()) {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering tasks: {e}"),
    }
    let selected: Vec<String> = session.selection().iter().map(|id| id.to_string()).collect();
    if !selected.is_empty() {
        println!("Selected: {}", selected.join(", "));
    }
}

fn print_series(session: &ProjectSession) {
    let report = session.report();
    if report.is_empty() {
        println!("No tasks; nothing to show.");
        return;
    }
    match report.rows_dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error rendering series: {e}"),
    }
    println!("Total cost: {:.2}", report.total_cost);
    if !report.excluded.is_empty() {
        let ids: Vec<String> = report.excluded.iter().map(|id| id.to_string()).collect();
        println!("Excluded (duration < 1 day): {}", ids.join(", "));
    }
}

fn print_chart(chart: &ChartSpec) {
    println!("X range: {} .. {}", chart.x_range.0, chart.x_range.1);
    for bar in &chart.bars {
        let label = bar.label.as_deref().unwrap_or("");
        println!(
            "  [{:>2}] {} -> {} {}",
            bar.color_index, bar.start_date, bar.end_date, label
        );
    }
    let marks: Vec<String> = chart
        .annotations
        .iter()
        .filter_map(|&idx| {
            let text = chart.annotation_text(idx)?;
            Some(format!("{} {}", chart.curve[idx].date, text))
        })
        .collect();
    println!("Curve marks: {}", marks.join(", "));
}

fn parse_id(s: Option<&str>) -> Option<TaskId> {
    s.and_then(|s| s.parse::<u64>().ok()).map(TaskId)
}

/// Parses `<cost> <YYYY-MM-DD> <days> <name...>`.
fn parse_record<'a, I>(mut parts: I) -> Result<TaskRecord, String>
where
    I: Iterator<Item = &'a str>,
{
    let cost: f64 = parts
        .next()
        .ok_or("missing cost")?
        .parse()
        .map_err(|_| "Invalid cost".to_string())?;
    let start = NaiveDate::parse_from_str(parts.next().ok_or("missing start date")?, "%Y-%m-%d")
        .map_err(|_| "Invalid date (YYYY-MM-DD)".to_string())?;
    let days: i64 = parts
        .next()
        .ok_or("missing duration")?
        .parse()
        .map_err(|_| "Invalid duration_days".to_string())?;
    let name = parts.collect::<Vec<_>>().join(" ");
    Ok(TaskRecord::new(name, cost, start, days))
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logging::init_logging(args.log_level.as_deref())?;

    let mut session = if args.empty {
        ProjectSession::default()
    } else {
        ProjectSession::with_sample_data()
    };
    if let Some(path) = &args.import {
        import_tasks_into(&mut session, path)?;
    }
    let mut show_labels = args.labels;

    println!("Progress Curve (CLI) - type 'help' for commands\n");
    print_tasks(&session);

    let stdin = io::stdin();
    let mut lines = stdin.lock();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match lines.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_tasks(&session),
            "series" => print_series(&session),
            "add" => match parse_record(parts) {
                Ok(record) => match session.add_task(record) {
                    Ok((id, _)) => {
                        println!("Task {id} added.");
                        print_tasks(&session);
                    }
                    Err(e) => println!("Error: {e}"),
                },
                Err(e) => println!("{e}\nUsage: add <cost> <YYYY-MM-DD> <days> <name...>"),
            },
            "edit" => {
                let Some(id) = parse_id(parts.next()) else {
                    println!("Usage: edit <id> <cost> <YYYY-MM-DD> <days> <name...>");
                    continue;
                };
                match parse_record(parts) {
                    Ok(record) => match session.edit_task(id, record) {
                        Ok(_) => {
                            println!("Task {id} updated.");
                            print_tasks(&session);
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    Err(e) => println!("{e}\nUsage: edit <id> <cost> <YYYY-MM-DD> <days> <name...>"),
                }
            }
            "delete" => match parse_id(parts.next()) {
                Some(id) => match session.remove_task(id) {
                    Ok(_) => {
                        println!("Deleted task {id}.");
                        print_tasks(&session);
                    }
                    Err(e) => println!("Error: {e}"),
                },
                None => println!("Usage: delete <id>"),
            },
            "select" | "deselect" => {
                let ids: Vec<Option<TaskId>> = parts.map(|p| parse_id(Some(p))).collect();
                if ids.is_empty() || ids.iter().any(Option::is_none) {
                    println!("Usage: {cmd} <id...>");
                    continue;
                }
                for id in ids.into_iter().flatten() {
                    if cmd == "select" {
                        if let Err(e) = session.select(id) {
                            println!("Error: {e}");
                        }
                    } else {
                        session.deselect(id);
                    }
                }
                print_tasks(&session);
            }
            "clear" => {
                session.clear_selection();
                println!("Selection cleared.");
            }
            "up" | "down" => {
                let direction = if cmd == "up" {
                    Direction::Up
                } else {
                    Direction::Down
                };
                if session.selection().is_empty() {
                    println!("Nothing selected.");
                    continue;
                }
                session.reorder(direction);
                println!("Moved selected tasks {direction}.");
                print_tasks(&session);
            }
            "labels" => match parts.next() {
                Some("on") => {
                    show_labels = true;
                    println!("Bar labels on.");
                }
                Some("off") => {
                    show_labels = false;
                    println!("Bar labels off.");
                }
                _ => println!("Usage: labels <on|off>"),
            },
            "chart" => match session.chart(show_labels) {
                Some(chart) => print_chart(&chart),
                None => println!("No tasks; nothing to show."),
            },
            "import" => match parts.next() {
                Some(path) => match import_tasks_into(&mut session, path) {
                    Ok(snapshot) => {
                        println!("Imported {} tasks from {path}.", snapshot.tasks.len());
                        print_tasks(&session);
                    }
                    Err(e) => println!("Import failed: {e}"),
                },
                None => println!("Usage: import <path>"),
            },
            "export" => {
                let (kind, path) = (parts.next(), parts.next());
                let result = match (kind, path) {
                    (Some("tasks"), Some(path)) => export_tasks_to_csv(session.tasks(), path),
                    (Some("progress"), Some(path)) => {
                        export_progress_to_csv(&session.report(), path)
                    }
                    (Some("report"), Some(path)) => save_report_to_json(&session.report(), path),
                    _ => {
                        println!("Usage: export <tasks|progress|report> <path>");
                        continue;
                    }
                };
                match result {
                    Ok(()) => println!("Exported {} to {}.", kind.unwrap_or(""), path.unwrap_or("")),
                    Err(e) => println!("Export failed: {e}"),
                }
            }
            "sample" => {
                session.import_tasks(sample_tasks());
                println!("Sample tasks loaded.");
                print_tasks(&session);
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
    Ok(())
}
