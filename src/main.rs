#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use gantt_timeline::{ChronoCalendar, Gantt, GanttOptions};

/// Interactive Gantt timeline viewer.
#[derive(Parser, Debug)]
#[command(name = "gantt-timeline", version, about)]
struct Cli {
    /// Task file to open (.json or .csv); a sample chart is shown without one
    file: Option<PathBuf>,

    /// Initial view mode: "Quarter Day", "Half Day", "Day", "Week" or "Month"
    #[arg(long)]
    view_mode: Option<String>,

    /// Settings file to use instead of the one in the config directory
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => GanttOptions::load(path)?,
        None => GanttOptions::load_or_default(),
    };
    if let Some(name) = &cli.view_mode {
        options.view_mode = name.parse()?;
    }

    let calendar = ChronoCalendar::new();
    let records = match &cli.file {
        Some(path) => gantt_timeline::io::load_tasks(path)?,
        None => app::sample_tasks(&options, &calendar),
    };
    log::info!("Starting viewer with {} tasks", records.len());

    let events = app::EventLog::default();
    let gantt = Gantt::new(records, options, calendar, events.gantt_events())?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Gantt Timeline"),
        ..Default::default()
    };

    eframe::run_native(
        "Gantt Timeline",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::GanttApp::new(cc, gantt, events, cli.file)))),
    )?;
    Ok(())
}
