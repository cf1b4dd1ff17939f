use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::ArgMatches;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use greenlight_core::config::GreenlightConfig;
use greenlight_core::events;
use greenlight_core::projects::{Tracked, now_ms};
use greenlight_core::{
    HttpProjectSource, Poller, Project, ProjectId, ProjectSet, ProjectSource, ProjectStatus,
};

use crate::table::{TableFormatter, format_duration_ms, format_progress, format_timestamp};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// A project plus the status derived from it, for `--json` output.
#[derive(serde::Serialize)]
struct ProjectView<'a> {
    #[serde(flatten)]
    project: &'a Project,
    status: ProjectStatus,
    in_progress: bool,
    progress_percent: Option<f64>,
}

impl<'a> ProjectView<'a> {
    fn new(project: &'a Project, now_ms: f64) -> Self {
        let in_progress = project.is_in_progress();
        Self {
            project,
            status: project.status(),
            in_progress,
            progress_percent: in_progress
                .then(|| project.progress_percent(now_ms))
                .flatten(),
        }
    }
}

fn project_views(projects: &ProjectSet, now_ms: f64) -> Vec<ProjectView<'_>> {
    projects
        .iter()
        .map(|p| ProjectView::new(p, now_ms))
        .collect()
}

/// A snapshot `watch` can draw.
trait WatchFrame: Tracked + Send + Sync + 'static {
    /// Whether the frame shows clock-dependent values that go stale.
    fn has_running(&self) -> bool;

    fn render_frame(&self, now_ms: f64, json_output: bool) -> Result<String, serde_json::Error>;
}

impl WatchFrame for ProjectSet {
    fn has_running(&self) -> bool {
        self.iter().any(Project::is_in_progress)
    }

    fn render_frame(&self, now_ms: f64, json_output: bool) -> Result<String, serde_json::Error> {
        if json_output {
            serde_json::to_string(&project_views(self, now_ms))
        } else if self.is_empty() {
            Ok("No projects found.\n".to_string())
        } else {
            Ok(TableFormatter::new(self).render(self, now_ms))
        }
    }
}

impl WatchFrame for Project {
    fn has_running(&self) -> bool {
        self.is_in_progress()
    }

    fn render_frame(&self, now_ms: f64, json_output: bool) -> Result<String, serde_json::Error> {
        if json_output {
            serde_json::to_string(&ProjectView::new(self, now_ms))
        } else {
            Ok(render_detail(self, now_ms))
        }
    }
}

/// How `watch` writes its frames.
#[derive(Debug, Clone, Copy)]
struct WatchOptions {
    interval: Duration,
    json_output: bool,
    clear_screen: bool,
}

impl WatchOptions {
    /// Only a human-readable view on a terminal gets cleared between frames.
    fn new(interval: Duration, json_output: bool, stdout_is_terminal: bool) -> Self {
        Self {
            interval,
            json_output,
            clear_screen: !json_output && stdout_is_terminal,
        }
    }
}

/// Load configuration with warning on errors.
///
/// Falls back to defaults if a config file cannot be read or parsed, but
/// notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
///
/// Values are not validated here; [`resolve_config`] does that once the
/// command-line overrides are applied.
fn load_config_with_warning() -> GreenlightConfig {
    match GreenlightConfig::load_merged_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.greenlight/config.toml and ./.greenlight/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            GreenlightConfig::default()
        }
    }
}

/// Config files and environment, then `--url` and `--interval` on top.
fn resolve_config(
    global: &ArgMatches,
    interval_ms: Option<u64>,
) -> Result<GreenlightConfig, Box<dyn std::error::Error>> {
    let mut config = load_config_with_warning();

    if let Some(url) = global.get_one::<String>("url") {
        config.api.base_url = Some(url.clone());
    }
    if let Some(interval_ms) = interval_ms {
        config.poll.interval_ms = Some(interval_ms);
    }

    if let Err(e) = config.validate() {
        eprintln!("❌ Invalid configuration: {}", e);
        error!(event = "cli.config.invalid", error = %e);
        events::log_greenlight_error(&e);
        return Err(e.into());
    }

    Ok(config)
}

fn build_source(config: &GreenlightConfig) -> Result<HttpProjectSource, Box<dyn std::error::Error>> {
    HttpProjectSource::from_config(config).map_err(|e| {
        eprintln!("❌ Could not set up the API client: {}", e);
        error!(event = "cli.api.client_failed", error = %e);
        events::log_greenlight_error(&e);
        e.into()
    })
}

fn parse_project_id(raw: &str) -> Result<ProjectId, Box<dyn std::error::Error>> {
    ProjectId::new(raw).map_err(|e| {
        eprintln!("❌ {}", e);
        error!(event = "cli.project_id_invalid", id = raw);
        events::log_greenlight_error(&e);
        e.into()
    })
}

pub fn run_command(matches: &ArgMatches) -> CommandResult {
    let command = matches.subcommand_name().unwrap_or("none");
    events::log_command_started(command);

    let runtime = tokio::runtime::Runtime::new()?;

    let result = match matches.subcommand() {
        Some(("list", sub_matches)) => runtime.block_on(handle_list_command(matches, sub_matches)),
        Some(("show", sub_matches)) => runtime.block_on(handle_show_command(matches, sub_matches)),
        Some(("watch", sub_matches)) => {
            runtime.block_on(handle_watch_command(matches, sub_matches))
        }
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    };

    events::log_command_finished(command, result.is_ok());
    result
}

async fn handle_list_command(global: &ArgMatches, matches: &ArgMatches) -> CommandResult {
    let json_output = matches.get_flag("json");

    info!(event = "cli.list_started", json_output = json_output);

    let config = resolve_config(global, None)?;
    let source = build_source(&config)?;

    match source.fetch_projects().await {
        Ok(projects) => {
            if json_output {
                let views = project_views(&projects, now_ms());
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else if projects.is_empty() {
                println!("No projects found.");
            } else {
                TableFormatter::new(&projects).print_table(&projects, now_ms());
            }

            info!(event = "cli.list_completed", count = projects.len());

            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to list projects: {}", e);

            error!(
                event = "cli.list_failed",
                error = %e
            );

            events::log_greenlight_error(&e);
            Err(e.into())
        }
    }
}

async fn handle_show_command(global: &ArgMatches, matches: &ArgMatches) -> CommandResult {
    let raw_id = matches
        .get_one::<String>("id")
        .ok_or("Project id argument is required")?;
    let json_output = matches.get_flag("json");

    info!(event = "cli.show_started", id = raw_id, json_output = json_output);

    let id = parse_project_id(raw_id)?;
    let config = resolve_config(global, None)?;
    let source = build_source(&config)?;

    match source.fetch_project(&id).await {
        Ok(project) => {
            if json_output {
                let view = ProjectView::new(&project, now_ms());
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_detail(&project, now_ms()));
            }

            info!(event = "cli.show_completed", id = %id);

            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Failed to show project '{}': {}", id, e);

            error!(
                event = "cli.show_failed",
                id = %id,
                error = %e
            );

            events::log_greenlight_error(&e);
            Err(e.into())
        }
    }
}

async fn handle_watch_command(global: &ArgMatches, matches: &ArgMatches) -> CommandResult {
    let raw_id = matches.get_one::<String>("id");
    let json_output = matches.get_flag("json");

    let config = resolve_config(global, matches.get_one::<u64>("interval").copied())?;
    let poll = config.poll_config();
    let options = WatchOptions::new(poll.interval, json_output, io::stdout().is_terminal());

    info!(
        event = "cli.watch_started",
        id = ?raw_id,
        json_output = json_output,
        interval_ms = poll.interval.as_millis() as u64
    );

    let source = Arc::new(build_source(&config)?);

    let result = match raw_id {
        Some(raw) => {
            let id = parse_project_id(raw)?;
            let poller = Poller::start_detail(source, id, poll, None)?;
            watch_until_interrupted(poller, options).await
        }
        None => {
            let poller = Poller::start_list(source, poll, None)?;
            watch_until_interrupted(poller, options).await
        }
    };

    if let Err(e) = &result {
        eprintln!("❌ Watch stopped: {}", e);
        error!(event = "cli.watch_failed", error = %e);
    }
    result
}

/// Draw frames to stdout until Ctrl+C, then stop the poller.
async fn watch_until_interrupted<T: WatchFrame>(
    poller: Poller<T>,
    options: WatchOptions,
) -> CommandResult {
    let mut stdout = io::stdout();
    let frames = write_frames(
        &poller,
        options,
        now_ms,
        &mut stdout,
        tokio::signal::ctrl_c(),
    )
    .await?;

    let label = poller.label().to_string();
    let stats = poller.stop().await?;

    info!(
        event = "cli.watch_completed",
        label = %label,
        frames = frames,
        fetches = stats.fetches,
        replacements = stats.replacements,
        failures = stats.failures,
        skipped = stats.skipped
    );

    Ok(())
}

/// Write a frame on every snapshot replacement until `interrupt` resolves or
/// the poller ends. Returns the number of frames written.
///
/// While a project is running the current snapshot is also redrawn once per
/// interval so elapsed time and progress keep moving. Those redraws only read
/// the snapshot. JSON mode and pipes get one frame per line.
async fn write_frames<T, C, W, I>(
    poller: &Poller<T>,
    options: WatchOptions,
    clock: C,
    out: &mut W,
    interrupt: I,
) -> Result<u64, Box<dyn std::error::Error>>
where
    T: WatchFrame,
    C: Fn() -> f64,
    W: Write,
    I: Future,
{
    let mut snapshots = poller.subscribe();
    let mut interrupt = std::pin::pin!(interrupt);
    let mut redraw = tokio::time::interval(options.interval);
    redraw.set_missed_tick_behavior(MissedTickBehavior::Delay);
    redraw.reset();

    let mut current = snapshots.borrow_and_update().clone();
    let mut frames: u64 = 0;

    loop {
        if let Some(snapshot) = current.as_deref() {
            let frame = snapshot.render_frame(clock(), options.json_output)?;
            frames += 1;

            if options.clear_screen {
                write!(out, "\x1B[2J\x1B[1;1H")?;
                write!(out, "{}", frame)?;
                writeln!(
                    out,
                    "\nPolling every {}ms. Press Ctrl+C to exit.",
                    options.interval.as_millis()
                )?;
            } else {
                writeln!(out, "{}", frame.trim_end())?;
            }
            out.flush()?;
        }

        let running = current.as_deref().is_some_and(WatchFrame::has_running);

        tokio::select! {
            _ = &mut interrupt => {
                info!(event = "cli.watch_interrupted", label = poller.label());
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    warn!(event = "cli.watch_poller_ended", label = poller.label());
                    break;
                }
                current = snapshots.borrow_and_update().clone();
            }
            _ = redraw.tick(), if running => {}
        }
    }

    Ok(frames)
}

fn render_detail(project: &Project, now_ms: f64) -> String {
    let status = project.status();
    let mut out = String::new();

    out.push_str(&format!(
        "{} {} ({})\n",
        status.icon(),
        project.display_name(),
        project.project_id
    ));
    out.push_str(&format!("  Status:      {}\n", status.label()));
    out.push_str(&format!(
        "  Up to date:  {}\n",
        if project.up_to_date { "yes" } else { "no" }
    ));
    out.push_str(&format!(
        "  Return code: {}\n",
        project
            .returncode
            .map_or_else(|| "-".to_string(), |code| code.to_string())
    ));
    out.push_str(&format!("  Last run:    {}\n", format_timestamp(project.mtime)));

    if let Some(args) = &project.args
        && !args.is_empty()
    {
        out.push_str(&format!("  Command:     {}\n", args.join(" ")));
    }

    if let Some(avg) = project.avg_runtime.filter(|avg| *avg > 0.0) {
        out.push_str(&format!("  Avg runtime: {}\n", format_duration_ms(avg)));
    }

    if project.is_in_progress() {
        let elapsed = project
            .elapsed_ms(now_ms)
            .map_or_else(|| "-".to_string(), format_duration_ms);
        out.push_str(&format!(
            "  Running:     {} elapsed, {}\n",
            elapsed,
            format_progress(project.progress_percent(now_ms))
        ));
    }

    for (title, captured) in [("stdout", &project.out), ("stderr", &project.err)] {
        if let Some(text) = captured
            && !text.is_empty()
        {
            out.push_str(&format!("\n--- {} ---\n{}\n", title, text.trim_end()));
        }
    }

    out
}
