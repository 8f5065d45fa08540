//! Command argument wrappers and command handlers.
//!
//! Argument structs carry the clap derives and convert into the core
//! parameter types (`CreateStep`, `StepSpan`, `ConfigUpdate`). Step
//! references are resolved against the loaded chart, so conversions that
//! need one take the chart as an argument:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → GanttChart → ChartStore
//! ```
//!
//! Every mutating command runs the same cycle: load the chart, attach the
//! step-added observer and an event recorder, apply the operation, save,
//! then render what changed together with the new visible rows.

use std::{cell::RefCell, rc::Rc};

use anyhow::{Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use gantt_core::{
    display::{CreateResult, DeleteResult, UpdateResult},
    BackgroundColor, ChangeReport, ChartEvent, ChartStore, ConfigUpdate, CreateStep, GanttChart,
    GanttError, RemovalPolicy, StepId, StepSpan, TreeOutline, VisibleRows,
};
use jiff::{civil, tz::TimeZone, SignedDuration, Timestamp};
use log::info;
use rand::Rng;

use crate::{demo, renderer::TerminalRenderer};

// ============================================================================
// Value parsers
// ============================================================================

/// Parses a point in time.
///
/// Accepts an RFC 3339 timestamp (`2024-03-01T09:00:00Z`), or a civil date
/// time (`2024-03-01T09:00`) or date (`2024-03-01`) in the system time zone.
pub fn parse_when(value: &str) -> std::result::Result<Timestamp, String> {
    if let Ok(timestamp) = value.parse::<Timestamp>() {
        return Ok(timestamp);
    }
    let datetime = value
        .parse::<civil::DateTime>()
        .or_else(|_| {
            value
                .parse::<civil::Date>()
                .map(|date| date.to_datetime(civil::Time::midnight()))
        })
        .map_err(|_| format!("'{value}' is not a timestamp, date time or date"))?;
    datetime
        .to_zoned(TimeZone::system())
        .map(|zoned| zoned.timestamp())
        .map_err(|e| e.to_string())
}

fn parse_color(value: &str) -> std::result::Result<BackgroundColor, String> {
    value.parse().map_err(|e: GanttError| e.to_string())
}

/// Resolves a step reference: `@N` names visible row `N`, anything else is
/// an identifier or a unique identifier prefix.
pub fn resolve_reference(chart: &GanttChart, reference: &str) -> gantt_core::Result<StepId> {
    match reference.trim().strip_prefix('@') {
        Some(row) => {
            let index: usize = row.parse().map_err(|_| {
                GanttError::invalid_input("step")
                    .with_reason(format!("'{reference}' is not a row reference"))
            })?;
            chart
                .step_at(index)
                .map(|step| step.uid().clone())
                .ok_or(GanttError::IndexOutOfRange {
                    index,
                    len: chart.visible_len(),
                })
        }
        None => chart.resolve_step(reference),
    }
}

/// `start` moved by `days`.
pub fn days_after(start: Timestamp, days: i64) -> gantt_core::Result<Timestamp> {
    offset(start, SignedDuration::from_hours(days * 24))
}

fn offset(start: Timestamp, duration: SignedDuration) -> gantt_core::Result<Timestamp> {
    start
        .checked_add(duration)
        .map_err(|e| GanttError::invalid_input("date").with_reason(e.to_string()))
}

fn random_color() -> BackgroundColor {
    BackgroundColor::from_rgb(rand::rng().random_range(0..=0x00ff_ffff))
}

// ============================================================================
// Chart commands
// ============================================================================

/// A single step reference
#[derive(Args)]
pub struct StepRefArgs {
    /// Step ID, unique ID prefix, or @N for visible row N
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
}

/// Load the demo dataset
///
/// Two root steps with three children each and three grandchildren per
/// child. The second root follows the first one.
#[derive(Args)]
pub struct DemoArgs {
    /// Append to the current chart instead of replacing it
    #[arg(long, help = "Append the demo steps instead of replacing the chart")]
    pub keep: bool,
}

// ============================================================================
// Config commands
// ============================================================================

/// Removal policy as accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RemovalPolicyArg {
    /// Remove only the step itself
    Node,
    /// Remove the step and all of its descendants
    Subtree,
}

impl From<RemovalPolicyArg> for RemovalPolicy {
    fn from(val: RemovalPolicyArg) -> Self {
        match val {
            RemovalPolicyArg::Node => RemovalPolicy::DetachNode,
            RemovalPolicyArg::Subtree => RemovalPolicy::DetachSubtree,
        }
    }
}

/// Change chart settings
///
/// Settings that are not given keep their current value.
#[derive(Args)]
pub struct ConfigSetArgs {
    /// What removing a step does with its descendants
    #[arg(long, value_enum)]
    pub removal_policy: Option<RemovalPolicyArg>,
    /// Allow moving steps along the timeline
    #[arg(long)]
    pub movable_steps: Option<bool>,
    /// Allow resizing step bars
    #[arg(long)]
    pub resizable_steps: Option<bool>,
    /// Allow moving steps to another visible row
    #[arg(long)]
    pub movable_steps_between_rows: Option<bool>,
}

impl From<ConfigSetArgs> for ConfigUpdate {
    fn from(val: ConfigSetArgs) -> Self {
        ConfigUpdate {
            removal_policy: val.removal_policy.map(Into::into),
            movable_steps: val.movable_steps,
            resizable_steps: val.resizable_steps,
            movable_steps_between_rows: val.movable_steps_between_rows,
        }
    }
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current settings
    #[command(alias = "s")]
    Show,
    /// Change one or more settings
    Set(ConfigSetArgs),
}

// ============================================================================
// Step commands
// ============================================================================

/// Add a new step
///
/// Without `--parent` the step becomes the last root row, or the row at
/// `--index`. With `--parent` it becomes the last child of that step and is
/// only visible once the parent is expanded. New steps without `--color`
/// get a random bar color.
#[derive(Args)]
pub struct AddStepArgs {
    /// Caption of the step. Defaults to "New Step N"
    pub caption: Option<String>,
    /// Start of the step. Defaults to the start of the chart, or now
    #[arg(long, value_parser = parse_when)]
    pub start: Option<Timestamp>,
    /// End of the step. Defaults to 7 days after an explicit start, 1 day
    /// otherwise
    #[arg(long, value_parser = parse_when)]
    pub end: Option<Timestamp>,
    /// CSS color of the step bar
    #[arg(long, value_parser = parse_color)]
    pub color: Option<BackgroundColor>,
    /// Parent step reference
    #[arg(short, long, conflicts_with = "index")]
    pub parent: Option<String>,
    /// Visible row to insert the new root step at (0-indexed)
    #[arg(short, long)]
    pub index: Option<usize>,
    /// Predecessor step reference
    #[arg(short, long)]
    pub after: Option<String>,
}

impl AddStepArgs {
    /// Converts into core parameters, resolving step references and date
    /// defaults against `chart`.
    pub fn into_params(self, chart: &GanttChart) -> gantt_core::Result<CreateStep> {
        let (start, end) = match (self.start, self.end) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, days_after(start, 7)?),
            (None, end) => {
                let start = chart
                    .time_span()
                    .map_or_else(Timestamp::now, |(start, _)| start);
                (start, end.map_or_else(|| days_after(start, 1), Ok)?)
            }
        };
        let caption = self
            .caption
            .unwrap_or_else(|| format!("New Step {}", chart.len() + 1));

        let mut params = CreateStep::new(caption, start, end);
        params.background_color = Some(self.color.unwrap_or_else(random_color));
        params.parent = self
            .parent
            .as_deref()
            .map(|reference| resolve_reference(chart, reference))
            .transpose()?;
        params.index = self.index;
        params.predecessor = self
            .after
            .as_deref()
            .map(|reference| resolve_reference(chart, reference))
            .transpose()?;
        Ok(params)
    }
}

/// Move a visible step to another row
#[derive(Args)]
pub struct MoveStepArgs {
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
    /// Target row (0-indexed)
    #[arg(help = "Target visible row (0-indexed); must be an existing row")]
    pub index: usize,
}

/// Change the start and/or end of a step bar
#[derive(Args)]
pub struct ResizeStepArgs {
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
    /// New start
    #[arg(long, value_parser = parse_when)]
    pub start: Option<Timestamp>,
    /// New end
    #[arg(long, value_parser = parse_when)]
    pub end: Option<Timestamp>,
}

impl ResizeStepArgs {
    pub fn into_span(self, uid: StepId) -> StepSpan {
        StepSpan {
            uid,
            start: self.start,
            end: self.end,
        }
    }
}

/// Move a step along the timeline, keeping its duration
#[derive(Args)]
pub struct RescheduleStepArgs {
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
    /// New start
    #[arg(value_parser = parse_when)]
    pub start: Timestamp,
}

/// Make a step the last child of another step
#[derive(Args)]
pub struct ReparentStepArgs {
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
    /// New parent step reference
    pub parent: String,
}

/// Set or clear the predecessor of a step
#[derive(Args)]
pub struct PredecessorArgs {
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
    /// Predecessor step reference; omit to clear
    pub predecessor: Option<String>,
}

/// Change the caption or color of a step
#[derive(Args)]
pub struct UpdateStepArgs {
    #[arg(help = "Step ID, unique ID prefix, or @N for visible row N (0-indexed)")]
    pub step: String,
    /// New caption
    #[arg(long)]
    pub caption: Option<String>,
    /// New CSS color of the step bar
    #[arg(long, value_parser = parse_color, conflicts_with = "clear_color")]
    pub color: Option<BackgroundColor>,
    /// Remove the bar color
    #[arg(long)]
    pub clear_color: bool,
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Add a new step
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// Remove a step according to the removal policy
    #[command(aliases = ["rm", "d"])]
    Remove(StepRefArgs),
    /// Move a visible step to another row
    #[command(alias = "mv")]
    Move(MoveStepArgs),
    /// Change the start and/or end of a step
    Resize(ResizeStepArgs),
    /// Move a step along the timeline
    Reschedule(RescheduleStepArgs),
    /// Make a step the child of another step
    Reparent(ReparentStepArgs),
    /// Turn a child step into a root step
    Detach(StepRefArgs),
    /// Set or clear the predecessor of a step
    #[command(alias = "pred")]
    Predecessor(PredecessorArgs),
    /// Change the caption or color of a step
    #[command(alias = "u")]
    Update(UpdateStepArgs),
    /// Show details of a step
    #[command(alias = "s")]
    Show(StepRefArgs),
}

// ============================================================================
// Handlers
// ============================================================================

/// Runs commands against a chart store and renders the results.
pub struct Cli {
    store: ChartStore,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(store: ChartStore, renderer: TerminalRenderer) -> Self {
        Self { store, renderer }
    }

    async fn load(&self) -> Result<GanttChart> {
        self.store.load_chart().await.context("Failed to load chart")
    }

    /// Loads the chart, applies `operation`, saves and renders the outcome.
    ///
    /// The text returned by `operation` is shown above the change summary.
    async fn apply<F>(&self, operation: F) -> Result<()>
    where
        F: FnOnce(&mut GanttChart) -> gantt_core::Result<String>,
    {
        let mut chart = self.load().await?;
        let events = Rc::new(RefCell::new(Vec::new()));
        attach_observers(&mut chart, &events);

        let summary = operation(&mut chart)?;
        self.store
            .save_chart(&chart)
            .await
            .context("Failed to save chart")?;

        let events = events.borrow();
        let mut output = summary;
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(&format!(
            "## Changes\n\n{}\n## Visible rows\n\n{}",
            ChangeReport::new(&chart, &events),
            VisibleRows(&chart)
        ));
        self.renderer.render(&output)
    }

    pub async fn show(&self) -> Result<()> {
        let chart = self.load().await?;
        self.renderer.render(&VisibleRows(&chart).to_string())
    }

    pub async fn tree(&self) -> Result<()> {
        let chart = self.load().await?;
        self.renderer.render(&TreeOutline(&chart).to_string())
    }

    pub async fn export(&self) -> Result<()> {
        let chart = self.load().await?;
        let json = chart.to_json().context("Failed to serialize chart")?;
        println!("{json}");
        Ok(())
    }

    pub async fn demo(&self, args: DemoArgs) -> Result<()> {
        if !args.keep {
            self.store.reset().await.context("Failed to reset chart")?;
        }
        self.apply(|chart| {
            let added = demo::populate(chart, Timestamp::now())?;
            Ok(format!("Loaded demo dataset with {added} steps.\n"))
        })
        .await
    }

    pub async fn expand(&self, args: StepRefArgs) -> Result<()> {
        self.apply(|chart| {
            let uid = resolve_reference(chart, &args.step)?;
            chart.expand(&uid)?;
            Ok(String::new())
        })
        .await
    }

    pub async fn collapse(&self, args: StepRefArgs) -> Result<()> {
        self.apply(|chart| {
            let uid = resolve_reference(chart, &args.step)?;
            chart.collapse(&uid)?;
            Ok(String::new())
        })
        .await
    }

    pub async fn toggle(&self, args: StepRefArgs) -> Result<()> {
        self.apply(|chart| {
            let uid = resolve_reference(chart, &args.step)?;
            chart.toggle(&uid)?;
            Ok(String::new())
        })
        .await
    }

    /// Handle config subcommands
    pub async fn handle_config_command(&self, command: ConfigCommands) -> Result<()> {
        match command {
            ConfigCommands::Show => {
                let config = self
                    .store
                    .load_config()
                    .await
                    .context("Failed to load chart settings")?;
                self.renderer.render(&config.to_string())
            }
            ConfigCommands::Set(args) => {
                let mut chart = self.load().await?;
                let mut config = *chart.config();
                let changed = config.apply(args.into());
                chart.set_config(config);
                self.store
                    .save_chart(&chart)
                    .await
                    .context("Failed to save chart settings")?;
                info!("Changed chart settings: {changed:?}");

                let summary = if changed.is_empty() {
                    "No settings changed.".to_string()
                } else {
                    format!("Changed settings: {}", changed.join(", "))
                };
                self.renderer.render(&format!("{summary}\n\n{config}"))
            }
        }
    }

    /// Handle step subcommands
    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Add(args) => {
                self.apply(|chart| {
                    let params = args.into_params(chart)?;
                    let uid = chart.create_step(params)?;
                    Ok(CreateResult::new(chart.require_step(&uid)?).to_string())
                })
                .await
            }
            StepCommands::Remove(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    let removed = chart.remove_step(&uid)?;
                    Ok(DeleteResult::new(&removed).to_string())
                })
                .await
            }
            StepCommands::Move(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    chart.move_step(args.index, &uid)?;
                    Ok(String::new())
                })
                .await
            }
            StepCommands::Resize(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    let span = args.into_span(uid);
                    let (start, end) = span.resolve(chart.require_step(&span.uid)?)?;
                    chart.resize_step(&span.uid, start, end)?;
                    let changes = vec![format!("Resized to {start} → {end}")];
                    Ok(UpdateResult::with_changes(chart.require_step(&span.uid)?, changes)
                        .to_string())
                })
                .await
            }
            StepCommands::Reschedule(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    let duration = chart.require_step(&uid)?.duration();
                    let end = offset(args.start, duration)?;
                    chart.reschedule_step(&uid, args.start, end)?;
                    let changes = vec![format!("Moved to {} → {end}", args.start)];
                    Ok(UpdateResult::with_changes(chart.require_step(&uid)?, changes).to_string())
                })
                .await
            }
            StepCommands::Reparent(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    let parent = resolve_reference(chart, &args.parent)?;
                    chart.set_parent(&uid, &parent)?;
                    Ok(String::new())
                })
                .await
            }
            StepCommands::Detach(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    chart.detach(&uid)?;
                    Ok(String::new())
                })
                .await
            }
            StepCommands::Predecessor(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    let predecessor = args
                        .predecessor
                        .as_deref()
                        .map(|reference| resolve_reference(chart, reference))
                        .transpose()?;
                    chart.set_predecessor(&uid, predecessor.as_deref())?;
                    let change = match &predecessor {
                        Some(predecessor) => format!("Predecessor set to `{}`", predecessor.short()),
                        None => "Predecessor cleared".to_string(),
                    };
                    Ok(UpdateResult::with_changes(chart.require_step(&uid)?, vec![change])
                        .to_string())
                })
                .await
            }
            StepCommands::Update(args) => {
                self.apply(|chart| {
                    let uid = resolve_reference(chart, &args.step)?;
                    let mut changes = Vec::new();
                    if let Some(caption) = args.caption {
                        changes.push(format!("Caption set to '{caption}'"));
                        chart.rename_step(&uid, caption)?;
                    }
                    if args.clear_color {
                        chart.set_background_color(&uid, None)?;
                        changes.push("Color cleared".to_string());
                    } else if let Some(color) = args.color {
                        changes.push(format!("Color set to {color}"));
                        chart.set_background_color(&uid, Some(color))?;
                    }
                    if changes.is_empty() {
                        return Err(GanttError::invalid_input("update")
                            .with_reason("nothing to change; pass --caption, --color or --clear-color"));
                    }
                    Ok(UpdateResult::with_changes(chart.require_step(&uid)?, changes).to_string())
                })
                .await
            }
            StepCommands::Show(args) => {
                let chart = self.load().await?;
                let uid = resolve_reference(&chart, &args.step)?;
                let step = chart.require_step(&uid)?;
                self.renderer.render(&step.to_string())
            }
        }
    }
}

/// Attaches the tooltip observer and records every chart event into `events`.
fn attach_observers(chart: &mut GanttChart, events: &Rc<RefCell<Vec<ChartEvent>>>) {
    chart.on_add_step(|step| {
        info!("Tooltip for {}", step.caption);
        Ok(())
    });
    let events = Rc::clone(events);
    chart.add_listener(move |event| {
        events.borrow_mut().push(event.clone());
        Ok(())
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantt_core::Step;

    fn create_test_chart() -> (GanttChart, StepId, StepId) {
        let start = Timestamp::from_second(1_704_067_200).unwrap();
        let mut chart = GanttChart::new();
        let a = chart.add_step(Step::new("Alpha", start, start)).unwrap();
        let b = chart.add_step(Step::new("Beta", start, start)).unwrap();
        (chart, a, b)
    }

    #[test]
    fn test_parse_when() {
        assert_eq!(
            parse_when("2024-01-01T00:00:00Z").unwrap(),
            Timestamp::from_second(1_704_067_200).unwrap()
        );
        assert!(parse_when("2024-01-01").is_ok());
        assert!(parse_when("2024-01-01T09:30").is_ok());
        assert!(parse_when("tomorrow").is_err());
    }

    #[test]
    fn test_resolve_row_reference() {
        let (chart, a, b) = create_test_chart();
        assert_eq!(resolve_reference(&chart, "@0").unwrap(), a);
        assert_eq!(resolve_reference(&chart, "@1").unwrap(), b);
        assert!(matches!(
            resolve_reference(&chart, "@2"),
            Err(GanttError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            resolve_reference(&chart, "@x"),
            Err(GanttError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_resolve_id_reference() {
        let (chart, a, _) = create_test_chart();
        assert_eq!(resolve_reference(&chart, a.as_str()).unwrap(), a);
        assert!(matches!(
            resolve_reference(&chart, "zzz"),
            Err(GanttError::StepNotFound { .. })
        ));
    }

    #[test]
    fn test_add_step_defaults() {
        let (chart, a, _) = create_test_chart();
        let args = AddStepArgs {
            caption: None,
            start: None,
            end: None,
            color: None,
            parent: Some("@0".to_string()),
            index: None,
            after: None,
        };

        let params = args.into_params(&chart).unwrap();

        assert_eq!(params.caption, "New Step 3");
        assert_eq!(params.parent, Some(a));
        assert_eq!(params.start, Timestamp::from_second(1_704_067_200).unwrap());
        assert_eq!(params.end, Timestamp::from_second(1_704_153_600).unwrap());
        assert!(params.background_color.is_some());
    }

    #[test]
    fn test_add_step_explicit_start_spans_a_week() {
        let chart = GanttChart::new();
        let start = Timestamp::from_second(1_704_067_200).unwrap();
        let args = AddStepArgs {
            caption: Some("Kickoff".to_string()),
            start: Some(start),
            end: None,
            color: Some("#336699".parse().unwrap()),
            parent: None,
            index: Some(0),
            after: None,
        };

        let params = args.into_params(&chart).unwrap();

        assert_eq!(params.end, days_after(start, 7).unwrap());
        assert_eq!(params.background_color.unwrap().as_str(), "#336699");
        assert_eq!(params.index, Some(0));
    }

    #[test]
    fn test_config_args_conversion() {
        let update: ConfigUpdate = ConfigSetArgs {
            removal_policy: Some(RemovalPolicyArg::Subtree),
            movable_steps: Some(false),
            resizable_steps: None,
            movable_steps_between_rows: None,
        }
        .into();

        assert_eq!(update.removal_policy, Some(RemovalPolicy::DetachSubtree));
        assert_eq!(update.movable_steps, Some(false));
        assert_eq!(update.resizable_steps, None);
    }
}
