//! Course CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::app::Settings;
use super::output::Output;
use crate::domain::{Course, Unit};
use crate::ingest::{load_course, BuildOutcome, BuildReport};

#[derive(Subcommand)]
pub enum CourseCommands {
    /// Show every unit of a course's curriculum matrix
    Show {
        /// Course id on the records site
        id: u32,

        /// List units in study order (prerequisites first)
        #[arg(long)]
        order: bool,
    },

    /// List the optional units of a course
    Optional {
        /// Course id on the records site
        id: u32,
    },
}

pub fn run(cmd: CourseCommands, settings: &Settings, output: &Output) -> Result<()> {
    match cmd {
        CourseCommands::Show { id, order } => show_course(settings, output, id, order),
        CourseCommands::Optional { id } => list_optional(settings, output, id),
    }
}

/// Builds a course from the configured source
pub(crate) fn build(settings: &Settings, output: &Output, id: u32) -> Result<BuildOutcome> {
    output.verbose_ctx(
        "course",
        &format!("Loading course {} from {}", id, settings.documents_dir.display()),
    );
    let outcome = load_course(&settings.source(), id, &settings.builder())?;
    output.verbose_ctx(
        "course",
        &format!(
            "Built {} units ({} rows rejected, {} decoration rows, {} unresolved)",
            outcome.course.len(),
            outcome.report.rejected.len(),
            outcome.report.skipped,
            outcome.report.unresolved.len()
        ),
    );
    Ok(outcome)
}

fn show_course(settings: &Settings, output: &Output, id: u32, order: bool) -> Result<()> {
    let BuildOutcome { course, report } = build(settings, output, id)?;

    let units: Vec<&Unit> = if order {
        let study_order = course.graph().study_order()?;
        study_order.iter().filter_map(|name| course.unit(name)).collect()
    } else {
        course.units().iter().collect()
    };

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": course.id(),
            "name": course.name(),
            "total_credit_hours": course.total_credit_hours(),
            "units": units,
            "report": report,
        }));
        return Ok(());
    }

    print_header(&course);
    print_units(&units);
    print_report(&report);

    Ok(())
}

fn list_optional(settings: &Settings, output: &Output, id: u32) -> Result<()> {
    let BuildOutcome { course, report } = build(settings, output, id)?;
    let optional: Vec<&Unit> = course.optional_units().collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": course.id(),
            "name": course.name(),
            "units": optional,
        }));
        return Ok(());
    }

    if optional.is_empty() {
        println!("Course {} has no optional units.", course);
    } else {
        println!("Optional units of {} ({}):", course, optional.len());
        print_units(&optional);
    }
    print_report(&report);

    Ok(())
}

fn print_header(course: &Course) {
    println!("Course: {}", course);
    println!(
        "Units: {} ({} optional, {}h)",
        course.len(),
        course.optional_units().count(),
        course.total_credit_hours()
    );
    println!();
}

pub(crate) fn print_units(units: &[&Unit]) {
    println!("{:<5} {:<50} {:>6}  PREREQUISITE", "TYPE", "NAME", "HOURS");
    println!("{}", "-".repeat(80));
    for unit in units {
        println!(
            "{:<5} {:<50} {:>5}h  {}",
            unit.marker(),
            unit.name(),
            unit.credit_hours(),
            unit.prerequisite().unwrap_or("-")
        );
    }
}

fn print_report(report: &BuildReport) {
    if report.is_clean() {
        return;
    }

    println!();
    for rejection in &report.rejected {
        println!("Skipped row {}: {}", rejection.row + 1, rejection.reason);
    }
    for unresolved in &report.unresolved {
        println!(
            "Unlinked prerequisite of '{}': '{}' ({})",
            unresolved.unit, unresolved.reference, unresolved.reason
        );
    }
}
