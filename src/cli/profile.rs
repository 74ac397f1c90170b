//! Profile CLI commands

use anyhow::{bail, Result};
use clap::Subcommand;

use super::app::Settings;
use super::course::{build, print_units};
use super::output::Output;
use crate::domain::Unit;
use crate::storage::Profile;

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Create a profile for a student enrolled in a course
    New {
        /// Student name
        student: String,

        /// Course id on the records site
        course: u32,

        /// Overwrite an existing profile
        #[arg(long)]
        force: bool,
    },

    /// Show the profile and its completed units
    Show,

    /// Mark units as completed
    Complete {
        /// Unit names, as listed by `course show`
        #[arg(required = true)]
        units: Vec<String>,
    },

    /// Remove units from the completed set
    Undo {
        /// Unit names
        #[arg(required = true)]
        units: Vec<String>,
    },
}

pub fn run(cmd: ProfileCommands, settings: &Settings, output: &Output) -> Result<()> {
    match cmd {
        ProfileCommands::New { student, course, force } => {
            new_profile(settings, output, &student, course, force)
        }
        ProfileCommands::Show => show_profile(settings, output),
        ProfileCommands::Complete { units } => complete_units(settings, output, &units),
        ProfileCommands::Undo { units } => undo_units(settings, output, &units),
    }
}

fn new_profile(settings: &Settings, output: &Output, student: &str, course_id: u32, force: bool) -> Result<()> {
    let store = settings.profile_store();
    if store.exists() && !force {
        bail!(
            "Profile already exists at {}. Use --force to replace it.",
            store.path().display()
        );
    }

    let outcome = build(settings, output, course_id)?;
    let profile = Profile::new(student, outcome.course)?;
    store.save(&profile)?;

    output.success(&format!(
        "Created profile for {} in {} at {}",
        profile.student,
        profile.course,
        store.path().display()
    ));
    Ok(())
}

fn show_profile(settings: &Settings, output: &Output) -> Result<()> {
    let profile = settings.profile_store().load()?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "student": profile.student,
            "course": { "id": profile.course.id(), "name": profile.course.name() },
            "completed": profile.completed,
            "completed_hours": profile.completed_hours(),
            "updated_at": profile.updated_at,
        }));
        return Ok(());
    }

    println!("Student: {}", profile.student);
    println!("Course: {}", profile.course);
    println!(
        "Completed: {} units ({}h)",
        profile.completed.len(),
        profile.completed_hours()
    );

    let completed: Vec<&Unit> = profile
        .course
        .units()
        .iter()
        .filter(|unit| profile.completed.contains(unit.name()))
        .collect();
    if !completed.is_empty() {
        println!();
        print_units(&completed);
    }

    Ok(())
}

fn complete_units(settings: &Settings, output: &Output, units: &[String]) -> Result<()> {
    let store = settings.profile_store();
    let mut profile = store.load()?;

    for unit in units {
        profile.complete(unit)?;
        output.verbose_ctx("profile", &format!("Completed {}", unit));
    }
    store.save(&profile)?;

    output.success(&format!("Marked {} unit(s) as completed", units.len()));
    Ok(())
}

fn undo_units(settings: &Settings, output: &Output, units: &[String]) -> Result<()> {
    let store = settings.profile_store();
    let mut profile = store.load()?;

    let removed = units.iter().filter(|unit| profile.undo(unit)).count();
    store.save(&profile)?;

    output.success(&format!("Removed {} unit(s) from completed", removed));
    Ok(())
}
