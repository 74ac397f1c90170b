//! Eligibility queries (eligible, blocked)
//!
//! Both commands answer from the saved profile unless `--course` is given,
//! in which case the course is built from the source and the completed set
//! comes from `--completed` flags.

use std::collections::HashSet;

use anyhow::Result;

use super::app::Settings;
use super::course::{build, print_units};
use super::output::Output;
use crate::domain::{Course, EligibilityResolver, Unit};

/// Course and completed set a query runs against
fn load_state(
    settings: &Settings,
    output: &Output,
    course: Option<u32>,
    completed: &[String],
) -> Result<(Course, HashSet<String>)> {
    match course {
        Some(id) => {
            let outcome = build(settings, output, id)?;
            Ok((outcome.course, completed.iter().cloned().collect()))
        }
        None => {
            let profile = settings.profile_store().load()?;
            output.verbose_ctx(
                "query",
                &format!("Loaded profile of {} ({} completed)", profile.student, profile.completed.len()),
            );
            let completed = profile.completed_set();
            Ok((profile.course, completed))
        }
    }
}

/// Show optional units the student can take now
pub fn eligible(settings: &Settings, output: &Output, course: Option<u32>, completed: &[String]) -> Result<()> {
    let (course, completed) = load_state(settings, output, course, completed)?;
    let units = EligibilityResolver::new(&course).eligible(&completed);
    output.verbose_ctx("eligible", &format!("Found {} eligible units", units.len()));

    print_query(output, &course, &units, "eligible", "No optional units available right now.", "Eligible optional units")
}

/// Show optional units still waiting on their prerequisite
pub fn blocked(settings: &Settings, output: &Output, course: Option<u32>, completed: &[String]) -> Result<()> {
    let (course, completed) = load_state(settings, output, course, completed)?;
    let units = EligibilityResolver::new(&course).blocked(&completed);
    output.verbose_ctx("blocked", &format!("Found {} blocked units", units.len()));

    print_query(output, &course, &units, "blocked", "No blocked optional units.", "Blocked optional units")
}

fn print_query(
    output: &Output,
    course: &Course,
    units: &[&Unit],
    key: &str,
    empty: &str,
    title: &str,
) -> Result<()> {
    if output.is_json() {
        let names: Vec<&str> = units.iter().map(|u| u.name()).collect();
        output.data(&serde_json::json!({
            "course": course.id(),
            key: names,
        }));
    } else if units.is_empty() {
        println!("{}", empty);
    } else {
        println!("{} in {} ({}):", title, course, units.len());
        print_units(units);
    }

    Ok(())
}
