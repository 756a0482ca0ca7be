//! Classroom Demo
//!
//! Runs one class period against an in-memory store: imports a roster, calls
//! on students, draws cards from both pools and prints the standings.
//!
//! Set `STARBOARD_SEED` for a reproducible run and `RUST_LOG=debug` to see
//! every draw.

use starboard_core::{Outcome, PoolType, RosterRow, Student, StudentId};
use starboard_service::{DrawOutcome, Service, ServiceConfig};
use tracing_subscriber::EnvFilter;

fn main() -> starboard_service::Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    println!("=== Starboard Classroom Demo ===\n");

    let config = ServiceConfig::from_env()?;
    let service = Service::open(&config)?;
    let startup = service.startup();
    if let Some(catalog) = startup.catalog {
        println!(
            "Catalog ready: {} cards added, {} patched\n",
            catalog.inserted, catalog.patched
        );
    }

    let teacher = service.register_tenant("ms-lee")?;
    let rows = [
        RosterRow::new("Name", Some("Dorm")),
        RosterRow::new("Alice", Some("101")),
        RosterRow::new("Bob", Some("101")),
        RosterRow::new("Cara", Some("102")),
        RosterRow::new("Dan", Some("102")),
        RosterRow::new("Eve", None),
        RosterRow::new("nan", Some("103")),
    ];
    let imported = service.import_roster(teacher.id, &rows)?;
    println!("Imported {} students for {}\n", imported, teacher.username);

    // Call on each student once; correct answers earn two stars
    println!("Roll call:");
    for round in 0..imported {
        let student = service.pick_student(teacher.id)?;
        let delta = if round % 2 == 0 { 2 } else { 1 };
        let student = service.record_answer(teacher.id, student.id, delta)?;
        println!("  {} answers (+{}) -> {} stars", student.name, delta, student.stars);
    }

    println!("\nCard draws:");
    for (turn, pool) in [PoolType::Normal, PoolType::Negative, PoolType::Normal]
        .into_iter()
        .enumerate()
    {
        let student = service.pick_student(teacher.id)?;
        let outcome = service.draw_item(teacher.id, student.id, pool)?;
        let roster = service.students(teacher.id)?;
        println!("  Turn {}: {}", turn + 1, describe(&student, &outcome, &roster));
        let ticked = service.advance_turn(teacher.id)?;
        if ticked > 0 {
            println!("          {} immunity counters ticked down", ticked);
        }
    }

    let stats = service.roster_stats(teacher.id)?;
    let roster = service.students(teacher.id)?;
    println!(
        "\nProgress: {:.0}% picked ({} of {})",
        stats.progress, stats.picked, stats.total
    );
    println!("Leaderboard:");
    for (rank, id) in stats.by_stars.iter().enumerate() {
        if let Some(student) = roster.iter().find(|s| s.id == *id) {
            println!(
                "  {}. {:<6} {:>3} stars{}",
                rank + 1,
                student.name,
                student.stars,
                if student.is_cursed { " (cursed)" } else { "" }
            );
        }
    }

    println!("\n=== Class Dismissed ===");
    Ok(())
}

/// Directives from `RUST_LOG`, or `info` when unset or unparsable
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn describe(student: &Student, outcome: &DrawOutcome, roster: &[Student]) -> String {
    let name = move |id: StudentId| {
        roster
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
            .unwrap_or("?")
    };
    let detail = match &outcome.resolution.outcome {
        Outcome::None => String::new(),
        Outcome::Targets(ids) => format!(
            " affecting {}",
            ids.iter().map(|id| name(*id)).collect::<Vec<_>>().join(", ")
        ),
        Outcome::Drain { target, drained } => format!(
            " on {} ({})",
            name(*target),
            if *drained { "drained" } else { "backfired" }
        ),
        Outcome::Fortune { won } => {
            format!(" ({})", if *won { "fortune smiles" } else { "fortune frowns" })
        }
        Outcome::Duel { opponent, won } => format!(
            " against {} ({})",
            name(*opponent),
            if *won { "won" } else { "lost" }
        ),
        Outcome::Chain(hops) => format!(
            " bouncing {}",
            hops.iter()
                .map(|hop| format!("{}{}", name(hop.student), if hop.hit { "!" } else { "" }))
                .collect::<Vec<_>>()
                .join(" -> ")
        ),
        Outcome::Featured(id) => format!(" calling up {}", name(*id)),
    };
    format!("{} drew {}{}", student.name, outcome.card.name, detail)
}
