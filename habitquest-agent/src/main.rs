use std::io::{self, BufRead, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};

use habitquest_core::commands::{Commands, HabitEdit, SortKey, ensure_initialized_once};
use habitquest_core::model::Habit;
use habitquest_core::services::ranks;
use habitquest_core::services::tips::{StaticTips, TipSource};

#[derive(Parser, Debug)]
#[command(name = "habitquest", about = "HabitQuest habit progression CLI")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create the .habitquest root tree (idempotent)
    Init,
    /// Add a habit
    Add {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "Health")]
        category: String,
        #[arg(long, default_value = "")]
        icon: String,
        /// Optional streak goal in days
        #[arg(long)]
        target: Option<u32>,
    },
    /// Check in a habit for today (by id or exact name)
    Done { habit: String },
    /// List habits
    List {
        #[arg(long)]
        category: Option<String>,
        /// name | streak | xp
        #[arg(long, default_value = "name")]
        sort: String,
        #[arg(long)]
        json: bool,
    },
    /// User level/XP plus per-category target progress
    Stats,
    /// Trailing 7-day XP report
    Report,
    /// Pause or resume a habit
    Pause { habit: String },
    /// Rename/retag a habit
    Edit {
        habit: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete a habit
    Rm { habit: String },
    /// Add a category
    CatAdd {
        name: String,
        #[arg(long, default_value = "⭐")]
        icon: String,
    },
    /// Remove a category
    CatRm { name: String },
    /// Print a motivational line for a habit
    Tip { habit: String },
    /// Interactive session (the undo window only makes sense inside one)
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Cmd::Init => {
            let report = ensure_initialized_once()?;
            println!("HabitQuest root: {}", report.root.display());
            for c in &report.created {
                println!("  created {c}");
            }
            if report.created.is_empty() {
                println!("  already initialized");
            }
            Ok(())
        }
        Cmd::Shell => {
            let mut cmds = Commands::open()?;
            shell(&mut cmds)
        }
        command => {
            let mut cmds = Commands::open()?;
            run(&mut cmds, command)
        }
    }
}

fn run(cmds: &mut Commands, command: Cmd) -> Result<()> {
    match command {
        Cmd::Init | Cmd::Shell => unreachable!("handled in main/shell"),
        Cmd::Add {
            name,
            description,
            category,
            icon,
            target,
        } => {
            match cmds.add_habit(&name, &description, &category, &icon, target)? {
                Some(id) => println!("Added habit {id}"),
                None => println!("Habit name must not be empty."),
            }
            Ok(())
        }
        Cmd::Done { habit } => {
            let Some(id) = resolve(cmds, &habit) else {
                println!("No habit matches '{habit}'.");
                return Ok(());
            };
            let report = cmds.complete_habit(&id)?;
            match report.outcome {
                Some(outcome) => {
                    println!(
                        "Check-in applied: streak {}, +{} XP (base {} + streak {} + combo {})",
                        outcome.new_streak,
                        outcome.total_gained,
                        outcome.base_xp,
                        outcome.streak_bonus,
                        outcome.combo_bonus
                    );
                    if outcome.combo_active {
                        println!("COMBO x{}!", outcome.combo_count);
                    }
                    if outcome.leveled_up {
                        println!("LEVEL UP! You reached level {}.", cmds.user().level);
                    }
                }
                None => println!(
                    "Not applied ({}).",
                    report.declined.as_deref().unwrap_or("declined")
                ),
            }
            Ok(())
        }
        Cmd::List {
            category,
            sort,
            json,
        } => {
            let sort = match sort.as_str() {
                "streak" => SortKey::Streak,
                "xp" => SortKey::Xp,
                _ => SortKey::Name,
            };
            let habits = cmds.list(category.as_deref(), sort);
            if json {
                println!("{}", serde_json::to_string_pretty(&habits)?);
                return Ok(());
            }
            for h in habits {
                print_habit(h);
            }
            Ok(())
        }
        Cmd::Stats => {
            let user = cmds.user();
            let per_level = cmds.xp_per_level();
            println!(
                "{} — level {} ({} / {} XP, {} total)",
                if user.username.is_empty() {
                    "Adventurer"
                } else {
                    &user.username
                },
                user.level,
                user.xp,
                per_level,
                user.total_xp
            );
            for cp in cmds.category_progress() {
                if cp.with_target > 0 {
                    println!(
                        "  {} {}: {}/{} targets reached ({:.0}%)",
                        cp.icon,
                        cp.name,
                        cp.reached,
                        cp.with_target,
                        cp.progress * 100.0
                    );
                }
            }
            Ok(())
        }
        Cmd::Report => {
            println!("Daily XP, 7 days to {}", chrono::Utc::now().date_naive());
            for day in cmds.daily_report(7) {
                println!(
                    "{}  {:>5} XP{}",
                    day.date,
                    day.xp,
                    if day.all_completed { "  (all done)" } else { "" }
                );
            }
            Ok(())
        }
        Cmd::Pause { habit } => {
            let Some(id) = resolve(cmds, &habit) else {
                println!("No habit matches '{habit}'.");
                return Ok(());
            };
            match cmds.toggle_pause(&id)? {
                Some(true) => println!("Paused."),
                Some(false) => println!("Resumed."),
                None => println!("No habit matches '{habit}'."),
            }
            Ok(())
        }
        Cmd::Edit {
            habit,
            name,
            description,
            category,
            icon,
        } => {
            let Some(id) = resolve(cmds, &habit) else {
                println!("No habit matches '{habit}'.");
                return Ok(());
            };
            let Some(current) = cmds.habits().iter().find(|h| h.id == id).cloned() else {
                return Ok(());
            };
            let edit = HabitEdit {
                name: name.unwrap_or(current.name),
                description: description.unwrap_or(current.description),
                category: category.unwrap_or(current.category),
                icon: icon.unwrap_or(current.icon),
            };
            if cmds.edit_habit(&id, edit)? {
                println!("Updated.");
            } else {
                println!("Nothing changed (name must not be empty).");
            }
            Ok(())
        }
        Cmd::Rm { habit } => {
            let Some(id) = resolve(cmds, &habit) else {
                println!("No habit matches '{habit}'.");
                return Ok(());
            };
            if cmds.delete_habit(&id)? {
                println!("Deleted.");
            }
            Ok(())
        }
        Cmd::CatAdd { name, icon } => {
            if cmds.add_category(&name, &icon)? {
                println!("Category added.");
            } else {
                println!("Category name must not be empty.");
            }
            Ok(())
        }
        Cmd::CatRm { name } => {
            if cmds.delete_category(&name)? {
                println!("Category removed.");
            } else {
                println!("No category named '{name}'.");
            }
            Ok(())
        }
        Cmd::Tip { habit } => {
            let Some(id) = resolve(cmds, &habit) else {
                println!("No habit matches '{habit}'.");
                return Ok(());
            };
            if let Some(h) = cmds.habits().iter().find(|x| x.id == id) {
                let line = StaticTips
                    .tip(&h.name, h.streak)
                    .unwrap_or_else(|_| habitquest_core::services::tips::FALLBACK_TIP.to_string());
                println!("\"{line}\"");
            }
            Ok(())
        }
    }
}

/// Match a habit by exact id, then by exact name.
fn resolve(cmds: &Commands, key: &str) -> Option<String> {
    let habits = cmds.habits();
    habits
        .iter()
        .find(|h| h.id == key)
        .or_else(|| habits.iter().find(|h| h.name == key))
        .map(|h| h.id.clone())
}

fn print_habit(h: &Habit) {
    let rank = ranks::rank_of(h.streak);
    let next = ranks::next_milestone(h.streak)
        .map(|m| format!(", next rank {} in {} days", m.name, m.days - h.streak))
        .unwrap_or_default();
    println!(
        "{} {}  [{}]  streak {} ({}{}), {} XP{}{}",
        h.icon,
        h.name,
        h.category,
        h.streak,
        rank.name,
        next,
        h.xp,
        if h.target_reached() { "  ★ target reached" } else { "" },
        if h.is_paused { "  (paused)" } else { "" },
    );
}

/// Minimal interactive loop so the combo window and the 10 s undo window
/// can actually be exercised from a terminal.
fn shell(cmds: &mut Commands) -> Result<()> {
    println!("habitquest shell — done <habit> | undo | list | stats | tip <habit> | quit");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        match verb {
            "" => {}
            "quit" | "exit" => return Ok(()),
            "done" => run(cmds, Cmd::Done { habit: rest.to_string() })?,
            "undo" => {
                if cmds.undo_last()? {
                    println!("Reverted the last check-in.");
                } else {
                    println!("Nothing to undo (window may have expired).");
                }
            }
            "list" => run(
                cmds,
                Cmd::List {
                    category: None,
                    sort: "name".to_string(),
                    json: false,
                },
            )?,
            "stats" => run(cmds, Cmd::Stats)?,
            "tip" => run(cmds, Cmd::Tip { habit: rest.to_string() })?,
            other => println!("Unknown command '{other}'."),
        }
    }
}
