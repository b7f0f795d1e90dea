use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;

use hearth::app::Hearth;
use hearth::calendar;
use hearth::config::HearthConfig;
use hearth::error::HearthError;
use hearth::intake;

#[derive(Parser)]
#[command(name = "hearth")]
#[command(about = "Household task coordinator with a shared month calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month calendar
    Month {
        /// Month to show, e.g. "2026-09" (defaults to the current month)
        month: Option<String>,

        /// Go back this many months
        #[arg(long, default_value_t = 0, conflicts_with = "next")]
        prev: u32,

        /// Go forward this many months
        #[arg(long, default_value_t = 0)]
        next: u32,
    },
    /// List tasks
    List {
        /// Only pending tasks
        #[arg(long, conflicts_with = "completed")]
        pending: bool,

        /// Only completed tasks
        #[arg(long)]
        completed: bool,
    },
    /// Show details for one task
    Show { id: String },
    /// Add a task
    Add {
        title: String,

        /// Due date/time, e.g. "2026-09-15T17:00"
        #[arg(short, long)]
        due: String,

        /// Assignee (member id or name; defaults to the first member)
        #[arg(short, long)]
        assign: Option<String>,

        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create a task from a natural-language description
    Smart {
        /// e.g. "buy milk tomorrow at 5pm"
        text: String,

        /// Assignee (member id or name; defaults to the first member)
        #[arg(short, long)]
        assign: Option<String>,
    },
    /// Toggle a task between pending and completed
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// Manage household members
    Members {
        #[command(subcommand)]
        command: MemberCommands,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// List members
    List,
    /// Add a member
    Add {
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        /// International phone number for WhatsApp notifications, e.g. 5511999998888
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Remove a member (their tasks become unassigned)
    Remove { id: String },
}

/// Logs go to the systemd user journal (`journalctl --user -t hearth -f`).
fn init_logging() {
    let Ok(journal) = systemd_journal_logger::JournalLog::new() else {
        return;
    };
    let journal = journal.with_syslog_identifier("hearth".to_string());
    if log::set_boxed_logger(Box::new(journal)).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();
    let config = HearthConfig::load();

    let mut app = match Hearth::load(&config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, &mut app, &config).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    if let Some(notice) = &app.notice {
        eprintln!("warning: {notice}");
    }
}

async fn run(
    command: Commands,
    app: &mut Hearth,
    config: &HearthConfig,
) -> Result<(), HearthError> {
    match command {
        Commands::Month { month, prev, next } => {
            if let Some(month) = month {
                app.calendar.displayed_month = parse_month(&month)?;
            }
            for _ in 0..prev {
                app.calendar.prev_month();
            }
            for _ in 0..next {
                app.calendar.next_month();
            }
            print_month(app);
        }
        Commands::List { pending, completed } => {
            for task in &app.tasks {
                if pending && task.status.is_completed() {
                    continue;
                }
                if completed && !task.status.is_completed() {
                    continue;
                }
                print_task_line(app, task);
            }
            println!(
                "\n{} pending, {} completed",
                app.pending_count(),
                app.completed_count()
            );
            if let Some(next_up) = app.next_up() {
                println!("next up: {}", next_up.title);
            }
        }
        Commands::Show { id } => {
            let Some(task) = app.task(&id).cloned() else {
                return Err(HearthError::Validation(format!("no task with id {id}")));
            };
            app.active_task = Some(task.id.clone());
            println!("{}", task.title);
            println!("  status:      {}", task.status.as_keyword());
            println!(
                "  due:         {}",
                task.due_date.with_timezone(&Local).format("%a %e %b %Y %H:%M")
            );
            println!("  assigned to: {}", app.assignee_name(&task));
            if !task.description.is_empty() {
                println!("  {}", task.description);
            }
            println!("  id:          {}", task.id);
        }
        Commands::Add {
            title,
            due,
            assign,
            description,
        } => {
            app.open_editor(None);
            app.form.title = title;
            app.form.due = due;
            app.form.description = description;
            if let Some(assign) = assign {
                app.form.assigned_to = resolve_member(app, &assign)?;
            }
            let task = app.create_task()?;
            println!("created \"{}\" (id {})", task.title, task.id);
        }
        Commands::Smart { text, assign } => {
            let Some(api_key) = config.api_key() else {
                return Err(HearthError::Validation(
                    "smart entry needs an API key: set ANTHROPIC_API_KEY or api_key in config.toml"
                        .into(),
                ));
            };
            let assigned = match assign {
                Some(assign) => Some(resolve_member(app, &assign)?),
                None => None,
            };

            app.open_editor(None);
            if !app.begin_parse() {
                return Err(HearthError::Validation("a parse is already in flight".into()));
            }
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("interpreting task description...");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let parsed = intake::parse_task(&api_key, &text, Local::now()).await;
            spinner.finish_and_clear();

            let got_result = parsed.is_some();
            app.finish_parse(parsed);
            if !got_result {
                eprintln!("could not interpret the description; use `hearth add` to enter it manually");
                std::process::exit(1);
            }

            if let Some(assigned) = assigned {
                app.form.assigned_to = assigned;
            }
            let task = app.create_task()?;
            println!(
                "created \"{}\" due {} (id {})",
                task.title,
                task.due_date.with_timezone(&Local).format("%a %e %b %H:%M"),
                task.id
            );
        }
        Commands::Toggle { id } => match app.toggle_status(&id) {
            Some(status) => println!("{} is now {}", id, status.as_keyword()),
            None => return Err(HearthError::Validation(format!("no task with id {id}"))),
        },
        Commands::Delete { id } => {
            if app.delete_task(&id) {
                println!("deleted {id}");
            } else {
                return Err(HearthError::Validation(format!("no task with id {id}")));
            }
        }
        Commands::Members { command } => match command {
            MemberCommands::List => {
                for member in &app.members {
                    let phone = if member.has_phone() {
                        member.phone.as_str()
                    } else {
                        "no phone"
                    };
                    println!("{}  {} <{}> ({})", member.id, member.name, member.email, phone);
                }
            }
            MemberCommands::Add { name, email, phone } => {
                let member = app.add_member(name, email, phone);
                println!("added {} (id {})", member.name, member.id);
            }
            MemberCommands::Remove { id } => {
                if app.remove_member(&id) {
                    println!("removed {id}");
                } else {
                    return Err(HearthError::Validation(format!("no member with id {id}")));
                }
            }
        },
    }

    Ok(())
}

fn parse_month(input: &str) -> Result<NaiveDate, HearthError> {
    NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d")
        .map_err(|_| HearthError::Validation(format!("\"{input}\" is not a month (expected YYYY-MM)")))
}

/// Accept a member id or (case-insensitive) name.
fn resolve_member(app: &Hearth, needle: &str) -> Result<String, HearthError> {
    app.members
        .iter()
        .find(|m| m.id == needle)
        .or_else(|| {
            app.members
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(needle))
        })
        .map(|m| m.id.clone())
        .ok_or_else(|| HearthError::Validation(format!("no member matching \"{needle}\"")))
}

fn print_month(app: &Hearth) {
    let grid = app.calendar.grid();
    println!("{:^28}", app.calendar.month_label());
    println!(" Sun Mon Tue Wed Thu Fri Sat");

    for week in grid.chunks(7) {
        let mut line = String::new();
        for cell in week {
            if cell.in_current_month {
                let marker = if calendar::is_today(cell.date) {
                    '*'
                } else if !calendar::day_tasks(&app.tasks, cell.date).is_empty() {
                    '.'
                } else {
                    ' '
                };
                line.push_str(&format!(" {:>2}{}", cell.date.day(), marker));
            } else {
                line.push_str("   -");
            }
        }
        println!("{line}");
    }

    let mut printed_any = false;
    for cell in grid.iter().filter(|c| c.in_current_month) {
        let bucket = calendar::day_bucket(&app.tasks, cell.date);
        if bucket.visible.is_empty() {
            continue;
        }
        printed_any = true;
        println!("\n{}", cell.date.format("%a %e %b"));
        for task in &bucket.visible {
            let mark = if task.status.is_completed() { "x" } else { " " };
            println!("  [{}] {} ({})", mark, task.title, app.assignee_name(task));
        }
        if bucket.hidden > 0 {
            println!("  + {} more", bucket.hidden);
        }
    }
    if !printed_any {
        println!("\nno tasks this month");
    }
}

fn print_task_line(app: &Hearth, task: &hearth::core::task::Task) {
    let mark = if task.status.is_completed() { "x" } else { " " };
    println!(
        "[{}] {}  {}  ({})  {}",
        mark,
        task.due_date.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        task.title,
        app.assignee_name(task),
        task.id
    );
}
