mod render;

use std::collections::HashMap;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use studydash_core::config::{data_dir, Config};
use studydash_core::service::board::TaskFilter;
use studydash_core::service::subject_service::SubjectService;
use studydash_core::service::task_service::TaskService;
use studydash_core::service::timetable_service::TimetableService;
use studydash_core::time::local_now;
use studydash_core::usecase::dashboard::DashboardUseCase;
use studydash_core::{
    expand_key, parse_args, parse_day, parse_human_date, ClassType, EngineError, FileRepository,
    Priority, ScheduleEntry, Subject, Task, TaskStatus, TaskType,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studydash")]
#[command(about = "Attendance, timetable and assignment tracker for students", long_about = None)]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage subjects and mark attendance
    Subject {
        #[command(subcommand)]
        action: SubjectCommand,
    },
    /// Attendance analytics across all subjects
    Attendance,
    /// Manage the weekly timetable
    Timetable {
        #[command(subcommand)]
        action: TimetableCommand,
    },
    /// Manage the task board
    Task {
        #[command(subcommand)]
        action: TaskCommand,
    },
    /// Today's classes, free time, attendance and upcoming deadlines
    Dashboard,
    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum SubjectCommand {
    Add {
        name: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        professor: Option<String>,
    },
    List,
    /// Change a subject's name, code or professor
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        professor: Option<String>,
    },
    /// Record one class as attended or missed
    Mark {
        id: String,
        #[arg(value_enum)]
        mark: Mark,
    },
    Rm { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mark {
    Present,
    Absent,
}

#[derive(Subcommand)]
enum TimetableCommand {
    /// Add a class (usage: timetable add <subject-id> mon 09:00 10:30 --room B12)
    Add {
        subject: String,
        day: String,
        start: String,
        end: String,
        #[arg(long)]
        room: Option<String>,
        #[arg(long = "type", default_value = "lecture")]
        kind: String,
    },
    List,
    /// Change a class; the new slot must not overlap another class that day
    Edit {
        id: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        day: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        /// Set to false to keep the class but drop it from schedules
        #[arg(long)]
        active: Option<bool>,
    },
    Today,
    Next,
    /// Free slots for a day (default: today)
    Free { day: Option<String> },
    Rm { id: String },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a task (usage: task add "Lab report" due:fri pri:h type:exam subject:<id>)
    Add {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List tasks by deadline, optionally filtered
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        subject: Option<String>,
    },
    /// Edit a task (usage: task edit <id> New title due:+1w pri:l status:done)
    Edit {
        id: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    Board,
    /// Move a task to todo, in-progress or done
    Move { id: String, status: String },
    Upcoming,
    Stats,
    Rm { id: String },
}

const TASK_KEYS: [&str; 5] = ["due", "priority", "type", "subject", "description"];
const TASK_EDIT_KEYS: [&str; 6] = ["due", "priority", "type", "subject", "description", "status"];

struct App {
    json: bool,
    config: Config,
    subjects: SubjectService<FileRepository<Subject>>,
    timetable: TimetableService<FileRepository<ScheduleEntry>>,
    tasks: TaskService<FileRepository<Task>>,
}

impl App {
    fn open(json: bool) -> Result<Self> {
        let dir = data_dir()?;
        let config = Config::load(&dir)?;
        Ok(Self {
            json,
            subjects: SubjectService::new(FileRepository::new(Some(dir.clone()))?, config.target_percentage)?,
            timetable: TimetableService::new(
                FileRepository::new(Some(dir.clone()))?,
                config.day_window()?,
                config.min_free_slot_minutes,
            ),
            tasks: TaskService::new(FileRepository::new(Some(dir))?),
            config,
        })
    }

    /// Prints `value` as JSON when `--json` is set, otherwise runs `table`.
    fn emit<T: Serialize>(&self, value: &T, table: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            table(value);
        }
        Ok(())
    }

    fn names(&self) -> Result<render::SubjectNames> {
        let subjects: Vec<Subject> = self.subjects.list_subjects()?.into_iter().map(|d| d.subject).collect();
        Ok(render::subject_names(&subjects))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<EngineError>() {
                Some(EngineError::Conflict { .. }) => eprintln!("Rejected: {}", e),
                Some(_) => eprintln!("Error: {}", e),
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let app = App::open(cli.json)?;

    match cli.command {
        Some(Commands::Subject { action }) => run_subject(&app, action),
        Some(Commands::Attendance) => {
            let summary = app.subjects.attendance_summary()?;
            app.emit(&summary, render::attendance)
        }
        Some(Commands::Timetable { action }) => run_timetable(&app, action),
        Some(Commands::Task { action }) => run_task(&app, action),
        Some(Commands::Dashboard) | None => {
            let (day, now_minutes) = local_now();
            let usecase = DashboardUseCase::new(&app.subjects, &app.timetable, &app.tasks);
            let dashboard = usecase.build(day, now_minutes, Utc::now())?;
            let names = app.names()?;
            app.emit(&dashboard, |d| {
                render::today(&d.today, &names);
                if let Some(next) = &d.next_class {
                    println!("\nNext class: {}", render::describe(next, &names));
                }
                println!("\nFree today:");
                render::free_slots(&d.free_slots);
                println!();
                render::attendance(&d.attendance);
                println!("\nDue this week:");
                render::tasks(&d.upcoming_tasks);
            })
        }
        Some(Commands::Config) => {
            let rendered = app.config.to_toml()?;
            app.emit(&app.config, |_| {
                println!("# {}", data_dir().map(|d| d.join("config.toml").display().to_string()).unwrap_or_default());
                print!("{}", rendered);
            })
        }
    }
}

fn run_subject(app: &App, action: SubjectCommand) -> Result<()> {
    match action {
        SubjectCommand::Add { name, code, professor } => {
            let mut subject = Subject::new(name);
            subject.code = code;
            subject.professor = professor;
            let dto = app.subjects.create_subject(subject)?;
            app.emit(&dto, render::subject)
        }
        SubjectCommand::List => {
            let dtos = app.subjects.list_subjects()?;
            app.emit(&dtos, |d| render::subjects(d))
        }
        SubjectCommand::Edit { id, name, code, professor } => {
            let mut subject = app.subjects.find(&id)?;
            if let Some(name) = name {
                subject.name = name;
            }
            if code.is_some() {
                subject.code = code;
            }
            if professor.is_some() {
                subject.professor = professor;
            }
            let dto = app.subjects.update_subject(subject)?;
            app.emit(&dto, render::subject)
        }
        SubjectCommand::Mark { id, mark } => {
            let subject = app.subjects.find(&id)?;
            let dto = app.subjects.mark_attendance(&subject.id, matches!(mark, Mark::Present))?;
            app.emit(&dto, render::subject)
        }
        SubjectCommand::Rm { id } => {
            let subject = app.subjects.find(&id)?;
            app.subjects.delete_subject(&subject.id)?;
            println!("Subject removed: {}", subject.name);
            Ok(())
        }
    }
}

fn run_timetable(app: &App, action: TimetableCommand) -> Result<()> {
    let (today, now_minutes) = local_now();

    match action {
        TimetableCommand::Add { subject, day, start, end, room, kind } => {
            let subject = app.subjects.find(&subject)?;
            let kind: ClassType = kind.parse()?;
            let entry = ScheduleEntry::new(subject.id, parse_day(&day)?, &start, &end)?
                .with_room(room)
                .with_kind(kind);
            let created = app.timetable.add_entry(entry)?;
            let names = app.names()?;
            app.emit(&created, |e| render::entry(e, &names))
        }
        TimetableCommand::List => {
            let week = app.timetable.week()?;
            let names = app.names()?;
            app.emit(&week, |w| render::week(w, &names))
        }
        TimetableCommand::Edit { id, subject, day, start, end, room, kind, active } => {
            let mut entry = app.timetable.find(&id)?;
            if let Some(subject) = subject {
                entry.subject_id = app.subjects.find(&subject)?.id;
            }
            if let Some(day) = day {
                entry.day = parse_day(&day)?;
            }
            if let Some(start) = start {
                entry.start_time = start;
            }
            if let Some(end) = end {
                entry.end_time = end;
            }
            if room.is_some() {
                entry.room = room;
            }
            if let Some(kind) = kind {
                entry.kind = kind.parse()?;
            }
            if let Some(active) = active {
                entry.is_active = active;
            }
            let updated = app.timetable.update_entry(entry)?;
            let names = app.names()?;
            app.emit(&updated, |e| render::entry(e, &names))
        }
        TimetableCommand::Today => {
            let classes = app.timetable.today(today, now_minutes)?;
            let names = app.names()?;
            app.emit(&classes, |c| render::today(c, &names))
        }
        TimetableCommand::Next => {
            let next = app.timetable.next_class(today, now_minutes)?;
            let names = app.names()?;
            app.emit(&next, |n| match n {
                Some(entry) => println!("Next class: {}", render::describe(entry, &names)),
                None => println!("No classes scheduled."),
            })
        }
        TimetableCommand::Free { day } => {
            let day = match day {
                Some(d) => parse_day(&d)?,
                None => today,
            };
            let slots = app.timetable.free_slots(day)?;
            app.emit(&slots, |s| render::free_slots(s))
        }
        TimetableCommand::Rm { id } => {
            let entry = app.timetable.find(&id)?;
            app.timetable.remove_entry(&entry.id)?;
            println!("Class removed: {} {}-{}", entry.day, entry.start_time, entry.end_time);
            Ok(())
        }
    }
}

fn run_task(app: &App, action: TaskCommand) -> Result<()> {
    match action {
        TaskCommand::Add { args } => {
            let task = build_task(app, &args)?;
            let dto = app.tasks.create_task(task)?;
            app.emit(&dto, render::task)
        }
        TaskCommand::List { status, priority, subject } => {
            let filter = TaskFilter {
                status: status.map(|s| s.parse::<TaskStatus>()).transpose()?,
                priority: priority.map(|p| p.parse::<Priority>()).transpose()?,
                subject_id: subject.map(|s| app.subjects.find(&s).map(|s| s.id)).transpose()?,
            };
            let tasks = app.tasks.list(&filter, Utc::now())?;
            app.emit(&tasks, |t| render::tasks(t))
        }
        TaskCommand::Edit { id, args } => {
            let mut task = app.tasks.find(&id)?;
            let parsed = parse_args(&args);
            if !parsed.title.is_empty() {
                task.title = parsed.title;
            }
            let metadata = expand_metadata(parsed.metadata, &TASK_EDIT_KEYS)?;
            if let Some(s) = metadata.get("status") {
                task.status = s.parse::<TaskStatus>()?;
            }
            if let Some(due) = metadata.get("due") {
                task.deadline = parse_human_date(due)?;
            }
            apply_task_metadata(app, &mut task, &metadata)?;
            let dto = app.tasks.update_task(task)?;
            app.emit(&dto, render::task)
        }
        TaskCommand::Board => {
            let board = app.tasks.board()?;
            app.emit(&board, render::board)
        }
        TaskCommand::Move { id, status } => {
            let status: TaskStatus = status.parse()?;
            let task = app.tasks.find(&id)?;
            let dto = app.tasks.move_task(&task.id, status)?;
            app.emit(&dto, render::task)
        }
        TaskCommand::Upcoming => {
            let upcoming = app.tasks.upcoming(Utc::now())?;
            app.emit(&upcoming, |u| render::tasks(u))
        }
        TaskCommand::Stats => {
            let stats = app.tasks.analytics(Utc::now())?;
            app.emit(&stats, render::task_stats)
        }
        TaskCommand::Rm { id } => {
            let task = app.tasks.find(&id)?;
            app.tasks.delete_task(&task.id)?;
            println!("Task removed: {}", task.title);
            Ok(())
        }
    }
}

fn build_task(app: &App, args: &[String]) -> Result<Task> {
    let parsed = parse_args(args);
    if parsed.title.is_empty() {
        return Err(anyhow!("Task title is required"));
    }

    let metadata = expand_metadata(parsed.metadata, &TASK_KEYS)?;
    let due = metadata
        .get("due")
        .ok_or_else(|| anyhow!("A deadline is required (due:<date>)"))?;
    let mut task = Task::new(parsed.title, parse_human_date(due)?);
    apply_task_metadata(app, &mut task, &metadata)?;

    Ok(task)
}

fn expand_metadata(raw: HashMap<String, String>, keys: &[&str]) -> Result<HashMap<String, String>> {
    let mut metadata = HashMap::new();
    for (key, value) in raw {
        metadata.insert(expand_key(&key, keys)?, value);
    }
    Ok(metadata)
}

fn apply_task_metadata(app: &App, task: &mut Task, metadata: &HashMap<String, String>) -> Result<()> {
    if let Some(p) = metadata.get("priority") {
        task.priority = p.parse::<Priority>()?;
    }
    if let Some(t) = metadata.get("type") {
        task.task_type = t.parse::<TaskType>()?;
    }
    if let Some(s) = metadata.get("subject") {
        task.subject_id = Some(app.subjects.find(s)?.id);
    }
    if let Some(d) = metadata.get("description") {
        task.description = Some(d.clone());
    }
    Ok(())
}
