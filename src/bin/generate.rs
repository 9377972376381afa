use chrono::{Local, NaiveDate};
use schedule_maker::{
    FileScheduleStore, RecordIssue, RenderOptions, StoreLayout, day_name, write_artifacts,
};
use std::path::PathBuf;
use std::process::ExitCode;

fn print_help() {
    println!(
        "Usage: generate [--root <dir>] [--date <YYYY-MM-DD>]\n\n  --root <dir>          Configuration root (default ~/.schedule_config)\n  --date <YYYY-MM-DD>   Date printed on the artifacts (default today)\n  --migrate             Rewrite the answers file in the current format\n  -h, --help            Show this help"
    );
}

struct Args {
    root: Option<PathBuf>,
    date: Option<NaiveDate>,
    migrate: bool,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = Args {
        root: None,
        date: None,
        migrate: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--root" => {
                let value = iter.next().ok_or("--root needs a directory")?;
                args.root = Some(PathBuf::from(value));
            }
            "--date" => {
                let value = iter.next().ok_or("--date needs a value")?;
                let date = NaiveDate::parse_from_str(&value, "%Y-%m-%d")
                    .map_err(|_| format!("Invalid date '{value}' (YYYY-MM-DD)"))?;
                args.date = Some(date);
            }
            "--migrate" => args.migrate = true,
            other => return Err(format!("Unknown argument '{other}'. Try --help.")),
        }
    }
    Ok(Some(args))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let Some(root) = args.root.or_else(StoreLayout::default_root) else {
        eprintln!("Cannot locate a home directory; pass --root.");
        return ExitCode::FAILURE;
    };
    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let layout = StoreLayout::new(root);
    let store = FileScheduleStore::new(layout.clone()).with_save_date(date);

    let report = match store.load() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    for issue in &report.issues {
        match issue {
            RecordIssue::Corrupt { day, reason } => {
                println!("{}: unreadable record ({reason}); left empty", day_name(*day))
            }
            RecordIssue::Migrated { day } => {
                println!("{}: upgraded legacy record", day_name(*day))
            }
            RecordIssue::MigrationAmbiguous { day } => {
                println!("{}: kept both plans and legacy fields", day_name(*day))
            }
        }
    }

    if args.migrate {
        if let Err(e) = store.save(&report.schedule) {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
        println!("Answers file rewritten: {}", layout.answers_file().display());
    }

    match write_artifacts(&layout, &report.schedule, &RenderOptions::new(date)) {
        Ok(paths) => {
            for path in paths.all() {
                println!("Wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
