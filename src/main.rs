use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use bandprep::catalog::{self, SectionLookup};
use bandprep::progress::{Answer, FileBackend, band_descriptor, band_score, format_time};
use bandprep::timer::TimerState;
use bandprep::{
    Catalog, Config, Countdown, CountdownHandle, Preferences, ProgressStore, Skill, TrackedSkill,
};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Width used when printing section bodies
const WRAP_WIDTH: usize = 88;

#[derive(Parser)]
#[command(name = "bandprep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Content tree root (overrides config)
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Directory for progress and preferences (overrides the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List practice tests for a skill
    Tests {
        skill: Skill,
    },
    /// List the sections of a test
    Sections {
        skill: Skill,
        test: String,
    },
    /// Show one section
    Show {
        skill: Skill,
        test: String,
        section: String,
        /// Print the body as stored, without wrapping
        #[arg(long)]
        raw: bool,
    },
    /// Show stored progress
    Progress {
        skill: TrackedSkill,
        /// Summarise a single test
        test: Option<String>,
    },
    /// Record an answer
    Answer {
        skill: TrackedSkill,
        test: String,
        section: String,
        question: String,
        /// One value, or several for multi-select questions
        #[arg(required = true)]
        values: Vec<String>,
        /// Elapsed seconds in the section
        #[arg(long, default_value_t = 0)]
        time: u64,
    },
    /// Submit a section with its raw score
    Submit {
        skill: TrackedSkill,
        test: String,
        section: String,
        #[arg(long)]
        correct: u32,
        #[arg(long, default_value_t = 40)]
        total: u32,
        #[arg(long, default_value_t = 0)]
        time: u64,
    },
    /// Clear stored progress (both skills when none is given)
    Clear {
        skill: Option<TrackedSkill>,
    },
    /// Convert a raw score to a band
    Band {
        skill: TrackedSkill,
        #[arg(allow_negative_numbers = true)]
        correct: i64,
        #[arg(long, default_value_t = 40)]
        total: u32,
    },
    /// Show or update preferences
    Prefs {
        #[arg(long)]
        theme: Option<String>,
        #[arg(long)]
        font_size: Option<u16>,
        #[arg(long)]
        show_timer: Option<bool>,
        #[arg(long)]
        warning: Option<u64>,
    },
    /// Run a countdown in the terminal
    Timer {
        /// Duration in seconds (defaults to the configured duration)
        seconds: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bandprep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let content_dir = cli.content_dir.unwrap_or_else(|| config.content_dir.clone());
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => Config::data_dir()?,
    };

    let catalog = Catalog::new(content_dir);
    let mut backend = FileBackend::new(data_dir);

    match cli.command {
        Commands::Tests { skill } => {
            let tests = catalog.list_tests(skill.as_str());
            if tests.is_empty() {
                println!("No {} tests found in {:?}", skill, catalog.root());
            }
            for test in tests {
                println!(
                    "{:<20} {:<40} {} sections  {:?}",
                    test.id, test.title, test.sections, test.difficulty
                );
            }
        }
        Commands::Sections { skill, test } => {
            for section in catalog.list_sections(skill.as_str(), &test) {
                println!("{section}");
            }
        }
        Commands::Show { skill, test, section, raw } => {
            show_section(&catalog, skill, &test, &section, raw)?;
        }
        Commands::Progress { skill, test } => {
            let store = ProgressStore::new(backend);
            match test {
                Some(test) => {
                    let summary = store.test_summary(skill, &test);
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                None => {
                    let progress = store.progress(skill);
                    println!("{}", serde_json::to_string_pretty(&progress)?);
                }
            }
        }
        Commands::Answer { skill, test, section, question, values, time } => {
            let mut store = ProgressStore::new(backend);
            let record = store
                .record_answer(skill, &test, &section, &question, Answer::from_values(values), time)
                .context("Failed to save answer")?;
            println!("{} answers saved for {}/{}", record.answered_count(), test, section);
        }
        Commands::Submit { skill, test, section, correct, total, time } => {
            let mut store = ProgressStore::new(backend);
            let record = store
                .complete_section(skill, &test, &section, correct, total, time)
                .context("Failed to save result")?;
            let band = record.band_score.unwrap_or_default();
            println!(
                "{}/{} correct in {}: band {:.1} ({})",
                correct,
                total,
                format_time(record.time_spent),
                band,
                band_descriptor(band)
            );
        }
        Commands::Clear { skill } => {
            let mut store = ProgressStore::new(backend);
            store.clear_progress(skill).context("Failed to clear progress")?;
            match skill {
                Some(skill) => println!("Cleared {skill} progress"),
                None => println!("Cleared all progress"),
            }
        }
        Commands::Band { skill, correct, total } => {
            let band = band_score(correct, total, skill);
            println!("{band:.1} ({})", band_descriptor(band));
        }
        Commands::Prefs { theme, font_size, show_timer, warning } => {
            let mut prefs = Preferences::load(&backend);
            let changed = theme.is_some()
                || font_size.is_some()
                || show_timer.is_some()
                || warning.is_some();

            if let Some(theme) = theme {
                prefs.theme = theme;
            }
            if let Some(font_size) = font_size {
                prefs.font_size = font_size;
            }
            if let Some(show_timer) = show_timer {
                prefs.show_timer = show_timer;
            }
            if let Some(warning) = warning {
                prefs.warning_threshold_secs = warning;
            }
            if changed {
                prefs.save(&mut backend).context("Failed to save preferences")?;
            }
            println!("{}", serde_json::to_string_pretty(&prefs)?);
        }
        Commands::Timer { seconds } => {
            let prefs = Preferences::load(&backend);
            let duration = seconds.unwrap_or(config.default_duration_secs);
            run_timer(duration, prefs.warning_threshold_secs).await?;
        }
    }

    Ok(())
}

fn show_section(
    catalog: &Catalog,
    skill: Skill,
    test: &str,
    section: &str,
    raw: bool,
) -> Result<()> {
    let content = match catalog.load_section(skill.as_str(), test, section) {
        SectionLookup::Found(content) => content,
        SectionLookup::NotFound => bail!("Section not found: {}/{}/{}", skill, test, section),
        SectionLookup::Invalid(reason) => {
            bail!("Section {}/{}/{} is malformed: {}", skill, test, section, reason)
        }
    };

    let meta = &content.meta;
    let outline = catalog::outline(&content.content);

    println!("{} (section {})", meta.title, meta.section);
    println!("{} questions, {:?}", meta.questions, meta.difficulty);
    if let Some(limit) = meta.time_limit_secs() {
        println!("Time limit: {}", format_time(limit));
    }
    if !meta.question_types.is_empty() {
        println!("Question types: {}", meta.question_types.join(", "));
    }
    if let Some(audio) = &meta.audio_file {
        println!("Audio: {audio}");
    }
    println!("{} words, about {} min read", outline.word_count, outline.reading_minutes);
    println!();

    if raw {
        print!("{}", content.content);
        return Ok(());
    }

    let body = catalog::markdown::strip_components(&content.content);
    for paragraph in body.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        println!("{}\n", textwrap::fill(paragraph, WRAP_WIDTH));
    }
    Ok(())
}

async fn run_timer(duration: u64, warning_threshold: u64) -> Result<()> {
    let countdown = Countdown::new(duration)
        .with_warning_threshold(warning_threshold)
        .on_expire(|| println!("Time is up!"));
    let handle = CountdownHandle::spawn(countdown);
    let mut rx = handle.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                handle.cancel();
                println!();
                println!("Stopped at {}", handle.snapshot());
                return Ok(());
            }

            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let snapshot = *rx.borrow_and_update();
                let marker = if snapshot.warning { " !" } else { "" };
                println!("{snapshot}{marker}");
                if snapshot.state == TimerState::Expired {
                    return Ok(());
                }
            }
        }
    }
}
