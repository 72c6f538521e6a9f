use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use satgame::curriculum::{QuestionBank, level_index};
use satgame::quiz::Phase;
use satgame::state::Theme;
use satgame::{App, Config, CoreError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "satgame")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Question bank JSON (overrides the configured one)
    #[arg(short, long)]
    bank: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show plays, streak, category progress and focus areas
    Dashboard,
    /// List the subcategories of a category
    Subcats {
        /// Category name
        category: String,
    },
    /// List the 20 levels of a subcategory
    Levels {
        /// Subcategory name
        subcat: String,
    },
    /// Play a level
    Quiz {
        /// Subcategory name
        subcat: String,
        /// Level number (1-20)
        level: u8,
    },
    /// Show or set the colour theme
    Theme {
        /// dark or light
        theme: Option<Theme>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "satgame=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let bank = match cli.bank.as_ref().or(config.question_bank.as_ref()) {
        Some(path) => QuestionBank::load(path)?,
        None => {
            tracing::warn!("No question bank configured; every level will show as coming soon");
            QuestionBank::default()
        }
    };
    let mut app = App::open(&config, bank)?;

    match cli.command.unwrap_or(Commands::Dashboard) {
        Commands::Dashboard => print_dashboard(&app),
        Commands::Subcats { category } => {
            for sc in app.subcategories(&category) {
                println!("{:<32} {:>2}/20 levels completed ({}%)", sc.name, sc.completed, sc.percent);
            }
        }
        Commands::Levels { subcat } => print_levels(&app, &subcat),
        Commands::Quiz { subcat, level } => run_quiz(&mut app, &subcat, level).await?,
        Commands::Theme { theme } => {
            let theme = match theme {
                Some(theme) => app.set_theme(theme)?,
                None => app.theme(),
            };
            println!("Theme: {:?}", theme);
        }
    }

    Ok(())
}

fn print_dashboard(app: &App) {
    let dashboard = app.dashboard();
    println!("Plays: {}    Daily streak: {}", dashboard.plays, dashboard.streak_days);
    println!();

    for total in &dashboard.categories {
        println!(
            "{:<36} {:>3}/{:<3} levels done ({}%)",
            total.category,
            total.done,
            total.max,
            total.percent()
        );
    }

    println!();
    println!("Focus Area");
    if dashboard.weaknesses.is_empty() {
        println!("  Play some levels to discover your focus areas!");
    }
    for weakness in &dashboard.weaknesses {
        println!("  {} (avg. score {:.1}/5)", weakness.subcat, weakness.avg_score);
        for failed in &weakness.failed_levels {
            println!("    L{} ({}) - Score: {}/5", failed.level(), failed.difficulty, failed.score);
        }
    }

    println!();
    println!("Recent Results");
    if dashboard.recent.is_empty() {
        println!("  No attempts yet.");
    }
    for attempt in &dashboard.recent {
        println!(
            "  {} - L{} ({}) {}/5 {}",
            attempt.subcat,
            attempt.level(),
            attempt.difficulty,
            attempt.score,
            if attempt.passed { "Passed" } else { "Retry" }
        );
    }
}

fn print_levels(app: &App, subcat: &str) {
    let badges: Vec<String> = app.badges(subcat).iter().map(|d| d.to_string()).collect();
    println!(
        "{}  Badges: {}",
        subcat,
        if badges.is_empty() { "none".to_string() } else { badges.join(" ") }
    );

    for row in app.levels(subcat) {
        let best = row.best_score.map(|s| format!("(Best: {}/5)", s)).unwrap_or_default();
        let done = if row.completed { "Done" } else { "" };
        let start = if row.has_questions { "" } else { "Soon" };
        println!("  L{:<2} {:<8} {:<12} {:<4} {}", row.level, row.difficulty, best, done, start);
    }
}

async fn run_quiz(app: &mut App, subcat: &str, level: u8) -> Result<()> {
    let Some(index) = level_index(level) else {
        println!("Sorry, {}", CoreError::UnknownLevel(level));
        return Ok(());
    };

    match app.start_level(subcat, index) {
        Ok(_) => {}
        Err(e @ (CoreError::NoQuestions { .. } | CoreError::UnknownLevel(_))) => {
            println!("Sorry, {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let Some(session) = app.session() else { break };
        if session.phase() == Phase::Finished {
            break;
        }
        let Some((index, question)) = session.current_question() else { break };
        let total = session.questions().len();

        println!();
        println!("Question {}/{}   Correct: {}", index + 1, total, session.correct_count());
        println!("{}", question.prompt);
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}) {}", option_letter(i), option);
        }
        let options = question.options.len();

        let Some(line) = lines.next_line().await.context("Failed to read answer")? else {
            app.abandon_session();
            println!("Quiz abandoned.");
            return Ok(());
        };
        let Some(chosen) = parse_choice(&line, options) else {
            println!("Pick one of A-{}", option_letter(options.saturating_sub(1)));
            continue;
        };

        if let Some(feedback) = app.submit_answer(index, chosen).await? {
            println!("{}", if feedback.correct { "Correct!" } else { "Incorrect." });
            if let Some(compliment) = feedback.compliment {
                println!("{}", compliment);
            }
        }
    }

    let (result, outcome) = app.finish_session()?;
    println!();
    if result.passed {
        println!("Level Passed! You scored {}/{}.", result.score, result.total);
    } else {
        println!("You scored {}/{}. Score at least 3 to pass.", result.score, result.total);
    }
    println!("Plays earned: {}   Total plays: {}", outcome.plays_earned, outcome.plays);
    if outcome.badge_unlocked {
        println!("New badge unlocked: {}", outcome_badge(app, subcat));
    }

    println!();
    println!("Answer Review");
    for (i, item) in result.review.iter().enumerate() {
        println!("{}. {}", i + 1, item.prompt);
        for (o, option) in item.options.iter().enumerate() {
            let marker = if o == item.correct {
                " (correct)"
            } else if Some(o) == item.chosen {
                " (your pick)"
            } else {
                ""
            };
            println!("   {}) {}{}", option_letter(o), option, marker);
        }
        let explanation = if item.explanation.is_empty() { "N/A" } else { &item.explanation };
        println!("   Explanation: {}", explanation);
    }

    Ok(())
}

fn outcome_badge(app: &App, subcat: &str) -> String {
    app.badges(subcat).last().map(|d| d.to_string()).unwrap_or_default()
}

fn option_letter(i: usize) -> char {
    (b'A' + (i % 26) as u8) as char
}

/// Accept a letter (A, b, ...) or a 1-based number
fn parse_choice(input: &str, options: usize) -> Option<usize> {
    let input = input.trim();
    let index = match input.parse::<usize>() {
        Ok(n) => n.checked_sub(1)?,
        Err(_) => {
            let c = input.chars().next()?.to_ascii_uppercase();
            (c as usize).checked_sub('A' as usize)?
        }
    };
    (index < options).then_some(index)
}
