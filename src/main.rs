use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::Parser;
use log::warn;

use lexdrill::app::{App, AppEvent, Prompt};
use lexdrill::catalog::{Catalog, CatalogSource, SENTENCES_ASSET, WORDS_ASSET};
use lexdrill::config::Config;
use lexdrill::engine::PracticeEngine;
use lexdrill::event::{EventHandler, InputEvent};
use lexdrill::session::drill::DrillMode;
use lexdrill::session::result::{FinalResults, SessionStats};
use lexdrill::store::json_store::JsonStore;
use lexdrill::store::{KeyValueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "lexdrill", version, about = "Bulgarian vocabulary and sentence drill")]
struct Cli {
    #[arg(short, long, default_value = "words", help = "Drill mode (words, sentences)")]
    mode: String,

    #[arg(short, long, help = "Number of sentences per session")]
    count: Option<usize>,

    #[arg(long, help = "Words JSON file")]
    words: Option<PathBuf>,

    #[arg(long, help = "Sentences JSON file")]
    sentences: Option<PathBuf>,

    #[arg(long, help = "Base URL serving words.json and sentences.json")]
    url: Option<String>,

    #[arg(long, help = "Seed for reproducible selection")]
    seed: Option<u64>,

    #[arg(long = "reveal-ms", help = "Milliseconds before the translation is revealed")]
    reveal_ms: Option<u64>,

    #[arg(long, help = "Write the effective config to the config file and exit")]
    write_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let Some(mode) = DrillMode::from_name(&cli.mode) else {
        bail!("unknown mode '{}', expected 'words' or 'sentences'", cli.mode);
    };

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {e:#}");
        Config::default()
    });
    if let Some(count) = cli.count {
        config.sentence_session_size = count;
    }
    config.validate();

    if cli.write_config {
        config.save()?;
        println!("Wrote {}", Config::config_path().display());
        return Ok(());
    }

    let base_url = cli.url.or_else(|| config.catalog_url.clone());
    let words = catalog_source(
        cli.words.or_else(|| config.words_path.as_ref().map(PathBuf::from)),
        base_url.as_deref(),
        WORDS_ASSET,
    );
    let sentences = catalog_source(
        cli.sentences
            .or_else(|| config.sentences_path.as_ref().map(PathBuf::from)),
        base_url.as_deref(),
        SENTENCES_ASSET,
    );
    let catalog = Catalog::load(&words, &sentences)?;

    let store: Box<dyn KeyValueStore> =
        match JsonStore::with_base_dir(PathBuf::from(&config.data_dir)) {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("Progress will not be saved: {e:#}");
                Box::new(MemoryStore::new())
            }
        };

    let weights = config.priority.clone();
    let engine = match cli.seed {
        Some(seed) => PracticeEngine::seeded(catalog, weights, seed),
        None => PracticeEngine::new(catalog, weights),
    };
    let mut app = App::new(engine, store, config);
    if let Some(ms) = cli.reveal_ms {
        app.override_reveal_delay(ms);
    }

    if app.start(mode, Instant::now())?.is_none() {
        println!("Nothing to practice.");
        return Ok(());
    }
    print_prompt(&app);

    let events = EventHandler::new(Duration::from_millis(100));
    run(&mut app, &events)
}

fn catalog_source(
    path: Option<PathBuf>,
    base_url: Option<&str>,
    asset: &'static str,
) -> CatalogSource {
    match (path, base_url) {
        (Some(path), _) => CatalogSource::File(path),
        (None, Some(base)) => {
            CatalogSource::Url(format!("{}/{asset}", base.trim_end_matches('/')))
        }
        (None, None) => CatalogSource::Embedded(asset),
    }
}

fn run(app: &mut App, events: &EventHandler) -> Result<()> {
    loop {
        match events.next()? {
            InputEvent::Tick => {
                for event in app.tick(Instant::now()) {
                    match event {
                        AppEvent::Countdown { remaining_secs } => {
                            println!("  Revealing translation in {remaining_secs}s...");
                        }
                        AppEvent::Revealed => print_reveal(app),
                        AppEvent::Advanced(_) => print_prompt(app),
                        AppEvent::SessionComplete(results) => {
                            print_results(&results);
                            return Ok(());
                        }
                    }
                }
            }
            InputEvent::Line(line) => {
                if !handle_line(app, line.trim(), Instant::now()) {
                    if let Some(results) = app.final_results() {
                        print_results(&results);
                    }
                    return Ok(());
                }
            }
            InputEvent::Eof => return Ok(()),
        }
    }
}

/// `false` when the user asked to quit.
fn handle_line(app: &mut App, line: &str, now: Instant) -> bool {
    match line {
        "q" => return false,
        "s" => {
            if app.skip(now) {
                println!("  Skipped.");
                print_stats(&app.session_stats());
            }
            return true;
        }
        _ => {}
    }

    match app.mode() {
        Some(DrillMode::Words) => match line {
            "y" | "n" => {
                if app.answer_word(line == "y", now) {
                    if line == "y" {
                        println!("  ✓ Nice!");
                    } else {
                        println!("  ✗ Try again next time");
                    }
                    print_reveal(app);
                    print_stats(&app.session_stats());
                }
            }
            "t" => {
                app.toggle_language();
                print_prompt(app);
            }
            _ => println!("  [y] knew it  [n] didn't  [s] skip  [t] toggle language  [q] quit"),
        },
        Some(DrillMode::Sentences) => {
            let choice = line.parse::<usize>().ok().and_then(|n| n.checked_sub(1));
            match choice.and_then(|index| app.choose_option(index, now)) {
                Some(correct) => {
                    println!("  {}", if correct { "✓ Correct!" } else { "✗ Incorrect" });
                    print_reveal(app);
                    print_stats(&app.session_stats());
                }
                None => println!("  Enter an option number, [s] skip or [q] quit"),
            }
        }
        None => {}
    }
    true
}

fn print_prompt(app: &App) {
    let Some((primary, _)) = app.visible_prompt() else {
        return;
    };
    println!();
    println!("{primary}");
    match app.current() {
        Some(Prompt::Word(_)) => {
            println!("  Revealing translation in {}s...", app.reveal_secs());
        }
        Some(Prompt::Sentence(p)) => {
            println!("  ({})", p.translation);
            for (i, option) in p.options.iter().enumerate() {
                println!("  {}. {option}", i + 1);
            }
        }
        None => {}
    }
}

fn print_reveal(app: &App) {
    match app.visible_prompt() {
        Some((primary, _)) if matches!(app.current(), Some(Prompt::Sentence(_))) => {
            println!("  → {primary}");
        }
        Some((_, Some(secondary))) => println!("  → {secondary}"),
        _ => {}
    }
}

fn print_stats(stats: &SessionStats) {
    println!(
        "  Attempts: {} | Correct: {} | Wrong: {} | Skipped: {} | Accuracy: {}%",
        stats.total_attempts, stats.successes, stats.failures, stats.skipped, stats.accuracy
    );
}

fn print_results(results: &FinalResults) {
    println!();
    println!("Session complete");
    println!("  Items:    {}", results.total_items);
    println!("  Correct:  {}", results.correct);
    println!("  Wrong:    {}", results.incorrect);
    println!("  Skipped:  {}", results.skipped);
    println!("  Accuracy: {}%", results.accuracy);
}
