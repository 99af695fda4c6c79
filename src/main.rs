use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use crossterm::{style::Stylize, tty::IsTty};
use std::{
    error::Error,
    io::{self, BufRead, Write},
    path::PathBuf,
};
use wortquiz::{
    config::{Config, ConfigStore, FileConfigStore},
    import::{import_file, ImportReport},
    logging,
    quiz::{
        resolve_pool, QuizConfig, QuizSession, SessionState, SourceSelection, TestMode,
        TestSource, TestType, WordRepository,
    },
    seed::{self, DEFAULT_SEED},
    stats,
    word::non_empty,
    Article, NewWord, QuizError, StoreError, Word, WordFilter, WordStore,
};

/// German ↔ Turkish vocabulary quiz for the terminal
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Practice German vocabulary against Turkish translations: articles, plurals, translations, example sentences and wo/wohin/woher phrases, with favorites, categories and a result history."
)]
pub struct Cli {
    /// word database to use instead of the default location
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// log filter, e.g. "info" or "wortquiz=debug" (RUST_LOG takes precedence)
    #[clap(long, global = true)]
    log_level: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// answer a quiz in the terminal
    Quiz(QuizArgs),
    /// add, inspect or remove words
    #[clap(subcommand)]
    Word(WordCommand),
    /// list categories, or add/delete one
    Categories {
        #[clap(long)]
        add: Option<String>,
        #[clap(long, conflicts_with = "add")]
        delete: Option<String>,
    },
    /// manage favorite lists
    #[clap(subcommand)]
    List(ListCommand),
    /// import words from a .csv or .tsv file
    Import { file: PathBuf },
    /// load a bundled vocabulary
    Seed {
        #[clap(default_value = DEFAULT_SEED)]
        name: String,
    },
    /// show past results and per-mode statistics
    Results {
        #[clap(short = 'n', long, default_value_t = 10)]
        limit: usize,
        /// delete the whole history
        #[clap(long)]
        clear: bool,
    },
    /// print the active configuration
    Config {
        /// overwrite the config file with defaults
        #[clap(long)]
        reset: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
struct QuizArgs {
    /// artikel, plural, tr-de, de-tr, sentence, wo, wohin or woher
    #[clap(short, long)]
    mode: Option<TestMode>,

    /// multiple, fill or mixed
    #[clap(short = 't', long = "type")]
    test_type: Option<TestType>,

    /// number of questions
    #[clap(short = 'n', long)]
    count: Option<usize>,

    /// wordlist, category or favorites
    #[clap(short, long)]
    source: Option<TestSource>,

    /// category to draw words from (implies --source category)
    #[clap(short, long)]
    category: Option<String>,

    /// favorite list id, or "all" for every favorite (implies --source favorites)
    #[clap(short = 'l', long)]
    list: Option<String>,

    /// finish as soon as the last question is answered
    #[clap(long)]
    auto_finish: bool,

    /// save these settings as the new defaults
    #[clap(long)]
    remember: bool,
}

impl QuizArgs {
    /// Command line values win over the config file
    fn resolve(&self, cfg: &Config) -> (QuizConfig, SourceSelection) {
        let quiz = QuizConfig {
            mode: self.mode.unwrap_or(cfg.mode),
            test_type: self.test_type.unwrap_or(cfg.test_type),
            question_count: self.count.unwrap_or(cfg.question_count),
            auto_finish: self.auto_finish || cfg.auto_finish,
        };

        let source = match (self.source, &self.category, &self.list) {
            (Some(source), _, _) => source,
            (None, Some(_), _) => TestSource::Category,
            (None, None, Some(_)) => TestSource::Favorites,
            (None, None, None) => cfg.source,
        };
        let selection = SourceSelection {
            source,
            category: self.category.clone().or_else(|| cfg.category.clone()),
            favorite_list: self.list.clone().or_else(|| cfg.favorite_list.clone()),
        };
        (quiz, selection)
    }
}

#[derive(Subcommand, Debug)]
enum WordCommand {
    /// add a word
    Add(WordArgs),
    /// list words
    List {
        #[clap(short, long)]
        category: Option<String>,
        /// only words marked as favorite
        #[clap(short, long)]
        favorites: bool,
        /// match German, Turkish or plural text
        #[clap(short, long)]
        search: Option<String>,
    },
    /// show every field of a word
    Show { id: i64 },
    /// toggle the favorite flag
    Favorite { id: i64 },
    /// delete a word
    Delete { id: i64 },
}

#[derive(Args, Debug, Clone)]
struct WordArgs {
    german: String,
    turkish: String,
    category: String,
    /// der, die or das
    #[clap(short, long)]
    article: Option<Article>,
    #[clap(short, long)]
    plural: Option<String>,
    #[clap(long)]
    plural_suffix: Option<String>,
    #[clap(long)]
    wo: Option<String>,
    #[clap(long)]
    wohin: Option<String>,
    #[clap(long)]
    woher: Option<String>,
    #[clap(long)]
    description: Option<String>,
    #[clap(long)]
    notes: Option<String>,
    /// German example sentence
    #[clap(long)]
    sentence: Option<String>,
    /// Turkish translation of the example sentence
    #[clap(long)]
    translation: Option<String>,
    #[clap(long)]
    favorite: bool,
}

impl WordArgs {
    fn into_new_word(self) -> NewWord {
        NewWord {
            article: self.article,
            german: self.german,
            plural: self.plural,
            plural_suffix: self.plural_suffix,
            turkish: self.turkish,
            category: self.category,
            is_favorite: self.favorite,
            wo: self.wo,
            wohin: self.wohin,
            woher: self.woher,
            description: self.description,
            notes: self.notes,
            example_sentence: self.sentence,
            example_translation: self.translation,
        }
    }
}

#[derive(Subcommand, Debug)]
enum ListCommand {
    /// create an empty favorite list
    Create { name: String },
    /// show one list with its words, or every list
    Show { id: Option<i64> },
    /// add a word to a list
    Add { list: i64, word: i64 },
    /// remove a word from a list
    Remove { list: i64, word: i64 },
    Rename { id: i64, name: String },
    Delete { id: i64 },
}

/// Colors for feedback, only when stdout is a terminal
#[derive(Debug, Clone, Copy)]
struct Palette {
    styled: bool,
}

impl Palette {
    fn detect() -> Self {
        Self {
            styled: io::stdout().is_tty(),
        }
    }

    fn good(&self, text: &str) -> String {
        if self.styled {
            text.green().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn bad(&self, text: &str) -> String {
        if self.styled {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.styled {
            text.dark_grey().to_string()
        } else {
            text.to_string()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let config_store = match &cli.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new(),
    };
    let cfg = config_store.load();

    let level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    logging::init_tracing(&level);

    let mut store = match cli.db.as_ref().or(cfg.database_path.as_ref()) {
        Some(path) => WordStore::open(path)?,
        None => WordStore::open_default()?,
    };

    if let Err(err) = run(cli.command, &mut store, &config_store, cfg) {
        eprintln!("{} {err}", Palette::detect().bad("error:"));
        std::process::exit(1);
    }
    Ok(())
}

fn run(
    command: Command,
    store: &mut WordStore,
    config_store: &FileConfigStore,
    cfg: Config,
) -> wortquiz::Result<()> {
    match command {
        Command::Quiz(args) => run_quiz(store, config_store, cfg, &args),
        Command::Word(cmd) => run_word(store, cmd),
        Command::Categories { add, delete } => {
            if let Some(name) = add {
                store.add_category(&name)?;
            }
            if let Some(name) = delete {
                store.delete_category(&name)?;
            }
            for category in store.list_categories()? {
                println!("{category}");
            }
            Ok(())
        }
        Command::List(cmd) => run_list(store, cmd),
        Command::Import { file } => {
            let report = import_file(store, &file)?;
            print_report(&report);
            Ok(())
        }
        Command::Seed { name } => {
            let report = seed::load_seed(store, &name)?;
            print_report(&report);
            Ok(())
        }
        Command::Results { limit, clear } => {
            if clear {
                store.clear_test_results()?;
                println!("Ergebnisverlauf gelöscht.");
                return Ok(());
            }
            print_results(store, limit)
        }
        Command::Config { reset } => {
            let cfg = if reset {
                let cfg = Config::default();
                config_store.save(&cfg)?;
                cfg
            } else {
                cfg
            };
            println!("# {}", config_store.path().display());
            println!("{}", serde_json::to_string_pretty(&cfg).map_err(io::Error::from)?);
            Ok(())
        }
    }
}

fn run_quiz(
    store: &mut WordStore,
    config_store: &FileConfigStore,
    mut cfg: Config,
    args: &QuizArgs,
) -> wortquiz::Result<()> {
    let (quiz_config, selection) = args.resolve(&cfg);
    if !selection.is_ready() {
        let flag = match selection.source {
            TestSource::Favorites => "--list",
            _ => "--category",
        };
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            format!("source '{}' needs {flag}", selection.source),
        )
        .exit();
    }

    let palette = Palette::detect();
    let pool = resolve_pool(&*store, &selection)?;
    let mode = quiz_config.mode;
    let mut session = QuizSession::new(quiz_config.clone());
    match session.start(pool) {
        Ok(_) => {}
        Err(QuizError::EmptyPool) => {
            println!(
                "Keine passenden Wörter für {} ({}).",
                mode.label(),
                selection.describe()
            );
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!(
            "{} · {} · {} Fragen",
            mode.label(),
            selection.describe(),
            session.questions().len()
        );
        let finished_input = ask_all(&mut session, &mut lines, palette)?;

        let outcome = session.finish()?;
        println!();
        let line = format!(
            "{} von {} richtig, {}%",
            outcome.correct_count, outcome.total_questions, outcome.score
        );
        if outcome.score >= 50 {
            println!("{}", palette.good(&line));
        } else {
            println!("{}", palette.bad(&line));
        }
        for item in session.review()?.iter().filter(|item| !item.is_correct) {
            println!(
                "  {} {} {}",
                item.question.question,
                palette.dim("→"),
                item.question.correct_answer
            );
        }

        match session.record_with(&selection, store) {
            Ok(id) => tracing::debug!(id, "result saved"),
            Err(err) => println!(
                "{}",
                palette.dim(&format!("Hinweis: Ergebnis wurde nicht gespeichert ({err})"))
            ),
        }

        if finished_input || !ask_again(&mut lines)? {
            break;
        }
        session.restart()?;
    }

    if args.remember {
        cfg.remember(&quiz_config, &selection);
        config_store.save(&cfg)?;
        println!("Einstellungen gespeichert: {}", config_store.path().display());
    }
    Ok(())
}

/// Asks every question once. Returns true when input ran out.
fn ask_all<I>(
    session: &mut QuizSession,
    lines: &mut I,
    palette: Palette,
) -> wortquiz::Result<bool>
where
    I: Iterator<Item = io::Result<String>>,
{
    for index in 0..session.questions().len() {
        let Some(question) = session.question(index).cloned() else {
            break;
        };
        println!();
        println!("{}/{}  {}", index + 1, session.questions().len(), question.question);
        if let Some(options) = &question.options {
            let listed: Vec<String> = options
                .iter()
                .enumerate()
                .map(|(i, option)| format!("{}) {option}", i + 1))
                .collect();
            println!("   {}", listed.join("   "));
        }

        let Some(input) = read_line(lines)? else {
            return Ok(true);
        };
        let given = choice_or_text(question.options.as_deref(), &input);
        let correct = question.is_correct(&given);
        let state = session.answer(index, given)?;

        if correct {
            println!("{}", palette.good("richtig"));
        } else {
            println!(
                "{} {}",
                palette.bad("falsch,"),
                palette.dim(&format!("richtig ist: {}", question.correct_answer))
            );
        }
        if state == SessionState::Completed {
            break;
        }
    }
    Ok(false)
}

/// "2" picks the second option; anything else is taken as typed
fn choice_or_text(options: Option<&[String]>, input: &str) -> String {
    options
        .and_then(|options| {
            let n: usize = input.trim().parse().ok()?;
            options.get(n.checked_sub(1)?)
        })
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn read_line<I>(lines: &mut I) -> io::Result<Option<String>>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("> ");
    io::stdout().flush()?;
    lines.next().transpose()
}

fn ask_again<I>(lines: &mut I) -> io::Result<bool>
where
    I: Iterator<Item = io::Result<String>>,
{
    println!("Nochmal? [j/N]");
    Ok(read_line(lines)?
        .map(|answer| matches!(answer.trim().to_lowercase().as_str(), "j" | "ja" | "y" | "yes"))
        .unwrap_or(false))
}

fn run_word(store: &mut WordStore, cmd: WordCommand) -> wortquiz::Result<()> {
    match cmd {
        WordCommand::Add(args) => {
            let word = store.add_word(&args.into_new_word())?;
            println!("{}", word_line(&word));
        }
        WordCommand::List {
            category,
            favorites,
            search,
        } => {
            let filter = WordFilter {
                category,
                favorites_only: favorites,
                search,
                ids: None,
            };
            let words = store.list_words(&filter)?;
            if words.is_empty() {
                println!("Keine Wörter gefunden.");
            }
            for word in &words {
                println!("{}", word_line(word));
            }
        }
        WordCommand::Show { id } => {
            let word = store
                .get_word(id)?
                .ok_or_else(|| StoreError::not_found("word", id))?;
            print_word_details(&word);
        }
        WordCommand::Favorite { id } => {
            let favorite = store.toggle_favorite(id)?;
            println!(
                "Wort {id} ist {} Favorit.",
                if favorite { "jetzt" } else { "kein" }
            );
        }
        WordCommand::Delete { id } => {
            store.delete_word(id)?;
            println!("Wort {id} gelöscht.");
        }
    }
    Ok(())
}

fn word_line(word: &Word) -> String {
    format!(
        "{:>4}  {}  ·  {}  [{}]{}",
        word.id,
        word.with_article(),
        word.turkish,
        word.category,
        if word.is_favorite { "  ★" } else { "" }
    )
}

fn print_word_details(word: &Word) {
    println!("{}", word_line(word));
    let fields = [
        ("Plural", &word.plural),
        ("Pluralendung", &word.plural_suffix),
        ("Wo", &word.wo),
        ("Wohin", &word.wohin),
        ("Woher", &word.woher),
        ("Beschreibung", &word.description),
        ("Notizen", &word.notes),
        ("Beispiel", &word.example_sentence),
        ("Übersetzung", &word.example_translation),
    ];
    for (label, value) in fields {
        if let Some(text) = non_empty(value) {
            println!("      {label}: {text}");
        }
    }
}

fn run_list(store: &mut WordStore, cmd: ListCommand) -> wortquiz::Result<()> {
    match cmd {
        ListCommand::Create { name } => {
            let list = store.create_favorite_list(&name)?;
            println!("Liste {} „{}“ angelegt.", list.id, list.name);
        }
        ListCommand::Show { id: Some(id) } => {
            let list = store
                .get_favorite_list(id)?
                .ok_or_else(|| StoreError::not_found("favorite list", id))?;
            println!("{}  {} ({} Wörter)", list.id, list.name, list.word_ids.len());
            for word in store
                .list_words(&WordFilter::default())?
                .iter()
                .filter(|w| list.contains(w))
            {
                println!("{}", word_line(word));
            }
        }
        ListCommand::Show { id: None } => {
            for list in store.list_favorite_lists()? {
                println!("{:>4}  {} ({} Wörter)", list.id, list.name, list.word_ids.len());
            }
        }
        ListCommand::Add { list, word } => {
            if !store.add_to_favorite_list(list, word)? {
                println!("Wort {word} ist schon in Liste {list}.");
            }
        }
        ListCommand::Remove { list, word } => {
            if !store.remove_from_favorite_list(list, word)? {
                println!("Wort {word} ist nicht in Liste {list}.");
            }
        }
        ListCommand::Rename { id, name } => store.rename_favorite_list(id, &name)?,
        ListCommand::Delete { id } => store.delete_favorite_list(id)?,
    }
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!("{} Wörter importiert, {} übersprungen.", report.imported, report.skipped.len());
    for row in &report.skipped {
        println!("  Zeile {}: {}", row.line, row.reason);
    }
}

fn print_results(store: &WordStore, limit: usize) -> wortquiz::Result<()> {
    let history = store.list_test_results(None)?;
    if history.is_empty() {
        println!("Noch keine Ergebnisse.");
        return Ok(());
    }

    for result in history.iter().take(limit) {
        println!(
            "{}  {:<8} {:<8} {:>3}%  {}/{}",
            result.taken_at.format("%Y-%m-%d %H:%M"),
            result.mode.to_string(),
            result.test_type.to_string(),
            result.score,
            result.correct_answers,
            result.total_questions
        );
    }

    let summary = stats::summarize(&history);
    println!();
    if let Some(average) = summary.average_score {
        println!("{} Tests, Durchschnitt {average:.0}%", summary.attempts);
    }
    for mode in &summary.per_mode {
        println!(
            "  {:<20} {:>3}×  Ø {:>3.0}%  best {:>3}%",
            mode.mode.label(),
            mode.attempts,
            mode.average_score,
            mode.best_score
        );
    }
    Ok(())
}
