use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::json;
use tracing::info;

use lexis::bleu::{corpus_bleu, score::score_corpus, sentence_bleu, BleuConfig, Smoothing};
use lexis::config::Config;
use lexis::fuzzy;
use lexis::ontology::download;
use lexis::output::terminal;
use lexis::tagging::{ConceptExtractor, TaggerOptions};
use lexis::topics::corpus::{load_corpus, Corpus};
use lexis::topics::lsa::LsaConfig;
use lexis::topics::modeler::LsaModeler;
use lexis::topics::preprocess::Preprocessor;
use lexis::topics::sweep::{best_point, sweep, SweepConfig};
use lexis::topics::traits::TopicModeler;

const DEMO_REFERENCES: [&str; 2] = ["this is a test", "this is test"];
const DEMO_CANDIDATE: &str = "this is a test";

const DEMO_TEAMS: [&str; 4] = [
    "Atlanta Falcons",
    "New York Jets",
    "New York Giants",
    "Dallas Cowboys",
];

/// Root of the infectious disease branch ("disease by infectious agent").
const DEMO_TERM: &str = "DOID:0050117";

/// Sentences from "Pulmonary and Cardiac Pathology in Covid-19: The First
/// Autopsy Series from New Orleans" (Fox et al.).
const DEMO_TEXT: &str = "
Whether this may represent an early manifestation of a viral myocarditis is not certain,
but there was no significant brisk lymphocytic inflammatory infiltrate consistent with the
typical pattern of viral myocarditis...
There is prior evidence of viral infection causing activation of both maladaptive cytokine pathways,
and platelet response, and our findings suggest that these immune functions may be related to
severe forms of Covid-19. In response to systemic and pulmonary viral infections of H1N1
influenza and dengue, megakaryocytes have been known to respond by overexpressing IFITM3,
and producing platelets with the same over-expression.
";

/// Lexis: classic NLP toolkit.
///
/// BLEU scoring, fuzzy string matching, LSA topic modeling, and ontology
/// concept tagging. Every subcommand runs a small demonstration when given
/// no arguments.
#[derive(Parser)]
#[command(name = "lexis", version, about)]
struct Cli {
    /// Print results as JSON instead of colored text
    #[arg(long, global = true)]
    json: bool,

    /// Re-download the ontology even if the cached copy is fresh
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a candidate sentence against references with BLEU
    Bleu {
        /// Candidate sentence (whitespace-tokenized)
        #[arg(long)]
        candidate: Option<String>,

        /// Reference sentence (repeatable)
        #[arg(long)]
        reference: Vec<String>,

        /// Comma-separated n-gram weights (default: 0.25,0.25,0.25,0.25)
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,

        /// Smoothing for zero n-gram matches
        #[arg(long, value_enum, default_value_t = SmoothingArg::None)]
        smoothing: SmoothingArg,
    },

    /// Compare strings with fuzzy ratios and rank choices against a query
    Fuzzy {
        /// Query to rank the choices against
        #[arg(long)]
        query: Option<String>,

        /// Candidate choice (repeatable; default: four NFL teams)
        #[arg(long)]
        choice: Vec<String>,

        /// Number of ranked choices to show (default: 2)
        #[arg(long, default_value = "2")]
        limit: usize,
    },

    /// Fit an LSA topic model to a one-document-per-line corpus
    Topics {
        /// Corpus file (default: LEXIS_CORPUS_PATH or lsa_practice.txt)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Number of topics (default: 2)
        #[arg(long, default_value = "2")]
        topics: usize,

        /// Terms shown per topic (default: 10)
        #[arg(long, default_value = "10")]
        words: usize,
    },

    /// Score topic coherence across a range of topic counts
    Coherence {
        /// Corpus file (default: LEXIS_CORPUS_PATH or lsa_practice.txt)
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// First topic count (default: 2)
        #[arg(long, default_value = "2")]
        start: usize,

        /// Stop before this topic count (default: 12)
        #[arg(long, default_value = "12")]
        stop: usize,

        /// Step between topic counts (default: 1)
        #[arg(long, default_value = "1")]
        step: usize,
    },

    /// Browse the ontology hierarchy
    Ontology {
        #[command(subcommand)]
        command: OntologyCommand,
    },

    /// Tag ontology concepts in text
    Tag {
        /// Text to tag
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the text to tag from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum OntologyCommand {
    /// List subclasses of a term
    Children {
        /// Term id (default: DOID:0050117, disease by infectious agent)
        id: Option<String>,

        /// Levels to descend (default: 1)
        #[arg(long, default_value = "1", conflicts_with = "all")]
        distance: usize,

        /// Descend the whole subtree
        #[arg(long)]
        all: bool,

        /// Include the term itself
        #[arg(long)]
        with_self: bool,
    },

    /// List superclasses of a term
    Parents {
        /// Term id
        id: String,

        /// Levels to ascend (default: all)
        #[arg(long)]
        distance: Option<usize>,
    },

    /// Show the cached ontology's age and size
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum SmoothingArg {
    None,
    /// Add 0.1 to zero-match numerators
    Epsilon,
    /// Add one to numerator and denominator above unigrams
    AddOne,
}

impl From<SmoothingArg> for Smoothing {
    fn from(arg: SmoothingArg) -> Self {
        match arg {
            SmoothingArg::None => Smoothing::None,
            SmoothingArg::Epsilon => Smoothing::Epsilon(0.1),
            SmoothingArg::AddOne => Smoothing::AddOne,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr so --json output stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("lexis=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bleu {
            candidate,
            reference,
            weights,
            smoothing,
        } => {
            let candidate: Vec<String> = tokens(candidate.as_deref().unwrap_or(DEMO_CANDIDATE));
            let references: Vec<Vec<String>> = if reference.is_empty() {
                DEMO_REFERENCES.iter().map(|r| tokens(r)).collect()
            } else {
                reference.iter().map(|r| tokens(r)).collect()
            };

            let mut config = match &weights {
                Some(w) => BleuConfig::with_weights(w),
                None => BleuConfig::default(),
            };
            config.smoothing = smoothing.into();
            if config.weights.is_empty() {
                anyhow::bail!("--weights needs at least one value");
            }

            let individual = BleuConfig {
                weights: vec![1.0, 0.0, 0.0, 0.0],
                smoothing: config.smoothing,
            };
            let cumulative = BleuConfig {
                weights: vec![0.25; 4],
                smoothing: config.smoothing,
            };

            let list_of_references = vec![references.clone()];
            let candidates = vec![candidate.clone()];

            let rows = vec![
                ("sentence".to_string(), sentence_bleu(&references, &candidate, &config)),
                (
                    "corpus".to_string(),
                    corpus_bleu(&list_of_references, &candidates, &config)?,
                ),
                (
                    "individual 1-gram".to_string(),
                    sentence_bleu(&references, &candidate, &individual),
                ),
                (
                    "cumulative 4-gram".to_string(),
                    sentence_bleu(&references, &candidate, &cumulative),
                ),
            ];

            if cli.json {
                let detail = score_corpus(&list_of_references, &candidates, &config)?;
                let scores: serde_json::Map<String, serde_json::Value> =
                    rows.into_iter().map(|(k, v)| (k, json!(v))).collect();
                print_json(&json!({ "scores": scores, "detail": detail }))?;
            } else {
                terminal::display_bleu_scores(&rows);
            }
        }

        Commands::Fuzzy {
            query,
            choice,
            limit,
        } => {
            let choices: Vec<String> = if choice.is_empty() {
                DEMO_TEAMS.iter().map(|s| s.to_string()).collect()
            } else {
                choice
            };

            match query {
                Some(query) => {
                    let matches = fuzzy::extract(&query, &choices, limit);
                    if cli.json {
                        print_json(&json!({ "query": query, "matches": matches }))?;
                    } else {
                        terminal::display_matches(&query, &matches);
                    }
                }
                None => run_fuzzy_demo(&choices, limit, cli.json)?,
            }
        }

        Commands::Topics {
            corpus,
            topics,
            words,
        } => {
            let corpus = open_corpus(corpus)?;
            let config = LsaConfig {
                num_topics: topics,
                ..LsaConfig::default()
            };
            let modeler = LsaModeler::new(config, words)?;
            let summary = modeler.model(&corpus.documents)?;

            if cli.json {
                print_json(&summary)?;
            } else {
                summary.display();
            }
        }

        Commands::Coherence {
            corpus,
            start,
            stop,
            step,
        } => {
            let corpus = open_corpus(corpus)?;
            let texts = Preprocessor::new()?.process_all(&corpus.documents);
            let config = SweepConfig {
                start,
                stop,
                step,
                ..SweepConfig::default()
            };

            info!(start, stop, step, "Sweeping topic counts");
            let points = sweep(&texts, &config, &LsaConfig::default())?;
            let best = best_point(&points);

            if cli.json {
                print_json(&json!({ "points": points, "best": best }))?;
            } else {
                terminal::display_sweep(&points, best.as_ref());
            }
        }

        Commands::Ontology { command } => {
            let config = Config::load()?;
            config.require_ontology()?;

            match command {
                OntologyCommand::Children {
                    id,
                    distance,
                    all,
                    with_self,
                } => {
                    let id = id.unwrap_or_else(|| DEMO_TERM.to_string());
                    let ontology = download::load_ontology(&config, cli.refresh).await?;
                    let distance = if all { None } else { Some(distance) };
                    let terms = ontology.subclasses(&id, distance, with_self)?;

                    if cli.json {
                        print_json(&terms)?;
                    } else {
                        terminal::display_terms(&format!("Subclasses of {id}"), &terms);
                    }
                }

                OntologyCommand::Parents { id, distance } => {
                    let ontology = download::load_ontology(&config, cli.refresh).await?;
                    let terms = ontology.superclasses(&id, distance, false)?;

                    if cli.json {
                        print_json(&terms)?;
                    } else {
                        terminal::display_terms(&format!("Superclasses of {id}"), &terms);
                    }
                }

                OntologyCommand::Info => {
                    if cli.refresh && config.ontology_path.is_none() {
                        download::ensure_cached(&config, true).await?;
                    }
                    let status = download::cache_status(
                        &config.cache_dir,
                        &config.ontology_url,
                        config.ontology_max_age_days,
                    );

                    // Only parse what is already on disk; info never downloads on its own
                    let on_disk = config
                        .ontology_path
                        .clone()
                        .or_else(|| status.modified.map(|_| status.path.clone()));
                    let ontology = match on_disk {
                        Some(path) => Some(lexis::ontology::Ontology::from_path(&path)?),
                        None => None,
                    };

                    if cli.json {
                        print_json(&json!({
                            "cache": status,
                            "terms": ontology.as_ref().map(|o| o.len()),
                            "data_version": ontology.as_ref().and_then(|o| o.data_version()),
                        }))?;
                    } else {
                        terminal::display_ontology_info(&status, ontology.as_ref());
                        if ontology.is_none() {
                            println!(
                                "{}",
                                "Not downloaded yet. Run `lexis ontology info --refresh` to fetch it."
                                    .dimmed()
                            );
                        }
                    }
                }
            }
        }

        Commands::Tag { text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                (None, None) => DEMO_TEXT.to_string(),
            };

            let config = Config::load()?;
            config.require_ontology()?;
            let ontology = download::load_ontology(&config, cli.refresh).await?;

            let options = TaggerOptions {
                match_synonyms: config.match_synonyms,
                ..TaggerOptions::default()
            };
            let extractor = ConceptExtractor::new(&ontology, &options);
            let doc = extractor.tag(&text);
            info!(concepts = doc.concepts().len(), "Tagging complete");

            if cli.json {
                print_json(&doc.concepts())?;
            } else {
                terminal::display_concepts(&doc);
            }
        }
    }

    Ok(())
}

/// The stock ratio comparisons followed by a ranking of `choices`.
fn run_fuzzy_demo(choices: &[String], limit: usize, as_json: bool) -> Result<()> {
    let rows: Vec<(String, u8)> = vec![
        (
            "ratio (identical)".to_string(),
            fuzzy::ratio("this is a test", "this is a test"),
        ),
        (
            "partial_ratio (identical)".to_string(),
            fuzzy::partial_ratio("this is a test", "this is a test"),
        ),
        (
            "ratio (reordered)".to_string(),
            fuzzy::ratio("fuzzy wuzzy was a bear", "wuzzy fuzzy was a bear"),
        ),
        (
            "token_sort_ratio (reordered)".to_string(),
            fuzzy::token_sort_ratio("fuzzy wuzzy was a bear", "wuzzy fuzzy was a bear"),
        ),
        (
            "token_sort_ratio (repeated)".to_string(),
            fuzzy::token_sort_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"),
        ),
        (
            "token_set_ratio (repeated)".to_string(),
            fuzzy::token_set_ratio("fuzzy was a bear", "fuzzy fuzzy was a bear"),
        ),
    ];

    let ranked = fuzzy::extract("new york jets", choices, limit);
    let best = fuzzy::extract_one("cowboys", choices);

    if as_json {
        let ratios: serde_json::Map<String, serde_json::Value> =
            rows.into_iter().map(|(k, v)| (k, json!(v))).collect();
        return print_json(&json!({ "ratios": ratios, "extract": ranked, "extract_one": best }));
    }

    terminal::display_ratios(&rows);
    terminal::display_matches("new york jets", &ranked);
    terminal::display_matches("cowboys", best.as_slice());
    Ok(())
}

/// Load the corpus from `path`, falling back to the configured default.
fn open_corpus(path: Option<PathBuf>) -> Result<Corpus> {
    let path = match path {
        Some(path) => path,
        None => Config::load()?.corpus_path,
    };
    let corpus = load_corpus(&path)?;
    if corpus.is_empty() {
        anyhow::bail!("Corpus {} has no documents", path.display());
    }
    Ok(corpus)
}

fn tokens(sentence: &str) -> Vec<String> {
    sentence.split_whitespace().map(str::to_string).collect()
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
