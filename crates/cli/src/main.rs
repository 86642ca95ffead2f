//! # promptitron: YKS curriculum tutor CLI
//!
//! Browse a subject's curriculum, select topics, and send them to the
//! tutoring backend's features.

mod browse;
mod config;
mod features;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use crate::config::{get_config, AppConfig};
use features::{load_selection, run_chat, run_feature, FeatureOptions};
use promptitron::api::{
    AnalysisRequest, ApiClient, ChatRequest, ConceptMapOptions, Difficulty, DocumentAnalysisRequest,
    ExamType, ExplanationLevel, ExplanationOptions, MapType, QuestionGenerationRequest,
    QuestionOptions, QuestionType, SearchRequest, StudyPlanRequest, SummaryOptions, SummaryStyle,
    UrlAnalysisRequest,
};
use promptitron::chat::ChatMode;
use promptitron::curriculum::{CurriculumBrowser, PathKey};
use promptitron::handoff::ActionType;
use promptitron::{create_source, FileSessionStore, YKS_SUBJECTS};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// --- CLI Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(long, global = true)]
    config: Option<String>,
    /// Overrides the backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the YKS subjects that have a curriculum
    Subjects,
    /// Browse a subject interactively and hand off a selection
    Browse(BrowseArgs),
    /// Select topics by path key and hand them off without prompting
    Select(SelectArgs),
    /// Run a curriculum feature on the handed-off selection
    Run(RunArgs),
    /// Start an AI or Socratic conversation about the selection
    Chat(ChatArgs),
    /// Send a single message to the general chat endpoint
    Ask(AskArgs),
    /// Generate questions for a free-form subject and topic
    Questions(QuestionsArgs),
    /// Generate a study plan
    StudyPlan(StudyPlanArgs),
    /// Search the backend's knowledge collections
    Search(SearchArgs),
    /// Analyze content, web pages, videos or documents
    Analyze(AnalyzeArgs),
    /// Upload a document for analysis
    Upload(UploadArgs),
    /// Show conversation memory
    Memory(MemoryArgs),
    /// Show the backend's curriculum overview
    Curriculum,
    /// Show backend health, statistics and collections
    Status,
}

#[derive(Args, Debug)]
struct BrowseArgs {
    /// The subject to browse, e.g. `kimya`
    subject: String,
}

#[derive(Args, Debug)]
struct SelectArgs {
    /// The subject the paths belong to
    subject: String,
    /// Path keys to check, in order (e.g. `kimya-9-0-0`)
    #[arg(long = "path", required = true)]
    paths: Vec<String>,
    /// The feature to hand the selection to
    #[arg(long, default_value = "questions", value_parser = parse_action)]
    action: ActionType,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Overrides the action stored with the selection
    #[arg(long, value_parser = parse_action)]
    action: Option<ActionType>,
    #[arg(long, default_value = "medium", value_parser = parse_wire::<Difficulty>)]
    difficulty: Difficulty,
    #[arg(long, default_value = "multiple_choice", value_parser = parse_wire::<QuestionType>)]
    question_type: QuestionType,
    /// Number of questions (1-20)
    #[arg(long, default_value_t = 5)]
    count: u8,
    #[arg(long, default_value = "tyt", value_parser = parse_wire::<ExamType>)]
    exam_type: ExamType,
    #[arg(long, default_value = "detailed", value_parser = parse_wire::<SummaryStyle>)]
    summary_style: SummaryStyle,
    #[arg(long, default_value = "hierarchical", value_parser = parse_wire::<MapType>)]
    map_type: MapType,
    #[arg(long, default_value = "comprehensive", value_parser = parse_wire::<ExplanationLevel>)]
    level: ExplanationLevel,
    /// Leave examples out of summaries and explanations
    #[arg(long)]
    no_examples: bool,
    /// Leave formulas out of explanations
    #[arg(long)]
    no_formulas: bool,
    /// Leave connections out of concept maps
    #[arg(long)]
    no_connections: bool,
    /// Learning goal when the selection was handed to a Socratic session
    #[arg(long)]
    goal: Option<String>,
}

#[derive(Args, Debug)]
struct ChatArgs {
    /// Use the Socratic method instead of a free conversation
    #[arg(long)]
    socratic: bool,
    /// Learning goal for Socratic sessions
    #[arg(long)]
    goal: Option<String>,
}

#[derive(Args, Debug)]
struct AskArgs {
    message: String,
    #[arg(long)]
    session_id: Option<String>,
    #[arg(long)]
    student_id: Option<String>,
}

#[derive(Args, Debug)]
struct QuestionsArgs {
    subject: String,
    topic: String,
    #[arg(long, value_parser = parse_wire::<Difficulty>)]
    difficulty: Option<Difficulty>,
    #[arg(long, value_parser = parse_wire::<QuestionType>)]
    question_type: Option<QuestionType>,
    #[arg(long)]
    count: Option<u8>,
    #[arg(long, value_parser = parse_wire::<ExamType>)]
    exam_type: Option<ExamType>,
}

#[derive(Args, Debug)]
struct StudyPlanArgs {
    /// Student profile as a JSON object
    #[arg(long, default_value = "{}")]
    profile: String,
    #[arg(long, value_parser = parse_wire::<ExamType>)]
    target_exam: Option<ExamType>,
    #[arg(long)]
    weeks: Option<u32>,
    #[arg(long)]
    hours: Option<u32>,
}

#[derive(Args, Debug)]
struct SearchArgs {
    query: String,
    #[arg(long = "collection")]
    collections: Vec<String>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    #[command(subcommand)]
    target: AnalyzeTarget,
    #[arg(long, global = true)]
    analysis_type: Option<String>,
    /// A custom instruction for web, video and document analysis
    #[arg(long, global = true)]
    prompt: Option<String>,
}

#[derive(Subcommand, Debug)]
enum AnalyzeTarget {
    /// Analyze a piece of text
    Content { content: String },
    /// Analyze a web page
    Web { url: String },
    /// Analyze a YouTube video
    Youtube { url: String },
    /// Analyze a document already uploaded to the backend
    Document { file_path: String },
}

#[derive(Args, Debug)]
struct UploadArgs {
    file: PathBuf,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, default_value = "general")]
    analysis_type: String,
}

#[derive(Args, Debug)]
struct MemoryArgs {
    session_id: String,
    /// Clear the memory instead of showing it
    #[arg(long)]
    clear: bool,
}

fn parse_action(raw: &str) -> Result<ActionType, String> {
    raw.parse().map_err(|e: promptitron::HandoffError| e.to_string())
}

/// Parses a backend wire name (e.g. `multiple_choice`) into an option enum.
fn parse_wire<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_value(Value::String(raw.to_string()))
        .map_err(|_| format!("unsupported value '{raw}'"))
}

// --- Main Application Entry ---

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = match get_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration failed: {e}");
            std::process::exit(1);
        }
    };
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }

    // Setup logging to a file
    let log_file = File::create(&config.log_file)?;
    let subscriber = fmt::Subscriber::builder()
        .with_writer(log_file)
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    info!(api_url = %config.api_url, "promptitron starting");

    let (name, result) = match &cli.command {
        Commands::Subjects => ("Subjects", handle_subjects()),
        Commands::Browse(args) => ("Browse", handle_browse(&config, args).await),
        Commands::Select(args) => ("Select", handle_select(&config, args).await),
        Commands::Run(args) => ("Run", handle_run(&config, args).await),
        Commands::Chat(args) => ("Chat", handle_chat(&config, args).await),
        Commands::Ask(args) => ("Ask", handle_ask(&config, args).await),
        Commands::Questions(args) => ("Questions", handle_questions(&config, args).await),
        Commands::StudyPlan(args) => ("Study plan", handle_study_plan(&config, args).await),
        Commands::Search(args) => ("Search", handle_search(&config, args).await),
        Commands::Analyze(args) => ("Analyze", handle_analyze(&config, args).await),
        Commands::Upload(args) => ("Upload", handle_upload(&config, args).await),
        Commands::Memory(args) => ("Memory", handle_memory(&config, args).await),
        Commands::Curriculum => ("Curriculum", handle_curriculum(&config).await),
        Commands::Status => ("Status", handle_status(&config).await),
    };

    if let Err(e) = result {
        tracing::error!("{name} failed: {e:#}");
        eprintln!("{name} failed: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

// --- Command Handlers ---

fn api_client(config: &AppConfig) -> Result<ApiClient> {
    Ok(ApiClient::with_timeout(
        config.api_url.clone(),
        config.request_timeout(),
    )?)
}

fn session_store(config: &AppConfig) -> FileSessionStore {
    FileSessionStore::new(&config.session_file)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn handle_subjects() -> Result<()> {
    for subject in YKS_SUBJECTS {
        println!("{:<24} {}", subject.name, subject.display_name);
    }
    Ok(())
}

async fn load_browser(config: &AppConfig, subject: &str) -> Result<CurriculumBrowser> {
    let source = create_source(&config.curriculum_source)?;
    let mut browser = CurriculumBrowser::new();
    browser.load(source.as_ref(), subject).await;
    if let Some(error) = browser.error() {
        bail!("{error}");
    }
    Ok(browser)
}

async fn handle_browse(config: &AppConfig, args: &BrowseArgs) -> Result<()> {
    let mut browser = load_browser(config, &args.subject).await?;
    let mut store = session_store(config);
    println!("Komutlar: e <n> aç/kapat, c <n> seç, p <eylem> devam, q çık");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    browse::run_repl(&mut browser, &mut store, stdin.lock(), &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

async fn handle_select(config: &AppConfig, args: &SelectArgs) -> Result<()> {
    let mut browser = load_browser(config, &args.subject).await?;
    for raw in &args.paths {
        let key = PathKey::decode(raw);
        let Some(tree) = browser.tree() else {
            bail!("No curriculum loaded");
        };
        if tree.find(&key).is_none() {
            bail!("Unknown path key: {raw}");
        }
        if !browser.state().is_checked(&key) {
            browser.toggle_checked(&key);
        }
    }
    let mut store = session_store(config);
    let count = browse::hand_off(&browser, &mut store, args.action)?;
    println!("✅ {count} konu '{}' için kaydedildi.", args.action);
    Ok(())
}

async fn handle_run(config: &AppConfig, args: &RunArgs) -> Result<()> {
    let store = session_store(config);
    let handoff = load_selection(&store, args.action)?;
    let client = api_client(config)?;
    let options = FeatureOptions {
        questions: QuestionOptions {
            difficulty: args.difficulty,
            question_type: args.question_type,
            count: args.count,
            exam_type: args.exam_type,
        },
        summary: SummaryOptions {
            summary_style: args.summary_style,
            include_examples: !args.no_examples,
        },
        concept_map: ConceptMapOptions {
            map_type: args.map_type,
            include_connections: !args.no_connections,
        },
        explanation: ExplanationOptions {
            explanation_level: args.level,
            include_examples: !args.no_examples,
            include_formulas: !args.no_formulas,
        },
        goal: args.goal.clone(),
    };

    match ChatMode::for_action(handoff.action) {
        Some(mode) => {
            let stdin = io::stdin();
            run_chat(
                &client,
                mode,
                handoff.selected_topics,
                options.goal.as_deref(),
                stdin.lock(),
                &mut io::stdout(),
            )
            .await?;
        }
        None => run_feature(&client, &handoff, &options, &mut io::stdout()).await?,
    }
    Ok(())
}

async fn handle_chat(config: &AppConfig, args: &ChatArgs) -> Result<()> {
    let store = session_store(config);
    let handoff = load_selection(&store, None)?;
    let mode = if args.socratic {
        ChatMode::Socratic
    } else {
        ChatMode::for_action(handoff.action).unwrap_or(ChatMode::AiChat)
    };
    let client = api_client(config)?;
    let stdin = io::stdin();
    run_chat(
        &client,
        mode,
        handoff.selected_topics,
        args.goal.as_deref(),
        stdin.lock(),
        &mut io::stdout(),
    )
    .await?;
    Ok(())
}

async fn handle_ask(config: &AppConfig, args: &AskArgs) -> Result<()> {
    let client = api_client(config)?;
    let response = client
        .chat(&ChatRequest {
            message: args.message.clone(),
            session_id: args.session_id.clone(),
            student_id: args.student_id.clone(),
            context: None,
            use_memory: true,
            stream: false,
        })
        .await?;
    println!("{}", response.response);
    for suggestion in &response.suggestions {
        println!("  • {suggestion}");
    }
    if let Some(session_id) = &response.session_id {
        println!("\nOturum: {session_id}");
    }
    Ok(())
}

async fn handle_questions(config: &AppConfig, args: &QuestionsArgs) -> Result<()> {
    let client = api_client(config)?;
    let response = client
        .generate_questions(&QuestionGenerationRequest {
            subject: args.subject.clone(),
            topic: args.topic.clone(),
            difficulty: args.difficulty,
            question_type: args.question_type,
            count: args.count,
            exam_type: args.exam_type,
        })
        .await?;
    print_json(&response)
}

async fn handle_study_plan(config: &AppConfig, args: &StudyPlanArgs) -> Result<()> {
    let student_profile: Map<String, Value> =
        serde_json::from_str(&args.profile).context("--profile must be a JSON object")?;
    let client = api_client(config)?;
    let response = client
        .generate_study_plan(&StudyPlanRequest {
            student_profile,
            target_exam: args.target_exam,
            duration_weeks: args.weeks,
            daily_hours: args.hours,
        })
        .await?;
    print_json(&response)
}

async fn handle_search(config: &AppConfig, args: &SearchArgs) -> Result<()> {
    let client = api_client(config)?;
    let response = client
        .search(&SearchRequest {
            query: args.query.clone(),
            collection_names: (!args.collections.is_empty()).then(|| args.collections.clone()),
            n_results: args.limit,
            ..Default::default()
        })
        .await?;
    print_json(&response)
}

async fn handle_analyze(config: &AppConfig, args: &AnalyzeArgs) -> Result<()> {
    let client = api_client(config)?;
    let response = match &args.target {
        AnalyzeTarget::Content { content } => {
            client
                .analyze_content(&AnalysisRequest {
                    content: content.clone(),
                    analysis_type: args.analysis_type.clone(),
                    include_suggestions: Some(true),
                })
                .await?
        }
        AnalyzeTarget::Web { url } => {
            client
                .analyze_web(&UrlAnalysisRequest {
                    url: url.clone(),
                    analysis_type: args.analysis_type.clone(),
                    custom_prompt: args.prompt.clone(),
                })
                .await?
        }
        AnalyzeTarget::Youtube { url } => {
            client
                .analyze_youtube(&UrlAnalysisRequest {
                    url: url.clone(),
                    analysis_type: args.analysis_type.clone(),
                    custom_prompt: args.prompt.clone(),
                })
                .await?
        }
        AnalyzeTarget::Document { file_path } => {
            client
                .analyze_document(&DocumentAnalysisRequest {
                    file_path: file_path.clone(),
                    analysis_type: args.analysis_type.clone(),
                    custom_prompt: args.prompt.clone(),
                    ..Default::default()
                })
                .await?
        }
    };
    print_json(&response)
}

async fn handle_upload(config: &AppConfig, args: &UploadArgs) -> Result<()> {
    let client = api_client(config)?;
    let response = client
        .upload_document(&args.file, &args.description, &args.analysis_type)
        .await?;
    print_json(&response)
}

async fn handle_memory(config: &AppConfig, args: &MemoryArgs) -> Result<()> {
    let client = api_client(config)?;
    let response = if args.clear {
        client.clear_conversation_memory(&args.session_id).await?
    } else {
        client.conversation_memory(&args.session_id).await?
    };
    print_json(&response)
}

async fn handle_curriculum(config: &AppConfig) -> Result<()> {
    let client = api_client(config)?;
    print_json(&client.curriculum().await?)
}

async fn handle_status(config: &AppConfig) -> Result<()> {
    let client = api_client(config)?;
    let health = client.health().await?;
    println!("Sağlık:");
    print_json(&health)?;
    println!("İstatistikler:");
    print_json(&client.stats().await?)?;
    println!("Koleksiyonlar:");
    print_json(&client.collections().await?)
}

