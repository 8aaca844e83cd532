use medibot::config::Config;
use medibot::database::{VectorDB, VectorIndex};
use medibot::document::{load_pdf_dir, TextSplitter};
use medibot::embeddings::{Embedder, MiniLmEmbedder};
use medibot::ingest::ingest_documents;
use medibot::llm::prompt::GREETING;
use medibot::llm::{DirectChat, RagChat, Retriever};
use medibot::providers::{ChatProvider, GeminiProvider, MistralProvider};

use std::sync::Arc;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use dotenv::dotenv;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ground answers in chunks retrieved from the vector index (Gemini).
    Rag,
    /// Skip retrieval; rely on the medical-only instruction (Mistral).
    Direct,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "MediBot - medical chatbot with retrieval-augmented answers")]
struct Args {
    /// Populate the vector index from a directory of PDFs instead of chatting.
    #[arg(long)]
    ingest: bool,

    /// Directory scanned for PDF files during ingestion.
    #[arg(long, default_value = "data")]
    data_dir: String,

    /// Which chat variant to run.
    #[arg(long, value_enum, default_value_t = Mode::Rag)]
    mode: Mode,
}

/// The two orchestrator variants behind one `ask` call for the input loop.
enum ChatSession {
    Rag(RagChat),
    Direct(DirectChat),
}

impl ChatSession {
    async fn ask(&mut self, question: &str) -> String {
        match self {
            ChatSession::Rag(chat) => chat.ask(question).await,
            ChatSession::Direct(chat) => chat.ask(question).await,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    colored::control::set_override(true);
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let config = Config::from_env()?;

    if args.ingest {
        run_ingest(&args, &config).await
    } else {
        run_chat(args.mode, &config).await
    }
}

async fn run_ingest(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("{}", "📚 Ingesting medical documents...".bright_cyan());

    let embedder = Arc::new(MiniLmEmbedder::new()?);
    let vector_db = VectorDB::new(&config.qdrant_url).await?;
    vector_db
        .create_collection(&config.collection_name, embedder.dimension() as u64)
        .await?;

    let documents = load_pdf_dir(&args.data_dir)?;
    println!("Loaded {} pages from {}", documents.len(), args.data_dir.bright_yellow());

    let splitter = TextSplitter::new(config.chunk_size, config.chunk_overlap);
    let count = ingest_documents(
        &documents,
        &splitter,
        embedder,
        Arc::new(vector_db),
        &config.collection_name,
    )
    .await?;

    println!(
        "{}",
        format!("✅ Indexed {} chunks into '{}'", count, config.collection_name).bright_green()
    );
    Ok(())
}

async fn run_chat(mode: Mode, config: &Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut session = match mode {
        Mode::Rag => {
            // Missing credentials must halt here, before any chat renders.
            let api_key = Config::gemini_api_key()?;

            println!("{}", "Loading medical knowledge...".bright_cyan());
            let embedder: Arc<dyn Embedder> = Arc::new(MiniLmEmbedder::new()?);
            let index: Arc<dyn VectorIndex> = Arc::new(VectorDB::new(&config.qdrant_url).await?);
            let retriever = Retriever::new(embedder, index, config.collection_name.clone());

            let provider: Arc<dyn ChatProvider> =
                Arc::new(GeminiProvider::new(api_key, config.gemini_model.clone()));

            println!("{}", "🩺 MediBot - Your Medical Assistant".bright_magenta().bold());
            println!("{}", "A friendly AI assistant for general medical information".dimmed());
            ChatSession::Rag(RagChat::new(retriever, provider))
        }
        Mode::Direct => {
            let api_key = Config::mistral_api_key()?;

            let provider: Arc<dyn ChatProvider> =
                Arc::new(MistralProvider::new(api_key, config.mistral_model.clone()));

            println!("{}", "🩺 Medical Chatbot".bright_magenta().bold());
            println!(
                "{}",
                "Ask only medical-related questions. Other topics will be politely declined."
                    .dimmed()
            );
            ChatSession::Direct(DirectChat::new(provider))
        }
    };

    println!("\n🩺 {}", GREETING.bright_green());

    // One blocking round trip per input line; no concurrent requests within
    // a session. Input is forwarded as-is, empty lines included.
    let mut rl = Editor::<(), DefaultHistory>::new()?;
    loop {
        match rl.readline("👤 ") {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let answer = session.ask(&line).await;
                println!("🩺 {}", answer.bright_green());
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
