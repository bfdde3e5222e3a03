use crate::{tools::FunctionFactory, web, Agent};
use clap::{Arg, ArgAction, Command};
use std::env;
use tracing::{error, info};

/// CLI entry point for the finlegal tool
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("finlegal")
        .version("0.1.0")
        .about("Finance and legal aid agent for MSMEs and consumers (Mistral tool calling)")
        .arg(
            Arg::new("prompt")
                .help("The query to send to the agent (omit with --serve)")
                .index(1),
        )
        .arg(
            Arg::new("serve")
                .long("serve")
                .action(ArgAction::SetTrue)
                .help("Start the web form server instead of running a one-shot query"),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port for the web server (or set PORT env var)"),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .value_name("MODEL")
                .help("The Mistral model to use")
                .default_value("mistral-large-latest"),
        )
        .arg(
            Arg::new("api-key")
                .short('k')
                .long("api-key")
                .value_name("KEY")
                .help("Mistral API key (or set MISTRAL_API_KEY env var)"),
        )
        .arg(
            Arg::new("base-url")
                .short('u')
                .long("base-url")
                .value_name("URL")
                .help("Mistral base URL (or set MISTRAL_BASE_URL env var)"),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .value_name("SECONDS")
                .help("Request timeout in seconds")
                .default_value("120"),
        )
        .arg(
            Arg::new("max-iterations")
                .short('i')
                .long("max-iterations")
                .value_name("COUNT")
                .help("Maximum agent iterations per turn")
                .default_value("10"),
        )
        .arg(
            Arg::new("language")
                .short('l')
                .long("language")
                .value_name("LANGUAGE")
                .help("Preferred response language (English or Hindi)")
                .default_value("English"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help("Print the execution trace after the answer"),
        )
        .get_matches();

    // Get API key from argument or environment
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("MISTRAL_API_KEY").ok())
        .ok_or("Mistral API key is required. Set MISTRAL_API_KEY environment variable or use --api-key")?;

    // Resolve base URL from CLI or environment
    let base_url = matches
        .get_one::<String>("base-url")
        .cloned()
        .or_else(|| env::var("MISTRAL_BASE_URL").ok())
        .unwrap_or_else(|| "https://api.mistral.ai/v1".to_string());

    let timeout_seconds: u64 = matches.get_one::<String>("timeout").unwrap().parse()?;
    let max_iterations: usize = matches
        .get_one::<String>("max-iterations")
        .unwrap()
        .parse()?;

    let agent = Agent::new(api_key, FunctionFactory::with_default_tools())
        .with_model(matches.get_one::<String>("model").unwrap().as_str())
        .with_timeout(std::time::Duration::from_secs(timeout_seconds))
        .with_max_iterations(max_iterations)
        .with_base_url(base_url.clone());

    if matches.get_flag("serve") {
        let port: u16 = matches
            .get_one::<String>("port")
            .cloned()
            .or_else(|| env::var("PORT").ok())
            .unwrap_or_else(|| "8080".to_string())
            .parse()?;

        info!("Starting web form server on port {}", port);
        info!("Base URL: {}", base_url);
        return web::start_server(agent, port).await;
    }

    let prompt = matches
        .get_one::<String>("prompt")
        .ok_or("A query is required unless --serve is given")?;
    let language = matches.get_one::<String>("language").unwrap();

    info!("Running agent with query: {}", prompt);
    info!(
        "Using model: {}",
        matches.get_one::<String>("model").unwrap()
    );
    info!("Base URL: {}", base_url);

    let mut memory = crate::ConversationMemory::with_default_system();
    let input = format!("{} in {}", prompt, language);

    match agent.run_turn(&mut memory, &input).await {
        Ok(result) => {
            println!("\nAgent Response:\n{}", result.output);
            if matches.get_flag("trace") {
                println!("\n{}", result.replay());
            }
            info!("Agent execution completed successfully");
        }
        Err(e) => {
            error!("Agent execution failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
