use std::process::ExitCode;

use clap::Parser;
use learn_web::{AuthError, Command, Config, Error, load_catalog, logging};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    let _guard = match logging::init(&config.data_dir(), &config.log_level) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let result = match &config.command {
        None => run_tui(&config).await,
        Some(Command::Validate { file }) => validate(file),
        Some(Command::Whoami) => whoami(&config).await,
        Some(Command::Logout) => logout(&config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "exiting with error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_tui(config: &Config) -> Result<(), Error> {
    let app = learn_web::build_app(config)?;
    learn_web::run(app).await
}

fn validate(file: &std::path::Path) -> Result<(), Error> {
    let catalog = load_catalog(file)?;
    println!("{} is valid", file.display());
    println!("  topics:             {}", catalog.topics.len());
    println!("  quiz categories:    {}", catalog.quiz.len());
    println!("  quiz questions:     {}", catalog.question_count());
    println!("  practice questions: {}", catalog.practice_count());
    Ok(())
}

async fn whoami(config: &Config) -> Result<(), Error> {
    let store = learn_web::open_store(config)?;
    let mut auth = learn_web::auth_facade(config, store);
    auth.restore();

    match auth.verify_token().await {
        Ok(user) => {
            println!("{} <{}>", user.name(), user.email);
            Ok(())
        }
        Err(AuthError::NotAuthenticated) => {
            println!("Not logged in");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn logout(config: &Config) -> Result<(), Error> {
    let store = learn_web::open_store(config)?;
    let mut auth = learn_web::auth_facade(config, store);
    if !auth.restore().is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }

    auth.logout().await?;
    println!("Logged out");
    Ok(())
}
