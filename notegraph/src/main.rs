use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use dotenv::dotenv;

mod cli;
mod config;
mod controllers;
mod notes;

use cli::{Cli, Command, ServeArgs};
use notes::query;
use notes::NoteCache;

pub struct AppState {
    pub cache: Arc<NoteCache>,
}

#[actix_web::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let notes_dir = config::notes_dir()?;

    match cli.command {
        Command::Home => println!("{}", notes_dir.display()),
        Command::New => println!("{}", notes::file_ops::new_note_path(&notes_dir).display()),
        Command::List(args) => {
            let cache = NoteCache::new(notes_dir);
            cache.rebuild()?;
            let snapshot = cache.snapshot();
            for row in query::list(&snapshot, &args.to_options()) {
                println!("{}", row);
            }
        }
        Command::Links(args) => {
            let cache = NoteCache::new(notes_dir);
            cache.rebuild()?;
            let snapshot = cache.snapshot();
            let rows = if let Some(filename) = &args.filename {
                query::links_for(&snapshot, filename, args.direction())?
            } else if args.dangling {
                query::dangling_links(&snapshot)
            } else {
                query::all_links(&snapshot)
            };
            for row in rows {
                println!("{}", row);
            }
        }
        Command::Serve(args) => serve(notes_dir, args).await?,
    }
    Ok(())
}

async fn serve(notes_dir: PathBuf, args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cache = Arc::new(NoteCache::with_read_only(notes_dir, args.read_only));

    // Build the first snapshot before accepting requests; later rebuilds
    // happen after each successful note update.
    cache.rebuild()?;

    log::info!("notegraph v{}", controllers::health::VERSION);
    log::info!(
        "Serving {} notes from {:?}{}",
        cache.snapshot().len(),
        cache.notes_dir(),
        if cache.read_only() { " (read-only)" } else { "" }
    );

    let port = args.port;
    let shared = Arc::clone(&cache);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(AppState {
                cache: Arc::clone(&shared),
            }))
            .wrap(cors)
            .wrap(Logger::default())
            .configure(controllers::health::config_routes)
            .configure(controllers::notes::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    Ok(())
}
