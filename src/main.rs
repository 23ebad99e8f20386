use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use pinmap::config::Config;
use pinmap::db::Database;
use pinmap::import::AssetImporter;
use pinmap::logging;
use pinmap::picker::FilePicker;
use pinmap::screens::{DetailScreen, MapScreen};

enum Command {
    Add { latitude: f64, longitude: f64 },
    List,
    Show { point_id: String },
    Import { point_id: String, files: Vec<PathBuf> },
}

struct Args {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args() -> Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config_path = None;
    let mut rest = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("pinmap {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--config" | "-c" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--config requires a path argument");
                };
                config_path = Some(PathBuf::from(path));
                i += 1;
            }
            _ => rest.push(args[i].clone()),
        }
        i += 1;
    }

    let command = match rest.first().map(String::as_str) {
        Some("add") if rest.len() == 3 => Command::Add {
            latitude: rest[1].parse().context("latitude must be a number")?,
            longitude: rest[2].parse().context("longitude must be a number")?,
        },
        Some("list") => Command::List,
        Some("show") if rest.len() == 2 => Command::Show {
            point_id: rest[1].clone(),
        },
        Some("import") if rest.len() >= 3 => Command::Import {
            point_id: rest[1].clone(),
            files: rest[2..].iter().map(PathBuf::from).collect(),
        },
        _ => {
            print_help();
            std::process::exit(1);
        }
    };

    Ok(Args {
        config_path,
        command,
    })
}

fn print_help() {
    println!(
        r#"pinmap - pins on a map with photos attached

USAGE:
    pinmap [OPTIONS] <COMMAND>

COMMANDS:
    add <latitude> <longitude>     Drop a new pin
    list                           List pins with their photos
    show <point-id>                Show the photos of one pin
    import <point-id> <file>...    Copy images into the library for a pin

OPTIONS:
    --config, -c PATH   Path to config file
    --version, -V       Show version
    --help, -h          Show this help message

ENVIRONMENT:
    PINMAP_CONFIG       Path to config file (overrides default location)
    PINMAP_LOG          Log level (trace, debug, info, warn, error)

Config file location: $XDG_CONFIG_HOME/pinmap/config.toml"#
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    let _ = logging::init(None);

    let config = match args.config_path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load()?,
    };

    let db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open database {}", config.db_path.display()))?;

    let result = run(&db, &config, args.command);
    db.close()?;
    result
}

fn run(db: &Database, config: &Config, command: Command) -> Result<()> {
    let mut map = MapScreen::open(db).context("Failed to initialize storage")?;

    match command {
        Command::Add {
            latitude,
            longitude,
        } => {
            let point = map.long_press(latitude, longitude)?;
            println!("{}", point.id);
        }
        Command::List => {
            for point in map.points() {
                println!(
                    "{}\t{:.6}\t{:.6}\t{} photo(s)",
                    point.id,
                    point.latitude,
                    point.longitude,
                    point.images.len()
                );
            }
        }
        Command::Show { point_id } => {
            let Some(point) = db.get_point(&point_id)? else {
                bail!("point not found: {}", point_id);
            };
            println!("{}\t{:.6}\t{:.6}", point.id, point.latitude, point.longitude);
            for uri in &point.images {
                println!("  {}", uri);
            }
        }
        Command::Import { point_id, files } => {
            let Some(route) = map.press_marker(&point_id) else {
                bail!("point not found: {}", point_id);
            };
            let mut detail = DetailScreen::open(db, &route)?;
            let importer = AssetImporter::new(&config.media_dir);
            let picker = FilePicker::new(files, &config.picker.image_extensions);

            let Some(report) = detail.add_images(db, &importer, &picker)? else {
                println!("No images selected");
                return Ok(());
            };
            map.receive_update(&detail.save());

            for imported in &report.imported {
                println!("{} -> {}", imported.source.display(), imported.photo.uri);
            }
            for (source, reason) in &report.failed {
                eprintln!("failed: {}: {}", source.display(), reason);
            }
            if !report.is_complete() {
                bail!(
                    "imported {} of {} images",
                    report.imported.len(),
                    report.imported.len() + report.failed.len()
                );
            }
        }
    }

    Ok(())
}
