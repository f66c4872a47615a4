use clap::{ArgGroup, Parser, Subcommand};
use meet_core::export::{write_heat_sheet_file, write_results_file};
use meet_core::meet::find_race;
use meet_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "meetbook")]
#[command(about = "Swim meet program and results engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the numbered race program
    Program {
        /// Meet file (JSON)
        #[arg(long)]
        meet: PathBuf,

        /// Discard the saved custom order first
        #[arg(long)]
        reset: bool,
    },

    /// Move a race one slot up or down and save the order
    #[command(group(ArgGroup::new("direction").required(true).args(["up", "down"])))]
    Move {
        #[arg(long)]
        meet: PathBuf,

        /// Acara number of the race to move
        #[arg(long)]
        acara: u32,

        #[arg(long)]
        up: bool,

        #[arg(long)]
        down: bool,
    },

    /// Seed heats and assign lanes
    Heats {
        #[arg(long)]
        meet: PathBuf,

        /// Only this race
        #[arg(long)]
        acara: Option<u32>,

        /// Seed for the random tie-break (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Also write the heat sheet to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Rank results and award medals
    Results {
        #[arg(long)]
        meet: PathBuf,

        /// Only this race
        #[arg(long)]
        acara: Option<u32>,

        /// Also write the results to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Medal tables
    Medals {
        #[arg(long)]
        meet: PathBuf,

        /// Club table instead of swimmers
        #[arg(long, conflicts_with = "best")]
        clubs: bool,

        /// Best swimmer of each category and gender
        #[arg(long)]
        best: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    meet_core::logging::init_with_level(meet_core::logging::level_for_verbosity(cli.verbose));

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    tracing::debug!("Custom orders under {:?}", config.data.order_dir());

    match cli.command {
        Commands::Program { meet, reset } => cmd_program(&meet, reset, &config),
        Commands::Move {
            meet,
            acara,
            up,
            down: _,
        } => {
            let direction = if up { Direction::Up } else { Direction::Down };
            cmd_move(&meet, acara, direction, &config)
        }
        Commands::Heats {
            meet,
            acara,
            seed,
            csv,
        } => cmd_heats(&meet, acara, seed, csv.as_deref(), &config),
        Commands::Results { meet, acara, csv } => {
            cmd_results(&meet, acara, csv.as_deref(), &config)
        }
        Commands::Medals { meet, clubs, best } => cmd_medals(&meet, clubs, best, &config),
    }
}

fn order_store(config: &Config) -> JsonOrderStore {
    JsonOrderStore::new(config.data.order_dir())
}

fn load_program(meet: &Meet, config: &Config) -> Result<Vec<Race>> {
    let sequencer = ProgramSequencer::from_config(&config.program);
    meet.program(&order_store(config), &sequencer)
}

/// The whole program, or just the requested race
fn select(program: Vec<Race>, acara: Option<u32>) -> Result<Vec<Race>> {
    match acara {
        Some(number) => Ok(vec![find_race(&program, number)?.clone()]),
        None => Ok(program),
    }
}

fn cmd_program(meet_path: &Path, reset: bool, config: &Config) -> Result<()> {
    let meet = Meet::load(meet_path)?;

    if reset {
        meet.reset_program(&mut order_store(config))?;
        println!("✓ Custom order cleared");
    }

    let program = load_program(&meet, config)?;
    print_header(&meet);
    if program.is_empty() {
        println!("No races.");
        return Ok(());
    }
    for race in &program {
        println!("  Acara {:>3}  {}", race.acara_number, race.key);
    }
    Ok(())
}

fn cmd_move(meet_path: &Path, acara: u32, direction: Direction, config: &Config) -> Result<()> {
    let meet = Meet::load(meet_path)?;
    let sequencer = ProgramSequencer::from_config(&config.program);
    let mut store = order_store(config);

    let program = meet.move_race(&mut store, &sequencer, acara, direction)?;

    println!("✓ Program order saved");
    for race in &program {
        println!("  Acara {:>3}  {}", race.acara_number, race.key);
    }
    Ok(())
}

fn cmd_heats(
    meet_path: &Path,
    acara: Option<u32>,
    seed: Option<u64>,
    csv: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let meet = Meet::load(meet_path)?;
    let races = select(load_program(&meet, config)?, acara)?;

    let mut builder = HeatBuilder::from_config(&config.heats);
    if let Some(seed) = seed {
        builder = builder.with_seed(seed);
    }

    let sheets = meet.heat_sheets(&races, &builder);
    print_header(&meet);
    for sheet in &sheets {
        println!();
        println!("Acara {} - {}", sheet.race.acara_number, sheet.race.key);
        if sheet.heats.is_empty() {
            println!("  (no seeded entrants)");
        }
        for heat in &sheet.heats {
            println!("  Heat {}", heat.heat_number);
            for (lane, entrant) in heat.occupied() {
                println!(
                    "    Lane {}  {:<24} {:<16} {}",
                    lane,
                    entrant.name(),
                    entrant.club(),
                    time::format_time(entrant.entry.seed_ms())
                );
            }
        }
    }

    if let Some(path) = csv {
        let rows = write_heat_sheet_file(path, &sheets)?;
        println!();
        println!("✓ Wrote {} lanes to {}", rows, path.display());
    }
    Ok(())
}

fn cmd_results(
    meet_path: &Path,
    acara: Option<u32>,
    csv: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let meet = Meet::load(meet_path)?;
    let races = select(load_program(&meet, config)?, acara)?;
    let book = meet.results_book(&races, &config.results.excluded_remarks);

    print_header(&meet);
    for result in &book {
        println!();
        println!("Acara {} - {}", result.race.acara_number, result.race.key);
        for entry in &result.entries {
            let place = entry
                .rank
                .map_or_else(|| "-".to_string(), |r| r.to_string());
            let time = if entry.final_ms > 0 {
                time::format_time(entry.final_ms)
            } else {
                "--:--.--".to_string()
            };
            let note = match (entry.medal, entry.entrant.entry.remark) {
                (Some(medal), _) => medal.to_string(),
                (None, Some(remark)) => remark.to_string(),
                (None, None) => String::new(),
            };
            println!(
                "  {:>3}  {:<24} {:<16} {}  {}",
                place,
                entry.entrant.name(),
                entry.entrant.club(),
                time,
                note
            );
        }
    }

    if let Some(path) = csv {
        let rows = write_results_file(path, &book)?;
        println!();
        println!("✓ Wrote {} results to {}", rows, path.display());
    }
    Ok(())
}

fn cmd_medals(meet_path: &Path, clubs: bool, best: bool, config: &Config) -> Result<()> {
    let meet = Meet::load(meet_path)?;
    let program = load_program(&meet, config)?;
    let book = meet.results_book(&program, &config.results.excluded_remarks);

    print_header(&meet);
    if clubs {
        println!("Club medal table");
        for tally in tabulate_clubs(&book) {
            println!("  {:>3}  {:<24} {}", tally.rank, tally.club, counts(&tally.medals));
        }
    } else if best {
        println!("Best swimmers");
        for group in best_swimmers(&book) {
            println!("  {} {}", group.category, group.gender);
            for swimmer in &group.swimmers {
                println!(
                    "       {:<24} {:<16} {}",
                    swimmer.name,
                    swimmer.club,
                    counts(&swimmer.medals)
                );
            }
        }
    } else {
        println!("Swimmer medal table");
        for tally in tabulate_swimmers(&book) {
            println!(
                "  {:>3}  {:<24} {:<16} {}",
                tally.rank,
                tally.name,
                tally.club,
                counts(&tally.medals)
            );
        }
    }
    Ok(())
}

fn counts(medals: &MedalCount) -> String {
    format!(
        "G{} S{} B{} ({})",
        medals.gold,
        medals.silver,
        medals.bronze,
        medals.total()
    )
}

fn print_header(meet: &Meet) {
    let event = meet.event();
    let name = if event.name.is_empty() {
        &event.id
    } else {
        &event.name
    };
    println!("{} ({})", name, event.event_date);
}
