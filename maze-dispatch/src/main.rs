use clap::{Parser, Subcommand, ValueEnum};
use maze_core::{Coordinate, Dimension};
use maze_dispatch::{solve_standalone, Steps};

#[derive(Parser)]
#[command(name = "maze-cli", about = "Solve a maze from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a maze described entirely on the command line.
    Solve {
        /// Grid size as WIDTHxHEIGHT, e.g. "10x8".
        #[arg(long)]
        dimension: String,

        /// Entrance coordinate label, e.g. "A1".
        #[arg(long)]
        entrance: String,

        /// Comma-separated wall coordinate labels, e.g. "B2,C3,D4".
        #[arg(long, default_value = "")]
        walls: String,

        /// Which path to report: the shortest route out, or the
        /// longest simple route that still reaches the exit.
        #[arg(long, value_enum, default_value_t = StepsArg::Min)]
        steps: StepsArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StepsArg {
    Min,
    Max,
}

impl From<StepsArg> for Steps {
    fn from(value: StepsArg) -> Self {
        match value {
            StepsArg::Min => Steps::Min,
            StepsArg::Max => Steps::Max,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Solve {
            dimension,
            entrance,
            walls,
            steps,
        } => solve_command(&dimension, &entrance, &walls, steps.into()),
    }
}

fn solve_command(dimension: &str, entrance: &str, walls: &str, steps: Steps) {
    let dimension = match Dimension::parse(dimension) {
        Ok(d) => d,
        Err(e) => fail(&format!("invalid dimension: {e}")),
    };

    let entrance = match Coordinate::parse(entrance) {
        Ok(c) => c,
        Err(e) => fail(&format!("invalid entrance: {e}")),
    };

    let walls: Vec<Coordinate> = match parse_walls(walls) {
        Ok(w) => w,
        Err(e) => fail(&format!("invalid walls: {e}")),
    };

    match solve_standalone(dimension, entrance, walls, steps) {
        Ok(path) => {
            let rendered: Vec<String> = path.iter().map(Coordinate::label).collect();
            println!("{}", rendered.join(" -> "));
        }
        Err(e) => fail(&e.to_string()),
    }
}

fn parse_walls(walls: &str) -> Result<Vec<Coordinate>, maze_core::CoreError> {
    walls
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Coordinate::parse)
        .collect()
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}
