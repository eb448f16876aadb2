use clap::{Args, Parser};

#[derive(Parser)]
#[command(author, version, about, long_about=None)]
struct Cli {
    #[command(flatten)]
    run: CliArgs,
}

#[derive(Args)]
struct CliArgs {
    file: std::path::PathBuf,

    /// CPU speed in instructions per second
    #[arg(short, long, default_value_t = chip8_interp::cpu::DEFAULT_CLOCK_HZ,
          value_parser = clap::value_parser!(u32).range(1..))]
    speed: u32,

    /// Log every executed instruction
    #[arg(short, long)]
    debug: bool,

    /// Mute audio
    #[arg(short, long)]
    mute: bool,

    /// Hexdump memory from START to STOP and exit
    #[arg(long, num_args = 2, value_names = ["START", "STOP"], value_parser = parse_address)]
    mem: Option<Vec<usize>>,
}

fn parse_address(arg: &str) -> Result<usize, String> {
    let parsed = match arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    parsed.map_err(|e| format!("invalid address `{}`: {}", arg, e))
}

fn main() {
    let cli = Cli::parse();
    let args = cli.run;

    let default_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config = chip8_interp::Config {
        rom: args.file,
        speed: args.speed,
        mute: args.mute,
        dump: args.mem.map(|range| (range[0], range[1])),
    };

    match chip8_interp::run(config) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(e.exit_code())
        }
    }
}
