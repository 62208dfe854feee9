use clap::{CommandFactory, Parser};
use bin2hpp::codec::WordWidth;
use bin2hpp::document::DEFAULT_MAX_COLUMNS;
use bin2hpp::embed::{
    convert, default_output_path, self_test, EmbedOptions, SelfTestSource, DEFAULT_RANDOM_LEN,
    DEFAULT_SEED,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "bin2hpp", about = "Convert a binary file into a C++ header")]
struct Cli {
    /// Input file to convert
    input: Option<PathBuf>,
    /// Header to write (default: input with the extension replaced by .hpp)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Maximum number of columns in the literal block
    #[arg(short, long, default_value_t = DEFAULT_MAX_COLUMNS)]
    columns: usize,
    /// Literal width: 8, 16, 32, 64 (uint8_t .. uint64_t); anything else means 8
    #[arg(short, long, default_value = "8")]
    bit_width: usize,
    /// Aggregate name (default: output file stem)
    #[arg(short, long)]
    name: Option<String>,
    /// Append a generated reader (16, 32 and 64-bit widths only)
    #[arg(short, long)]
    decoder: bool,
    /// Run the round-trip self-test instead of writing a header
    #[arg(short, long)]
    selftest: bool,
    /// Print the self-test report as JSON
    #[arg(long, requires = "selftest")]
    json: bool,
    /// Seed for the self-test buffer when no input is given
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Length of the self-test buffer when no input is given
    #[arg(long, default_value_t = DEFAULT_RANDOM_LEN)]
    random_len: usize,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Bare invocation is a request for usage, not an error.
    if std::env::args_os().len() == 1 {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO })
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error : {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let opts = EmbedOptions {
        word_width:  WordWidth::from_bits(cli.bit_width),
        max_columns: cli.columns,
        struct_name: cli.name,
        decoder:     cli.decoder,
    };

    // ── Self-test ────────────────────────────────────────────────────────────
    if cli.selftest {
        let source = match cli.input {
            Some(path) => SelfTestSource::File(path),
            None       => SelfTestSource::Random { seed: cli.seed, len: cli.random_len },
        };
        let report = self_test(&source, &opts)?;
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("Tests results :");
            println!("{}", report.summary());
            for failure in &report.failures {
                println!("  failed : {failure}");
            }
        }
        return Ok(if report.all_passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE });
    }

    // ── Convert ──────────────────────────────────────────────────────────────
    let Some(input) = cli.input else {
        return Err("no input file given (see --help)".into());
    };
    let output = cli.output.unwrap_or_else(|| default_output_path(&input));
    let summary = convert(&input, &output, &opts)?;
    println!(
        "  {} → {}  ({} bytes, {} x {}, struct {}{})",
        input.display(),
        output.display(),
        summary.total_byte_count,
        summary.words,
        opts.word_width.type_name(),
        summary.struct_name,
        summary.encoding.label().map(|l| format!(", {l}")).unwrap_or_default(),
    );
    Ok(ExitCode::SUCCESS)
}
