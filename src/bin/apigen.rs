use std::{env, path::PathBuf, process::ExitCode};

use apigen::verify::verify_fingerprint;
use apigen::{generate_from_json, BoundaryError, CodegenResult, Framework, GeneratorConfig, Log, LogLevel};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct GenerateOptions {
    config: GeneratorConfig,
    out_dir: Option<PathBuf>,
    expect_fingerprint: Option<String>,
    log_level: LogLevel,
}

/// A failed run: either a usage problem or a generation failure with its trace.
enum CliError {
    Usage(String),
    Generation(BoundaryError, LogLevel),
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        CliError::Usage(message)
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run(env::args().collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage(err)) => {
            eprintln!("{err}");
            print_usage();
            ExitCode::FAILURE
        }
        Err(CliError::Generation(err, level)) => {
            eprintln!("{}", err.report(level));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Vec<String>) -> Result<(), CliError> {
    if args.len() < 3 {
        return Err("not enough arguments".to_string().into());
    }

    let command = args[1].as_str();
    let file = PathBuf::from(&args[2]);
    let options = parse_generate_options(&args[3..])?;

    match command {
        "generate" => run_generate(&file, &options),
        "check" => run_check(&file, &options),
        _ => Err(format!("unknown command '{command}'").into()),
    }
}

fn generate_checked(file: &PathBuf, options: &GenerateOptions) -> Result<CodegenResult, CliError> {
    let input = std::fs::read_to_string(file)
        .map_err(|e| format!("failed to read '{}': {e}", file.display()))?;
    let result = generate_from_json(&input, &options.config, Log::new())
        .unsafe_run()
        .map_err(|err| CliError::Generation(err, options.log_level))?;

    if let Some(expected) = &options.expect_fingerprint {
        verify_fingerprint(&result, expected).map_err(|error| {
            CliError::Generation(
                BoundaryError {
                    error,
                    log: Log::new(),
                },
                options.log_level,
            )
        })?;
    }
    Ok(result)
}

fn run_generate(file: &PathBuf, options: &GenerateOptions) -> Result<(), CliError> {
    let result = generate_checked(file, options)?;
    let files = result.files();

    let Some(output_dir) = &options.out_dir else {
        for generated in &files {
            println!("// {}", generated.path);
            println!("{}", generated.contents);
        }
        return Ok(());
    };

    for generated in &files {
        let dest = output_dir.join(&generated.path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create directory '{}': {e}", parent.display()))?;
        }
        std::fs::write(&dest, &generated.contents)
            .map_err(|e| format!("failed to write '{}': {e}", dest.display()))?;
        eprintln!("wrote: {}", dest.display());
    }

    eprintln!("Generated {} files in {}", files.len(), output_dir.display());
    Ok(())
}

fn run_check(file: &PathBuf, options: &GenerateOptions) -> Result<(), CliError> {
    let result = generate_checked(file, options)?;
    println!("support definitions: {}", result.support_definitions().len());
    println!("clients: {}", result.clients().len());
    println!("servers: {}", result.servers().len());
    println!("fingerprint: {}", result.fingerprint());
    Ok(())
}

fn parse_generate_options(args: &[String]) -> Result<GenerateOptions, String> {
    let mut config: Option<GeneratorConfig> = None;
    let mut package: Option<String> = None;
    let mut framework: Option<Framework> = None;
    let mut out_dir: Option<PathBuf> = None;
    let mut expect_fingerprint: Option<String> = None;
    let mut log_level = LogLevel::Info;
    let mut i = 0usize;

    while i < args.len() {
        let flag = args[i].as_str();
        let value = || {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match flag {
            "--config" => {
                let path = value()?;
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("failed to read config '{path}': {e}"))?;
                config = Some(GeneratorConfig::from_json_str(&text).map_err(|e| e.to_string())?);
            }
            "--package" => package = Some(value()?),
            "--framework" => {
                framework = Some(value()?.parse().map_err(|e: apigen::GenError| e.to_string())?)
            }
            "--out" => out_dir = Some(PathBuf::from(value()?)),
            "--expect-fingerprint" => expect_fingerprint = Some(value()?),
            "--log-level" => log_level = value()?.parse()?,
            other => return Err(format!("unknown option '{other}'")),
        }
        i += 2;
    }

    // Flags override the config file.
    let mut config = config.unwrap_or_default();
    if let Some(package) = package {
        config.package = package;
    }
    if let Some(framework) = framework {
        config.framework = framework;
    }

    Ok(GenerateOptions {
        config,
        out_dir,
        expect_fingerprint,
        log_level,
    })
}

fn print_usage() {
    eprintln!("usage:");
    eprintln!("  apigen generate <description.json> [options] [--out <dir>]");
    eprintln!("  apigen check <description.json> [options]");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --config <file>                generator config (JSON)");
    eprintln!("  --package <name>               Java package of the emitted units");
    eprintln!("  --framework jdk-http|jaxrs     target framework flavor");
    eprintln!("  --expect-fingerprint <digest>  fail unless the output hashes to sha256:<hex>");
    eprintln!("  --log-level debug|info|warning|error");
    eprintln!("                                 detail of the trace printed on failure");
    eprintln!();
    eprintln!("without --out, generate prints every file to stdout.");
}
