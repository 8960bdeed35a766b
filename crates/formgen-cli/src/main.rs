//! formgen CLI.
//!
//! Generates Angular reactive forms from an OpenAPI v2 or v3 spec.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{ArgAction, Args, Parser, Subcommand};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use tracing_subscriber::EnvFilter;

use formgen_compiler::{loader, Compiler, CompilerConfig};

mod ui;

#[derive(Parser)]
#[command(name = "formgen")]
#[command(about = "Generates Angular ReactiveForms from an OpenAPI v2 or v3 spec")]
#[command(after_help = "Examples:\n  \
    formgen generate -i https://petstore.swagger.io/v2/swagger.json -o petstore-forms\n  \
    formgen generate -i swagger.yaml -o project/form/src/lib -m")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the spec comes from and where forms go.
#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// Location of the OpenAPI spec as a URL or file path
    #[arg(short, long = "input-spec", visible_alias = "swagger-url")]
    input: String,

    /// Where to write the generated files
    #[arg(short, long, visible_alias = "out-dir", default_value = ".")]
    output: PathBuf,

    /// Generated file name (defaults to the camel-cased spec title, then forms.ts)
    #[arg(short, long, visible_alias = "out-file")]
    file_name: Option<String>,

    /// Generate one file per definition
    #[arg(short, long, visible_alias = "multi")]
    multiple_files: bool,
}

impl GenerateArgs {
    fn config(&self) -> CompilerConfig {
        CompilerConfig {
            input: self.input.clone(),
            out_dir: self.output.clone(),
            file_name: self.file_name.clone(),
            multiple_files: self.multiple_files,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate form files from a spec
    Generate(GenerateArgs),

    /// Load and compile a spec without writing anything
    Check {
        /// Location of the OpenAPI spec as a URL or file path
        #[arg(short, long = "input-spec", visible_alias = "swagger-url")]
        input: String,
    },

    /// Regenerate whenever the spec file changes
    Watch(GenerateArgs),
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate(args) => generate(&args).await?,
        Commands::Check { input } => check(&input).await?,
        Commands::Watch(args) => run_watch_mode(&args).await?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Generate forms once.
async fn generate(args: &GenerateArgs) -> miette::Result<()> {
    let start = Instant::now();
    let spinner = ui::spinner(&format!("Generating forms from {}...", args.input));

    let compiler = Compiler::new(args.config());
    let result = compiler.compile().await;
    spinner.finish_and_clear();

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            ui::nope_header();
            return Err(e.into());
        }
    };

    ui::success(&format!(
        "Generated {} form(s) {} {} control(s)",
        result.forms,
        ui::symbols::DOT,
        result.controls
    ));
    for file in &result.files {
        ui::file_line(&file.display().to_string());
    }
    println!();
    ui::timing("Completed", start.elapsed().as_millis());

    Ok(())
}

/// Compile without writing and print a per-form summary.
async fn check(input: &str) -> miette::Result<()> {
    let spinner = ui::spinner("Checking spec...");

    let compiler = Compiler::new(CompilerConfig {
        input: input.to_string(),
        ..CompilerConfig::default()
    });

    let forms = match compiler.check().await {
        Ok(forms) => {
            spinner.finish_and_clear();
            forms
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::nope_header();
            return Err(e.into());
        }
    };

    ui::looking_good();
    println!();

    ui::box_header("FORMS");
    ui::box_line("");
    let largest = forms.iter().map(|f| f.control_count()).max().unwrap_or(1);
    for form in &forms {
        ui::form_line(&form.ident, form.control_count(), largest);
    }
    ui::box_line("");
    ui::box_footer();
    println!();

    println!(
        "    {} forms {} {} controls {} rules: {}",
        forms.len(),
        ui::symbols::DOT,
        forms.iter().map(|f| f.control_count()).sum::<usize>(),
        ui::symbols::DOT,
        compiler.rules().names().join(", ")
    );

    Ok(())
}

/// Regenerate on every change to the spec file until Ctrl-C.
async fn run_watch_mode(args: &GenerateArgs) -> miette::Result<()> {
    if loader::is_url(&args.input) {
        return Err(miette::miette!(
            "Watch mode needs a local spec file, got a URL: {}",
            args.input
        ));
    }

    let spec_path = PathBuf::from(&args.input);
    let spec_name = spec_path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| miette::miette!("Not a file: {}", args.input))?;
    // Watch the directory: editors often replace the file instead of writing it in place.
    let watch_dir = spec_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let compiler = Compiler::new(args.config());
    rebuild(&compiler, "Initial generation...").await;
    println!();

    // Channel for file change events
    let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(1);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    if events
                        .iter()
                        .any(|event| event.path.file_name() == Some(spec_name.as_os_str()))
                    {
                        let _ = tx.try_send(());
                    }
                }
                Err(e) => tracing::warn!(error = %e, "file watcher error"),
            }
        },
    )
    .map_err(|e| miette::miette!("Failed to create file watcher: {}", e))?;

    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| miette::miette!("Failed to watch {}: {}", watch_dir.display(), e))?;

    ui::info(&format!("Watching for changes in {}", spec_path.display()));
    ui::info("Ready! Waiting for changes...");

    loop {
        tokio::select! {
            Some(()) = rx.recv() => {
                println!();
                rebuild(&compiler, "Change detected, regenerating...").await;
                println!();
                ui::info("Ready! Waiting for changes...");
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                ui::dim("Stopping watch mode.");
                break;
            }
        }
    }

    Ok(())
}

/// One watch-mode generation; failures are reported, not fatal.
async fn rebuild(compiler: &Compiler, message: &str) {
    let spinner = ui::spinner(message);
    let start = Instant::now();

    match compiler.compile().await {
        Ok(result) => {
            spinner.finish_and_clear();
            ui::success(&format!(
                "Generated {} form(s) in {}ms",
                result.forms,
                start.elapsed().as_millis()
            ));
        }
        Err(e) => {
            spinner.finish_and_clear();
            ui::error(&format!("{}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_flags() {
        let cli = Cli::try_parse_from([
            "formgen", "generate", "-i", "swagger.json", "-o", "out", "-f", "api.ts", "-m",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let config = args.config();
        assert_eq!(config.input, "swagger.json");
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.file_name.as_deref(), Some("api.ts"));
        assert!(config.multiple_files);
    }

    #[test]
    fn test_generate_long_aliases() {
        let cli = Cli::try_parse_from([
            "formgen", "generate", "--swagger-url", "spec.yaml", "--out-dir", "forms", "--multi",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.input, "spec.yaml");
        assert_eq!(args.output, PathBuf::from("forms"));
        assert!(args.multiple_files);
        assert_eq!(args.file_name, None);
    }

    #[test]
    fn test_output_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["formgen", "generate", "--input-spec", "a.json"]).unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.output, PathBuf::from("."));
        assert!(!args.multiple_files);
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["formgen", "generate"]).is_err());
        assert!(Cli::try_parse_from(["formgen", "check"]).is_err());
    }

    #[test]
    fn test_verbosity_is_global() {
        let cli = Cli::try_parse_from(["formgen", "check", "-i", "a.json", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
