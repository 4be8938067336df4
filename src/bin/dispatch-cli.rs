//! Diagnostics CLI for the method registry
//!
//! Registers a small demonstration service and lets you invoke its methods,
//! ask for name suggestions and list what is registered.
//!
//! ```text
//! dispatch-cli invoke greet '{"name": "henry"}'
//! dispatch-cli invoke calculator.add '[2, 3]'
//! dispatch-cli suggest calculater.add
//! dispatch-cli list
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dispatch_core::config::ConfigLoader;
use dispatch_core::logging::init_structured_logging;
use dispatch_core::registry::{BoundArgs, MethodDescriptor, MethodRegistry, MethodSource};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "dispatch-cli")]
#[command(about = "Invoke registered methods by name with JSON arguments")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Do not attach suggestions to method-not-found errors
    #[arg(long, global = true)]
    no_suggest: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke a method and print its JSON result
    Invoke(InvokeArgs),
    /// Print registered names close to NAME
    Suggest {
        name: String,
    },
    /// List registered methods with their parameters
    List,
}

#[derive(Args)]
struct InvokeArgs {
    /// Qualified method name
    method: String,

    /// Arguments as a JSON array or object
    #[arg(default_value = "[]")]
    args: String,
}

struct Calculator;

impl Calculator {
    fn add(&self, mut args: BoundArgs) -> Result<f64> {
        Ok(args.take::<f64>(0)? + args.take::<f64>(1)?)
    }

    fn divide(&self, mut args: BoundArgs) -> Result<f64> {
        let dividend: f64 = args.take(0)?;
        let divisor: f64 = args.take(1)?;
        anyhow::ensure!(divisor != 0.0, "division by zero");
        Ok(dividend / divisor)
    }
}

impl MethodSource for Calculator {
    fn methods(self: Arc<Self>) -> Vec<MethodDescriptor> {
        let add = MethodDescriptor::builder("add")
            .namespace("calculator")
            .param::<f64>("a")
            .param::<f64>("b")
            .owned_by(Arc::clone(&self), Calculator::add)
            .build();
        let divide = MethodDescriptor::builder("divide")
            .namespace("calculator")
            .param::<f64>("dividend")
            .param::<f64>("divisor")
            .owned_by(self, Calculator::divide)
            .build();
        [add, divide].into_iter().filter_map(Result::ok).collect()
    }
}

fn demo_registry(cli: &Cli) -> Result<MethodRegistry> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().context("loading configuration")?;
    if cli.no_suggest {
        config.suggest_methods = false;
    }

    let mut registry = MethodRegistry::from_config(config);
    registry.register(
        MethodDescriptor::builder("greet")
            .param_with_default("name", || "stranger".to_string())
            .handler(|mut args| Ok(format!("Hello {}", args.take::<String>(0)?)))
            .build()?,
    );
    registry.register(
        MethodDescriptor::builder("echo")
            .nullable_param::<Value>("value")
            .handler(|mut args| args.take::<Option<Value>>(0))
            .build()?,
    );
    registry.scan(Arc::new(Calculator));
    Ok(registry)
}

fn main() -> Result<ExitCode> {
    init_structured_logging();
    let cli = Cli::parse();
    let registry = demo_registry(&cli)?;

    match &cli.command {
        Commands::Invoke(args) => {
            let document: Value =
                serde_json::from_str(&args.args).context("arguments are not valid JSON")?;
            match registry.invoke(&args.method, &document) {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(error) => {
                    eprintln!("error: {error}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Commands::Suggest { name } => {
            for suggestion in registry.suggest_methods(name) {
                println!("{suggestion}");
            }
        }
        Commands::List => {
            for name in registry.method_names() {
                let Some(method) = registry.get(&name) else {
                    continue;
                };
                let params: Vec<String> = method
                    .parameters()
                    .iter()
                    .map(|p| {
                        let marker = if p.has_default() { "?" } else { "" };
                        format!("{}{marker}: {}", p.name(), p.target())
                    })
                    .collect();
                println!("{name}({}) -> {}", params.join(", "), method.return_type());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
