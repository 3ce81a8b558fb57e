use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Deserialize;
use serde_json::Value;
use tracing_subscriber::prelude::*;

use foundry_config::{accessor, Config, FieldPath, ViewFormat};
use foundry_core::{
    ConfigStore, GenerationService, ResultDescriptor, SchemaDefaults, SeedPolicy, ServiceError,
    StoreSettings,
};
use foundry_schema::{schema, SchemaValidator, ValidationIssue, ValidationResult, Variant};

const DEFAULT_LOG_FILTER: &str = "info";

fn cli() -> Command {
    let variant = || {
        Arg::new("variant")
            .required(true)
            .value_parser(value_parser!(Variant))
            .help("Asset type: npc_portrait, weapon_item, environment_concept (or npc, weapon, environment)")
    };
    let format = || {
        Arg::new("format")
            .long("format")
            .default_value("json")
            .value_parser(value_parser!(ViewFormat))
            .help("Output format: json or yaml")
    };

    Command::new("foundry")
        .version(foundry_core::VERSION)
        .about("Asset Foundry configuration engine")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines on stderr"),
        )
        .subcommand(
            Command::new("defaults")
                .about("Print the default config of an asset type")
                .arg(variant())
                .arg(format())
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .conflicts_with("random-seed")
                        .help("Seed to place in the config (default 42)"),
                )
                .arg(
                    Arg::new("random-seed")
                        .long("random-seed")
                        .action(ArgAction::SetTrue)
                        .help("Pick a random seed"),
                ),
        )
        .subcommand(
            Command::new("fields")
                .about("List the declared fields of an asset type")
                .arg(variant()),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a JSON or YAML config file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .help("Config file; .yaml/.yml is read as YAML, anything else as JSON"),
                ),
        )
        .subcommand(
            Command::new("batch")
                .about("Validate named override sets merged onto the default config")
                .arg(variant())
                .arg(
                    Arg::new("file")
                        .required(true)
                        .help("JSON or YAML file: {\"variants\": [{\"name\": ..., \"parameters\": {...}}]}"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed of the base config (default 42)"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Load an asset type, apply edits and validate the result")
                .arg(variant())
                .arg(
                    Arg::new("set")
                        .long("set")
                        .action(ArgAction::Append)
                        .value_name("PATH=VALUE")
                        .help("Field edit; VALUE is parsed as JSON, falling back to a string"),
                )
                .arg(
                    Arg::new("settings")
                        .long("settings")
                        .value_name("FILE")
                        .help("Store settings TOML"),
                )
                .arg(
                    Arg::new("generate")
                        .long("generate")
                        .action(ArgAction::SetTrue)
                        .help("Run a dry-run generation if the config is valid"),
                ),
        )
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
    if let Err(err) = result {
        eprintln!("logging disabled: {err}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("log-json"));

    let passed = match matches.subcommand() {
        Some(("defaults", args)) => defaults(args),
        Some(("fields", args)) => fields(args),
        Some(("validate", args)) => validate(args)?,
        Some(("batch", args)) => batch(args)?,
        Some(("edit", args)) => edit(args).await?,
        _ => true,
    };
    std::process::exit(if passed { 0 } else { 1 });
}

fn variant_arg(args: &ArgMatches) -> Variant {
    args.get_one::<Variant>("variant")
        .copied()
        .unwrap_or(Variant::NpcPortrait)
}

fn defaults(args: &ArgMatches) -> bool {
    let variant = variant_arg(args);
    let format = args.get_one::<ViewFormat>("format").copied().unwrap_or_default();
    let policy = if args.get_flag("random-seed") {
        SeedPolicy::Random
    } else {
        args.get_one::<u64>("seed")
            .map_or_else(SeedPolicy::default, |seed| SeedPolicy::Fixed(*seed))
    };
    let config = SchemaDefaults::new()
        .with_seed_policy(policy)
        .defaults_for(variant);
    println!("{}", format.render(&config));
    true
}

fn fields(args: &ArgMatches) -> bool {
    let schema = schema(variant_arg(args));
    let width = schema
        .fields()
        .iter()
        .map(|spec| spec.path().len())
        .max()
        .unwrap_or(0);
    println!("groups: {}", schema.groups().join(", "));
    for spec in schema.fields() {
        println!("{:width$}  {}", spec.path(), spec.kind());
    }
    true
}

fn read_config(file: &str) -> anyhow::Result<Config> {
    let text = std::fs::read_to_string(file).with_context(|| format!("reading {file}"))?;
    let yaml = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let config = if yaml {
        Config::from_yaml(&text)
    } else {
        Config::from_json(&text)
    };
    config.with_context(|| format!("parsing {file}"))
}

fn print_result(result: &ValidationResult) {
    for issue in &result.errors {
        println!("error   {issue}");
    }
    for issue in &result.warnings {
        println!("warning {issue}");
    }
    println!(
        "{} ({} errors, {} warnings)",
        if result.success { "VALID" } else { "INVALID" },
        result.errors.len(),
        result.warnings.len()
    );
}

fn validate(args: &ArgMatches) -> anyhow::Result<bool> {
    let Some(file) = args.get_one::<String>("file") else {
        bail!("missing config file");
    };
    let config = read_config(file)?;
    let result = SchemaValidator::new().check(&config);
    print_result(&result);
    if let Some(normalized) = &result.normalized_config {
        println!();
        println!("normalized:");
        println!("{}", foundry_config::view::render(normalized));
    }
    Ok(result.is_valid())
}

/// Override sets applied one at a time to the same base
#[derive(Debug, Deserialize)]
struct BatchFile {
    variants: Vec<BatchVariant>,
}

#[derive(Debug, Deserialize)]
struct BatchVariant {
    #[serde(default)]
    name: Option<String>,
    parameters: Config,
}

impl BatchVariant {
    fn label(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{index}"))
    }
}

/// Merge each override set onto `base` and validate the result
///
/// Overrides that name a field `variant` does not declare fail without
/// reaching the validator.
fn check_batch(variant: Variant, base: &Config, variants: &[BatchVariant]) -> Vec<ValidationResult> {
    let validator = SchemaValidator::new();
    variants
        .iter()
        .map(|entry| match schema(variant).first_undeclared_leaf(&entry.parameters) {
            Some(path) => ValidationResult::from_issues(
                vec![ValidationIssue::new(
                    path.to_string(),
                    format!("not a field of {variant}"),
                )],
                vec![],
            ),
            None => validator.check(&accessor::merge(base, &entry.parameters)),
        })
        .collect()
}

fn batch(args: &ArgMatches) -> anyhow::Result<bool> {
    let variant = variant_arg(args);
    let Some(file) = args.get_one::<String>("file") else {
        bail!("missing batch file");
    };
    let batch: BatchFile = serde_json::from_value(read_config(file)?.into_value())
        .with_context(|| format!("reading variants from {file}"))?;
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);
    let base = schema(variant).default_config(seed);

    let results = check_batch(variant, &base, &batch.variants);
    let mut passed = true;
    for (index, (entry, result)) in batch.variants.iter().zip(&results).enumerate() {
        println!("== {}", entry.label(index));
        print_result(result);
        passed &= result.is_valid();
    }
    tracing::info!(%variant, variants = results.len(), passed, "batch checked");
    Ok(passed)
}

fn parse_edit(raw: &str) -> anyhow::Result<(FieldPath, Value)> {
    let Some((path, value)) = raw.split_once('=') else {
        bail!("expected PATH=VALUE, got '{raw}'");
    };
    let path: FieldPath = path
        .trim()
        .parse()
        .with_context(|| format!("invalid path in '{raw}'"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((path, value))
}

async fn edit(args: &ArgMatches) -> anyhow::Result<bool> {
    let variant = variant_arg(args);
    let settings = match args.get_one::<String>("settings") {
        Some(file) => StoreSettings::load(file).with_context(|| format!("loading {file}"))?,
        None => StoreSettings::default(),
    };
    let edits = args
        .get_many::<String>("set")
        .into_iter()
        .flatten()
        .map(|raw| parse_edit(raw))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let store = ConfigStore::builder(Arc::new(DryRunGenerator))
        .with_settings(settings)
        .build()?;
    store.switch_variant(variant).await?;
    for (path, value) in edits {
        store.set(&path, value)?;
    }

    let snapshot = store.flush().await?;
    println!("{}", snapshot.view);
    println!();
    if let Some(result) = &snapshot.result {
        print_result(result);
    }

    if args.get_flag("generate") && snapshot.can_generate() {
        let record = store.generate().await?;
        println!();
        println!(
            "generated {} ({}x{}, fingerprint {})",
            record.result().locator,
            record.result().width,
            record.result().height,
            record.fingerprint().short()
        );
    }
    Ok(snapshot.can_generate())
}

/// Generator that only describes what would be produced
struct DryRunGenerator;

#[async_trait::async_trait]
impl GenerationService for DryRunGenerator {
    async fn request_generation(&self, config: &Config) -> Result<ResultDescriptor, ServiceError> {
        let resolution = "output.resolution"
            .parse::<FieldPath>()
            .ok()
            .and_then(|path| config.get_str(&path).map(str::to_owned))
            .unwrap_or_default();
        let (width, height) = resolution
            .split_once('x')
            .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
            .ok_or_else(|| ServiceError::Generation(format!("bad resolution '{resolution}'")))?;
        let format = "output.format"
            .parse::<FieldPath>()
            .ok()
            .and_then(|path| config.get_str(&path).map(str::to_owned))
            .unwrap_or_else(|| "png".to_string());
        let locator = format!("dry-run://{}.{format}", config.fingerprint().short());
        Ok(ResultDescriptor::new(locator, width, height).with_format(format))
    }
}
