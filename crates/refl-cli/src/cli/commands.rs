use super::CliError;
use anyhow::Context;
use refl_core::domain::Layer;
use refl_core::modules::convert::{ConversionRequest, load_layer_stack, run_conversion};
use refl_core::modules::genx::GenxTable;
use refl_core::modules::lsfit::{LISTING_BANNER, LISTING_COLUMNS, generate_listing};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(clap::Args)]
pub(super) struct ConvertArgs {
    /// GenX parameter export (header-less CSV)
    genx: PathBuf,

    /// LSFIT template whose value fields are rewritten
    template: PathBuf,

    /// Output path for the reassembled control file
    #[arg(short, long)]
    output: PathBuf,

    /// File holding the literal header block (defaults to the standard
    /// LSFIT banner and column line)
    #[arg(long)]
    header_file: Option<PathBuf>,

    /// File holding the literal tail block (defaults to empty)
    #[arg(long)]
    tail_file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct GenerateArgs {
    /// GenX parameter export (header-less CSV)
    genx: PathBuf,

    /// Output path; the listing goes to stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub(super) struct LayersArgs {
    /// GenX parameter export (header-less CSV)
    genx: PathBuf,

    /// Emit the stack as JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub(super) fn run_convert_command(args: ConvertArgs) -> Result<i32, CliError> {
    let header = match &args.header_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read header file '{}'", path.display()))?,
        None => format!("{LISTING_BANNER}\n{LISTING_COLUMNS}\n"),
    };
    let tail = match &args.tail_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read tail file '{}'", path.display()))?,
        None => String::new(),
    };

    let request = ConversionRequest::new(&args.genx, &args.template, header, tail);
    let rendered = run_conversion(&request)?;

    // Written only after the whole transformation succeeded.
    fs::write(&args.output, rendered)
        .with_context(|| format!("failed to write '{}'", args.output.display()))?;
    info!(output = %args.output.display(), "wrote control file");
    Ok(0)
}

pub(super) fn run_generate_command(args: GenerateArgs) -> Result<i32, CliError> {
    let table = GenxTable::from_path(&args.genx)?;
    let listing = generate_listing(&table);
    match &args.output {
        Some(path) => {
            fs::write(path, listing + "\n")
                .with_context(|| format!("failed to write '{}'", path.display()))?;
        }
        None => println!("{listing}"),
    }
    Ok(0)
}

pub(super) fn run_layers_command(args: LayersArgs) -> Result<i32, CliError> {
    let stack = load_layer_stack(&args.genx)?;
    if args.json {
        let layers: Vec<&Layer> = stack.iter().collect();
        let report = serde_json::to_string_pretty(&layers)
            .context("failed to encode the layer report")?;
        println!("{report}");
    } else {
        for layer in stack.iter() {
            println!("{layer}");
        }
    }
    Ok(0)
}
