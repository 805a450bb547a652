use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, Subcommand};
use image::{Rgba, RgbaImage};
use slicekit_core::compositing::load_atlas;
use slicekit_core::draw::draw_slice;
use slicekit_core::model::RectF;
use slicekit_core::ninepatch::PatchMode;
use slicekit_core::table::SliceTable;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "slicekit",
    about = "Compress, inspect and render sprite-atlas slice tables",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a descriptive slice sheet (JSON) into a compact binary table
    Pack(PackArgs),
    /// Print the contents of a compact binary table
    Dump(DumpArgs),
    /// Render one slice from an atlas image into a PNG
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Slice sheet JSON path
    #[arg(short, long)]
    input: PathBuf,
    /// Output path for the compact binary table
    #[arg(short, long)]
    output: PathBuf,
    /// Re-decode the output and compare every record against the sheet
    #[arg(long, default_value_t = false)]
    verify: bool,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Compact binary table path
    #[arg(short, long)]
    input: PathBuf,
    /// Emit JSON instead of a text listing
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Atlas image (PNG)
    #[arg(long)]
    atlas: PathBuf,
    /// Compact binary table path
    #[arg(long)]
    table: PathBuf,
    /// Slice name to render
    #[arg(short, long)]
    slice: String,
    /// Destination width in pixels
    #[arg(long)]
    width: u32,
    /// Destination height in pixels
    #[arg(long)]
    height: u32,
    /// Fill policy for nine-patch slices: stretch | repeat
    #[arg(long, default_value = "stretch")]
    mode: String,
    /// Asset scale multiplier (minimum 1)
    #[arg(long, default_value_t = 1)]
    scale: i32,
    /// Tint color as hex (rgb, argb, rrggbb or aarrggbb, leading # optional)
    #[arg(long)]
    tint: Option<String>,
    /// Output PNG path
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);
    match cli.command {
        Commands::Pack(args) => cmd_pack(args),
        Commands::Dump(args) => cmd_dump(args),
        Commands::Render(args) => cmd_render(args),
    }
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let table = SliceTable::from_source_file(&args.input)
        .with_context(|| format!("loading sheet {}", args.input.display()))?;
    info!(entries = table.len(), "loaded slice sheet");
    info!("{}", table.stats().summary());

    let bytes = table.to_compact().context("encoding compact table")?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = ?args.output, size = bytes.len(), "compact table written");

    if args.verify {
        let decoded = SliceTable::from_compact(&bytes).context("re-decoding compact table")?;
        let mut mismatches = 0usize;
        for (name, original) in table.iter() {
            let read = decoded.get(name);
            let geometry_matches = read.is_some_and(|r| {
                r.bounds == original.bounds
                    && r.center == original.center
                    && r.pivot == original.pivot
            });
            if !geometry_matches {
                // Expected for fields beyond the encodable ranges: the
                // compact format masks them down.
                warn!(name = %name, ?original, ?read, "record did not round-trip");
                mismatches += 1;
            }
        }
        if mismatches == 0 {
            info!(entries = table.len(), "verify passed: all records round-trip");
        } else {
            info!(mismatches, "verify finished with masked records");
        }
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let table = SliceTable::from_compact_file(&args.input)
        .with_context(|| format!("loading table {}", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        for (name, slice) in table.iter() {
            let kind = if slice.is_nine_patch() { "nine-patch" } else { "plain" };
            println!(
                "{name}: bounds ({}, {}) {}x{} {kind} center ({}, {}) {}x{} pivot ({}, {})",
                slice.bounds.x,
                slice.bounds.y,
                slice.bounds.w,
                slice.bounds.h,
                slice.center.x,
                slice.center.y,
                slice.center.w,
                slice.center.h,
                slice.pivot.x,
                slice.pivot.y,
            );
        }
        println!("{}", table.stats().summary());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mode: PatchMode = args
        .mode
        .parse()
        .ok()
        .with_context(|| format!("unknown mode `{}` (expected stretch or repeat)", args.mode))?;
    let tint = args.tint.as_deref().map(parse_tint).transpose()?;

    let atlas = load_atlas(&args.atlas)
        .with_context(|| format!("loading atlas {}", args.atlas.display()))?;
    let table = SliceTable::from_compact_file(&args.table)
        .with_context(|| format!("loading table {}", args.table.display()))?;

    let mut canvas = RgbaImage::new(args.width, args.height);
    let dest = RectF::new(0.0, 0.0, args.width as f32, args.height as f32);
    let covered = draw_slice(
        &mut canvas,
        &atlas,
        &table,
        &args.slice,
        dest,
        args.scale,
        mode,
        tint,
    );
    if covered.is_none() {
        bail!("slice `{}` not found in table", args.slice);
    }

    canvas
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(path = ?args.output, slice = %args.slice, "rendered slice");
    Ok(())
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// Parses a hex tint: `rgb`, `argb`, `rrggbb` or `aarrggbb`, `#` optional.
/// Three- and four-digit forms expand each digit; missing alpha is opaque.
fn parse_tint(s: &str) -> anyhow::Result<Rgba<u8>> {
    let hex = s.trim().trim_start_matches('#');
    let doubled: String = hex.chars().flat_map(|c| [c, c]).collect();
    let expanded = match hex.len() {
        3 => format!("ff{doubled}"),
        4 => doubled,
        6 => format!("ff{hex}"),
        8 => hex.to_string(),
        _ => bail!("invalid tint `{s}` (expected 3, 4, 6 or 8 hex digits)"),
    };
    let value = u32::from_str_radix(&expanded, 16)
        .with_context(|| format!("invalid tint `{s}`"))?;
    let a = (value >> 24) as u8;
    let r = (value >> 16) as u8;
    let g = (value >> 8) as u8;
    let b = value as u8;
    Ok(Rgba([r, g, b, a]))
}
