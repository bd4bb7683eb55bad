//! Dice Stage inspector
//!
//! Prints what the stage would do with a library without opening a window.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;

use dicestage::dice3d::appearance::{edge_color, rasterize_pattern, DieColor};
use dicestage::dice3d::layout::GridLayout;
use dicestage::dice3d::meshes::build_die_geometry;
use dicestage::dice3d::orientation::{fnv1a_utf16, orientation_degrees};
use dicestage::dice3d::types::{default_library, load_library, DiePattern, StageSettings};

#[derive(Parser)]
#[command(name = "dicestage-inspect")]
#[command(author, version, about = "Inspect dice stage orientations, layouts and textures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resting orientation for one or more die ids
    Orientation {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Summarize every die in a library
    Library {
        /// JSON library file (defaults to the bundled one)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print grid slots for a number of dice
    Layout {
        #[arg(short = 'n', long)]
        count: usize,

        #[arg(short, long)]
        columns: Option<usize>,
    },

    /// Write a pattern texture as PNG
    Texture {
        #[arg(short, long, value_parser = parse_pattern_arg)]
        pattern: DiePattern,

        /// Any CSS color, e.g. "#38bdf8" or "teal"
        #[arg(short, long)]
        color: String,

        #[arg(short, long)]
        out: PathBuf,
    },
}

fn parse_pattern_arg(s: &str) -> Result<DiePattern, String> {
    DiePattern::parse(s)
        .ok_or_else(|| format!("Unknown pattern: {}. Valid: solid, stripes, gradient", s))
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Orientation { ids } => {
            print_orientations(&ids);
            Ok(())
        }
        Commands::Library { file } => print_library(file.as_deref()),
        Commands::Layout { count, columns } => {
            print_layout(count, columns);
            Ok(())
        }
        Commands::Texture {
            pattern,
            color,
            out,
        } => write_texture(pattern, &color, &out),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn print_orientations(ids: &[String]) {
    for id in ids {
        println!(
            "{:<24} hash {:#010x}  {}",
            id.bold(),
            fnv1a_utf16(id),
            format!("{:>3}°", orientation_degrees(id)).cyan()
        );
    }
}

fn print_library(file: Option<&Path>) -> Result<(), String> {
    let dice = match file {
        Some(path) => load_library(path).map_err(|e| e.to_string())?,
        None => default_library(),
    };

    println!("{}", format!("{} dice", dice.len()).bold());
    for die in &dice {
        let geometry = build_die_geometry(die.sides, orientation_degrees(&die.id));
        let body = DieColor::parse_or_gray(&die.color_hex);

        println!();
        println!("{} ({})", die.display_name().bold(), die.id.dimmed());
        println!(
            "  d{:<4} {}, {} triangles, {} edges",
            die.sides,
            geometry.kind.name(),
            geometry.triangle_count(),
            geometry.edges.len()
        );
        println!(
            "  color {}  edges {}  pattern {}  orientation {}°",
            body,
            edge_color(body),
            die.pattern.name(),
            geometry.key.orientation_degrees
        );
        if die.appearance.is_some() {
            println!("  {}", "custom surface".cyan());
        }
        if die.options.len() != die.sides as usize {
            println!(
                "  {} {} options for {} sides",
                "Warning:".yellow().bold(),
                die.options.len(),
                die.sides
            );
        }
    }
    Ok(())
}

fn print_layout(count: usize, columns: Option<usize>) {
    let defaults = StageSettings::default();
    let layout = GridLayout::new(columns.unwrap_or(defaults.columns), defaults.cell_size);

    println!(
        "{} dice in {} columns: {} rows, window height {}px",
        count,
        layout.columns,
        layout.rows(count),
        layout.content_height(count, defaults.row_px, None)
    );
    for (index, position) in layout.positions(count).iter().enumerate() {
        let (row, col) = layout.cell(index);
        println!(
            "  {:>3}  row {:>2} col {:>2}  ({:>6.2}, {:>6.2})",
            index, row, col, position.x, position.y
        );
    }
    println!("vertical center {:.2}", layout.vertical_center(count));
}

fn write_texture(pattern: DiePattern, color: &str, out: &Path) -> Result<(), String> {
    let base = DieColor::parse(color).map_err(|e| e.to_string())?;
    let raster = rasterize_pattern(pattern, base)
        .ok_or_else(|| format!("the {} pattern has no texture", pattern.name()))?;

    raster
        .save_with_format(out, image::ImageFormat::Png)
        .map_err(|e| format!("failed to write {}: {}", out.display(), e))?;

    println!(
        "{} {}x{} {} texture to {}",
        "Wrote".green().bold(),
        raster.width(),
        raster.height(),
        pattern.name(),
        out.display()
    );
    Ok(())
}
