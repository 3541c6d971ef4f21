//! bitfont - inspect grid bitmap font atlases
//!
//! Loads an atlas headlessly, then prints glyph metrics, kerning pairs
//! and the layout of sample strings.

use anyhow::{anyhow, Context, Result};
use log::info;
use std::path::PathBuf;

use bitfont::config::{self, Config};
use bitfont::font::{Alignment, BitmapFont};
use bitfont::geometry::Point;
use bitfont::gpu::RecordingBackend;
use bitfont::text::from_latin1;

/// Parsed command line
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    atlas: Option<PathBuf>,
    texts: Vec<String>,
    align: Alignment,
    show_metrics: bool,
    show_kerning: bool,
    no_kerning: bool,
    fixed: bool,
    precision: Option<f64>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Self> {
        let mut opts = Self::default();
        for arg in args {
            if let Some(value) = arg.strip_prefix("--config=") {
                opts.config = Some(PathBuf::from(value));
            } else if let Some(value) = arg.strip_prefix("--align=") {
                opts.align = value.parse()?;
            } else if let Some(value) = arg.strip_prefix("--precision=") {
                let precision: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid precision: {}", value))?;
                opts.precision = Some(precision);
            } else {
                match arg.as_str() {
                    "--metrics" | "-m" => opts.show_metrics = true,
                    "--kerning" | "-k" => opts.show_kerning = true,
                    "--no-kerning" => opts.no_kerning = true,
                    "--fixed" => opts.fixed = true,
                    other if other.starts_with('-') => {
                        return Err(anyhow!("Unknown option: {}", other));
                    }
                    other if opts.atlas.is_none() => opts.atlas = Some(PathBuf::from(other)),
                    other => opts.texts.push(other.to_string()),
                }
            }
        }
        Ok(opts)
    }
}

fn print_help() {
    println!(
        r#"bitfont {} - grid bitmap font inspector

USAGE:
    bitfont [OPTIONS] [ATLAS] [TEXT...]

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -m, --metrics           Print per-glyph ink metrics
    -k, --kerning           Print non-zero kerning pairs
    --align=ALIGN           Layout alignment: left | center | right
    --no-kerning            Disable pairwise kerning
    --fixed                 Force fixed-width mode
    --precision=Q           Snap layout start to multiples of Q
    --config=PATH           Use this config file
    --init-config           Generate config file
    -f, --force             Overwrite config file without confirmation

ATLAS defaults to [font].atlas from the config file.

EXAMPLES:
    bitfont font.tga "Hello, World"
    bitfont --metrics --kerning font.png AV To
    bitfont --align=center --precision=0.0625 font.png "Title"

CONFIG FILE:
    $BITFONT_CONFIG, ~/.config/bitfont/config.toml, /etc/bitfont/config.toml"#,
        env!("CARGO_PKG_VERSION")
    );
}

fn init_config(force: bool) -> Result<()> {
    if let Some(path) = config::default_config_path() {
        if path.exists() && !force {
            println!("Config file already exists: {}", path.display());
            println!("Use --force to overwrite.");
            return Ok(());
        }
    }
    let path = Config::write_default_config()?;
    println!("Config file generated: {}", path.display());
    Ok(())
}

/// Printable label for a code point
fn glyph_label(code: u8) -> String {
    let ch = char::from(code);
    if ch.is_control() || ch == ' ' {
        format!("0x{:02X}", code)
    } else {
        format!("'{}'", ch)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("bitfont {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.iter().any(|a| a == "--init-config") {
        let force = args.iter().any(|a| a == "--force" || a == "-f");
        return init_config(force);
    }

    let opts = Options::parse(&args)?;

    let mut cfg = match &opts.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load(),
    };
    if opts.fixed {
        cfg.font.fixed_width = true;
    }
    if opts.no_kerning {
        cfg.font.kerning = false;
    }
    if let Some(precision) = opts.precision {
        cfg.font.min_position_precision = precision;
    }

    let atlas_path = opts
        .atlas
        .clone()
        .or_else(|| (!cfg.font.atlas.as_os_str().is_empty()).then(|| cfg.font.atlas.clone()))
        .ok_or_else(|| anyhow!("No atlas given (pass ATLAS or set [font].atlas)"))?;

    info!("bitfont starting: {}", atlas_path.display());

    let mut backend = RecordingBackend::new();
    let font = BitmapFont::load(&atlas_path, &cfg.font, &mut backend)
        .with_context(|| format!("Failed to load atlas: {}", atlas_path.display()))?;

    if let Some(atlas) = font.atlas() {
        println!(
            "atlas: {}x{}  cell: {}x{}  accents: {}",
            atlas.width, atlas.height, atlas.cell_width, atlas.cell_height, atlas.accents_present
        );
    }
    println!(
        "glyphs: {}  kerning rows: {}  height: {:.4}  spacing: {:.4}",
        font.sprite_count(),
        font.kerning_rows(),
        font.height(),
        font.char_spacing()
    );

    if opts.show_metrics {
        println!();
        println!("code   left  width");
        for code in (0..=255u8).filter(|&c| font.has_sprite(c)) {
            let m = font.metrics(code);
            println!("{:<6} {:>4}  {:>5}", glyph_label(code), m.left_edge_offset, m.width);
        }
    }

    if opts.show_kerning {
        println!();
        println!("pair           offset");
        for first in (0..=255u8).filter(|&c| font.has_kerning_row(c)) {
            for second in 0..=255u8 {
                let offset = font.kerning_offset(first, second);
                if offset != 0 {
                    println!(
                        "{:<6} {:<6} {:>6}",
                        glyph_label(first),
                        glyph_label(second),
                        offset
                    );
                }
            }
        }
    }

    for text in &opts.texts {
        let codes = font.encode(text);
        let mut positions = Vec::with_capacity(codes.len());
        let end_x = font.layout_positions_latin1(&mut positions, &codes, Point::default(), opts.align);

        println!();
        println!(
            "\"{}\"  width: {:.4}  end x: {:.4}",
            from_latin1(&codes),
            font.measure_latin1(&codes, None),
            end_x
        );
        for (code, pos) in codes.iter().zip(&positions) {
            println!("  {:<6} x={:>9.4} y={:>9.4}", glyph_label(*code), pos.x, pos.y);
        }
    }

    font.release(&mut backend);
    Ok(())
}
