//! Thin command-line wrapper: render one equation to a PNG or PPM image.
//!
//! ```text
//! eqdraw 'y = mx + b/2' -o line.png
//! eqdraw --print-tree 'sqrt(12 - a)'
//! RUST_LOG=debug eqdraw -s 48 '(1 + 2)/(2+1)' --format ppm -o - > frac.ppm
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use eqdraw::font::FontQuery;
use eqdraw::font::resolve::{default_italic_query, default_regular_query};
use eqdraw::{Canvas, ContextOptions, DrawContext, LayoutConfig, Rgba};

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
enum ImageFormat {
    Png,
    /// Binary PPM (P6), flattened onto white.
    Ppm,
}

impl ImageFormat {
    /// `.ppm` selects PPM; anything else, stdout included, is PNG.
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ppm") => ImageFormat::Ppm,
            _ => ImageFormat::Png,
        }
    }

    fn write<W: Write>(self, canvas: &Canvas, out: W) -> Result<()> {
        match self {
            ImageFormat::Png => canvas.write_png(out)?,
            ImageFormat::Ppm => canvas.write_ppm(out)?,
        }
        Ok(())
    }
}

/// Render ASCII equation notation to a PNG or PPM image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Equation, e.g. `y = mx + b/2` or `sqrt(12 - a)`.
    equation: String,

    /// Output path; `-` writes to stdout.
    #[arg(short, long, default_value = "equation.png")]
    output: PathBuf,

    /// Image format; inferred from the output extension when omitted.
    #[arg(long, value_enum)]
    format: Option<ImageFormat>,

    /// Nominal font size in pixels.
    #[arg(short, long, default_value_t = 24.0)]
    size: f32,

    /// Preferred font family; repeat to list fallbacks.
    #[arg(long = "family", value_name = "NAME")]
    families: Vec<String>,

    /// Extra directory to load fonts from.
    #[arg(long = "font-dir", value_name = "DIR")]
    font_dirs: Vec<PathBuf>,

    /// Extra font file to load.
    #[arg(long = "font-file", value_name = "FILE")]
    font_files: Vec<PathBuf>,

    /// Foreground color.
    #[arg(long, default_value = "#000000")]
    fg: Rgba,

    /// Background color.
    #[arg(long, default_value = "#ffffff", conflicts_with = "transparent")]
    bg: Rgba,

    /// Leave the background transparent (flattened onto white in PPM output).
    #[arg(long)]
    transparent: bool,

    /// Upper bound for growing brackets and radicals.
    #[arg(long, default_value_t = eqdraw::equation::MAX_FONT_SIZE)]
    max_font_size: f32,

    /// Print the parsed tree and its tokens instead of rendering.
    #[arg(long)]
    print_tree: bool,
}

impl Args {
    fn context_options(&self) -> ContextOptions {
        let with_families = |mut query: FontQuery| {
            if !self.families.is_empty() {
                query.families = self.families.clone();
            }
            query
        };
        ContextOptions {
            font_size: self.size,
            regular: with_families(default_regular_query()),
            italic: with_families(default_italic_query()),
            font_dirs: self.font_dirs.clone(),
            font_files: self.font_files.clone(),
            foreground: self.fg,
            layout: LayoutConfig {
                max_font_size: self.max_font_size,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

fn main() -> Result<()> {
    // Keep logging setup in the binary so the library remains unopinionated.
    env_logger::init();
    let args = Args::parse();

    if args.print_tree {
        match eqdraw::parse(&args.equation)? {
            Some(node) => {
                println!("{node}");
                println!("{}", node.tokens().join(" "));
            }
            None => println!("(empty)"),
        }
        return Ok(());
    }

    let mut dc = DrawContext::new(&args.context_options()).context("loading fonts")?;
    let background = (!args.transparent).then_some(args.bg);
    let Some(canvas) = eqdraw::render(&args.equation, &mut dc, background)? else {
        bail!("nothing to render in {:?}", args.equation);
    };
    log::info!("rendered {}x{} image", canvas.width(), canvas.height());

    let format = args.format.unwrap_or_else(|| ImageFormat::from_path(&args.output));
    if args.output.as_os_str() == "-" {
        let mut out = BufWriter::new(io::stdout().lock());
        format.write(&canvas, &mut out)?;
        out.flush()?;
    } else {
        let file = File::create(&args.output)
            .with_context(|| format!("creating {}", args.output.display()))?;
        let mut out = BufWriter::new(file);
        format
            .write(&canvas, &mut out)
            .with_context(|| format!("writing {}", args.output.display()))?;
        out.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        let tests = [
            ("out.png", ImageFormat::Png),
            ("out.ppm", ImageFormat::Ppm),
            ("OUT.PPM", ImageFormat::Ppm),
            ("out", ImageFormat::Png),
            ("-", ImageFormat::Png),
        ];
        for (path, want) in tests {
            assert_eq!(want, ImageFormat::from_path(Path::new(path)), "{path}");
        }
    }

    #[test]
    fn parses_format_flag() {
        let args = Args::try_parse_from(["eqdraw", "1/2", "--format", "ppm", "-o", "-"]).unwrap();
        assert_eq!(Some(ImageFormat::Ppm), args.format);
        let args = Args::try_parse_from(["eqdraw", "1/2"]).unwrap();
        assert_eq!(PathBuf::from("equation.png"), args.output);
        assert_eq!(None, args.format);
    }
}
