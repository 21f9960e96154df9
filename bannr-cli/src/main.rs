//! Command-line banner renderer

use std::borrow::Cow;
use std::fs;
use std::io::{self, Read as _};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use bannr::font::Font;
use bannr::render::{Renderer, SmushMode};
use clap::Parser;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let font = cli.font()?;
    if cli.info {
        print_info(&font);
        return Ok(());
    }
    let renderer = cli.renderer(&font);
    let input = cli.input()?;
    // empty input still draws one blank banner
    let lines: Vec<&str> = if input.is_empty() {
        vec![""]
    } else {
        input.lines().collect()
    };
    for line in lines {
        let banner = renderer
            .render(line)
            .with_context(|| format!("failed to render {line:?}"))?;
        println!("{banner}");
    }
    Ok(())
}

/// Render text as block-letter banners
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Text to render; read from stdin if omitted. Each line becomes a separate banner.
    text: Vec<String>,
    /// An .flf font to use instead of the built-in one
    #[arg(short = 'f', long, env = "BANNR_FONT")]
    font: Option<PathBuf>,
    /// Override the smush mode of the font
    #[arg(short = 'm', long, allow_negative_numbers = true)]
    smush_mode: Option<i64>,
    /// Print the font header and comments instead of rendering
    #[arg(short = 'i', long)]
    info: bool,
}

impl Cli {
    fn font(&self) -> Result<Cow<'static, Font>> {
        let Some(path) = &self.font else {
            return Ok(Cow::Borrowed(Font::standard()));
        };
        let bytes =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let font = bannr::parse_font(bytes)
            .with_context(|| format!("failed to parse font {}", path.display()))?;
        log::info!(
            "loaded {}: height {}, smush mode {}",
            path.display(),
            font.height(),
            font.smush_mode()
        );
        Ok(Cow::Owned(font))
    }

    fn renderer<'font>(&self, font: &'font Font) -> Renderer<'font> {
        let renderer = Renderer::new(font);
        match self.smush_mode {
            Some(mode) => {
                log::debug!("overriding smush mode {} with {mode}", font.smush_mode());
                renderer.smush_mode(SmushMode::from_raw(mode))
            }
            None => renderer,
        }
    }

    fn input(&self) -> Result<String> {
        if !self.text.is_empty() {
            return Ok(self.text.join(" "));
        }
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read stdin")?;
        Ok(input)
    }
}

fn print_info(font: &Font) {
    let header = font.header();
    println!("hardblank: {}", char::from(header.hardblank));
    println!("height: {}", header.height);
    println!("baseline: {}", header.baseline);
    println!("max width: {}", header.max_width);
    println!("smush mode: {}", header.smush_mode());
    println!("rules: {:?}", font.layout().rules());
    if !font.comments().is_empty() {
        println!();
        println!("{}", font.comments());
    }
}
