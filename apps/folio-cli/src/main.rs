use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_common::{Capabilities, Rect, Viewport};
use folio_page::{PageConfig, PageShell};
use folio_render::{CssRenderer, DebugTextRenderer, RenderView, Renderer};
use folio_widgets::{TiltConfig, TiltSurface, Typewriter, TypewriterTiming};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

/// Fixed 60 Hz step for headless runs.
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser)]
#[command(name = "folio-cli", about = "CLI tool for the folio motion layer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the default page summary
    Info,
    /// Step the typewriter and print every transition
    Typewriter {
        /// Number of ticks to run
        #[arg(short, long, default_value = "30")]
        ticks: usize,
        /// Comma-separated word list (defaults to the page's words)
        #[arg(short, long, value_delimiter = ',')]
        words: Vec<String>,
    },
    /// Print the tilt rotation for a pointer offset from a card's center
    Tilt {
        #[arg(long, allow_hyphen_values = true)]
        dx: f32,
        #[arg(long, allow_hyphen_values = true)]
        dy: f32,
    },
    /// Run a scripted headless session and print frames
    Simulate {
        /// Page config (.yaml, .yml or .json); defaults to the stock page
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Pretend the device is touch-only
        #[arg(long)]
        touch: bool,
        /// Number of 60 Hz frames to run
        #[arg(short, long, default_value = "240")]
        frames: usize,
        /// Print a frame every N frames
        #[arg(long, default_value = "60")]
        every: usize,
        /// Print CSS rules instead of the debug dump
        #[arg(long)]
        css: bool,
        #[arg(long)]
        width: Option<f32>,
        #[arg(long)]
        height: Option<f32>,
    },
    /// Load and validate a page config
    Validate { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            let config = PageConfig::default();
            println!("folio-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("widgets: {}", folio_widgets::crate_info());
            println!("page: {}", folio_page::crate_info());
            println!("render: {}", folio_render::crate_info());
            println!(
                "default page: {} sections, {} cards, {} words",
                config.sections.len(),
                config.sections.iter().map(|s| s.cards.len()).sum::<usize>(),
                config.typewriter.words.len()
            );
        }
        Commands::Typewriter { ticks, words } => {
            let words = if words.is_empty() {
                PageConfig::default().typewriter.words
            } else {
                words
            };
            let mut machine = Typewriter::new(words, TypewriterTiming::default())?;
            println!(
                "  0 {:?} {:?} next in {}ms",
                machine.phase(),
                machine.text(),
                machine.next_delay().as_millis()
            );
            for i in 1..=ticks {
                let delay = machine.tick();
                println!(
                    "{i:>3} {:?} {:?} word={} next in {}ms",
                    machine.phase(),
                    machine.text(),
                    machine.word_index(),
                    delay.as_millis()
                );
            }
        }
        Commands::Tilt { dx, dy } => {
            let card = Rect::new(0.0, 0.0, 600.0, 600.0);
            let surface = TiltSurface::new(card, TiltConfig::default())?;
            let r = surface.rotation_for(Vec2::new(dx, dy));
            println!("offset=({dx:.1}, {dy:.1}) rotateX={:.3}deg rotateY={:.3}deg", r.x, r.y);
        }
        Commands::Simulate {
            config,
            touch,
            frames,
            every,
            css,
            width,
            height,
        } => {
            let mut config = match config {
                Some(path) => PageConfig::load(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => PageConfig::default(),
            };
            if let Some(width) = width {
                config.viewport.width = width;
            }
            if let Some(height) = height {
                config.viewport.height = height;
            }
            if every == 0 {
                anyhow::bail!("--every must be at least 1");
            }
            let mut shell = PageShell::new(config)?;
            if touch {
                shell = shell.with_capabilities(Capabilities::touch());
            }
            simulate(&mut shell, frames, every, css);
        }
        Commands::Validate { path } => {
            let config = PageConfig::load(&path)
                .with_context(|| format!("invalid config {}", path.display()))?;
            println!(
                "OK: {} sections, {} nav links, {} words, viewport {}",
                config.sections.len(),
                config.nav.len(),
                config.typewriter.words.len(),
                fmt_viewport(config.viewport)
            );
        }
    }

    Ok(())
}

fn fmt_viewport(v: Viewport) -> String {
    format!("{:.0}x{:.0}", v.width, v.height)
}

/// Scripted session: sweep the pointer across the first card, scroll to the
/// bottom, then let the pointer leave and everything settle.
fn simulate(shell: &mut PageShell, frames: usize, every: usize, css: bool) {
    shell.mount();
    let view = RenderView::default();

    let card = shell
        .layout()
        .sections()
        .iter()
        .find_map(|s| s.cards.first().map(|c| (s.id.clone(), c.bounds)));
    if let Some((section, _)) = &card {
        shell.scroll_to_section(section);
    }
    let sweep_end = frames / 3;
    let scroll_end = 2 * frames / 3;
    let start_offset = shell.scroll_offset();
    let scroll_frames = (scroll_end - sweep_end).max(1) as f32;
    let scroll_step = (shell.layout().max_scroll() - start_offset) / scroll_frames;

    for f in 0..frames {
        if f < sweep_end {
            if let Some((_, bounds)) = card {
                let t = f as f32 / sweep_end.max(1) as f32;
                let y = bounds.center().y - shell.scroll_offset();
                let x = bounds.min.x + bounds.width() * t;
                shell.pointer_moved(Vec2::new(x, y));
            }
        } else if f < scroll_end {
            shell.scroll_by(scroll_step);
        } else if f == scroll_end {
            shell.pointer_left();
        }
        shell.advance(FRAME);

        if f % every == 0 || f + 1 == frames {
            let frame = shell.frame();
            if css {
                println!("/* frame {f} */");
                for rule in CssRenderer::new().render(&frame, &view) {
                    println!("{rule}");
                }
            } else {
                println!("--- frame {f} ---");
                print!("{}", DebugTextRenderer::new().render(&frame, &view));
            }
        }
    }

    shell.teardown();
    tracing::info!(
        frames,
        subscriptions = shell.bus().len(),
        timers = shell.timers().pending(),
        "simulation finished"
    );
}
