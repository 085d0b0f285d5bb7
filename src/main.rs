use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;

use meteor_shooter::app::{App, Flow};
use meteor_shooter::assets::Assets;
use meteor_shooter::audio::{self, AudioSink, Sound};
use meteor_shooter::config::GameConfig;
use meteor_shooter::display;
use meteor_shooter::geometry::Viewport;
use meteor_shooter::input::InputTracker;

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal is the game screen, so records only go to a file, and only
/// when one is configured. `RUST_LOG` picks the level (default `info`).
fn init_logging(config: &GameConfig) -> anyhow::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

// ── Main loop ─────────────────────────────────────────────────────────────────

/// Returns once the player quits.
fn run<W: Write>(
    out: &mut W,
    app: &mut App,
    sink: &mut dyn AudioSink,
    input: &mut InputTracker,
    config: &GameConfig,
) -> anyhow::Result<()> {
    let mut rng = thread_rng();
    let clock = Instant::now();
    let mut last = 0u64;
    let (cols, rows) = terminal::size()?;
    let mut viewport = Viewport::new(cols, rows);
    let mut events = Vec::new();

    loop {
        let frame_start = Instant::now();
        let now = clock.elapsed().as_millis() as u64;
        let dt = now.saturating_sub(last) as f32 / 1000.0;
        last = now;

        // ── Drain all pending terminal events (non-blocking) ──────────────────
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Resize(cols, rows) => {
                    viewport = Viewport::new(cols, rows);
                    out.queue(terminal::Clear(terminal::ClearType::All))?;
                    log::debug!("resized to {}x{}", cols, rows);
                }
                other => input.handle(&other, now),
            }
        }
        let frame_input = input.snapshot(now, &viewport);

        events.clear();
        if app.update(&frame_input, now, dt, &mut rng, &mut events) == Flow::Quit {
            return Ok(());
        }
        audio::react(sink, &events);

        display::render(out, app, viewport, now)?;

        let elapsed = frame_start.elapsed();
        if elapsed < config.frame {
            std::thread::sleep(config.frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig::from_env();
    init_logging(&config)?;

    let assets = Assets::load(&config.asset_dir)
        .with_context(|| format!("loading assets from {}", config.asset_dir.display()))?;
    let mut sink = audio::open(&config).context("opening audio output")?;
    let mut app = App::new(assets, &mut thread_rng());

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key-release events let held keys end exactly; other terminals fall back
    // to the hold window.
    let keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
        && out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
    log::info!("keyboard release events: {}", keyboard_enhanced);

    sink.play_music(Sound::Music.volume());
    let mut input = InputTracker::new(keyboard_enhanced);
    let result = run(&mut out, &mut app, sink.as_mut(), &mut input, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("exiting on error: {:#}", e);
    }
    result
}
