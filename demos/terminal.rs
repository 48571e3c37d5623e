//! Terminal Demo - Three frames switched from the keyboard and mouse
//!
//! Demonstrates:
//! - Frame registration and next/prev navigation with a switch effect
//! - An effect animated over a fixed number of ticks
//! - Pointer tracking and hover on a component
//! - Swipes and the wheel as navigation gestures
//! - Debounced resize with breakpoint hooks
//!
//! Keys: Left/Right navigate, 1-3 jump to a frame, q quits.
//! Log output goes to `laco-demo.log`.
//!
//! Run with: cargo run --example terminal

use std::cell::Cell;
use std::fs::File;
use std::io::{self, Write};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind,
};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue, style::Print};

use laco::{
    BuilderRoot, CellSize, Direction, FrameLinks, FrameSwitchCoordinator, GestureKind,
    HasChildren, Hook, HoverMode, LandingConfig, LifecycleEntity, MouseTranslator, Persistence,
    PointerHook, Rect, SurfaceId, Switchable, TerminalViewport, TranslatedInput,
};

const TICK: Duration = Duration::from_millis(16);
const SWITCH_TICKS: u32 = 30;

/// Restores the terminal when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, DisableMouseCapture, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> io::Result<()> {
    let log = File::create("laco-demo.log")?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = match LandingConfig::load("laco.toml") {
        Ok(config) => config,
        Err(err) => {
            tracing::info!(error = %err, "using default configuration");
            LandingConfig::default()
        }
    };

    let cell = CellSize::default();
    let viewport = Rc::new(TerminalViewport::detect(cell)?);
    let builder = BuilderRoot::new(config, viewport.clone());

    // Frames
    for links in [
        FrameLinks::new("intro").next("features"),
        FrameLinks::new("features").prev("intro").next("outro").switch_effect("wipe"),
        FrameLinks::new("outro").prev("features"),
    ] {
        let frame = builder
            .add_frame(LifecycleEntity::frame(links, viewport.clone()))
            .map_err(io::Error::other)?;
        frame.on(
            Hook::StartBegin,
            |f| tracing::info!(frame = f.frame_name(), "frame started"),
            Persistence::Persistent,
        );
        frame
            .on_gesture(
                GestureKind::WheelDown,
                |_| tracing::debug!("wheel down"),
                Persistence::Persistent,
            )
            .map_err(io::Error::other)?;
    }

    // Hoverable call to action inside the features frame
    let cta_hovered = Rc::new(Cell::new(false));
    if let Some(features) = builder.frame("features") {
        let cta = features.add_component(LifecycleEntity::component(
            "cta",
            Rect::new(80.0, 160.0, 240.0, 48.0),
            viewport.clone(),
        ));
        cta.set_hover_mode(HoverMode::Internal);
        for (hook, value) in [(PointerHook::HoverBegin, true), (PointerHook::HoverEnd, false)] {
            let hovered = cta_hovered.clone();
            cta.on_pointer(hook, move |_| hovered.set(value), Persistence::Persistent)
                .map_err(io::Error::other)?;
        }
    }

    // Effects: a default cut and a timed wipe. The outgoing frame stops when
    // a switch begins, the incoming one starts when it completes.
    let remaining = Rc::new(Cell::new(0u32));
    let cut = FrameSwitchCoordinator::new("cut");
    let wipe = FrameSwitchCoordinator::new("wipe");
    for effect in [&cut, &wipe] {
        effect.on_begin(
            |effect| {
                if let Some(frame) = effect.active_frame() {
                    frame.stop_sequence();
                }
            },
            Persistence::Persistent,
        );
        effect.on_complete(
            |effect| {
                if let Some(frame) = effect.active_frame() {
                    frame.stop_sequence_completed();
                }
                if let Some(frame) = effect.replace_frame() {
                    frame.start_sequence();
                }
            },
            Persistence::Persistent,
        );
    }
    cut.on_begin(|effect| effect.effect_sequence_complete(), Persistence::Persistent);
    {
        let remaining = remaining.clone();
        wipe.on_begin(move |_| remaining.set(SWITCH_TICKS), Persistence::Persistent);
    }
    builder.add_switch_effect(cut);
    let wipe = builder.add_switch_effect(wipe);

    builder.on_breakpoint(
        |bp| tracing::info!(device = ?bp.device, tier = ?bp.tier, "breakpoint"),
        Persistence::Persistent,
    );

    let _guard = TerminalGuard::enter()?;
    let translator = MouseTranslator::new(cell);
    builder.start();

    loop {
        if event::poll(TICK)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Right => {
                        builder.next();
                    }
                    KeyCode::Left => {
                        builder.prev();
                    }
                    KeyCode::Char(c @ '1'..='3') => {
                        let target = ["intro", "features", "outro"][usize::from(c as u8 - b'1')];
                        builder.to_frame(target, None, Direction::Next);
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let surface = builder
                        .current_frame_name()
                        .map_or_else(SurfaceId::viewport, SurfaceId::new);
                    for input in translator.translate(&mouse, &surface) {
                        match input {
                            TranslatedInput::Pointer(event) => builder.handle_input(&event),
                            TranslatedInput::Gesture(gesture) => {
                                match gesture.kind {
                                    GestureKind::SwipeLeft => {
                                        builder.next();
                                    }
                                    GestureKind::SwipeRight => {
                                        builder.prev();
                                    }
                                    _ => {
                                        builder.handle_gesture(&gesture);
                                    }
                                }
                            }
                        }
                    }
                }
                Event::Resize(columns, _rows) => {
                    viewport.set_columns(columns);
                    builder.on_viewport_resized(Instant::now());
                }
                _ => {}
            }
        }

        builder.poll_resize(Instant::now());

        if wipe.is_in_progress() {
            let left = remaining.get().saturating_sub(1);
            remaining.set(left);
            if left == 0 {
                wipe.effect_sequence_complete();
            }
        }

        builder.animation_frame();
        draw(&builder, &remaining, cta_hovered.get())?;
    }

    Ok(())
}

fn draw(builder: &BuilderRoot, remaining: &Cell<u32>, cta_hovered: bool) -> io::Result<()> {
    let pointer = builder.global_pointer();
    let (x, y) = pointer.position();
    let (vx, vy) = pointer.velocity();
    let breakpoint = builder.breakpoint();
    let active = builder.current_frame_name().unwrap_or_default();

    let switching = if builder.is_switch_in_progress() {
        format!("switching ({} ticks left)", remaining.get())
    } else {
        "idle".to_string()
    };

    let lines = [
        format!("frame: {active}"),
        format!("switch: {switching}"),
        format!("breakpoint: {:?} / {:?}", breakpoint.device, breakpoint.tier),
        format!("pointer: ({x:.0}, {y:.0})  velocity: ({vx:.0}, {vy:.0})"),
        format!("cta hovered: {cta_hovered}"),
        String::new(),
        "Left/Right navigate, 1-3 jump, swipe to switch, q quits".to_string(),
    ];

    let mut out = io::stdout();
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in (0u16..).zip(lines.iter()) {
        queue!(out, cursor::MoveTo(2, row + 1), Print(line))?;
    }
    out.flush()
}
