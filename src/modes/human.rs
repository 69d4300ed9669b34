use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::game::{Action, Direction, GameConfig, GameEngine, GameState, Phase};
use crate::input::{InputHandler, KeyAction, SwipeTracker};
use crate::metrics::SessionStats;
use crate::render::Renderer;

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    stats: SessionStats,
    renderer: Renderer,
    input_handler: InputHandler,
    swipe: SwipeTracker,
    should_quit: bool,
    /// Direction queued by input, applied on the next tick
    pending_direction: Option<Direction>,
    /// When the special food on the board despawns
    special_until: Option<Instant>,
    /// Until when the level-up banner is shown
    banner_until: Option<Instant>,
    /// Set when the tick timer must be rebuilt (level change, resume)
    retime_tick: bool,
    /// Set when the special-food timer must be rebuilt (resume, restart)
    retime_spawn: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Self {
        let mut engine = match seed {
            Some(seed) => GameEngine::with_seed(config, seed),
            None => GameEngine::new(config),
        };
        let state = engine.reset();

        Self {
            engine,
            state,
            stats: SessionStats::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            swipe: SwipeTracker::new(),
            should_quit: false,
            pending_direction: None,
            special_until: None,
            banner_until: None,
            retime_tick: false,
            retime_spawn: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game speed depends on the level, so this timer is rebuilt
        // whenever the level changes
        let mut tick_timer = make_interval(self.engine.config().tick_interval(self.state.level));

        // Special food is offered on a slow fixed cadence
        let mut spawn_timer = make_interval(self.engine.config().special_spawn_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = time::interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event)?;
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.state.is_running() {
                        self.advance_tick();
                    }
                }

                // Offer to place special food
                _ = spawn_timer.tick() => {
                    if self.state.is_running() {
                        self.offer_special_food();
                    }
                }

                // Despawn special food that was left uneaten. The deadline
                // keeps running while the game is paused.
                _ = time::sleep_until(self.special_until.unwrap_or_else(Instant::now)),
                        if self.special_until.is_some() => {
                    self.expire_special_food();
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.stats.update();
                    let show_banner = self
                        .banner_until
                        .map_or(false, |until| Instant::now() < until);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.stats, show_banner);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.retime_tick {
                tick_timer = make_interval(self.engine.config().tick_interval(self.state.level));
                self.retime_tick = false;
            }
            if self.retime_spawn {
                spawn_timer = make_interval(self.engine.config().special_spawn_interval());
                self.retime_spawn = false;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => {
                // Only process key press events, not release
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }

                match self.input_handler.handle_key_event(key) {
                    KeyAction::GameAction(Action::Move(dir)) => {
                        self.on_direction(dir);
                    }
                    KeyAction::GameAction(Action::Continue) => {
                        // No action needed
                    }
                    KeyAction::TogglePause => {
                        self.toggle_pause();
                    }
                    KeyAction::Restart => {
                        self.restart();
                    }
                    KeyAction::Quit => {
                        self.should_quit = true;
                    }
                    KeyAction::None => {}
                }
            }
            Event::Mouse(mouse) => {
                // A press on the start screen begins the game; the
                // gesture itself is not tracked as a swipe
                if self.state.phase == Phase::Ready {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        self.start_game();
                    }
                    return Ok(());
                }
                if let Some(dir) = self.swipe.handle_mouse_event(mouse) {
                    self.on_direction(dir);
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// React to a directional input. The first one wakes the game up
    /// and is otherwise swallowed; later ones are queued for the tick.
    fn on_direction(&mut self, dir: Direction) {
        match self.state.phase {
            Phase::Ready => self.start_game(),
            Phase::Running | Phase::Paused => {
                self.pending_direction = Some(dir);
            }
            Phase::GameOver => {}
        }
    }

    fn toggle_pause(&mut self) {
        match self.state.phase {
            Phase::Ready => self.start_game(),
            Phase::Running => {
                self.state.toggle_pause();
                info!("game paused at score {}", self.state.score);
            }
            Phase::Paused => {
                self.state.toggle_pause();
                // Fresh timers so resuming does not trigger an instant tick
                self.retime_tick = true;
                self.retime_spawn = true;
                info!("game resumed");
            }
            Phase::GameOver => {}
        }
    }

    fn start_game(&mut self) {
        self.state.start();
        self.stats.on_game_start();
        self.retime_tick = true;
        self.retime_spawn = true;
        info!("game started");
    }

    fn advance_tick(&mut self) {
        let action = self
            .pending_direction
            .take()
            .map(Action::Move)
            .unwrap_or(Action::Continue);

        let result = self.engine.step(&mut self.state, action);

        if result.info.ate_special {
            // Eaten before the deadline, so the despawn is off
            self.special_until = None;
        }

        if let Some(level) = result.info.leveled_up {
            self.banner_until =
                Some(Instant::now() + self.engine.config().level_banner_duration());
            self.retime_tick = true;
            info!(
                "reached level {} at score {}, grid is now {}x{}",
                level, self.state.score, self.state.grid_size, self.state.grid_size
            );
        }

        if result.terminated {
            self.stats.on_game_over(self.state.score, self.state.level);
            info!(
                "game over ({:?}) at score {}, level {}",
                result.info.collision, self.state.score, self.state.level
            );
        }
    }

    fn offer_special_food(&mut self) {
        if self.engine.try_spawn_special(&mut self.state) {
            self.special_until = Some(Instant::now() + self.engine.config().special_lifetime());
            info!("special food spawned");
        }
    }

    fn expire_special_food(&mut self) {
        self.special_until = None;
        if self.state.special_food.take().is_some() {
            info!("special food expired");
        }
    }

    /// Throw the board away and start over, skipping the start screen
    fn restart(&mut self) {
        self.state = self.engine.reset();
        self.state.start();
        self.stats.on_game_start();
        self.pending_direction = None;
        self.special_until = None;
        self.banner_until = None;
        self.retime_tick = true;
        self.retime_spawn = true;
        info!("game restarted");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

fn make_interval(period: Duration) -> time::Interval {
    // Start one full period out; a fresh tokio interval would otherwise
    // fire immediately
    let mut timer = time::interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}
