use crate::config::{self, Config, ConfigError};
use crate::effects::Effect;
use crate::events::AppEvent;
use crate::feedback::ProgressIndicator;
use crate::menu::RadialMenu;
use dwell::arbiter::{Gesture, InteractionEngine, Mode, SessionCommand};
use dwell::hand::{FrameInput, Hand};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use strum::IntoEnumIterator;

pub type SelectionListener = Box<dyn FnMut(Hand, Gesture, Option<usize>) + Send>;

/// Snapshot published after every tick for `status` queries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Status {
    pub mode: String,
    pub menu_visible: bool,
    pub highlighted: Option<usize>,
    pub last_selection: Option<usize>,
    pub selections: u64,
    pub effect: String,
    pub frames: u64,
}

pub struct Driver {
    engine: InteractionEngine,
    menu: RadialMenu,
    effect: Effect,
    left_progress: ProgressIndicator,
    right_progress: ProgressIndicator,
    listeners: Vec<SelectionListener>,
    timers_enabled: bool,
    pending_config: Option<Config>,
    status: Arc<RwLock<Status>>,
}

impl Driver {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let driver = Self {
            engine: InteractionEngine::new(&config.engine_settings())?,
            menu: RadialMenu::new(config.highlight_style),
            effect: Effect::from_config(config),
            left_progress: ProgressIndicator::new(config.progress_display_distance),
            right_progress: ProgressIndicator::new(config.progress_display_distance),
            listeners: Vec::new(),
            timers_enabled: true,
            pending_config: None,
            status: Arc::new(RwLock::new(Status::default())),
        };
        driver.publish_status(0);
        Ok(driver)
    }

    pub fn on_selection(
        &mut self,
        listener: impl FnMut(Hand, Gesture, Option<usize>) + Send + 'static,
    ) {
        self.listeners.push(Box::new(listener));
    }

    pub fn status_handle(&self) -> Arc<RwLock<Status>> {
        self.status.clone()
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn menu(&self) -> &RadialMenu {
        &self.menu
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn progress(&self, hand: Hand) -> &ProgressIndicator {
        match hand {
            Hand::Left => &self.left_progress,
            Hand::Right => &self.right_progress,
        }
    }

    pub fn timers_enabled(&self) -> bool {
        self.timers_enabled
    }

    /// Returns `false` once the loop should stop.
    pub fn handle(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Frame(frame) => {
                self.tick(&frame);
            }
            AppEvent::ConfigReload => match config::load_config() {
                Ok(new_config) => self.apply_config(new_config),
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
            AppEvent::Shutdown => return false,
        }
        true
    }

    pub fn tick(&mut self, frame: &FrameInput) -> Vec<SessionCommand> {
        let commands = self.engine.tick(frame);
        for command in &commands {
            self.dispatch(*command);
        }
        self.update_progress(frame);

        if self.engine.mode().is_idle()
            && let Some(config) = self.pending_config.take()
        {
            self.apply_config(config);
        }

        let frames = self.status.read().frames + 1;
        self.publish_status(frames);
        commands
    }

    fn dispatch(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SuppressTimerInteractors => {
                log::debug!("Timer ray interactors suppressed");
                self.timers_enabled = false;
            }
            SessionCommand::SpawnMenu { hand, gesture, pose } => {
                log::info!("Radial menu opened by {} hand ({})", hand, gesture);
                self.menu.spawn(pose, self.engine.arbiter().picker().layout());
            }
            SessionCommand::Highlight(index) => {
                if self.menu.highlight(index) {
                    log::debug!("Highlighted sector {:?}", index);
                }
            }
            SessionCommand::SectorSelected {
                hand,
                gesture,
                selection,
            } => {
                log::info!("Selected sector index = {:?}", selection);
                for listener in &mut self.listeners {
                    listener(hand, gesture, selection);
                }
                let mut status = self.status.write();
                status.last_selection = selection;
                status.selections += 1;
            }
            SessionCommand::ApplyEffect(selection) => self.effect.apply(selection),
            SessionCommand::HideMenu => self.menu.hide(),
            SessionCommand::RestoreTimerInteractors => {
                log::debug!("Timer ray interactors restored");
                self.timers_enabled = true;
            }
        }
    }

    fn update_progress(&mut self, frame: &FrameInput) {
        for hand in Hand::iter() {
            let progress = self.engine.dwell_progress(hand);
            let target = frame.hand(hand).effective().hover_target;
            let head = frame.center_eye.position;
            let ring = match hand {
                Hand::Left => &mut self.left_progress,
                Hand::Right => &mut self.right_progress,
            };

            match (progress, target) {
                (Some(fill), Some(target)) => {
                    if !ring.visible {
                        ring.show(head, target);
                    }
                    ring.set_fill(fill);
                }
                _ if ring.visible => ring.reset(),
                _ => {}
            }
        }
    }

    /// Applies new settings now, or once the current session has ended.
    pub fn apply_config(&mut self, config: Config) {
        match self.engine.reconfigure(&config.engine_settings()) {
            Ok(true) => {
                self.menu.set_style(config.highlight_style);
                self.effect = Effect::from_config(&config);
                self.left_progress = ProgressIndicator::new(config.progress_display_distance);
                self.right_progress = ProgressIndicator::new(config.progress_display_distance);
                log::info!("Configuration reloaded");
            }
            Ok(false) => {
                log::debug!("Session active, deferring configuration reload");
                self.pending_config = Some(config);
            }
            Err(e) => log::error!("Rejected configuration: {}", e),
        }
    }

    fn publish_status(&self, frames: u64) {
        let mut status = self.status.write();
        status.mode = match self.engine.mode() {
            Mode::Idle => "idle".to_string(),
            Mode::PointAndPinch(hand) => format!("point-and-pinch ({})", hand),
            Mode::PointAndWait(hand) => format!("point-and-wait ({})", hand),
        };
        status.menu_visible = self.menu.visible;
        status.highlighted = self.menu.visible.then_some(self.menu.highlight_index).flatten();
        status.effect = self.effect.describe();
        status.frames = frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectKind, HighlightStyle};
    use crate::effects::PanelName;
    use dwell::geom::Vec3;
    use dwell::hand::HandSignals;
    use std::sync::Mutex;

    const HAND: Vec3 = Vec3::new(0.1, 1.2, 0.4);

    fn idle() -> FrameInput {
        FrameInput {
            dt: 0.1,
            left: HandSignals::tracked(HAND),
            right: HandSignals::tracked(HAND),
            ..FrameInput::default()
        }
    }

    fn pinch(dx: f64, dy: f64) -> FrameInput {
        let mut f = idle();
        f.left.pinch_active = true;
        f.left.position = Some(HAND + Vec3::new(dx, dy, 0.0));
        f
    }

    fn recorded(driver: &mut Driver) -> Arc<Mutex<Vec<Option<usize>>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        driver.on_selection(move |_, _, selection| sink.lock().unwrap().push(selection));
        log
    }

    #[test]
    fn test_pinch_selection_drives_light() {
        let mut driver = Driver::new(&Config::default()).unwrap();
        let selections = recorded(&mut driver);

        driver.tick(&pinch(0.0, 0.0));
        assert!(driver.menu().visible);
        assert_eq!(driver.menu().sectors.len(), 4);

        driver.tick(&pinch(0.0, 0.1));
        assert_eq!(driver.menu().highlight_index, Some(0));

        driver.tick(&idle());
        assert!(!driver.menu().visible);
        assert_eq!(*selections.lock().unwrap(), vec![Some(0)]);
        match driver.effect() {
            Effect::Light(light) => assert_eq!(light.color_mode(), 1),
            other => panic!("unexpected effect {:?}", other),
        }

        let status = driver.status_handle().read().clone();
        assert_eq!(status.last_selection, Some(0));
        assert_eq!(status.selections, 1);
        assert_eq!(status.mode, "idle");
        assert_eq!(status.frames, 3);
    }

    #[test]
    fn test_deadzone_release_selects_nothing() {
        let mut driver = Driver::new(&Config::default()).unwrap();
        let selections = recorded(&mut driver);

        driver.tick(&pinch(0.0, 0.0));
        driver.tick(&pinch(0.01, 0.0));
        driver.tick(&idle());

        assert_eq!(*selections.lock().unwrap(), vec![None]);
        assert_eq!(driver.effect(), &Effect::from_config(&Config::default()));
    }

    #[test]
    fn test_panels_effect() {
        let config = Config {
            effect: EffectKind::Panels,
            panels: ["a", "b", "c", "d"].into_iter().map(PanelName::new).collect(),
            ..Config::default()
        };
        let mut driver = Driver::new(&config).unwrap();

        driver.tick(&pinch(0.0, 0.0));
        driver.tick(&pinch(0.0, -0.1));
        driver.tick(&idle());

        assert_eq!(driver.effect().describe(), "panel c");
    }

    #[test]
    fn test_dwell_shows_progress_then_opens_menu() {
        let config = Config {
            dwell_selection_time: 0.5,
            ..Config::default()
        };
        let mut driver = Driver::new(&config).unwrap();
        let mut hover = idle();
        hover.right.point_active = true;
        hover.right.hovering = true;
        hover.right.hover_target = Some(Vec3::new(0.0, 1.5, 2.0));

        driver.tick(&hover);
        let ring = driver.progress(Hand::Right);
        assert!(ring.visible);
        assert!((ring.fill - 0.2).abs() < 1e-9);
        assert!(!driver.progress(Hand::Left).visible);

        for _ in 0..4 {
            driver.tick(&hover);
        }
        assert_eq!(driver.mode(), Mode::PointAndWait(Hand::Right));
        assert!(!driver.timers_enabled());
        assert!(!driver.progress(Hand::Right).visible);

        let mut release = hover;
        release.right.point_active = false;
        driver.tick(&release);
        assert!(driver.timers_enabled());
        assert_eq!(driver.mode(), Mode::Idle);
    }

    #[test]
    fn test_config_applied_after_session() {
        let mut driver = Driver::new(&Config::default()).unwrap();
        driver.tick(&pinch(0.0, 0.0));

        let six = Config {
            sector_count: 6,
            highlight_style: HighlightStyle::Scale,
            ..Config::default()
        };
        driver.apply_config(six);
        assert_eq!(driver.menu().sectors.len(), 4);

        driver.tick(&idle());
        driver.tick(&pinch(0.0, 0.0));
        assert_eq!(driver.menu().sectors.len(), 6);
        assert_eq!(driver.menu().style(), HighlightStyle::Scale);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut driver = Driver::new(&Config::default()).unwrap();
        driver.apply_config(Config {
            sector_count: 1,
            ..Config::default()
        });
        driver.tick(&pinch(0.0, 0.0));
        assert_eq!(driver.menu().sectors.len(), 4);

        assert!(
            Driver::new(&Config {
                deadzone_radius: -1.0,
                ..Config::default()
            })
            .is_err()
        );
    }

    #[test]
    fn test_shutdown_stops_loop() {
        let mut driver = Driver::new(&Config::default()).unwrap();
        assert!(driver.handle(AppEvent::Frame(idle())));
        assert!(!driver.handle(AppEvent::Shutdown));
    }
}
