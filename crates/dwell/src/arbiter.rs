//! Chooses between point-and-pinch and point-and-wait, and owns the radial
//! menu session while one hand holds it.

use crate::error::Error;
use crate::geom::{Pose, Projection, SelectionPlane};
use crate::hand::{FrameInput, Hand, HandSignals};
use crate::sector::{SectorLayout, SectorPicker};
use crate::timer::{DEFAULT_SELECTION_TIME, DwellEvent, DwellSelector};
use strum::{Display as StrumDisplay, IntoEnumIterator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
pub enum Gesture {
    PointAndPinch,
    PointAndWait,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    PointAndPinch(Hand),
    PointAndWait(Hand),
}

impl Mode {
    fn active(gesture: Gesture, hand: Hand) -> Self {
        match gesture {
            Gesture::PointAndPinch => Self::PointAndPinch(hand),
            Gesture::PointAndWait => Self::PointAndWait(hand),
        }
    }

    pub fn owner(&self) -> Option<Hand> {
        match self {
            Self::Idle => None,
            Self::PointAndPinch(hand) | Self::PointAndWait(hand) => Some(*hand),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What the host should do this frame, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    /// Disable other timer-driven ray interactors so a dwell cannot fire twice.
    SuppressTimerInteractors,
    SpawnMenu {
        hand: Hand,
        gesture: Gesture,
        pose: Pose,
    },
    /// The sector under the hand changed. `None` means back in the dead-zone.
    Highlight(Option<usize>),
    SectorSelected {
        hand: Hand,
        gesture: Gesture,
        selection: Option<usize>,
    },
    ApplyEffect(Option<usize>),
    HideMenu,
    RestoreTimerInteractors,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub sector_count: usize,
    pub angle_gap_degrees: f64,
    pub deadzone_radius: f64,
    pub dwell_selection_time: f64,
    pub menu_display_distance: f64,
    pub projection: Projection,
    pub primary_hand: Hand,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            sector_count: 4,
            angle_gap_degrees: 10.0,
            deadzone_radius: 0.02,
            dwell_selection_time: DEFAULT_SELECTION_TIME,
            menu_display_distance: 1.0,
            projection: Projection::World,
            primary_hand: Hand::Left,
        }
    }
}

impl EngineSettings {
    pub fn picker(&self) -> Result<SectorPicker, Error> {
        let layout = SectorLayout::new(self.sector_count, self.angle_gap_degrees)?;
        SectorPicker::new(layout, self.deadzone_radius)
    }
}

/// Single-owner session state machine.
///
/// From `Idle`, every hand's pinch is checked before any hand's dwell, and
/// within each check the primary hand goes first.
#[derive(Debug, Clone)]
pub struct ModeArbiter {
    mode: Mode,
    picker: SectorPicker,
    primary: Hand,
    projection: Projection,
    menu_distance: f64,
    highlighted: Option<usize>,
    timers_suppressed: bool,
}

impl ModeArbiter {
    pub fn new(picker: SectorPicker, settings: &EngineSettings) -> Self {
        Self {
            mode: Mode::Idle,
            picker,
            primary: settings.primary_hand,
            projection: settings.projection,
            menu_distance: settings.menu_display_distance,
            highlighted: None,
            timers_suppressed: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn picker(&self) -> &SectorPicker {
        &self.picker
    }

    pub fn timers_suppressed(&self) -> bool {
        self.timers_suppressed
    }

    pub fn tick(&mut self, input: &FrameInput) -> Vec<SessionCommand> {
        let mut commands = Vec::new();

        match self.mode {
            Mode::Idle => self.try_start(input, &mut commands),
            Mode::PointAndPinch(hand) => {
                let signals = input.hand(hand).effective();
                if signals.pinch_active {
                    self.track(&signals, &mut commands);
                } else {
                    self.finalize(hand, Gesture::PointAndPinch, &mut commands);
                }
            }
            Mode::PointAndWait(hand) => {
                let signals = input.hand(hand).effective();
                if !signals.timer_dwell_active && signals.point_active {
                    self.track(&signals, &mut commands);
                } else {
                    self.finalize(hand, Gesture::PointAndWait, &mut commands);
                }
            }
        }

        commands
    }

    fn try_start(&mut self, input: &FrameInput, commands: &mut Vec<SessionCommand>) {
        let order = Hand::priority(self.primary);

        if let Some(hand) = order
            .into_iter()
            .find(|&h| input.hand(h).effective().pinch_active)
        {
            self.begin(hand, Gesture::PointAndPinch, input, commands);
            return;
        }

        if let Some(hand) = order.into_iter().find(|&h| {
            let s = input.hand(h).effective();
            s.timer_dwell_active && s.point_active
        }) {
            self.timers_suppressed = true;
            commands.push(SessionCommand::SuppressTimerInteractors);
            self.begin(hand, Gesture::PointAndWait, input, commands);
        }
    }

    fn begin(
        &mut self,
        hand: Hand,
        gesture: Gesture,
        input: &FrameInput,
        commands: &mut Vec<SessionCommand>,
    ) {
        // effective() already filtered out untracked hands
        let Some(reference) = input.hand(hand).position else {
            return;
        };
        let pose = input.center_eye.ahead(self.menu_distance);

        self.picker.begin(reference, SelectionPlane::new(self.projection, &pose));
        self.mode = Mode::active(gesture, hand);
        self.highlighted = None;

        log::debug!("{} session started by {} hand", gesture, hand);
        commands.push(SessionCommand::SpawnMenu {
            hand,
            gesture,
            pose,
        });
    }

    fn track(&mut self, signals: &HandSignals, commands: &mut Vec<SessionCommand>) {
        let Some(position) = signals.position else {
            return;
        };
        let selected = self.picker.update(position);
        if selected != self.highlighted {
            self.highlighted = selected;
            commands.push(SessionCommand::Highlight(selected));
        }
    }

    fn finalize(&mut self, hand: Hand, gesture: Gesture, commands: &mut Vec<SessionCommand>) {
        let selection = self.picker.end();
        self.mode = Mode::Idle;
        self.highlighted = None;

        log::debug!("{} session by {} hand ended: {:?}", gesture, hand, selection);
        commands.push(SessionCommand::SectorSelected {
            hand,
            gesture,
            selection,
        });
        commands.push(SessionCommand::ApplyEffect(selection));
        commands.push(SessionCommand::HideMenu);

        if std::mem::take(&mut self.timers_suppressed) {
            commands.push(SessionCommand::RestoreTimerInteractors);
        }
    }
}

/// Arbiter plus one dwell selector per hand.
///
/// A hand's dwell signal for a tick is its external `timer_dwell_active`, or
/// its own selector having fired on `hovering && point_active` with that hover
/// still held.
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    arbiter: ModeArbiter,
    left: DwellSelector,
    right: DwellSelector,
}

impl InteractionEngine {
    pub fn new(settings: &EngineSettings) -> Result<Self, Error> {
        let selector = DwellSelector::new(settings.dwell_selection_time)?;
        Ok(Self {
            arbiter: ModeArbiter::new(settings.picker()?, settings),
            left: selector.clone(),
            right: selector,
        })
    }

    pub fn mode(&self) -> Mode {
        self.arbiter.mode()
    }

    pub fn arbiter(&self) -> &ModeArbiter {
        &self.arbiter
    }

    pub fn selector(&self, hand: Hand) -> &DwellSelector {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    fn selector_mut(&mut self, hand: Hand) -> &mut DwellSelector {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }

    /// Dwell fill for a hand that is hovering and has not fired yet.
    pub fn dwell_progress(&self, hand: Hand) -> Option<f64> {
        let selector = self.selector(hand);
        (selector.is_hovering() && selector.state().armed).then(|| selector.progress())
    }

    pub fn tick(&mut self, input: &FrameInput) -> Vec<SessionCommand> {
        let mut frame = *input;
        let suppressed = self.arbiter.timers_suppressed();

        for hand in Hand::iter() {
            let signals = frame.hand(hand).effective();
            let hovering = !suppressed && signals.hovering && signals.point_active;
            let selector = self.selector_mut(hand);
            if selector.tick(input.dt, hovering) == DwellEvent::Selected {
                log::debug!("dwell selection fired for {} hand", hand);
            }
            // Stays asserted after firing until the hover drops.
            if selector.is_hovering() && !selector.state().armed {
                frame.hand_mut(hand).timer_dwell_active = true;
            }
        }

        self.arbiter.tick(&frame)
    }

    /// Swaps in new settings. Refused while a session is open.
    pub fn reconfigure(&mut self, settings: &EngineSettings) -> Result<bool, Error> {
        if !self.arbiter.mode().is_idle() {
            return Ok(false);
        }
        *self = Self::new(settings)?;
        Ok(true)
    }
}
