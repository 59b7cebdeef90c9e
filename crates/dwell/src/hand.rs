use crate::geom::{Pose, Vec3};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[default]
    #[strum(serialize = "Left", serialize = "l")]
    Left,
    #[strum(serialize = "Right", serialize = "r")]
    Right,
}

impl Hand {
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Both hands, `primary` first. The first hand to satisfy a transition wins.
    pub fn priority(primary: Hand) -> [Hand; 2] {
        [primary, primary.other()]
    }
}

/// Per-hand signals polled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandSignals {
    #[serde(rename = "pinch")]
    pub pinch_active: bool,
    #[serde(rename = "point")]
    pub point_active: bool,
    /// Ray is hovering an interactable.
    pub hovering: bool,
    /// Dwell confirmation coming from an external timer selector.
    #[serde(rename = "dwell")]
    pub timer_dwell_active: bool,
    /// `None` while the hand is not tracked.
    pub position: Option<Vec3>,
    /// Center of the hovered interactable, when known.
    pub hover_target: Option<Vec3>,
}

impl HandSignals {
    pub fn tracked(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn is_tracked(&self) -> bool {
        self.position.is_some()
    }

    /// Signals as seen by the selection logic: an untracked hand is inactive.
    pub fn effective(&self) -> Self {
        if self.is_tracked() {
            *self
        } else {
            Self::default()
        }
    }
}

/// Everything the selection logic reads in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInput {
    /// Seconds since the previous frame.
    pub dt: f64,
    pub left: HandSignals,
    pub right: HandSignals,
    #[serde(rename = "head")]
    pub center_eye: Pose,
}

impl FrameInput {
    pub fn hand(&self, hand: Hand) -> &HandSignals {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }

    pub fn hand_mut(&mut self, hand: Hand) -> &mut HandSignals {
        match hand {
            Hand::Left => &mut self.left,
            Hand::Right => &mut self.right,
        }
    }
}
