//! Minimal vector math for hand positions and head poses.
//!
//! Coordinates follow the tracking runtime: y up, z forward, x right.

use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::ops::{Add, Mul, Sub};
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        (len > f64::EPSILON && len.is_finite()).then(|| self * (1.0 / len))
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A displacement on the menu plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Position plus orientation, given as forward and up directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    #[serde(default = "Pose::default_forward")]
    pub forward: Vec3,
    #[serde(default = "Pose::default_up")]
    pub up: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::default(),
            forward: Vec3::FORWARD,
            up: Vec3::UP,
        }
    }
}

impl Pose {
    fn default_forward() -> Vec3 {
        Vec3::FORWARD
    }

    fn default_up() -> Vec3 {
        Vec3::UP
    }

    pub fn right(&self) -> Vec3 {
        self.up.cross(self.forward)
    }

    /// Pose `distance` units in front of this one, sharing its orientation.
    pub fn ahead(&self, distance: f64) -> Self {
        let forward = self.forward.normalized().unwrap_or(Vec3::FORWARD);
        Self {
            position: self.position + forward * distance,
            ..*self
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    /// Drop the depth axis of the world displacement.
    #[default]
    #[strum(serialize = "world")]
    World,
    /// Project onto the right/up axes of the menu pose captured at spawn.
    #[strum(serialize = "view")]
    View,
}

/// Plane a hand displacement is flattened onto before picking a sector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPlane {
    right: Vec3,
    up: Vec3,
}

impl Default for SelectionPlane {
    fn default() -> Self {
        Self {
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::UP,
        }
    }
}

impl SelectionPlane {
    pub fn new(projection: Projection, menu_pose: &Pose) -> Self {
        match projection {
            Projection::World => Self::default(),
            Projection::View => {
                let fallback = Self::default();
                Self {
                    right: menu_pose.right().normalized().unwrap_or(fallback.right),
                    up: menu_pose.up.normalized().unwrap_or(fallback.up),
                }
            }
        }
    }

    pub fn project(&self, d: Vec3) -> Point {
        Point::new(d.dot(self.right), d.dot(self.up))
    }
}
