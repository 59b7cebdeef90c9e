//! Radial sector picking.
//!
//! Angles are clock-style: 0° points up and grows clockwise, so sector 0 sits
//! at twelve o'clock and the rest follow clockwise.

use crate::error::Error;
use crate::geom::{Point, SelectionPlane, Vec3};

pub const FULL_TURN: f64 = 360.0;

/// Clock angle of a displacement in degrees, in `[0, 360)`.
pub fn clock_angle(d: Point) -> f64 {
    let angle = d.x.atan2(d.y).to_degrees().rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative angles up to a full turn
    if angle >= FULL_TURN { 0.0 } else { angle }
}

/// Drawn arc of one sector. Shorter than the clickable arc by the gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    pub start_degrees: f64,
    pub sweep_degrees: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorLayout {
    count: usize,
    gap_degrees: f64,
}

impl SectorLayout {
    pub fn new(count: usize, gap_degrees: f64) -> Result<Self, Error> {
        if count < 2 {
            return Err(Error::InvalidSectorCount(count));
        }
        let width = FULL_TURN / count as f64;
        if !gap_degrees.is_finite() || gap_degrees < 0.0 || gap_degrees >= width {
            return Err(Error::InvalidAngleGap {
                gap: gap_degrees,
                width,
            });
        }
        Ok(Self { count, gap_degrees })
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn gap_degrees(&self) -> f64 {
        self.gap_degrees
    }

    pub fn sector_width(&self) -> f64 {
        FULL_TURN / self.count as f64
    }

    /// Sector containing a clock angle. The gap never shifts these boundaries.
    pub fn pick(&self, angle_degrees: f64) -> usize {
        let raw = (self.count as f64 * angle_degrees / FULL_TURN).floor();
        if raw.is_nan() || raw < 0.0 {
            return 0;
        }
        (raw as usize).min(self.count - 1)
    }

    /// Clickable arc of a sector as `[start, end)` in clock degrees.
    pub fn bounds(&self, index: usize) -> (f64, f64) {
        let width = self.sector_width();
        (index as f64 * width, (index + 1) as f64 * width)
    }

    pub fn wedge(&self, index: usize) -> Wedge {
        let (start, _) = self.bounds(index);
        Wedge {
            start_degrees: start + self.gap_degrees / 2.0,
            sweep_degrees: (self.sector_width() - self.gap_degrees).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    reference: Vec3,
    plane: SelectionPlane,
    selected: Option<usize>,
}

/// Maps hand displacement from a captured reference to a sector index.
#[derive(Debug, Clone)]
pub struct SectorPicker {
    layout: SectorLayout,
    deadzone: f64,
    session: Option<Session>,
}

impl SectorPicker {
    pub fn new(layout: SectorLayout, deadzone: f64) -> Result<Self, Error> {
        if !deadzone.is_finite() || deadzone < 0.0 {
            return Err(Error::InvalidDeadzone(deadzone));
        }
        Ok(Self {
            layout,
            deadzone,
            session: None,
        })
    }

    pub fn layout(&self) -> &SectorLayout {
        &self.layout
    }

    pub fn deadzone(&self) -> f64 {
        self.deadzone
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn selected(&self) -> Option<usize> {
        self.session.and_then(|s| s.selected)
    }

    pub fn begin(&mut self, reference: Vec3, plane: SelectionPlane) {
        self.session = Some(Session {
            reference,
            plane,
            selected: None,
        });
    }

    pub fn update(&mut self, current: Vec3) -> Option<usize> {
        let session = self.session.as_mut()?;
        let d = session.plane.project(current - session.reference);

        session.selected = if d.length() <= self.deadzone {
            None
        } else {
            Some(self.layout.pick(clock_angle(d)))
        };
        session.selected
    }

    /// Closes the session and returns its last selection.
    pub fn end(&mut self) -> Option<usize> {
        self.session.take().and_then(|s| s.selected)
    }
}
