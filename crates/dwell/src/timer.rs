use crate::error::Error;

pub const DEFAULT_SELECTION_TIME: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DwellEvent {
    #[default]
    None,
    Selected,
    Unselected,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DwellState {
    pub elapsed: f64,
    /// Hover holds and `Selected` has not fired yet.
    pub armed: bool,
}

/// Turns a continuous hover signal into edge-triggered select/unselect events.
///
/// `Selected` fires once when the hover has been held for `selection_time`.
/// `Unselected` fires once on the falling edge of the hover, whether or not
/// the selection had fired; repeated non-hovering ticks stay silent.
#[derive(Debug, Clone)]
pub struct DwellSelector {
    selection_time: f64,
    state: DwellState,
    hovering: bool,
}

impl Default for DwellSelector {
    fn default() -> Self {
        Self {
            selection_time: DEFAULT_SELECTION_TIME,
            state: DwellState::default(),
            hovering: false,
        }
    }
}

impl DwellSelector {
    pub fn new(selection_time: f64) -> Result<Self, Error> {
        if !selection_time.is_finite() || selection_time <= 0.0 {
            return Err(Error::InvalidSelectionTime(selection_time));
        }
        Ok(Self {
            selection_time,
            ..Self::default()
        })
    }

    pub fn selection_time(&self) -> f64 {
        self.selection_time
    }

    pub fn state(&self) -> DwellState {
        self.state
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn tick(&mut self, dt: f64, is_hovering: bool) -> DwellEvent {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        if !is_hovering {
            let was_hovering = std::mem::replace(&mut self.hovering, false);
            self.state = DwellState::default();
            return if was_hovering {
                DwellEvent::Unselected
            } else {
                DwellEvent::None
            };
        }

        if !self.hovering {
            self.hovering = true;
            self.state.armed = true;
        }

        if !self.state.armed {
            return DwellEvent::None;
        }

        self.state.elapsed += dt;
        if self.state.elapsed >= self.selection_time {
            self.state.armed = false;
            return DwellEvent::Selected;
        }
        DwellEvent::None
    }

    /// Drops any accumulated hover without emitting an event.
    pub fn reset(&mut self) {
        self.state = DwellState::default();
        self.hovering = false;
    }

    pub fn progress(&self) -> f64 {
        fill_progress(self.state.elapsed, self.selection_time)
    }
}

/// Fraction of a dwell completed, clamped to `[0, 1]`.
pub fn fill_progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 || !duration.is_finite() {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(selector: &mut DwellSelector, ticks: &[(f64, bool)]) -> Vec<DwellEvent> {
        ticks
            .iter()
            .map(|&(dt, hovering)| selector.tick(dt, hovering))
            .collect()
    }

    #[test]
    fn test_selected_fires_on_crossing_tick() {
        let mut selector = DwellSelector::new(1.0).unwrap();
        let events = run(&mut selector, &[(0.3, true); 4]);

        assert_eq!(
            events,
            vec![
                DwellEvent::None,
                DwellEvent::None,
                DwellEvent::None,
                DwellEvent::Selected
            ]
        );
    }

    #[test]
    fn test_below_threshold_never_selects() {
        let mut selector = DwellSelector::new(1.0).unwrap();
        let events = run(&mut selector, &[(0.1, true); 9]);
        assert!(events.iter().all(|e| *e == DwellEvent::None));
        assert!(selector.progress() < 1.0);
    }

    #[test]
    fn test_selected_fires_once_while_hover_holds() {
        let mut selector = DwellSelector::new(0.5).unwrap();
        let events = run(&mut selector, &[(0.5, true); 5]);
        let selected = events.iter().filter(|e| **e == DwellEvent::Selected).count();

        assert_eq!(selected, 1);
        assert_eq!(events[0], DwellEvent::Selected);
        assert!(!selector.state().armed);
    }

    #[test]
    fn test_unselected_is_edge_triggered() {
        let mut selector = DwellSelector::new(1.0).unwrap();
        let events = run(
            &mut selector,
            &[(0.4, true), (0.4, false), (0.4, false), (0.4, false)],
        );

        assert_eq!(
            events,
            vec![
                DwellEvent::None,
                DwellEvent::Unselected,
                DwellEvent::None,
                DwellEvent::None
            ]
        );
    }

    #[test]
    fn test_no_unselected_without_prior_hover() {
        let mut selector = DwellSelector::default();
        assert_eq!(selector.tick(0.1, false), DwellEvent::None);
    }

    #[test]
    fn test_hover_drop_resets_elapsed() {
        let mut selector = DwellSelector::new(1.0).unwrap();
        run(&mut selector, &[(0.9, true), (0.1, false)]);
        assert_eq!(selector.state(), DwellState::default());

        // a fresh hover needs the full time again
        let events = run(&mut selector, &[(0.9, true), (0.05, true)]);
        assert_eq!(events, vec![DwellEvent::None, DwellEvent::None]);
    }

    #[test]
    fn test_reselect_after_release() {
        let mut selector = DwellSelector::new(0.5).unwrap();
        let events = run(&mut selector, &[(0.6, true), (0.1, false), (0.6, true)]);
        assert_eq!(
            events,
            vec![
                DwellEvent::Selected,
                DwellEvent::Unselected,
                DwellEvent::Selected
            ]
        );
    }

    #[test]
    fn test_bad_dt_counts_as_zero() {
        let mut selector = DwellSelector::new(1.0).unwrap();
        run(&mut selector, &[(-1.0, true), (f64::NAN, true)]);
        assert_eq!(selector.state().elapsed, 0.0);
    }

    #[test]
    fn test_invalid_selection_time() {
        assert!(DwellSelector::new(0.0).is_err());
        assert!(DwellSelector::new(-1.0).is_err());
        assert!(DwellSelector::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_fill_progress_clamps() {
        assert_eq!(fill_progress(0.0, 2.0), 0.0);
        assert_eq!(fill_progress(1.0, 2.0), 0.5);
        assert_eq!(fill_progress(5.0, 2.0), 1.0);
        assert_eq!(fill_progress(-1.0, 2.0), 0.0);
    }
}
