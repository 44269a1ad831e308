use tracing::{debug, warn};

use crate::error::CoreError;
use crate::preset::PresetTable;
use crate::viewport::Viewport;

/// On-screen rectangle of an in-progress zoom selection, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// A zoom gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Pixel where the gesture started.
    pub anchor: (f64, f64),
    /// Pixel rectangle covered so far, for the presentation layer to draw.
    pub rect: Option<SelectionRect>,
    /// Region the active viewport would become on commit.
    /// `None` until the selection covers at least one pixel on both axes.
    pub candidate: Option<Viewport>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControllerState {
    Idle,
    Selecting(Selection),
}

/// Holds the active viewport and turns zoom gestures, resets and presets
/// into viewport replacements.
///
/// Every replacement, and every change of image size, raises the
/// needs-recompute flag.  The presentation layer polls it with
/// [`take_needs_recompute`](Self::take_needs_recompute) before drawing.
#[derive(Debug, Clone)]
pub struct ViewportController {
    default_viewport: Viewport,
    active: Viewport,
    presets: PresetTable,
    state: ControllerState,
    width: u32,
    height: u32,
    needs_recompute: bool,
}

impl ViewportController {
    /// Start at [`Viewport::DEFAULT`] for a `width × height` image.
    ///
    /// The recompute flag starts raised so the first frame gets drawn.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_presets(width, height, PresetTable::new())
    }

    pub fn with_presets(width: u32, height: u32, presets: PresetTable) -> Self {
        Self {
            default_viewport: Viewport::DEFAULT,
            active: Viewport::DEFAULT,
            presets,
            state: ControllerState::Idle,
            width,
            height,
            needs_recompute: true,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.active
    }

    pub fn image_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn selection(&self) -> Option<&Selection> {
        match &self.state {
            ControllerState::Selecting(sel) => Some(sel),
            ControllerState::Idle => None,
        }
    }

    pub fn presets(&self) -> &PresetTable {
        &self.presets
    }

    pub fn needs_recompute(&self) -> bool {
        self.needs_recompute
    }

    /// Return the recompute flag and lower it.
    pub fn take_needs_recompute(&mut self) -> bool {
        std::mem::take(&mut self.needs_recompute)
    }

    /// Start a zoom gesture at pixel `(px, py)`.
    ///
    /// Ignored while a selection is already in progress; returns whether a
    /// new gesture was started.
    pub fn begin_selection(&mut self, px: f64, py: f64) -> bool {
        if matches!(self.state, ControllerState::Selecting(_)) {
            return false;
        }
        debug!(px, py, "Selection started");
        self.state = ControllerState::Selecting(Selection {
            anchor: (px, py),
            rect: None,
            candidate: None,
        });
        true
    }

    /// Move the free corner of the selection to pixel `(px, py)`.
    ///
    /// The rectangle keeps the image's aspect ratio: its diagonal direction
    /// follows the image diagonal and its size is the distance from the
    /// anchor to `(px, py)`.  It always extends right and down from the
    /// anchor.  Returns the new candidate viewport, if the rectangle is
    /// non-empty.  The active viewport is untouched.
    pub fn update_selection(&mut self, px: f64, py: f64) -> Option<Viewport> {
        let (width, height) = (self.width, self.height);
        let active = self.active;
        let ControllerState::Selecting(sel) = &mut self.state else {
            return None;
        };

        let rect = selection_rect(sel.anchor, (px, py), width, height);
        sel.rect = Some(rect);
        sel.candidate = active
            .sub_viewport(
                rect.x as f64,
                rect.y as f64,
                rect.x as f64 + rect.width as f64,
                rect.y as f64 + rect.height as f64,
                width,
                height,
            )
            .ok();
        sel.candidate
    }

    /// Finish the gesture, replacing the active viewport with the candidate.
    ///
    /// Returns `Ok(None)` when no gesture was in progress.  An empty
    /// selection (a click without a drag) is rejected and leaves the active
    /// viewport as it was.
    pub fn commit_selection(&mut self) -> crate::Result<Option<Viewport>> {
        let ControllerState::Selecting(sel) = std::mem::replace(&mut self.state, ControllerState::Idle)
        else {
            return Ok(None);
        };
        match sel.candidate {
            Some(vp) => {
                self.replace(vp);
                Ok(Some(vp))
            }
            None => {
                warn!(anchor = ?sel.anchor, "Empty selection ignored");
                Err(CoreError::InvalidViewport {
                    reason: "selection does not cover any pixels".into(),
                })
            }
        }
    }

    /// Abandon the gesture without touching the viewport.
    pub fn cancel_selection(&mut self) -> bool {
        let was_selecting = matches!(self.state, ControllerState::Selecting(_));
        self.state = ControllerState::Idle;
        was_selecting
    }

    /// Return to the default region.
    pub fn reset(&mut self) {
        self.state = ControllerState::Idle;
        self.replace(self.default_viewport);
    }

    /// Jump to a named preset.  Unknown names leave everything unchanged.
    pub fn apply_preset(&mut self, name: &str) -> crate::Result<Viewport> {
        let vp = self.presets.get(name)?;
        self.state = ControllerState::Idle;
        self.replace(vp);
        Ok(vp)
    }

    /// Replace the active viewport with an arbitrary validated region.
    pub fn set_viewport(&mut self, vp: Viewport) -> crate::Result<()> {
        let vp = Viewport::new(vp.x_min, vp.x_max, vp.y_min, vp.y_max)?;
        self.replace(vp);
        Ok(())
    }

    /// Raise the recompute flag without touching the viewport, for changes
    /// the controller does not own (e.g. a new iteration cap).
    pub fn invalidate(&mut self) {
        self.needs_recompute = true;
    }

    /// Record a new output image size.  The grid is tied to the image size,
    /// so a change invalidates it even when the viewport stays put.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        debug!(width, height, "Image resized");
        self.width = width;
        self.height = height;
        self.needs_recompute = true;
    }

    fn replace(&mut self, vp: Viewport) {
        debug!(
            x_min = vp.x_min,
            x_max = vp.x_max,
            y_min = vp.y_min,
            y_max = vp.y_max,
            "Viewport replaced"
        );
        self.active = vp;
        self.needs_recompute = true;
    }
}

/// Aspect-locked selection rectangle from `anchor` towards `current`.
fn selection_rect(anchor: (f64, f64), current: (f64, f64), width: u32, height: u32) -> SelectionRect {
    let (w, h) = (width as f64, height as f64);
    let diag = (w * w + h * h).sqrt();
    let (ax, ay) = if diag > 0.0 { (w / diag, h / diag) } else { (0.0, 0.0) };
    let dx = current.0 - anchor.0;
    let dy = current.1 - anchor.1;
    let length = (dx * dx + dy * dy).sqrt();
    SelectionRect {
        x: anchor.0 as i32,
        y: anchor.1 as i32,
        width: (ax * length) as i32,
        height: (ay * length) as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_stale() {
        let mut c = ViewportController::new(100, 100);
        assert_eq!(c.state(), &ControllerState::Idle);
        assert_eq!(c.viewport(), Viewport::DEFAULT);
        assert!(c.take_needs_recompute());
        assert!(!c.take_needs_recompute());
    }

    #[test]
    fn selection_commit_zooms_in() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        let original = c.viewport();

        assert!(c.begin_selection(10.0, 10.0));
        let candidate = c.update_selection(50.0, 50.0).unwrap();
        // Updating only moves the candidate.
        assert_eq!(c.viewport(), original);
        assert!(!c.needs_recompute());

        let committed = c.commit_selection().unwrap().unwrap();
        assert_eq!(committed, candidate);
        assert_eq!(c.viewport(), committed);
        assert!(original.strictly_contains(&committed));
        assert!(committed.width() < original.width());
        assert!(committed.height() < original.height());
        assert_eq!(c.state(), &ControllerState::Idle);
        assert!(c.take_needs_recompute());
    }

    #[test]
    fn selection_keeps_image_aspect() {
        let mut c = ViewportController::new(200, 100);
        c.begin_selection(20.0, 10.0);
        c.update_selection(120.0, 10.0);
        let rect = c.selection().unwrap().rect.unwrap();
        assert_eq!((rect.x, rect.y), (20, 10));
        // Distance 100 along the 2:1 image diagonal.
        assert_eq!(rect.width, 89);
        assert_eq!(rect.height, 44);
    }

    #[test]
    fn far_drag_stays_finite() {
        let mut c = ViewportController::new(100, 100);
        c.begin_selection(10.0, 10.0);
        let candidate = c.update_selection(4.0e9, 4.0e9).unwrap();
        let rect = c.selection().unwrap().rect.unwrap();
        assert_eq!((rect.width, rect.height), (i32::MAX, i32::MAX));
        assert!((candidate.x_min - (-1.76)).abs() < 1e-9);
        assert!(candidate.x_max.is_finite() && candidate.x_max > Viewport::DEFAULT.x_max);
        assert!(candidate.y_max.is_finite() && candidate.y_max > Viewport::DEFAULT.y_max);
        assert_eq!(c.commit_selection().unwrap(), Some(candidate));
    }

    #[test]
    fn begin_is_ignored_while_selecting() {
        let mut c = ViewportController::new(100, 100);
        assert!(c.begin_selection(10.0, 10.0));
        assert!(!c.begin_selection(70.0, 70.0));
        assert_eq!(c.selection().unwrap().anchor, (10.0, 10.0));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        c.begin_selection(30.0, 30.0);
        c.update_selection(30.0, 30.0);
        assert!(matches!(
            c.commit_selection(),
            Err(CoreError::InvalidViewport { .. })
        ));
        assert_eq!(c.viewport(), Viewport::DEFAULT);
        assert_eq!(c.state(), &ControllerState::Idle);
        assert!(!c.needs_recompute());
    }

    #[test]
    fn commit_while_idle_is_noop() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        assert_eq!(c.commit_selection(), Ok(None));
        assert!(!c.needs_recompute());
    }

    #[test]
    fn update_while_idle_is_noop() {
        let mut c = ViewportController::new(100, 100);
        assert_eq!(c.update_selection(40.0, 40.0), None);
        assert_eq!(c.state(), &ControllerState::Idle);
    }

    #[test]
    fn cancel_discards_selection() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        c.begin_selection(10.0, 10.0);
        c.update_selection(60.0, 60.0);
        assert!(c.cancel_selection());
        assert_eq!(c.viewport(), Viewport::DEFAULT);
        assert!(!c.needs_recompute());
        assert!(!c.cancel_selection());
    }

    #[test]
    fn reset_restores_default() {
        let mut c = ViewportController::new(100, 100);
        c.begin_selection(10.0, 10.0);
        c.update_selection(50.0, 50.0);
        c.commit_selection().unwrap();
        c.take_needs_recompute();

        c.reset();
        assert_eq!(c.viewport(), Viewport::DEFAULT);
        assert!(c.take_needs_recompute());
    }

    #[test]
    fn preset_replaces_viewport() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        let vp = c.apply_preset("wide").unwrap();
        assert_eq!(vp.x_min, -5.0);
        assert_eq!(c.viewport(), vp);
        assert!(c.take_needs_recompute());
    }

    #[test]
    fn unknown_preset_keeps_viewport() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        assert!(matches!(
            c.apply_preset("atlantis"),
            Err(CoreError::UnknownPreset(_))
        ));
        assert_eq!(c.viewport(), Viewport::DEFAULT);
        assert!(!c.needs_recompute());
    }

    #[test]
    fn preset_discards_selection() {
        let mut c = ViewportController::new(100, 100);
        c.begin_selection(10.0, 10.0);
        c.apply_preset("home").unwrap();
        assert_eq!(c.state(), &ControllerState::Idle);
    }

    #[test]
    fn resize_marks_stale() {
        let mut c = ViewportController::new(100, 100);
        c.take_needs_recompute();
        c.resize(100, 100);
        assert!(!c.needs_recompute());
        c.resize(320, 200);
        assert_eq!(c.image_size(), (320, 200));
        assert!(c.take_needs_recompute());
    }

    #[test]
    fn set_viewport_validates() {
        let mut c = ViewportController::new(100, 100);
        let bad = Viewport {
            x_min: 1.0,
            x_max: 0.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert!(c.set_viewport(bad).is_err());
        assert_eq!(c.viewport(), Viewport::DEFAULT);
    }
}
