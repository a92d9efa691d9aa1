//! Mode controller: the session state machine.
//!
//! The controller owns the annotation store and the overlay table and
//! decides, for every pointer event, whether it belongs to a control, to
//! the mesh, or to nobody.
//!
//! ```text
//!            select(s)              select(s')
//!   ┌──────┐ ─────────► ┌───────────┐ ◄──┐
//!   │ Idle │            │ Painting  │ ───┘
//!   └──────┘ ◄───────── └───────────┘
//!      ▲  ▲    stop()         │
//!      │  │ unlock()          │ lock()
//!      │  │    ┌────────┐     │
//!      │  └────│ Locked │ ◄───┘
//!      │ stop()└────────┘
//!      └─────────┘
//! ```
//!
//! `quit()` leaves any state for the terminal closed state.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    AnnotationStore, CoreError, CoreResult, FaceColor, FacePicker, InputEvent, OverlayLayout,
    ScreenPoint, Sensation, SessionConfig, SnapshotExporter, UiCommand, Viewport,
};

/// What pointer drags currently do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", content = "sensation", rename_all = "snake_case")]
pub enum InteractionMode {
    /// Pointer events are ignored by the mesh.
    #[default]
    Idle,
    /// Presses and drags on the mesh paint the sensation.
    Painting(Sensation),
    /// Camera frozen and painting suppressed.
    Locked,
}

impl InteractionMode {
    /// The sensation being painted, if any.
    #[must_use]
    pub fn sensation(self) -> Option<Sensation> {
        match self {
            InteractionMode::Painting(sensation) => Some(sensation),
            InteractionMode::Idle | InteractionMode::Locked => None,
        }
    }
}

/// Whether the session still accepts events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Events are processed.
    Running,
    /// `quit` was executed; events are ignored.
    Closed,
}

/// How a pointer event was consumed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// The press landed on a control and its command ran.
    Control(UiCommand),
    /// A face was painted.
    Painted {
        /// The painted face.
        face: usize,
        /// Its color after blending.
        color: FaceColor,
    },
    /// Painting was active but the pick found no face.
    Missed,
    /// Nothing happened.
    Ignored,
    /// The session is closed.
    Closed,
}

/// Routes pointer events and commands for one annotation session.
pub struct ModeController<V> {
    viewport: V,
    overlay: OverlayLayout,
    store: AnnotationStore,
    snapshots: SnapshotExporter,
    mode: InteractionMode,
    pointer_down: bool,
    interaction_enabled: bool,
    status: SessionStatus,
}

impl<V: Viewport + FacePicker> ModeController<V> {
    /// Start a session over a fresh, unpainted store of `face_count` faces.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured overlay layout is invalid.
    pub fn new(config: &SessionConfig, viewport: V, face_count: usize) -> CoreResult<Self> {
        Self::resume(config, viewport, AnnotationStore::new(face_count))
    }

    /// Start a session over existing annotations.
    ///
    /// Pushes the store's colors and the control table to the viewport and
    /// draws the first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured overlay layout is invalid.
    pub fn resume(
        config: &SessionConfig,
        mut viewport: V,
        store: AnnotationStore,
    ) -> CoreResult<Self> {
        let (width, height) = viewport.size();
        let overlay = OverlayLayout::new(config.overlay.clone(), width, height)?;

        viewport.set_interaction_enabled(true);
        viewport.set_face_colors(store.colors());

        let mut controller = Self {
            viewport,
            overlay,
            store,
            snapshots: SnapshotExporter::from_config(config),
            mode: InteractionMode::Idle,
            pointer_down: false,
            interaction_enabled: true,
            status: SessionStatus::Running,
        };
        controller.refresh(None);

        tracing::info!(
            "Session started: {} faces, viewport {width}x{height}",
            controller.store.face_count()
        );
        Ok(controller)
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// Whether the session is still running.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Whether `quit` has run.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status == SessionStatus::Closed
    }

    /// Whether the primary button is held.
    #[must_use]
    pub fn pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Whether camera navigation is enabled on the viewport.
    #[must_use]
    pub fn interaction_enabled(&self) -> bool {
        self.interaction_enabled
    }

    /// The annotations.
    #[must_use]
    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// The control table.
    #[must_use]
    pub fn overlay(&self) -> &OverlayLayout {
        &self.overlay
    }

    /// The viewport.
    #[must_use]
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// Mutable access to the viewport, e.g. for camera changes by the host.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// End the session and hand back the viewport and annotations.
    #[must_use]
    pub fn into_parts(self) -> (V, AnnotationStore) {
        (self.viewport, self.store)
    }

    /// Enter painting mode with `sensation`.
    ///
    /// Ignored while locked; unlock or stop first. After a stop from the
    /// locked state the mode changes, but presses stay inert until
    /// `unlock` or `save` re-enables the view.
    pub fn select_sensation(&mut self, sensation: Sensation) -> SessionStatus {
        if self.reject_if_closed("select sensation") {
            return self.status;
        }
        if self.mode == InteractionMode::Locked {
            tracing::info!("View is locked; unlock before selecting {sensation}");
            return self.status;
        }

        self.mode = InteractionMode::Painting(sensation);
        tracing::info!("Painting {sensation}");
        self.refresh(Some(UiCommand::SelectSensation(sensation)));
        self.status
    }

    /// Leave painting (or locked) mode for idle.
    ///
    /// Camera navigation is left as it is.
    pub fn stop(&mut self) -> SessionStatus {
        if self.reject_if_closed("stop") {
            return self.status;
        }

        self.mode = InteractionMode::Idle;
        tracing::info!("Painting stopped");
        self.refresh(Some(UiCommand::Stop));
        self.status
    }

    /// Freeze the camera and suppress painting.
    pub fn lock(&mut self) -> SessionStatus {
        if self.reject_if_closed("lock") {
            return self.status;
        }

        self.mode = InteractionMode::Locked;
        self.set_interaction(false);
        tracing::info!("View locked");
        self.refresh(Some(UiCommand::Lock));
        self.status
    }

    /// Re-enable the camera. A locked session returns to idle; any other
    /// mode is kept.
    pub fn unlock(&mut self) -> SessionStatus {
        if self.reject_if_closed("unlock") {
            return self.status;
        }

        if self.mode == InteractionMode::Locked {
            self.mode = InteractionMode::Idle;
        }
        self.set_interaction(true);
        tracing::info!("View unlocked");
        self.refresh(Some(UiCommand::Unlock));
        self.status
    }

    /// Re-enable the camera and write a snapshot of the current frame.
    ///
    /// The mode is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionClosed`] after `quit`, or the capture
    /// error. The highlight moves to Save either way.
    pub fn save(&mut self) -> CoreResult<PathBuf> {
        if self.reject_if_closed("save") {
            return Err(CoreError::SessionClosed);
        }

        self.set_interaction(true);
        let result = self.snapshots.capture(&mut self.viewport);
        self.refresh(Some(UiCommand::Save));
        result
    }

    /// Highlight Quit, draw one final frame and close the session.
    pub fn quit(&mut self) -> SessionStatus {
        if self.reject_if_closed("quit") {
            return self.status;
        }

        self.refresh(Some(UiCommand::Quit));
        self.viewport.close();
        self.pointer_down = false;
        self.status = SessionStatus::Closed;
        tracing::info!("Session closed");
        self.status
    }

    /// Run a command as if its control were pressed.
    ///
    /// Snapshot failures are logged; the session continues.
    pub fn execute(&mut self, command: UiCommand) -> SessionStatus {
        match command {
            UiCommand::SelectSensation(sensation) => self.select_sensation(sensation),
            UiCommand::Stop => self.stop(),
            UiCommand::Lock => self.lock(),
            UiCommand::Unlock => self.unlock(),
            UiCommand::Save => {
                if let Err(e) = self.save() {
                    tracing::error!("Failed to save snapshot: {e}");
                }
                self.status
            }
            UiCommand::Quit => self.quit(),
        }
    }

    /// Primary button pressed at `point`.
    ///
    /// A press on a control runs its command and never reaches the mesh.
    pub fn on_pointer_down(&mut self, point: ScreenPoint) -> PointerOutcome {
        if self.reject_if_closed("pointer down") {
            return PointerOutcome::Closed;
        }

        self.pointer_down = true;
        if let Some(command) = self.overlay.hit_test(point) {
            tracing::debug!("Control hit: {command}");
            self.execute(command);
            return PointerOutcome::Control(command);
        }
        self.paint_at(point)
    }

    /// Pointer moved to `point`. Paints while the button is held.
    pub fn on_pointer_move(&mut self, point: ScreenPoint) -> PointerOutcome {
        if self.reject_if_closed("pointer move") {
            return PointerOutcome::Closed;
        }
        if !self.pointer_down || self.overlay.hit_test(point).is_some() {
            return PointerOutcome::Ignored;
        }
        self.paint_at(point)
    }

    /// Primary button released.
    pub fn on_pointer_up(&mut self, _point: ScreenPoint) -> PointerOutcome {
        if self.reject_if_closed("pointer up") {
            return PointerOutcome::Closed;
        }
        self.pointer_down = false;
        PointerOutcome::Ignored
    }

    /// Re-anchor the control table to a new viewport size and redraw.
    pub fn on_resize(&mut self, width: u32, height: u32) -> SessionStatus {
        if self.reject_if_closed("resize") {
            return self.status;
        }

        self.overlay.resize(width, height);
        tracing::debug!("Viewport resized to {width}x{height}");
        self.refresh(self.overlay.active());
        self.status
    }

    /// Route a recorded or live input event.
    pub fn dispatch(&mut self, event: &InputEvent) -> SessionStatus {
        match *event {
            InputEvent::PointerDown { x, y } => {
                self.on_pointer_down(ScreenPoint::new(x, y));
            }
            InputEvent::PointerMove { x, y } => {
                self.on_pointer_move(ScreenPoint::new(x, y));
            }
            InputEvent::PointerUp { x, y } => {
                self.on_pointer_up(ScreenPoint::new(x, y));
            }
            InputEvent::Resize { width, height } => {
                self.on_resize(width, height);
            }
            InputEvent::Command { command } => {
                self.execute(command);
            }
        }
        self.status
    }

    fn paint_at(&mut self, point: ScreenPoint) -> PointerOutcome {
        let Some(sensation) = self.mode.sensation() else {
            return PointerOutcome::Ignored;
        };
        if !self.interaction_enabled {
            tracing::debug!("View is disabled; not painting {sensation}");
            return PointerOutcome::Ignored;
        }

        let Some(face) = self.viewport.pick(point) else {
            tracing::debug!("No face under ({}, {})", point.x, point.y);
            return PointerOutcome::Missed;
        };

        match self.store.paint(face, sensation) {
            Ok(color) => {
                self.viewport.set_face_colors(self.store.colors());
                self.viewport.render();
                PointerOutcome::Painted { face, color }
            }
            Err(e) => {
                tracing::warn!("Picker returned an unusable face: {e}");
                PointerOutcome::Missed
            }
        }
    }

    fn set_interaction(&mut self, enabled: bool) {
        self.interaction_enabled = enabled;
        self.viewport.set_interaction_enabled(enabled);
    }

    fn refresh(&mut self, active: Option<UiCommand>) {
        self.overlay.set_active(active);
        self.viewport.set_overlay(self.overlay.controls());
        self.viewport.render();
    }

    fn reject_if_closed(&self, action: &str) -> bool {
        if self.is_closed() {
            tracing::warn!("Ignoring {action}: session is closed");
            return true;
        }
        false
    }
}

impl<V> std::fmt::Debug for ModeController<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeController")
            .field("mode", &self.mode)
            .field("status", &self.status)
            .field("pointer_down", &self.pointer_down)
            .field("faces", &self.store.face_count())
            .finish_non_exhaustive()
    }
}
