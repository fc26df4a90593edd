//! Step controller
//!
//! Binds a source's discrete time-step range to a mutable "current step".
//! The controller exists only while a session is alive; it is attached once
//! when the source is known and steps only if the source reports more than
//! one step.
//!
//! Bounds-change events update stored bounds and nothing else: re-rendering
//! after a file rewrite is always an explicit caller decision.

use crate::error::CoreResult;
use impanel_source::{FileSource, SourceEvent, StepRange};
use tracing::debug;

/// Stepping state of a controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    /// The source holds a single step; nothing to control
    NoStepping,
    /// The source holds several steps
    Stepping {
        /// Step currently displayed
        current: i64,
        /// Step bounds as last reported by the source
        bounds: StepRange,
        /// Set when a bounds-change notification has been absorbed and the
        /// displayed frame may be stale
        file_changed: bool,
    },
}

/// Tracks the displayed step against a time-varying source
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepController {
    state: StepState,
}

impl StepController {
    /// Attach to a source's reported step range
    ///
    /// Transitions to `Stepping` only when the range holds more than one
    /// step. The initial step is stored as given; the controller never
    /// clamps, the source defines out-of-range behavior.
    pub fn attach(bounds: StepRange, initial: i64) -> Self {
        let state = if bounds.has_multiple_steps() {
            StepState::Stepping {
                current: initial,
                bounds,
                file_changed: false,
            }
        } else {
            StepState::NoStepping
        };
        Self { state }
    }

    /// Current state
    pub fn state(&self) -> StepState {
        self.state
    }

    /// True when the controller is driving a multi-step source
    pub fn is_stepping(&self) -> bool {
        matches!(self.state, StepState::Stepping { .. })
    }

    /// Step currently displayed, if stepping
    pub fn current(&self) -> Option<i64> {
        match self.state {
            StepState::Stepping { current, .. } => Some(current),
            StepState::NoStepping => None,
        }
    }

    /// Bounds as last reported by the source, if stepping
    pub fn bounds(&self) -> Option<StepRange> {
        match self.state {
            StepState::Stepping { bounds, .. } => Some(bounds),
            StepState::NoStepping => None,
        }
    }

    /// Materialize a step on the source and record it as current
    ///
    /// The raw value is passed through; the source decides whether an
    /// out-of-range step is an error. On failure the recorded step is left
    /// unchanged. Callers re-render after a successful change.
    pub fn set_step<S: FileSource + ?Sized>(
        &mut self,
        step: i64,
        source: &mut S,
    ) -> CoreResult<()> {
        if let StepState::Stepping { current, .. } = &mut self.state {
            source.set_step(step)?;
            *current = step;
            debug!(step, "step materialized");
        }
        Ok(())
    }

    /// Absorb a source event
    ///
    /// `StepBoundsChanged` replaces the stored bounds and clears the changed
    /// flag; it never triggers a re-render.
    pub fn handle_event(&mut self, event: SourceEvent) {
        match event {
            SourceEvent::StepBoundsChanged { range } => {
                if let StepState::Stepping {
                    bounds,
                    file_changed,
                    ..
                } = &mut self.state
                {
                    debug!(low = range.low, high = range.high, "step bounds changed");
                    *bounds = range;
                    *file_changed = false;
                }
            }
        }
    }
}
