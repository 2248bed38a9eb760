use rand::Rng;

use crate::config::PuzzleConfig;
use crate::countdown::{format_remaining, remaining_ms};
use crate::easing::ease_in_out_cubic;
use crate::error::PuzzleError;
use crate::geometry::Size;
use crate::piece::Piece;
use crate::scale::scale_factor;
use crate::schedule::SolvingSchedule;
use crate::shuffle::scatter;
use crate::slicer::{grid_cells, slice_pieces};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    Finished,
}

/// What the host should do after a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    /// Schedule another frame.
    Continue,
    /// Stop scheduling; the surface shows the assembled image.
    Finished,
}

/// The piece that was moving during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActivePiece {
    pub piece: usize,
    pub schedule_position: usize,
    pub progress: f64,
    pub eased: f64,
}

/// Outcome of one [`Engine::tick`].
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub elapsed: f64,
    pub remaining_ms: f64,
    pub countdown: String,
    pub active: Option<ActivePiece>,
    pub status: FrameStatus,
}

/// Owns the surface, the pieces and the schedule for one run, and turns
/// monotonic timestamps into frames.
pub struct Engine<S: Surface> {
    config: PuzzleConfig,
    surface: S,
    pieces: Vec<Piece<S::Bitmap>>,
    schedule: SolvingSchedule,
    scale: f64,
    canvas: Size,
    started_at: f64,
    solving_index: usize,
    phase: Phase,
}

impl<S: Surface> Engine<S> {
    /// Scale, slice, scatter and schedule. The run's clock starts at
    /// `started_at` (same time base as later [`Engine::tick`] calls).
    pub fn new<R: Rng + ?Sized>(
        config: PuzzleConfig,
        mut surface: S,
        image: &S::Image,
        rng: &mut R,
        started_at: f64,
    ) -> Result<Self, PuzzleError> {
        let natural = surface.image_size(image);
        let scale = scale_factor(natural, config.max_box());
        let canvas = natural.scaled(scale);
        surface.resize(canvas)?;
        log::debug!(
            "image {}x{} scaled by {:.4} to {:.1}x{:.1}",
            natural.width,
            natural.height,
            scale,
            canvas.width,
            canvas.height
        );

        let cells = grid_cells(natural, scale, config.rows, config.cols);
        let mut pieces = slice_pieces(&mut surface, image, &cells)?;
        scatter(&mut pieces, canvas, config.max_rotation_deg, rng);
        let schedule = SolvingSchedule::new(pieces.len(), config.total_duration_ms, rng);
        log::debug!(
            "{} pieces, {:.1} ms each",
            pieces.len(),
            schedule.piece_move_duration()
        );

        Ok(Engine {
            config,
            surface,
            pieces,
            schedule,
            scale,
            canvas,
            started_at,
            solving_index: 0,
            phase: Phase::Running,
        })
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn pieces(&self) -> &[Piece<S::Bitmap>] {
        &self.pieces
    }

    pub fn schedule(&self) -> &SolvingSchedule {
        &self.schedule
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    /// Number of schedule positions already completed.
    pub fn solving_index(&self) -> usize {
        self.solving_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Run one frame at monotonic time `now`.
    pub fn tick(&mut self, now: f64) -> Frame {
        let total = self.config.total_duration_ms;
        if self.phase == Phase::Finished {
            return Frame {
                elapsed: now - self.started_at,
                remaining_ms: 0.0,
                countdown: format_remaining(0.0),
                active: None,
                status: FrameStatus::Finished,
            };
        }

        let elapsed = now - self.started_at;
        let remaining = remaining_ms(total, elapsed);

        self.surface.clear();
        for piece in &self.pieces {
            self.surface.draw(piece.bitmap(), piece.placement());
        }

        // The eased draw of the moving piece lands on top of its resting draw.
        let active = self.advance_active(elapsed);

        if elapsed < total {
            return Frame {
                elapsed,
                remaining_ms: remaining,
                countdown: format_remaining(remaining),
                active,
                status: FrameStatus::Continue,
            };
        }

        self.finish();
        Frame {
            elapsed,
            remaining_ms: 0.0,
            countdown: format_remaining(0.0),
            active,
            status: FrameStatus::Finished,
        }
    }

    fn advance_active(&mut self, elapsed: f64) -> Option<ActivePiece> {
        let k = self.solving_index;
        let index = self.schedule.piece_at(k)?;
        let progress = self.schedule.progress(k, elapsed);
        let eased = ease_in_out_cubic(progress);
        let count = self.pieces.len();

        let piece = &mut self.pieces[index];
        self.surface
            .draw(piece.bitmap(), piece.placement_toward_home(eased));

        if progress >= 1.0 {
            piece.solve();
            self.solving_index += 1;
            log::debug!(
                "piece {} (row {}, col {}) home, {}/{}",
                index,
                piece.row,
                piece.col,
                self.solving_index,
                count
            );
        }

        Some(ActivePiece {
            piece: index,
            schedule_position: k,
            progress,
            eased,
        })
    }

    /// Latch everything home and draw the assembled image, whatever the frame
    /// timing left unfinished.
    fn finish(&mut self) {
        let stragglers = self.pieces.len() - self.solving_index;
        if stragglers > 0 {
            log::debug!("{stragglers} pieces snapped home at deadline");
        }
        for piece in &mut self.pieces {
            piece.solve();
        }
        self.solving_index = self.pieces.len();
        self.phase = Phase::Finished;

        self.surface.clear();
        for piece in &self.pieces {
            self.surface.draw(piece.bitmap(), piece.placement());
        }
        log::info!("puzzle assembled");
    }

    /// Release the surface. The host must already have stopped its frame loop.
    pub fn destroy(mut self) {
        self.surface.release();
    }
}
