use crate::clock::{FrameRequestId, FrameScheduler};
use crate::foundation::core::{CellRect, PixelSize, Point};
use crate::foundation::error::FxResult;
use crate::raster::config::RasterSplitConfig;
use crate::raster::partition::{Partition, paint_partition};
use crate::raster::sample::{SourceSamples, fit_within};
use crate::surface::{PointerEvent, Surface, client_to_scaled};

/// Proof that an image load was requested for a specific source generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// What a pointer event did to the mosaic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitOutcome {
    /// Nothing loaded yet, or the event carries no position.
    Ignored,
    /// Rejected by the minimum-distance gate.
    Gated,
    /// No splittable cell qualified.
    NoTarget,
    /// `replaced` cells were split; the partition now holds `cells` cells.
    Split { replaced: usize, cells: usize },
}

/// Reveals an image by subdividing flat-colored cells under the pointer.
#[derive(Debug)]
pub struct RasterSplitRevealer {
    config: RasterSplitConfig,
    generation: u64,
    pending_load: Option<LoadTicket>,
    samples: Option<SourceSamples>,
    partition: Option<Partition>,
    last_pos: Option<Point>,
    redraw: Option<FrameRequestId>,
}

impl RasterSplitRevealer {
    /// Validate `config` and stage the load of its source.
    pub fn new(config: RasterSplitConfig) -> FxResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            generation: 1,
            pending_load: Some(LoadTicket { generation: 1 }),
            samples: None,
            partition: None,
            last_pos: None,
            redraw: None,
        })
    }

    pub fn config(&self) -> &RasterSplitConfig {
        &self.config
    }

    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.pending_load
    }

    /// Switch to a new image source. The current mosaic is dropped until the load completes.
    pub fn set_source(&mut self, image_src: impl Into<String>) -> LoadTicket {
        self.config.image_src = image_src.into();
        self.invalidate()
    }

    /// Apply new options; returns a ticket when the source or the max box changed.
    pub fn set_config(&mut self, config: RasterSplitConfig) -> FxResult<Option<LoadTicket>> {
        config.validate()?;
        let reload = self.config.needs_reload(&config);
        self.config = config;
        Ok(reload.then(|| self.invalidate()))
    }

    /// Install decoded samples: fit the render size, seed one averaged cell and paint it.
    #[tracing::instrument(skip_all, fields(generation = ticket.generation))]
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        samples: SourceSamples,
        surface: &mut dyn Surface,
    ) -> bool {
        if self.pending_load != Some(ticket) {
            tracing::trace!("discarding stale image load");
            return false;
        }
        self.pending_load = None;

        let max = PixelSize::new(self.config.max_width, self.config.max_height);
        let size = fit_within(samples.size(), max);
        let seed_color = samples.average_color(
            CellRect::new(0, 0, size.width, size.height),
            size,
        );
        let partition = Partition::seed(size, seed_color);

        match surface.context() {
            Some(canvas) => match canvas.resize(size.width, size.height) {
                Ok(()) => paint_partition(canvas, &partition),
                Err(err) => tracing::warn!(%err, "could not size raster surface"),
            },
            None => tracing::debug!("rendering context unavailable; raster split will not render"),
        }

        tracing::debug!(
            image = ?samples.size(),
            render = ?size,
            "raster source loaded"
        );
        self.samples = Some(samples);
        self.partition = Some(partition);
        self.last_pos = None;
        true
    }

    /// Deliver a pointer/touch event; splits cells and schedules at most one redraw.
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        surface: &dyn Surface,
        frames: &mut dyn FrameScheduler,
    ) -> SplitOutcome {
        let client = match event {
            PointerEvent::MouseMove { client } | PointerEvent::TouchMove { client } => client,
            PointerEvent::MouseLeave | PointerEvent::TouchEnd => {
                self.last_pos = None;
                return SplitOutcome::Ignored;
            }
        };
        let (Some(partition), Some(samples)) = (self.partition.as_mut(), self.samples.as_ref())
        else {
            return SplitOutcome::Ignored;
        };

        let size = partition.size();
        let p = client_to_scaled(client, surface.client_rect(), size);

        let min = self.config.min_split_distance;
        if let Some(last) = self.last_pos {
            if min > 0.0 && last.distance(p) < min {
                return SplitOutcome::Gated;
            }
        }
        self.last_pos = Some(p);

        let mode = self.config.split_mode;
        let targets = if self.config.split_radius > 0.0 {
            partition.select_within(p, self.config.split_radius, mode)
        } else {
            partition.select_at(p, mode).into_iter().collect()
        };
        if targets.is_empty() {
            return SplitOutcome::NoTarget;
        }

        let replaced = partition.split(&targets, mode, |cell| samples.average_color(cell, size));
        let cells = partition.len();
        if self.redraw.is_none() {
            self.redraw = Some(frames.request_frame());
        }
        SplitOutcome::Split { replaced, cells }
    }

    /// Repaint the whole mosaic for the pending redraw.
    pub fn on_frame(&mut self, id: FrameRequestId, surface: &mut dyn Surface) -> bool {
        if self.redraw != Some(id) {
            return false;
        }
        self.redraw = None;
        let Some(partition) = self.partition.as_ref() else {
            return false;
        };
        match surface.context() {
            Some(canvas) => {
                paint_partition(canvas, partition);
                true
            }
            None => false,
        }
    }

    /// Drop samples and partition, cancel the pending redraw and any pending load.
    pub fn teardown(&mut self, frames: &mut dyn FrameScheduler) {
        if let Some(id) = self.redraw.take() {
            frames.cancel_frame(id);
        }
        self.pending_load = None;
        self.samples = None;
        self.partition = None;
        self.last_pos = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.partition.is_some()
    }

    pub fn partition(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    pub fn render_size(&self) -> Option<PixelSize> {
        self.partition.as_ref().map(Partition::size)
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw.is_some()
    }

    /// Corner radius for the host's styling; has no effect on the mosaic.
    pub fn border_radius(&self) -> f64 {
        self.config.border_radius
    }

    fn invalidate(&mut self) -> LoadTicket {
        self.generation += 1;
        let ticket = LoadTicket {
            generation: self.generation,
        };
        self.pending_load = Some(ticket);
        self.samples = None;
        self.partition = None;
        self.last_pos = None;
        tracing::debug!(generation = self.generation, "raster source invalidated");
        ticket
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/revealer.rs"]
mod tests;
