/// Handle of one requested display-refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(pub u64);

/// Display-refresh timing source.
///
/// A request fires at most once. Components remember the handle they are waiting for and ignore
/// any other delivery, so cancelling twice (or delivering after cancel) is harmless.
pub trait FrameScheduler {
    /// Ask for one callback on the next refresh.
    fn request_frame(&mut self) -> FrameRequestId;

    /// Withdraw a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Frame clock driven explicitly by the host (tests, offline rendering).
#[derive(Debug, Default)]
pub struct ManualFrameClock {
    next_id: u64,
    pending: Vec<FrameRequestId>,
    ticks: u64,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one refresh and hand out every request that was pending at that moment.
    /// Requests made while servicing these handles wait for the next tick.
    pub fn tick(&mut self) -> Vec<FrameRequestId> {
        self.ticks += 1;
        std::mem::take(&mut self.pending)
    }

    pub fn pending(&self) -> &[FrameRequestId] {
        &self.pending
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl FrameScheduler for ManualFrameClock {
    fn request_frame(&mut self) -> FrameRequestId {
        self.next_id += 1;
        let id = FrameRequestId(self.next_id);
        self.pending.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        self.pending.retain(|p| *p != id);
    }
}
