//! Virtual-time timers. Nothing here reads a clock; the owner feeds elapsed milliseconds.

/// One-shot timer counting down to zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Deadline {
    remaining_ms: u32,
}

impl Deadline {
    pub const fn after(ms: u32) -> Self {
        Self { remaining_ms: ms }
    }

    pub const fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub const fn is_due(&self) -> bool {
        self.remaining_ms == 0
    }

    pub fn elapse(&mut self, ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(ms);
    }
}

/// Repeating timer; fires every `period_ms`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Interval {
    period_ms: u32,
    next: Deadline,
}

impl Interval {
    pub fn new(period_ms: u32) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next: Deadline::after(period_ms),
        }
    }

    pub const fn until_next_ms(&self) -> u32 {
        self.next.remaining_ms()
    }

    pub fn elapse(&mut self, ms: u32) {
        self.next.elapse(ms);
    }

    /// Consumes a due firing and schedules the following one.
    pub fn take_due(&mut self) -> bool {
        if self.next.is_due() {
            self.next = Deadline::after(self.period_ms);
            true
        } else {
            false
        }
    }
}
