//! Trait for devices driven by cycle budgets.

use crate::Cycles;

/// A device that consumes caller-supplied cycle budgets.
///
/// The contract is strict: at most one discrete unit of work (a state
/// decision or one pixel/sample/transfer) per granted cycle. Callers rely on
/// this for real-time budget accounting, so implementations must not batch.
pub trait CycleStepped {
    /// Consume up to `budget` cycles of work.
    fn run(&mut self, budget: Cycles);

    /// `true` while the device still has work pending.
    fn busy(&self) -> bool;

    /// Grant cycles until the device goes idle.
    ///
    /// The only busy-loop in the core; used by hosts that need a fully
    /// finished result (e.g. a drained frame) outside the normal schedule.
    fn flush(&mut self) {
        while self.busy() {
            self.run(Cycles::new(1000));
        }
    }
}
