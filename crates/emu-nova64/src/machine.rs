//! The Nova-64 machine: blitter, MMU and frame scheduling.
//!
//! The CPU core itself is external; it drives the machine through the
//! [`MemoryBus`] callbacks and reports its consumed cycles to
//! [`Nova64::run`]. On every frame boundary the machine notifies the
//! blitter (possible screen-refresh interrupt) and grants it the per-frame
//! cycle budget. The presentation layer calls [`Nova64::finish_frame`] and
//! then reads the framebuffer.

use emu_core::{CycleStepped, Cycles, FrameClock, MemoryBus};

use crate::blitter::{Blitter, TOTAL_PIXELS};
use crate::config::Nova64Config;
use crate::mmu::Mmu;

/// CPU clock rate in Hz.
pub const CPU_CLOCK_HZ: u32 = 4_000_000;

/// Raster refresh rate.
pub const FRAMES_PER_SECOND: u32 = 60;

/// CPU cycles per frame.
pub const CPU_CYCLES_PER_FRAME: u32 = CPU_CLOCK_HZ / FRAMES_PER_SECOND;

/// Blitter cycle budget granted per frame: enough for a full clear plus
/// several full-screen blits. Whatever does not finish in the budget is
/// picked up by [`Nova64::finish_frame`].
pub const BLIT_CYCLES_PER_FRAME: u32 = 8 * TOTAL_PIXELS as u32;

/// The machine context object owning all shared hardware state.
pub struct Nova64 {
    blitter: Blitter,
    mmu: Mmu,
    frame_clock: FrameClock,
    frame_done: bool,
}

impl Nova64 {
    #[must_use]
    pub fn new(config: &Nova64Config) -> Self {
        Self {
            blitter: Blitter::new(),
            mmu: Mmu::new(&config.rom),
            frame_clock: FrameClock::new(CPU_CYCLES_PER_FRAME),
            frame_done: false,
        }
    }

    pub fn reset(&mut self) {
        self.blitter.reset();
        self.mmu.reset();
        self.frame_clock.reset();
        self.frame_done = false;
    }

    /// Account for cycles the external CPU core just executed.
    ///
    /// Crossing a frame boundary raises the frame-done flag, notifies the
    /// blitter of the refresh, and hands the blitter its cycle budget.
    pub fn run(&mut self, consumed: Cycles) {
        if self.frame_clock.advance(consumed) {
            self.frame_done = true;
            self.blitter.notify_screen_refreshed();
            self.blitter.run(Cycles::new(BLIT_CYCLES_PER_FRAME));
        }
    }

    /// Check and clear the frame-done flag.
    pub fn take_frame_done(&mut self) -> bool {
        let done = self.frame_done;
        self.frame_done = false;
        done
    }

    /// Drain the blitter so the framebuffer holds a complete frame.
    pub fn finish_frame(&mut self) {
        self.blitter.flush();
    }

    /// Whether the screen-refresh interrupt line is asserted.
    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.blitter.irq_active()
    }

    #[must_use]
    pub fn blitter(&self) -> &Blitter {
        &self.blitter
    }

    pub fn blitter_mut(&mut self) -> &mut Blitter {
        &mut self.blitter
    }

    #[must_use]
    pub fn mmu(&self) -> &Mmu {
        &self.mmu
    }

    pub fn mmu_mut(&mut self) -> &mut Mmu {
        &mut self.mmu
    }
}

impl MemoryBus for Nova64 {
    fn read(&mut self, address: u16) -> u8 {
        self.mmu.read(&mut self.blitter, address)
    }

    fn write(&mut self, address: u16, value: u8) {
        self.mmu.write(&mut self.blitter, address, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_boundary_grants_blitter_budget() {
        let mut machine = Nova64::new(&Nova64Config::default());
        machine.blitter_mut().set_clear_color(0x0000);
        machine.blitter_mut().add_operation_clear();

        machine.run(Cycles::new(CPU_CYCLES_PER_FRAME + 1));
        assert!(machine.take_frame_done());
        assert!(!machine.take_frame_done(), "flag clears on take");
        assert!(
            !machine.blitter().busy(),
            "a single clear fits the frame budget"
        );
        assert_eq!(machine.blitter().framebuffer()[0], 0x0000);
    }

    #[test]
    fn no_frame_before_the_budget_is_reached() {
        let mut machine = Nova64::new(&Nova64Config::default());
        machine.run(Cycles::new(100));
        assert!(!machine.take_frame_done());
    }

    #[test]
    fn refresh_irq_follows_control_register() {
        let mut machine = Nova64::new(&Nova64Config::default());
        machine.write(0x0801, 0x01); // enable refresh IRQ
        machine.run(Cycles::new(CPU_CYCLES_PER_FRAME + 1));
        assert!(machine.irq_active());

        machine.write(0x0800, 0x01); // acknowledge
        assert!(!machine.irq_active());
    }

    #[test]
    fn reset_restores_banking_and_engine() {
        let mut machine = Nova64::new(&Nova64Config::default());
        machine.mmu_mut().set_rom_banked_in(false);
        machine.blitter_mut().add_operation_clear();
        machine.reset();
        assert!(!machine.blitter().busy());
        assert_eq!(machine.blitter().queue_len(), 0);
        // ROM banked back in: reads at $E000 come from the (zero) image
        assert_eq!(machine.read(0xE000), 0);
    }
}
