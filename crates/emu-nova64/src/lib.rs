//! Nova-64 fantasy computer core.
//!
//! The Nova-64 pairs an external CPU core with a blitter that owns all
//! video memory, renders through a cycle-budgeted pixel engine, and doubles
//! as the machine's text-terminal backend. This crate implements the
//! blitter IC, its register protocol, the CPU-visible bus and the frame
//! scheduler; CPU, audio and windowing live elsewhere and talk to the
//! machine through the `emu-core` bus traits.
//!
//! # Geometry
//!
//! - 512 x 320 visible pixels at 60 Hz, 16-bit ARGB4444 framebuffer
//! - 16 MiB of video memory in five banks under one 24-bit address space
//! - 256 blit descriptors, each up to 512 x 512 source pixels

pub mod blit;
pub mod blitter;
pub mod capture;
pub mod color;
pub mod config;
pub mod font;
pub mod machine;
pub mod mmu;
mod terminal;

pub use blit::Blit;
pub use blitter::{Blitter, Operation, SCREEN_HEIGHT, SCREEN_WIDTH, TOTAL_PIXELS};
pub use config::Nova64Config;
pub use machine::Nova64;
pub use mmu::{AddressTranslator, Mmu};
