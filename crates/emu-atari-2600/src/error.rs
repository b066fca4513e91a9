//! Console errors.

use atari_2600_cartridge::CartridgeError;
use emu_core::StateError;
use mos_6502::CpuError;
use thiserror::Error;

/// Anything that stops the console from being built or from running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Atari2600Error {
    /// The ROM image could not be mapped.
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),

    /// The CPU hit an instruction it cannot execute past.
    #[error(transparent)]
    Cpu(#[from] CpuError),

    /// A save state could not be restored. The console is unchanged.
    #[error("save state rejected: {0}")]
    State(#[from] StateError),
}
