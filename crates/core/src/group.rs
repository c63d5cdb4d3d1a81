mod channel;
#[cfg(feature = "mpi")]
mod mpi_group;
mod serial;

pub use channel::ChannelGroup;
#[cfg(feature = "mpi")]
pub use mpi_group::MpiGroup;
pub use serial::SerialGroup;

use std::error::Error as StdError;

use thiserror::Error;

/// A fixed group of cooperating processes.
///
/// Every collective call must be reached by every rank in the same order.
/// A rank that never reaches a collective stalls the whole group; there is no
/// timeout and no cancellation.
pub trait ProcessGroup {
    type Error: StdError + Send + Sync + 'static;

    /// Returns this process's rank within the group.
    fn rank(&self) -> usize;

    /// Returns the number of processes in the group.
    fn size(&self) -> usize;

    /// Broadcasts one byte from `root` to every rank in the group.
    ///
    /// On `root`, `value` is read; on every other rank it is overwritten with
    /// the root's value. Blocks until this rank's part of the collective is
    /// complete.
    ///
    /// # Errors
    ///
    /// Returns an error if `root` is not a rank of the group or if the
    /// collective fails. Either way the group can no longer stay in lockstep
    /// and the caller must abort the run.
    fn broadcast_u8(&self, root: usize, value: &mut u8) -> Result<(), Self::Error>;

    /// Broadcasts a flag from `root` to every rank in the group.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`ProcessGroup::broadcast_u8`] does.
    fn broadcast_bool(&self, root: usize, value: &mut bool) -> Result<(), Self::Error> {
        let mut byte = u8::from(*value);
        self.broadcast_u8(root, &mut byte)?;
        *value = byte != 0;
        Ok(())
    }
}

/// Errors reported by the built-in process groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GroupError {
    #[error("broadcast root {root} is outside a group of size {size}")]
    InvalidRoot { root: usize, size: usize },

    #[error("rank {rank} is no longer reachable")]
    Disconnected { rank: usize },

    #[error("rank {root} abandoned the collective after a local failure")]
    Aborted { root: usize },
}
