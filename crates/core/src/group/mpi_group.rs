use mpi::{topology::SimpleCommunicator, traits::*};

use super::{GroupError, ProcessGroup};

/// A process group backed by an MPI communicator.
///
/// MPI aborts the job when a collective fails, so broadcasts only report
/// invalid roots.
pub struct MpiGroup {
    comm: SimpleCommunicator,
}

impl MpiGroup {
    /// Wraps an existing communicator.
    #[must_use]
    pub fn new(comm: SimpleCommunicator) -> Self {
        Self { comm }
    }

    /// Returns the wrapped communicator.
    #[must_use]
    pub fn comm(&self) -> &SimpleCommunicator {
        &self.comm
    }
}

impl ProcessGroup for MpiGroup {
    type Error = GroupError;

    #[allow(clippy::cast_sign_loss)]
    fn rank(&self) -> usize {
        self.comm.rank() as usize
    }

    #[allow(clippy::cast_sign_loss)]
    fn size(&self) -> usize {
        self.comm.size() as usize
    }

    fn broadcast_u8(&self, root: usize, value: &mut u8) -> Result<(), Self::Error> {
        let size = self.size();
        let invalid = GroupError::InvalidRoot { root, size };
        if root >= size {
            return Err(invalid);
        }
        let root = i32::try_from(root).map_err(|_| invalid)?;

        self.comm.process_at_rank(root).broadcast_into(value);
        Ok(())
    }
}
