use super::{GroupError, ProcessGroup};

/// A group holding only the calling process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerialGroup;

impl ProcessGroup for SerialGroup {
    type Error = GroupError;

    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast_u8(&self, root: usize, _value: &mut u8) -> Result<(), Self::Error> {
        if root != 0 {
            return Err(GroupError::InvalidRoot { root, size: 1 });
        }
        Ok(())
    }
}
