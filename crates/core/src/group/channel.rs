use std::{
    cell::{Cell, RefCell},
    sync::mpsc::{self, Receiver, Sender},
};

use super::{GroupError, ProcessGroup};

#[derive(Debug)]
enum Message {
    /// The payload of collective `seq`.
    Payload { seq: u64, value: u8 },
    /// The sending rank dropped its handle.
    Departed { rank: usize },
}

/// A process group whose ranks live on threads of a single OS process.
///
/// [`ChannelGroup::create`] returns one handle per rank. Each handle is moved
/// onto its own thread and used exactly like a distributed group: every rank
/// must reach every collective in the same order.
///
/// Collectives are numbered per handle, so a broadcast that arrives before
/// its receiver has reached the matching call is held back until it does.
/// Dropping a handle notifies every peer. A rank waiting on a root that has
/// left observes [`GroupError::Disconnected`] instead of blocking forever,
/// once everything the root sent before leaving has been consumed.
#[derive(Debug)]
pub struct ChannelGroup {
    rank: usize,
    size: usize,
    peers: Vec<Option<Sender<Message>>>,
    inbox: Receiver<Message>,
    early: RefCell<Vec<(u64, u8)>>,
    departed: RefCell<Vec<usize>>,
    seq: Cell<u64>,
}

impl ChannelGroup {
    /// Creates the handles of a group with `size` ranks, ordered by rank.
    #[must_use]
    pub fn create(size: usize) -> Vec<Self> {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..size).map(|_| mpsc::channel()).unzip();

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| {
                let peers = senders
                    .iter()
                    .enumerate()
                    .map(|(peer, sender)| (peer != rank).then(|| sender.clone()))
                    .collect();

                Self {
                    rank,
                    size,
                    peers,
                    inbox,
                    early: RefCell::default(),
                    departed: RefCell::default(),
                    seq: Cell::new(0),
                }
            })
            .collect()
    }

    /// Advances and returns the collective counter.
    fn next_seq(&self) -> u64 {
        let seq = self.seq.get();
        self.seq.set(seq + 1);
        seq
    }

    /// Sends collective `seq` to every peer.
    ///
    /// A peer that has gone does not stop delivery to the others; the first
    /// such peer is reported afterwards.
    fn send_all(&self, seq: u64, value: u8) -> Result<(), GroupError> {
        let mut first_gone = None;
        for (peer, sender) in self.peers.iter().enumerate() {
            if let Some(sender) = sender
                && sender.send(Message::Payload { seq, value }).is_err()
            {
                first_gone.get_or_insert(GroupError::Disconnected { rank: peer });
            }
        }
        first_gone.map_or(Ok(()), Err)
    }

    /// Waits for the payload of collective `seq` sent by `root`.
    fn receive(&self, seq: u64, root: usize) -> Result<u8, GroupError> {
        let mut early = self.early.borrow_mut();
        if let Some(pos) = early.iter().position(|&(s, _)| s == seq) {
            return Ok(early.swap_remove(pos).1);
        }

        // A root's messages arrive in the order it sent them, so once its
        // departure is seen, everything it sent before is already in `early`.
        let mut departed = self.departed.borrow_mut();
        loop {
            if departed.contains(&root) {
                return Err(GroupError::Disconnected { rank: root });
            }

            match self.inbox.recv() {
                Ok(Message::Payload { seq: s, value }) if s == seq => return Ok(value),
                Ok(Message::Payload { seq: s, value }) => early.push((s, value)),
                Ok(Message::Departed { rank }) => departed.push(rank),
                Err(_) => return Err(GroupError::Disconnected { rank: root }),
            }
        }
    }
}

impl ProcessGroup for ChannelGroup {
    type Error = GroupError;

    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast_u8(&self, root: usize, value: &mut u8) -> Result<(), Self::Error> {
        if root >= self.size {
            return Err(GroupError::InvalidRoot {
                root,
                size: self.size,
            });
        }

        let seq = self.next_seq();

        if self.rank == root {
            self.send_all(seq, *value)
        } else {
            *value = self.receive(seq, root)?;
            Ok(())
        }
    }
}

impl Drop for ChannelGroup {
    fn drop(&mut self) {
        for sender in self.peers.iter().flatten() {
            // A peer that is already gone needs no notice.
            let _ = sender.send(Message::Departed { rank: self.rank });
        }
    }
}
