//! Scoped look-ahead over a decoder state.
//!
//! A peeker borrows the state exclusively, so no other decoder operation can
//! run while one is open, and two can never be open at once. Every token it
//! consumes is recorded together with its post-read offset; dropping the
//! peeker rewinds the state and queues the recording for replay, so the next
//! read sees the first peeked token again at its original offset.
//!
//! String payloads are copied when recorded: the reader's scratch buffer
//! will have been overwritten long before the replay is consumed.
use crate::decoder::DecoderState;
use crate::token::{Token, TokenId};
use crate::Result;

/// One-shot look-ahead session. Closing happens on drop, on every path.
pub struct Peeker<'a, 'r> {
    state: &'a mut DecoderState<'r>,
    recorded: Vec<(Token<'static>, u64)>,
    start_offset: u64,
    start_depth: u32,
}

impl<'a, 'r> Peeker<'a, 'r> {
    pub(crate) fn new(state: &'a mut DecoderState<'r>) -> Self {
        let start_offset = state.offset;
        let start_depth = state.depth;
        Self {
            state,
            recorded: Vec::new(),
            start_offset,
            start_depth,
        }
    }

    /// Read one token ahead. The returned token owns its payload.
    pub fn read_token(&mut self) -> Result<Token<'static>> {
        let t = {
            let (t, _) = self.state.read_token()?;
            t.into_owned()
        };
        self.recorded.push((t.clone(), self.state.offset));
        Ok(t)
    }

    /// Read one token ahead, returning only its kind. The token is still
    /// captured in full so the replay stays intact.
    pub fn skip_token(&mut self) -> Result<TokenId> {
        Ok(self.read_token()?.id())
    }

    /// Close the session, rewinding everything that was peeked.
    pub fn close(self) {}
}

impl Drop for Peeker<'_, '_> {
    fn drop(&mut self) {
        self.state.offset = self.start_offset;
        self.state.depth = self.start_depth;
        // Reversed so the replay stack pops in original read order.
        while let Some(entry) = self.recorded.pop() {
            self.state.replay.push(entry);
        }
    }
}

/* vim: textwidth=80
 */
