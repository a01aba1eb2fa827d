//! Journal-file ledger backend.
//!
//! The ledger log is a single append-only file (`.tlg`): a fixed 16-byte
//! header followed by kind-tagged record frames. The frame kind byte is
//! the operation discriminator, and the payload is the operation's JSON
//! record, so a frame is self-describing and can be cross-checked against
//! its payload on replay.
//!
//! ```text
//! header:  magic "TLG1" | version u16 le | flags u16 le | reserved [0u8; 8]
//! frame:   kind u8 | reserved [0u8; 3] | payload_len u32 le | payload
//! ```
//!
//! Opening replays every frame through the shared transition rules to
//! rebuild state; a frame that violates them is corruption, not input. In
//! [`ReadMode::Permissive`] a torn final frame (from a crashed writer) is
//! dropped by truncating the file back to the last complete record; in
//! [`ReadMode::Strict`] it is an error.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, Write};
use std::path::Path;
use std::sync::Mutex;

use turnstile_core::{EventId, IdentityToken, PaymentId, TicketId, TxRef};

use crate::error::LedgerError;
use crate::records::{EventRecord, LedgerOp, NewEvent, TicketRecord};
use crate::state::{Applied, LedgerState};
use crate::traits::TicketLedger;

/// Ledger journal magic bytes: `b"TLG1"`.
pub const MAGIC: &[u8; 4] = b"TLG1";

/// Current journal format version: `0x0001`.
pub const VERSION: u16 = 0x0001;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 16;

/// Frame header size in bytes.
pub const FRAME_HEADER_SIZE: usize = 8;

/// Maximum record payload size: 1 MiB. Ledger records are small; anything
/// larger is corruption.
pub const MAX_PAYLOAD_SIZE: u32 = 1024 * 1024;

const KIND_EVENT_CREATED: u8 = 0x01;
const KIND_EVENT_STATUS_SET: u8 = 0x02;
const KIND_TICKET_MINTED: u8 = 0x03;
const KIND_TICKET_USED: u8 = 0x04;

fn op_kind(op: &LedgerOp) -> u8 {
    match op {
        LedgerOp::EventCreated(_) => KIND_EVENT_CREATED,
        LedgerOp::EventStatusSet { .. } => KIND_EVENT_STATUS_SET,
        LedgerOp::TicketMinted { .. } => KIND_TICKET_MINTED,
        LedgerOp::TicketUsed { .. } => KIND_TICKET_USED,
    }
}

/// Read mode for handling a torn final frame on open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Truncated frames are errors.
    Strict,
    /// A truncated tail is dropped and the file is repaired to the last
    /// complete record.
    Permissive,
}

/// Options for opening a journal ledger.
#[derive(Debug, Clone, Copy)]
pub struct JournalOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Torn-tail handling on open (default: [`ReadMode::Strict`]).
    pub mode: ReadMode,
}

impl Default for JournalOptions {
    fn default() -> Self {
        Self {
            sync: false,
            mode: ReadMode::Strict,
        }
    }
}

fn encode_header() -> [u8; HEADER_SIZE] {
    let mut bytes = [0u8; HEADER_SIZE];
    bytes[0..4].copy_from_slice(MAGIC);
    bytes[4..6].copy_from_slice(&VERSION.to_le_bytes());
    // flags and reserved stay zero
    bytes
}

fn decode_header(bytes: &[u8]) -> Result<(), LedgerError> {
    if bytes.len() < HEADER_SIZE {
        return Err(LedgerError::InvalidHeader(format!(
            "header too short: {} bytes",
            bytes.len()
        )));
    }
    if &bytes[0..4] != MAGIC {
        return Err(LedgerError::InvalidHeader(format!(
            "invalid magic: {:?}, expected {:?}",
            &bytes[0..4],
            MAGIC
        )));
    }
    let version = u16::from_le_bytes([bytes[4], bytes[5]]);
    if version != VERSION {
        return Err(LedgerError::InvalidHeader(format!(
            "unsupported version: 0x{:04x}, expected 0x{:04x}",
            version, VERSION
        )));
    }
    let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
    if flags != 0 {
        return Err(LedgerError::InvalidHeader(format!(
            "non-zero flags: 0x{:04x}",
            flags
        )));
    }
    if bytes[8..16] != [0u8; 8] {
        return Err(LedgerError::InvalidHeader(
            "non-zero reserved bytes".to_string(),
        ));
    }
    Ok(())
}

struct JournalInner {
    file: File,
    state: LedgerState,
    /// Offset one past the last complete record; appends land here.
    end_offset: u64,
    sync: bool,
}

/// Journal-file ledger backend.
///
/// Replays the record log into memory on open and appends one frame per
/// write. Writes are finalized once the frame is flushed (and fsynced when
/// [`JournalOptions::sync`] is set) and the state transition has been
/// applied; conflicting writes serialize on the internal lock.
pub struct JournalLedger {
    inner: Mutex<JournalInner>,
}

impl JournalLedger {
    /// Opens or creates a journal ledger file.
    ///
    /// A missing or empty file is initialized with a fresh header. An
    /// existing file is validated and replayed per
    /// [`JournalOptions::mode`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the file cannot be opened, the header is
    /// invalid, a frame is malformed or violates transition rules, or (in
    /// strict mode) the final frame is truncated.
    pub fn open<P: AsRef<Path>>(path: P, options: JournalOptions) -> Result<Self, LedgerError> {
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(path)?;

        let len = file.metadata()?.len();
        let mut state = LedgerState::new();
        let end_offset;
        if len == 0 {
            file.write_all(&encode_header())?;
            file.flush()?;
            if options.sync {
                file.sync_all()?;
            }
            end_offset = HEADER_SIZE as u64;
        } else {
            if len < HEADER_SIZE as u64 {
                return Err(LedgerError::InvalidHeader(format!(
                    "file too small to hold a header: {} bytes",
                    len
                )));
            }
            file.seek(io::SeekFrom::Start(0))?;
            let mut header_bytes = [0u8; HEADER_SIZE];
            file.read_exact(&mut header_bytes)?;
            decode_header(&header_bytes)?;
            end_offset = Self::replay(&mut file, len, &mut state, options.mode)?;
            if end_offset < len {
                // Permissive repair: drop the torn tail so appends start
                // at a frame boundary.
                file.set_len(end_offset)?;
            }
            file.seek(io::SeekFrom::Start(end_offset))?;
        }

        Ok(Self {
            inner: Mutex::new(JournalInner {
                file,
                state,
                end_offset,
                sync: options.sync,
            }),
        })
    }

    /// Replays all frames after the header, returning the offset one past
    /// the last complete record.
    fn replay(
        file: &mut File,
        file_len: u64,
        state: &mut LedgerState,
        mode: ReadMode,
    ) -> Result<u64, LedgerError> {
        let mut position = HEADER_SIZE as u64;
        file.seek(io::SeekFrom::Start(position))?;

        loop {
            if position >= file_len {
                return Ok(position);
            }

            let mut frame_header = [0u8; FRAME_HEADER_SIZE];
            if let Err(e) = file.read_exact(&mut frame_header) {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    return match mode {
                        ReadMode::Permissive => Ok(position),
                        ReadMode::Strict => Err(LedgerError::TruncatedFrame { offset: position }),
                    };
                }
                return Err(e.into());
            }

            let kind = frame_header[0];
            if frame_header[1..4] != [0u8; 3] {
                return Err(LedgerError::InvalidFrame {
                    offset: position,
                    reason: "non-zero reserved bytes".to_string(),
                });
            }
            let payload_len = u32::from_le_bytes([
                frame_header[4],
                frame_header[5],
                frame_header[6],
                frame_header[7],
            ]);
            if payload_len > MAX_PAYLOAD_SIZE {
                return Err(LedgerError::InvalidFrame {
                    offset: position,
                    reason: format!(
                        "payload size {} exceeds maximum {}",
                        payload_len, MAX_PAYLOAD_SIZE
                    ),
                });
            }

            let mut payload = vec![0u8; payload_len as usize];
            if let Err(e) = file.read_exact(&mut payload) {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    return match mode {
                        ReadMode::Permissive => Ok(position),
                        ReadMode::Strict => Err(LedgerError::TruncatedFrame { offset: position }),
                    };
                }
                return Err(e.into());
            }

            let op: LedgerOp =
                serde_json::from_slice(&payload).map_err(|e| LedgerError::InvalidFrame {
                    offset: position,
                    reason: format!("unparseable record: {}", e),
                })?;
            if op_kind(&op) != kind {
                return Err(LedgerError::InvalidFrame {
                    offset: position,
                    reason: format!(
                        "frame kind 0x{:02x} disagrees with record discriminator",
                        kind
                    ),
                });
            }
            state.apply(&op).map_err(|e| LedgerError::InvalidFrame {
                offset: position,
                reason: format!("record violates transition rules: {}", e),
            })?;

            position += (FRAME_HEADER_SIZE + payload_len as usize) as u64;
        }
    }

    fn submit(&self, op: LedgerOp) -> Result<(Applied, TxRef), LedgerError> {
        let mut inner = self.inner.lock().expect("ledger lock poisoned");

        // Reject before any bytes reach the log; apply below cannot fail.
        inner.state.check(&op)?;
        let tx_ref = op.tx_ref(inner.state.next_seq())?;

        let payload = serde_json::to_vec(&op)?;
        if payload.len() as u64 > MAX_PAYLOAD_SIZE as u64 {
            return Err(LedgerError::PayloadTooLarge {
                size: payload.len() as u32,
                max: MAX_PAYLOAD_SIZE,
            });
        }
        let mut frame_header = [0u8; FRAME_HEADER_SIZE];
        frame_header[0] = op_kind(&op);
        frame_header[4..8].copy_from_slice(&(payload.len() as u32).to_le_bytes());

        let end = inner.end_offset;
        inner.file.seek(io::SeekFrom::Start(end))?;
        inner.file.write_all(&frame_header)?;
        inner.file.write_all(&payload)?;
        inner.file.flush()?;
        if inner.sync {
            inner.file.sync_all()?;
        }
        inner.end_offset += (FRAME_HEADER_SIZE + payload.len()) as u64;

        let applied = inner.state.apply(&op)?;
        Ok((applied, tx_ref))
    }
}

impl TicketLedger for JournalLedger {
    fn get_event(&self, id: EventId) -> Result<EventRecord, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock poisoned");
        inner.state.event(id).cloned()
    }

    fn get_ticket(&self, id: TicketId) -> Result<TicketRecord, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock poisoned");
        inner.state.ticket(id).cloned()
    }

    fn create_event(&self, event: NewEvent) -> Result<(EventId, TxRef), LedgerError> {
        match self.submit(LedgerOp::EventCreated(event))? {
            (Applied::Event(id), tx_ref) => Ok((id, tx_ref)),
            _ => unreachable!("event creation yields an event id"),
        }
    }

    fn set_event_status(&self, id: EventId, active: bool) -> Result<TxRef, LedgerError> {
        let (_, tx_ref) = self.submit(LedgerOp::EventStatusSet {
            event_id: id,
            active,
        })?;
        Ok(tx_ref)
    }

    fn mint_ticket(
        &self,
        event_id: EventId,
        identity_token: IdentityToken,
        payment_id: PaymentId,
    ) -> Result<(TicketId, TxRef), LedgerError> {
        match self.submit(LedgerOp::TicketMinted {
            event_id,
            identity_token,
            payment_id,
        })? {
            (Applied::Ticket(id), tx_ref) => Ok((id, tx_ref)),
            _ => unreachable!("minting yields a ticket id"),
        }
    }

    fn mark_used(
        &self,
        ticket_id: TicketId,
        identity_token: IdentityToken,
    ) -> Result<TxRef, LedgerError> {
        let (_, tx_ref) = self.submit(LedgerOp::TicketUsed {
            ticket_id,
            identity_token,
        })?;
        Ok(tx_ref)
    }

    fn total_events(&self) -> Result<u64, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock poisoned");
        Ok(inner.state.total_events())
    }

    fn user_tickets(&self, token: &IdentityToken) -> Result<Vec<TicketId>, LedgerError> {
        let inner = self.inner.lock().expect("ledger lock poisoned");
        Ok(inner.state.user_tickets(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let bytes = encode_header();
        assert!(decode_header(&bytes).is_ok());
    }

    #[test]
    fn header_rejects_bad_magic() {
        let mut bytes = encode_header();
        bytes[0] = b'X';
        assert!(decode_header(&bytes).is_err());
    }

    #[test]
    fn header_rejects_unknown_version() {
        let mut bytes = encode_header();
        bytes[4] = 0x02;
        assert!(decode_header(&bytes).is_err());
    }

    #[test]
    fn header_rejects_non_zero_flags() {
        let mut bytes = encode_header();
        bytes[6] = 0x01;
        assert!(decode_header(&bytes).is_err());
    }
}
