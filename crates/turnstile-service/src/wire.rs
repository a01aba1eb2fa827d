//! Boundary request/response shapes.
//!
//! JSON field names are a compatibility surface; structs here pin them
//! down with serde renames so transport layers cannot drift. The listing
//! summaries in [`crate::listing`] serialize with the same convention and
//! are used directly as response bodies.

use serde::{Deserialize, Serialize};

use turnstile_core::{EventId, TicketId, TxRef};

use crate::entry::{EntryConfirm, EntryScan};
use crate::errors::ServiceError;
use crate::issuer::IssuedTicket;
use crate::login::{LoginCodeIssued, LoginGrant};

/// Booking request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Event to book against.
    pub event_id: EventId,
    /// Opaque payment reference to hash and bind.
    pub payment_reference: String,
}

/// Booking response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Minted ticket id.
    pub ticket_id: TicketId,
    /// Event booked against.
    pub event_id: EventId,
    /// Reference of the finalized mint.
    pub transaction_ref: TxRef,
}

impl From<IssuedTicket> for BookingResponse {
    fn from(issued: IssuedTicket) -> Self {
        Self {
            ticket_id: issued.ticket_id,
            event_id: issued.event_id,
            transaction_ref: issued.tx_ref,
        }
    }
}

/// Scan request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    /// Ticket from the QR payload.
    pub ticket_id: TicketId,
    /// Holder credential from the QR payload.
    pub holder_credential: String,
}

/// Scan response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    /// Scanned ticket.
    pub ticket_id: TicketId,
    /// Event the ticket admits to.
    pub event_id: EventId,
    /// Event name.
    pub event_name: String,
    /// Event location.
    pub event_location: String,
    /// Event date as unix seconds.
    pub event_date: u64,
    /// Holder phone decoded from the credential.
    pub holder_identity: String,
    /// Whether the ticket was already consumed (always false on success).
    pub used: bool,
    /// The generated code, present only when disclosure is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ScanResponse {
    /// Builds the response, disclosing the code only when `reveal` is set.
    pub fn from_scan(scan: EntryScan, reveal: bool) -> Self {
        Self {
            ticket_id: scan.ticket_id,
            event_id: scan.event_id,
            event_name: scan.event_name,
            event_location: scan.event_location,
            event_date: scan.event_date,
            holder_identity: scan.holder_phone.as_str().to_string(),
            used: scan.used,
            code: reveal.then_some(scan.code),
        }
    }
}

/// Confirm request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    /// Ticket being consumed.
    pub ticket_id: TicketId,
    /// Phone the admin verified verbally.
    pub phone: String,
    /// Code the holder read back.
    pub code: String,
}

/// Confirm response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmResponse {
    /// Consumed ticket.
    pub ticket_id: TicketId,
    /// Reference of the finalized mark-used write.
    pub transaction_ref: TxRef,
}

impl From<EntryConfirm> for ConfirmResponse {
    fn from(confirm: EntryConfirm) -> Self {
        Self {
            ticket_id: confirm.ticket_id,
            transaction_ref: confirm.tx_ref,
        }
    }
}

/// Login-code request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCodeRequest {
    /// Phone requesting a code.
    pub phone: String,
}

/// Login-code response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginCodeResponse {
    /// The generated code, present only when disclosure is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl LoginCodeResponse {
    /// Builds the response, disclosing the code only when `reveal` is set.
    pub fn from_issued(issued: LoginCodeIssued, reveal: bool) -> Self {
        Self {
            code: reveal.then_some(issued.code),
        }
    }
}

/// Login verification request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Phone the code was requested for.
    pub phone: String,
    /// The code received out of band.
    pub code: String,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer credential for subsequent requests.
    pub token: String,
    /// Phone the session was granted to.
    pub phone: String,
    /// Whether the session carries admin privileges.
    pub is_admin: bool,
}

impl From<LoginGrant> for LoginResponse {
    fn from(grant: LoginGrant) -> Self {
        Self {
            token: grant.token,
            phone: grant.phone.as_str().to_string(),
            is_admin: grant.is_admin,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Human-readable rejection reason.
    pub error: String,
}

impl From<&ServiceError> for ErrorResponse {
    fn from(e: &ServiceError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_request_uses_camel_case() {
        let req: BookingRequest =
            serde_json::from_str(r#"{"eventId": 3, "paymentReference": "UPI-1"}"#).unwrap();
        assert_eq!(req.event_id, EventId::new(3));
        assert_eq!(req.payment_reference, "UPI-1");
    }

    #[test]
    fn scan_response_withholds_code_by_default() {
        let scan = EntryScan {
            ticket_id: TicketId::new(1),
            event_id: EventId::new(0),
            event_name: "Night Market".to_string(),
            event_location: "Pier 9".to_string(),
            event_date: 1_767_225_600,
            holder_phone: turnstile_core::Phone::parse("9876543210").unwrap(),
            used: false,
            code: "123456".to_string(),
        };
        let hidden = serde_json::to_string(&ScanResponse::from_scan(scan.clone(), false)).unwrap();
        assert!(!hidden.contains("123456"));
        let shown = serde_json::to_string(&ScanResponse::from_scan(scan, true)).unwrap();
        assert!(shown.contains("\"code\":\"123456\""));
        assert!(shown.contains("\"holderIdentity\":\"9876543210\""));
    }
}
