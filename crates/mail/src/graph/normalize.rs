//! Graph API response normalization
//!
//! Converts Graph resources to domain models and classifies move responses.

use anyhow::{Result, ensure};
use chrono::Utc;
use std::time::Duration;

use super::api;
use crate::models::{EmailAddress, FolderId, FolderSummary, ItemId, MailItem};
use crate::remote::MoveOutcome;

/// MAPI tag of PR_MESSAGE_SIZE
pub(crate) const MESSAGE_SIZE_TAG: u32 = 0x0E08;

/// Extended property id used to request the message size
pub(crate) const MESSAGE_SIZE_PROPERTY: &str = "Integer 0x0E08";

/// Backoff used when a throttled response carries no usable Retry-After
pub(crate) const DEFAULT_THROTTLE_BACKOFF: Duration = Duration::from_secs(5);

/// Error codes Graph uses to signal throttling on otherwise generic statuses
const THROTTLE_CODES: [&str; 3] = ["ApplicationThrottled", "ErrorServerBusy", "TooManyRequests"];

/// Normalize a Graph message to a MailItem
pub fn normalize_message(message: api::Message, folder_id: &FolderId) -> Result<MailItem> {
    ensure!(!message.id.is_empty(), "Message has no id");

    let from = message
        .from
        .and_then(|r| {
            let address = r.email_address.address?;
            Some(match r.email_address.name {
                Some(name) if !name.is_empty() && name != address => {
                    EmailAddress::with_name(name, address)
                }
                _ => EmailAddress::new(address),
            })
        })
        .unwrap_or_else(|| EmailAddress::new("unknown@unknown.com"));

    let parent = message
        .parent_folder_id
        .map(FolderId::new)
        .unwrap_or_else(|| folder_id.clone());

    let size = message
        .single_value_extended_properties
        .as_deref()
        .and_then(message_size)
        .unwrap_or(0);

    Ok(MailItem::builder(ItemId::new(message.id), parent)
        .size(size)
        .from(from)
        .subject(message.subject.unwrap_or_default())
        .received_at(message.received_date_time.unwrap_or_else(Utc::now))
        .build())
}

/// Normalize a Graph mail folder to a FolderSummary
pub fn normalize_folder(folder: api::MailFolder) -> FolderSummary {
    FolderSummary {
        id: FolderId::new(folder.id),
        name: folder.display_name,
        total_item_count: folder.total_item_count.unwrap_or(0),
        child_folder_count: folder.child_folder_count.unwrap_or(0),
    }
}

/// Read PR_MESSAGE_SIZE from a message's extended properties
fn message_size(properties: &[api::ExtendedProperty]) -> Option<u64> {
    properties
        .iter()
        .find(|p| is_message_size_property(&p.id))
        .and_then(|p| p.value.trim().parse().ok())
}

/// Graph echoes the id as e.g. "Integer 0xe08", so compare by tag value
fn is_message_size_property(id: &str) -> bool {
    let mut parts = id.split_whitespace();
    let (Some(kind), Some(tag), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let hex = tag.trim_start_matches("0x").trim_start_matches("0X");
    kind.eq_ignore_ascii_case("Integer") && u32::from_str_radix(hex, 16) == Ok(MESSAGE_SIZE_TAG)
}

/// Parse a Retry-After header given in delay-seconds
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Map a non-successful move response to a MoveOutcome
pub fn classify_move_response(status: u16, retry_after: Option<Duration>, body: &str) -> MoveOutcome {
    let error = serde_json::from_str::<api::ErrorResponse>(body).ok();
    let code_throttled = error
        .as_ref()
        .is_some_and(|e| THROTTLE_CODES.contains(&e.error.code.as_str()));

    if (200..300).contains(&status) {
        return MoveOutcome::Moved;
    }

    if status == 429 || status == 503 || code_throttled {
        return MoveOutcome::throttled(retry_after.unwrap_or(DEFAULT_THROTTLE_BACKOFF));
    }

    let cause = match error {
        Some(e) if !e.error.message.is_empty() => {
            format!("HTTP {}: {} ({})", status, e.error.message, e.error.code)
        }
        _ => format!("HTTP {}", status),
    };
    MoveOutcome::failed(cause)
}
