//! Microsoft Graph integration
//!
//! This module provides:
//! - An explicit session created by connecting with a bearer token
//! - A Graph API client implementing [`crate::remote::RemoteMailClient`]
//! - Folder and item enumeration
//! - Response normalization to domain models

mod client;
mod normalize;
mod session;

pub use client::GraphClient;
pub use normalize::{classify_move_response, normalize_folder, normalize_message, parse_retry_after};
pub use session::GraphSession;

/// Graph API response types
pub mod api {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    /// One page of a collection response
    #[derive(Debug, Deserialize)]
    pub struct Page<T> {
        #[serde(default = "Vec::new")]
        pub value: Vec<T>,
        #[serde(rename = "@odata.nextLink")]
        pub next_link: Option<String>,
    }

    /// Mail folder resource
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MailFolder {
        #[serde(default)]
        pub id: String,
        #[serde(default)]
        pub display_name: String,
        pub total_item_count: Option<u64>,
        pub child_folder_count: Option<u64>,
    }

    /// Message resource, reduced to the selected properties
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Message {
        pub id: String,
        pub subject: Option<String>,
        pub from: Option<Recipient>,
        pub received_date_time: Option<DateTime<Utc>>,
        pub parent_folder_id: Option<String>,
        pub single_value_extended_properties: Option<Vec<ExtendedProperty>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Recipient {
        pub email_address: EmailAddress,
    }

    #[derive(Debug, Deserialize)]
    pub struct EmailAddress {
        pub name: Option<String>,
        pub address: Option<String>,
    }

    /// MAPI property exposed through Graph
    #[derive(Debug, Deserialize)]
    pub struct ExtendedProperty {
        pub id: String,
        pub value: String,
    }

    /// Body of a move request
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MoveRequest<'a> {
        pub destination_id: &'a str,
    }

    /// Signed-in user
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct User {
        pub user_principal_name: Option<String>,
        pub mail: Option<String>,
    }

    /// Error envelope returned on failed requests
    #[derive(Debug, Deserialize)]
    pub struct ErrorResponse {
        pub error: ErrorBody,
    }

    #[derive(Debug, Deserialize)]
    pub struct ErrorBody {
        #[serde(default)]
        pub code: String,
        #[serde(default)]
        pub message: String,
    }
}
