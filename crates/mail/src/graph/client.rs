//! Graph API HTTP client
//!
//! Binds folders, enumerates and moves messages, and reads folder item
//! counts. Uses synchronous HTTP (ureq), one request at a time.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use urlencoding::encode;

use super::GraphSession;
use super::api;
use super::normalize::{
    MESSAGE_SIZE_PROPERTY, classify_move_response, normalize_folder, normalize_message,
    parse_retry_after,
};
use crate::models::{FolderHandle, FolderId, FolderSummary, MailItem};
use crate::remote::{BindError, MoveOutcome, RemoteMailClient};

/// Graph API client for one session
pub struct GraphClient {
    session: GraphSession,
}

impl GraphClient {
    /// Items requested per page when enumerating
    const PAGE_SIZE: usize = 100;

    /// Create a new Graph client
    pub fn new(session: GraphSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GraphSession {
        &self.session
    }

    /// End the session held by this client
    pub fn disconnect(self) {
        self.session.disconnect();
    }

    fn user_url(&self, mailbox: &str) -> String {
        format!("{}/users/{}", self.session.base_url(), encode(mailbox))
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, ureq::Error> {
        debug!("GET {}", url);
        let mut response = ureq::get(url)
            .header("Authorization", &self.session.authorization())
            .header("Accept", "application/json")
            .call()?;
        response.body_mut().read_json()
    }

    /// Follow `@odata.nextLink` until the collection is exhausted
    fn get_all<T: DeserializeOwned, F>(&self, first_url: String, mut progress_callback: F) -> Result<Vec<T>>
    where
        F: FnMut(usize),
    {
        let mut all = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            let page: api::Page<T> = self
                .get(&url)
                .with_context(|| format!("Failed to fetch {}", url))?;
            all.extend(page.value);
            progress_callback(all.len());
            next = page.next_link;
        }

        Ok(all)
    }

    /// List the top-level folders of a mailbox
    pub fn list_folders(&self, mailbox: &str) -> Result<Vec<FolderSummary>> {
        let url = format!(
            "{}/mailFolders?$top={}&$select=id,displayName,totalItemCount,childFolderCount",
            self.user_url(mailbox),
            Self::PAGE_SIZE
        );

        let folders: Vec<api::MailFolder> = self.get_all(url, |_| {})?;
        Ok(folders.into_iter().map(normalize_folder).collect())
    }

    /// List ALL items of a folder, optionally restricted by an OData filter
    ///
    /// # Arguments
    /// * `folder` - Folder to enumerate
    /// * `filter` - OData `$filter` expression, e.g. `receivedDateTime lt 2020-01-01T00:00:00Z`
    /// * `progress_callback` - Called with the number of items fetched so far
    pub fn list_items<F>(&self, folder: &FolderHandle, filter: Option<&str>, progress_callback: F) -> Result<Vec<MailItem>>
    where
        F: FnMut(usize),
    {
        let expand = format!(
            "singleValueExtendedProperties($filter=id eq '{}')",
            MESSAGE_SIZE_PROPERTY
        );
        let mut url = format!(
            "{}/mailFolders/{}/messages?$top={}&$select=id,subject,from,receivedDateTime,parentFolderId&$expand={}",
            self.user_url(&folder.mailbox),
            encode(folder.id.as_str()),
            Self::PAGE_SIZE,
            encode(&expand)
        );
        if let Some(filter) = filter.filter(|f| !f.trim().is_empty()) {
            url.push_str(&format!("&$filter={}", encode(filter)));
        }

        let messages: Vec<api::Message> = self.get_all(url, progress_callback)?;
        messages
            .into_iter()
            .map(|m| normalize_message(m, &folder.id))
            .collect()
    }

    /// Find a folder by display name among the mailbox's top-level folders
    fn find_folder_by_name(&self, folder_name: &str, mailbox: &str) -> Result<Option<api::MailFolder>, ureq::Error> {
        let filter = format!("displayName eq '{}'", folder_name.replace('\'', "''"));
        let url = format!(
            "{}/mailFolders?$filter={}&$select=id,displayName",
            self.user_url(mailbox),
            encode(&filter)
        );
        let page: api::Page<api::MailFolder> = self.get(&url)?;
        Ok(page.value.into_iter().next())
    }

    /// Look a folder up by well-known name (inbox, archive, deleteditems, ...)
    fn find_well_known_folder(&self, folder_name: &str, mailbox: &str) -> Result<Option<api::MailFolder>, ureq::Error> {
        let url = format!(
            "{}/mailFolders/{}?$select=id,displayName",
            self.user_url(mailbox),
            encode(folder_name)
        );
        match self.get::<api::MailFolder>(&url) {
            Ok(folder) => Ok(Some(folder)),
            Err(ureq::Error::StatusCode(400 | 404)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn bind_error(error: ureq::Error, folder_name: &str, mailbox: &str) -> BindError {
    match error {
        ureq::Error::StatusCode(404) => BindError::NotFound {
            folder: folder_name.to_string(),
            mailbox: mailbox.to_string(),
        },
        ureq::Error::StatusCode(401 | 403) => BindError::AccessDenied {
            folder: folder_name.to_string(),
            mailbox: mailbox.to_string(),
        },
        other => BindError::Remote(other.to_string()),
    }
}

impl RemoteMailClient for GraphClient {
    /// Graph moves messages only within one mailbox, so folders of any other
    /// mailbox are refused here, before a transfer starts.
    fn bind(&self, folder_name: &str, mailbox: &str) -> Result<FolderHandle, BindError> {
        if !mailbox.eq_ignore_ascii_case(self.session.mailbox()) {
            return Err(BindError::OtherMailbox {
                folder: folder_name.to_string(),
                mailbox: mailbox.to_string(),
                session_mailbox: self.session.mailbox().to_string(),
            });
        }

        let found = match self.find_folder_by_name(folder_name, mailbox) {
            Ok(Some(folder)) => Some(folder),
            Ok(None) => self
                .find_well_known_folder(folder_name, mailbox)
                .map_err(|e| bind_error(e, folder_name, mailbox))?,
            Err(e) => return Err(bind_error(e, folder_name, mailbox)),
        };

        let folder = found.ok_or_else(|| BindError::NotFound {
            folder: folder_name.to_string(),
            mailbox: mailbox.to_string(),
        })?;

        let name = if folder.display_name.is_empty() {
            folder_name.to_string()
        } else {
            folder.display_name
        };
        Ok(FolderHandle::new(FolderId::new(folder.id), name, mailbox))
    }

    fn move_item(&self, item: &MailItem, destination: &FolderHandle) -> MoveOutcome {
        let url = format!(
            "{}/messages/{}/move",
            self.user_url(self.session.mailbox()),
            encode(item.id.as_str())
        );
        debug!("POST {}", url);

        let result = ureq::post(&url)
            .config()
            .http_status_as_error(false)
            .build()
            .header("Authorization", &self.session.authorization())
            .header("Accept", "application/json")
            .send_json(api::MoveRequest {
                destination_id: destination.id.as_str(),
            });

        let mut response = match result {
            Ok(response) => response,
            Err(e) => return MoveOutcome::failed(e.to_string()),
        };

        if response.status().is_success() {
            return MoveOutcome::Moved;
        }

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(ureq::http::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = response.body_mut().read_to_string().unwrap_or_default();

        classify_move_response(status, retry_after, &body)
    }

    fn item_count(&self, folder: &FolderHandle) -> Result<u64> {
        let url = format!(
            "{}/mailFolders/{}?$select=totalItemCount",
            self.user_url(&folder.mailbox),
            encode(folder.id.as_str())
        );

        let response: api::MailFolder = self
            .get(&url)
            .with_context(|| format!("Failed to read item count of folder {}", folder.name))?;
        Ok(response.total_item_count.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemId;
    use crate::transfer::{
        ConfirmMode, TransferContext, TransferError, TransferOptions, TransferOrchestrator,
    };

    /// Points at a closed port; tests here must fail before any request
    fn offline_client() -> GraphClient {
        GraphClient::new(GraphSession::with_identity(
            "token",
            "admin@contoso.com",
            "alice@contoso.com",
            "http://127.0.0.1:9/v1.0",
        ))
    }

    #[test]
    fn test_bind_refuses_other_mailbox() {
        let client = offline_client();

        let err = client.bind("Archive", "bob@contoso.com").unwrap_err();

        assert_eq!(
            err,
            BindError::OtherMailbox {
                folder: "Archive".to_string(),
                mailbox: "bob@contoso.com".to_string(),
                session_mailbox: "alice@contoso.com".to_string(),
            }
        );
    }

    #[test]
    fn test_other_mailbox_target_is_configuration_error() {
        let client = offline_client();
        let context = client.session().transfer_context();
        let items = vec![
            MailItem::builder(ItemId::new("m1"), FolderId::new("inbox"))
                .size(10)
                .build(),
        ];
        let options = TransferOptions {
            threshold: 100,
            confirm: ConfirmMode::Automatic,
            ..TransferOptions::default()
        };

        let outcome = TransferOrchestrator::new(&client, &context, options).run(
            &items,
            "bob@contoso.com",
            "Archive",
        );

        let error = outcome.error().unwrap();
        assert!(error.is_configuration());
        assert!(matches!(
            error,
            TransferError::TargetFolder {
                source: BindError::OtherMailbox { .. },
                ..
            }
        ));
        assert_eq!(outcome.report().items_moved, 0);
    }
}
