//! `ferry folders`

use anyhow::Result;
use mail::FolderSummary;

use crate::cli::FoldersArgs;

pub fn execute(args: FoldersArgs) -> Result<()> {
    let client = super::connect(&args.mailbox)?;
    let folders = client.list_folders(&args.mailbox)?;
    client.disconnect();

    print!("{}", render(&folders));
    Ok(())
}

/// Render folders as an aligned table
fn render(folders: &[FolderSummary]) -> String {
    let width = folders
        .iter()
        .map(|f| f.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("FOLDER".len());

    let mut out = format!("{:<width$}  {:>8}  {:>10}\n", "FOLDER", "ITEMS", "SUBFOLDERS");
    for folder in folders {
        out.push_str(&format!(
            "{:<width$}  {:>8}  {:>10}\n",
            folder.name, folder.total_item_count, folder.child_folder_count
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mail::FolderId;

    #[test]
    fn test_render() {
        let folders = vec![
            FolderSummary {
                id: FolderId::new("f1"),
                name: "Inbox".to_string(),
                total_item_count: 1520,
                child_folder_count: 2,
            },
            FolderSummary {
                id: FolderId::new("f2"),
                name: "Archive 2019".to_string(),
                total_item_count: 7,
                child_folder_count: 0,
            },
        ];

        let table = render(&folders);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("FOLDER        "));
        assert_eq!(lines[1], "Inbox             1520           2");
        assert_eq!(lines[2], "Archive 2019         7           0");
    }
}
