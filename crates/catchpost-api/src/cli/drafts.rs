//! Draft management CLI commands: list, show, delete.

use anyhow::{Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use catchpost_core::render::render;
use catchpost_core::storage::draft_store::DraftStore;
use catchpost_types::ids::UserId;
use catchpost_types::step::Step;

/// List stored drafts as a table.
pub async fn list_drafts<S: DraftStore>(store: &S, json: bool) -> Result<()> {
    let drafts = store.list().await?;

    if json {
        let entries: Vec<serde_json::Value> = drafts
            .iter()
            .map(|d| {
                serde_json::json!({
                    "user_id": d.user_id,
                    "step": d.step,
                    "author": d.author,
                    "photos": d.photo_count,
                    "updated_at": d.updated_at.to_rfc3339(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if drafts.is_empty() {
        println!();
        println!("  {} No drafts stored.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("User").fg(Color::White),
        Cell::new("Step").fg(Color::White),
        Cell::new("Author").fg(Color::White),
        Cell::new("Photos").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for draft in &drafts {
        table.add_row(vec![
            Cell::new(draft.user_id).fg(Color::Cyan),
            Cell::new(draft.step).fg(step_color(draft.step)),
            Cell::new(draft.author.as_deref().unwrap_or("-")),
            Cell::new(draft.photo_count),
            Cell::new(draft.updated_at.format("%Y-%m-%d %H:%M").to_string()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} draft{}",
        style(drafts.len()).bold(),
        if drafts.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn step_color(step: Step) -> Color {
    match step {
        Step::Submitted => Color::Yellow,
        Step::Preview => Color::Green,
        _ => Color::Reset,
    }
}

/// Show one draft rendered as a post, with its raw JSON.
pub async fn show_draft<S: DraftStore>(store: &S, user_id: UserId, json: bool) -> Result<()> {
    let Some(record) = store.load(user_id).await? else {
        bail!("No draft stored for user {user_id}");
    };
    let rendered = render(&record.draft);

    if json {
        let out = serde_json::json!({
            "user_id": record.user_id,
            "step": record.step,
            "created_at": record.created_at.to_rfc3339(),
            "updated_at": record.updated_at.to_rfc3339(),
            "draft": record.draft,
            "rendered": rendered,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Draft of user {} at step {}",
        style("📝").bold(),
        style(record.user_id).cyan(),
        style(record.step).yellow()
    );
    println!(
        "  {}",
        style(format!(
            "created {} / updated {}",
            record.created_at.format("%Y-%m-%d %H:%M"),
            record.updated_at.format("%Y-%m-%d %H:%M")
        ))
        .dim()
    );
    println!();
    for line in rendered.lines() {
        println!("  {line}");
    }
    if !record.draft.photos.is_empty() {
        println!();
        println!("  {} photo(s)", style(record.draft.photos.len()).bold());
    }
    println!();
    println!("{}", style("  Raw JSON:").dim());
    println!("{}", serde_json::to_string_pretty(&record.draft)?);
    println!();

    Ok(())
}

/// Delete one draft. Fails when the user has none.
pub async fn delete_draft<S: DraftStore>(store: &S, user_id: UserId, json: bool) -> Result<()> {
    if store.load(user_id).await?.is_none() {
        bail!("No draft stored for user {user_id}");
    }
    store.delete(user_id).await?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "user_id": user_id}));
    } else {
        println!(
            "  {} Draft of user {} deleted",
            style("✓").green().bold(),
            style(user_id).bold()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catchpost_infra::sqlite::draft::SqliteDraftStore;
    use catchpost_infra::sqlite::pool::DatabasePool;
    use catchpost_types::draft::{Draft, DraftRecord};

    async fn store() -> SqliteDraftStore {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("cli.db").display());
        std::mem::forget(dir);
        SqliteDraftStore::new(DatabasePool::new(&url).await.unwrap())
    }

    #[tokio::test]
    async fn delete_removes_existing_draft() {
        let store = store().await;
        store
            .save(&DraftRecord::new(UserId(3), Step::Coords, Draft::default()))
            .await
            .unwrap();

        delete_draft(&store, UserId(3), true).await.unwrap();
        assert!(store.load(UserId(3)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_and_show_fail_for_missing_draft() {
        let store = store().await;
        let err = delete_draft(&store, UserId(4), true).await.unwrap_err();
        assert!(err.to_string().contains("No draft stored for user 4"));
        assert!(show_draft(&store, UserId(4), true).await.is_err());
    }

    #[tokio::test]
    async fn list_and_show_succeed() {
        let store = store().await;
        let draft = Draft {
            location: Some("ladoga".to_string()),
            author: Some("Vasya".to_string()),
            ..Draft::default()
        };
        store
            .save(&DraftRecord::new(UserId(5), Step::Preview, draft))
            .await
            .unwrap();

        list_drafts(&store, true).await.unwrap();
        list_drafts(&store, false).await.unwrap();
        show_draft(&store, UserId(5), false).await.unwrap();
    }
}
