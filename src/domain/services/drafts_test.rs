use std::env;
use std::path;
use std::time::Duration;

use anyhow::Result;
use tokio::time;
use uuid::Uuid;

use super::Drafts;
use crate::domain::models::DraftData;

fn scratch_dir() -> path::PathBuf {
    return env::temp_dir().join(format!("maildeck-drafts-{}", Uuid::new_v4()));
}

fn draft_with_subject(subject: &str) -> DraftData {
    return DraftData {
        subject: Some(subject.to_string()),
        ..DraftData::default()
    };
}

#[tokio::test]
async fn it_round_trips_a_draft() -> Result<()> {
    let mut drafts = Drafts::new(scratch_dir(), Some("welcome-v1"));

    drafts.save(&draft_with_subject("Hello {{userName}}")).await?;

    assert!(drafts.has_draft().await);
    let loaded = drafts.load().await.unwrap();
    assert_eq!(loaded.subject.as_deref(), Some("Hello {{userName}}"));

    let metadata = drafts.metadata().await.unwrap();
    assert_eq!(metadata.template_id.as_deref(), Some("welcome-v1"));
    assert!(!metadata.is_new_template);

    drafts.clear().await?;
    return Ok(());
}

#[tokio::test]
async fn it_keys_new_templates_separately() -> Result<()> {
    let dir = scratch_dir();
    let mut existing = Drafts::new(dir.clone(), Some("welcome-v1"));
    let mut fresh = Drafts::new(dir.clone(), None);

    fresh.save(&draft_with_subject("draft of a new template")).await?;

    assert!(!existing.has_draft().await);
    assert!(fresh.has_draft().await);
    assert!(fresh.metadata().await.unwrap().is_new_template);
    assert_eq!(Drafts::list(&dir).await, vec!["new".to_string()]);

    fresh.clear().await?;
    existing.clear().await?;
    return Ok(());
}

#[tokio::test]
async fn it_debounces_rapid_auto_saves_to_one_write() -> Result<()> {
    let mut drafts = Drafts::new(scratch_dir(), Some("welcome-v1"));

    for i in 1..=5 {
        drafts.auto_save(
            draft_with_subject(&format!("revision {i}")),
            Duration::from_millis(200),
        );
    }

    // Nothing may land before the debounce window elapses.
    assert!(!drafts.has_draft().await);

    time::sleep(Duration::from_millis(400)).await;
    let loaded = drafts.load().await.unwrap();
    assert_eq!(loaded.subject.as_deref(), Some("revision 5"));

    drafts.clear().await?;
    return Ok(());
}

#[tokio::test]
async fn it_treats_corrupt_drafts_as_absent() -> Result<()> {
    let dir = scratch_dir();
    tokio::fs::create_dir_all(&dir).await?;
    tokio::fs::write(dir.join("template_draft_welcome-v1.json"), "{not json").await?;

    let mut drafts = Drafts::new(dir, Some("welcome-v1"));

    assert!(drafts.load().await.is_none());
    assert!(!drafts.has_draft().await);

    drafts.clear().await?;
    return Ok(());
}

#[tokio::test]
async fn it_clears_an_absent_draft_without_error() -> Result<()> {
    let mut drafts = Drafts::new(scratch_dir(), None);

    drafts.clear().await?;
    assert!(!drafts.has_draft().await);

    return Ok(());
}

#[tokio::test]
async fn it_ignores_empty_drafts() -> Result<()> {
    let mut drafts = Drafts::new(scratch_dir(), Some("welcome-v1"));

    drafts.save(&DraftData::default()).await?;
    assert!(!drafts.has_draft().await);

    drafts.clear().await?;
    return Ok(());
}
