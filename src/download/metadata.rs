//! JSON metadata sidecar.

use std::path::Path;

use serde::Serialize;

use crate::download::pages::write_atomically;
use crate::error::Result;
use crate::work::{Artist, Work};

#[derive(Serialize)]
struct Sidecar<'a> {
    artist: &'a Artist,
    work: &'a Work,
}

/// Write the artist and work records as pretty-printed JSON.
pub async fn write_metadata(path: &Path, artist: &Artist, work: &Work) -> Result<()> {
    let json = serde_json::to_string_pretty(&Sidecar { artist, work })?;
    write_atomically(path, json.as_bytes()).await?;
    tracing::info!("Wrote metadata to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::work::{Page, WorkType};
    use chrono::DateTime;

    #[tokio::test]
    async fn test_sidecar_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("123.json");

        let artist = Artist {
            id: "4242".to_string(),
            username: "painter".to_string(),
            nickname: "Painter".to_string(),
        };
        let work = Work {
            id: "123".to_string(),
            name: "Sunset".to_string(),
            created_at: DateTime::parse_from_rfc3339("2018-03-01T12:34:00+09:00").unwrap(),
            page_count: 1,
            tools: vec!["SAI".to_string()],
            series: None,
            caption: None,
            tags: vec!["風景".to_string()],
            work_type: WorkType::Illustration,
            pages: vec![Page::default()],
            thumbnail: "CQkJ".to_string(),
        };

        write_metadata(&path, &artist, &work).await.unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["artist"]["username"], "painter");
        assert_eq!(value["work"]["id"], "123");
        assert_eq!(value["work"]["tags"][0], "風景");
        assert_eq!(value["work"]["thumbnail"], "CQkJ");

        let back: Work = serde_json::from_value(value["work"].clone()).unwrap();
        assert_eq!(back, work);
    }
}
