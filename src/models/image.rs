//! Image types

use chrono::{DateTime, Utc};

pub const UNTAGGED: &str = "<none>";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Image {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub created: Option<DateTime<Utc>>,
    pub size: i64,
    /// Number of containers created from this image
    pub containers: usize,
}

impl Image {
    pub fn short_id(&self) -> &str {
        super::short_id(&self.id)
    }

    pub fn primary_tag(&self) -> &str {
        self.repo_tags
            .iter()
            .find(|t| t.as_str() != "<none>:<none>")
            .map(String::as_str)
            .unwrap_or(UNTAGGED)
    }

    pub fn is_dangling(&self) -> bool {
        self.primary_tag() == UNTAGGED
    }

    pub fn repository(&self) -> &str {
        let tag = self.primary_tag();
        match tag.rsplit_once(':') {
            Some((repo, _)) if tag != UNTAGGED => repo,
            _ => tag,
        }
    }

    pub fn tag(&self) -> &str {
        let tag = self.primary_tag();
        if tag == UNTAGGED {
            return UNTAGGED;
        }
        match tag.rsplit_once(':') {
            // registry ports ("localhost:5000/app") are not tags
            Some((_, t)) if !t.contains('/') => t,
            _ => "latest",
        }
    }
}

/// Tagged images first (by tag), dangling images after (newest first)
pub fn sort_images(images: &mut [Image]) {
    images.sort_by(|a, b| match (a.is_dangling(), b.is_dangling()) {
        (false, true) => std::cmp::Ordering::Less,
        (true, false) => std::cmp::Ordering::Greater,
        (false, false) => a.primary_tag().cmp(b.primary_tag()),
        (true, true) => b.created.cmp(&a.created),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn image(tags: &[&str], created_secs: i64) -> Image {
        Image {
            id: format!("sha256:{:064}", created_secs),
            repo_tags: tags.iter().map(|t| t.to_string()).collect(),
            created: Utc.timestamp_opt(created_secs, 0).single(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tag_and_repository() {
        let img = image(&["nginx:1.25"], 0);
        assert_eq!(img.repository(), "nginx");
        assert_eq!(img.tag(), "1.25");

        let img = image(&["localhost:5000/app"], 0);
        assert_eq!(img.tag(), "latest");

        let img = image(&[], 0);
        assert!(img.is_dangling());
        assert_eq!(img.repository(), UNTAGGED);
    }

    #[test]
    fn test_sort_tagged_first_then_newest_dangling() {
        let mut images = vec![
            image(&[], 10),
            image(&["redis:7"], 1),
            image(&[], 20),
            image(&["alpine:3"], 2),
        ];
        sort_images(&mut images);
        let order: Vec<_> = images
            .iter()
            .map(|i| (i.primary_tag().to_string(), i.created.map(|c| c.timestamp())))
            .collect();
        assert_eq!(order[0].0, "alpine:3");
        assert_eq!(order[1].0, "redis:7");
        assert_eq!(order[2].1, Some(20));
        assert_eq!(order[3].1, Some(10));
    }
}
