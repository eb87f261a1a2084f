//! Bookkeeping for object URLs created from picked files

/// Object URLs the player created and has not yet revoked
#[derive(Debug, Default)]
pub struct ObjectUrls {
    urls: Vec<String>,
}

impl ObjectUrls {
    pub fn track(&mut self, url: String) {
        self.urls.push(url);
    }

    /// Remove and return every URL other than the current source
    pub fn release_unused(&mut self, current: Option<&str>) -> Vec<String> {
        let (keep, release): (Vec<String>, Vec<String>) = self
            .urls
            .drain(..)
            .partition(|url| current == Some(url.as_str()));
        self.urls = keep;
        release
    }

    /// Release unused URLs only if the source change was accepted.
    ///
    /// A rejected submit leaves the picked URL in the form for the retry.
    pub fn settle<T, E>(&mut self, outcome: &Result<T, E>, current: Option<&str>) -> Vec<String> {
        if outcome.is_err() {
            return Vec::new();
        }
        self.release_unused(current)
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_submit_keeps_picked_url() {
        let mut urls = ObjectUrls::default();
        urls.track("blob:picked".to_string());

        let rejected: Result<(), &str> = Err("frames");
        assert!(urls.settle(&rejected, Some("video.mp4")).is_empty());

        let accepted: Result<(), &str> = Ok(());
        assert!(urls.settle(&accepted, Some("blob:picked")).is_empty());
        assert_eq!(urls.drain(), vec!["blob:picked".to_string()]);
    }

    #[test]
    fn test_release_replaced_urls() {
        let mut urls = ObjectUrls::default();
        urls.track("blob:a".to_string());
        urls.track("blob:b".to_string());

        assert_eq!(urls.release_unused(Some("blob:b")), vec!["blob:a".to_string()]);
        assert_eq!(urls.release_unused(None), vec!["blob:b".to_string()]);
        assert!(urls.drain().is_empty());
    }

    #[test]
    fn test_drain_releases_everything() {
        let mut urls = ObjectUrls::default();
        urls.track("blob:a".to_string());
        assert_eq!(urls.drain(), vec!["blob:a".to_string()]);
        assert!(urls.drain().is_empty());
    }
}
