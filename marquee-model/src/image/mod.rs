pub mod sizes;

pub use sizes::{BackdropSize, ImageSize, PosterSize, ProfileSize};

/// Default catalog image host
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Local asset shown when a movie has no poster or backdrop
pub const POSTER_PLACEHOLDER: &str = "/placeholder-movie.png";

/// Local asset shown when a cast member has no profile image
pub const PERSON_PLACEHOLDER: &str = "/placeholder-person.png";

/// Resolve a catalog image path to a URL for the requested size.
///
/// Missing paths resolve to a local placeholder without touching the network.
pub fn image_url(base: &str, path: Option<&str>, size: ImageSize) -> String {
    match path.filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let base = base.trim_end_matches('/');
            if path.starts_with('/') {
                format!("{base}/{}{path}", size.as_str())
            } else {
                format!("{base}/{}/{path}", size.as_str())
            }
        }
        None => size.placeholder().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_sized_url() {
        let url = image_url(
            DEFAULT_IMAGE_BASE,
            Some("/abc.jpg"),
            ImageSize::Backdrop(BackdropSize::W1280),
        );
        assert_eq!(url, "https://image.tmdb.org/t/p/w1280/abc.jpg");
    }

    #[test]
    fn tolerates_trailing_slash_and_bare_path() {
        let url = image_url(
            "https://img.example/t/p/",
            Some("abc.jpg"),
            ImageSize::poster(),
        );
        assert_eq!(url, "https://img.example/t/p/w500/abc.jpg");
    }

    #[test]
    fn missing_path_uses_placeholder() {
        assert_eq!(
            image_url(DEFAULT_IMAGE_BASE, None, ImageSize::poster()),
            POSTER_PLACEHOLDER
        );
        assert_eq!(
            image_url(DEFAULT_IMAGE_BASE, Some(""), ImageSize::profile()),
            PERSON_PLACEHOLDER
        );
    }
}
