use chrono::{Datelike, NaiveDate};

use crate::ids::{GenreId, MovieId};

/// A catalog movie as returned by listing, search, and detail calls.
///
/// Values are immutable once fetched. Whether the signed-in user has
/// favorited a movie is a view-side overlay and deliberately not a field here.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub vote_average: f32,
    pub vote_count: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre_ids: Vec<GenreId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overview: String,
    pub runtime: Option<u32>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub status: Option<String>,
    pub adult: Option<bool>,
}

impl Movie {
    pub fn release_year(&self) -> Option<i32> {
        self.release_date.map(|date| date.year())
    }

    /// Overview trimmed to `max_chars`, with a trailing ellipsis when cut.
    pub fn overview_excerpt(&self, max_chars: usize) -> String {
        match self.overview.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &self.overview[..idx]),
            None => self.overview.clone(),
        }
    }
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_long_overview() {
        let movie = Movie {
            overview: "a".repeat(200),
            ..Movie::default()
        };
        let excerpt = movie.overview_excerpt(150);
        assert_eq!(excerpt.len(), 153);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn excerpt_keeps_short_overview() {
        let movie = Movie {
            overview: "Short.".to_string(),
            ..Movie::default()
        };
        assert_eq!(movie.overview_excerpt(150), "Short.");
    }

    #[test]
    fn release_year_from_date() {
        let movie = Movie {
            release_date: NaiveDate::from_ymd_opt(1999, 10, 15),
            ..Movie::default()
        };
        assert_eq!(movie.release_year(), Some(1999));
    }
}
