use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::filter_types::genre_label;
use crate::ids::GenreId;
use crate::movie::Movie;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Genre names keyed by id, built from the catalog's genre list.
///
/// Falls back to the built-in table for ids the catalog did not return.
#[derive(Debug, Clone, Default)]
pub struct GenreDirectory {
    ordered: Vec<Genre>,
    by_id: HashMap<GenreId, String>,
}

impl GenreDirectory {
    pub fn new(genres: Vec<Genre>) -> Self {
        let by_id = genres
            .iter()
            .map(|genre| (genre.id, genre.name.clone()))
            .collect();
        Self {
            ordered: genres,
            by_id,
        }
    }

    pub fn genres(&self) -> &[Genre] {
        &self.ordered
    }

    pub fn name(&self, id: GenreId) -> &str {
        self.by_id
            .get(&id)
            .map(String::as_str)
            .unwrap_or_else(|| genre_label(id))
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Full detail record for a single movie.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovieDetails {
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub tagline: Option<String>,
    pub imdb_id: Option<String>,
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

impl Credits {
    /// Cast ordered by billing, limited to `limit` entries
    pub fn top_billed(&self, limit: usize) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self.cast.iter().collect();
        cast.sort_by_key(|member| member.order);
        cast.truncate(limit);
        cast
    }

    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().filter(|member| member.job == "Director")
    }
}

/// A review published by the catalog service itself.
///
/// Unlike user reviews these carry a free-text author and no guaranteed
/// numeric rating.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogReview {
    pub id: String,
    pub author: String,
    pub content: String,
    pub rating: Option<f32>,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl CatalogReview {
    pub fn author_label(&self) -> &str {
        if self.author.trim().is_empty() {
            "Anonymous"
        } else {
            &self.author
        }
    }
}
