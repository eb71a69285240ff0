use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::ids::GenreId;

/// Earliest year offered by the release-year filter
pub const EARLIEST_RELEASE_YEAR: i32 = 1950;

/// Discovery sort orders understood by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum SortBy {
    #[default]
    PopularityDesc,
    ReleaseDateDesc,
    ReleaseDateAsc,
    VoteAverageDesc,
    VoteAverageAsc,
    TitleAsc,
    TitleDesc,
}

impl SortBy {
    pub fn all() -> &'static [SortBy] {
        use SortBy::*;
        &[
            PopularityDesc,
            ReleaseDateDesc,
            ReleaseDateAsc,
            VoteAverageDesc,
            VoteAverageAsc,
            TitleAsc,
            TitleDesc,
        ]
    }

    /// Wire value for the `sort_by` query parameter
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortBy::PopularityDesc => "popularity.desc",
            SortBy::ReleaseDateDesc => "release_date.desc",
            SortBy::ReleaseDateAsc => "release_date.asc",
            SortBy::VoteAverageDesc => "vote_average.desc",
            SortBy::VoteAverageAsc => "vote_average.asc",
            SortBy::TitleAsc => "title.asc",
            SortBy::TitleDesc => "title.desc",
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            SortBy::PopularityDesc => "Popularity",
            SortBy::ReleaseDateDesc => "Newest First",
            SortBy::ReleaseDateAsc => "Oldest First",
            SortBy::VoteAverageDesc => "Highest Rated",
            SortBy::VoteAverageAsc => "Lowest Rated",
            SortBy::TitleAsc => "Title A-Z",
            SortBy::TitleDesc => "Title Z-A",
        }
    }
}

impl FromStr for SortBy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::all()
            .iter()
            .copied()
            .find(|sort| sort.as_str() == s)
            .ok_or_else(|| ModelError::InvalidId(format!("sort order {s:?}")))
    }
}

impl TryFrom<String> for SortBy {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortBy> for String {
    fn from(value: SortBy) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum-rating presets offered by the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatingThreshold {
    Excellent,
    VeryGood,
    Good,
    Okay,
    Average,
}

impl RatingThreshold {
    pub fn all() -> &'static [RatingThreshold] {
        use RatingThreshold::*;
        &[Excellent, VeryGood, Good, Okay, Average]
    }

    pub const fn value(&self) -> f32 {
        match self {
            RatingThreshold::Excellent => 9.0,
            RatingThreshold::VeryGood => 8.0,
            RatingThreshold::Good => 7.0,
            RatingThreshold::Okay => 6.0,
            RatingThreshold::Average => 5.0,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            RatingThreshold::Excellent => "9+ Excellent",
            RatingThreshold::VeryGood => "8+ Very Good",
            RatingThreshold::Good => "7+ Good",
            RatingThreshold::Okay => "6+ Okay",
            RatingThreshold::Average => "5+ Average",
        }
    }
}

/// Release years offered by the year filter, newest first.
pub fn release_years(latest: i32) -> Vec<i32> {
    (EARLIEST_RELEASE_YEAR..=latest).rev().collect()
}

/// Built-in catalog genre names, used when the genre list is unavailable.
pub fn genre_label(id: GenreId) -> &'static str {
    match id.0 {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Sci-Fi",
        10770 => "TV",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => "Unknown",
    }
}

/// Discovery filters in the engine's own vocabulary.
///
/// Unset fields mean "no constraint"; translation to the catalog service's
/// parameter names happens in the catalog client.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscoverFilters {
    pub genre: Option<GenreId>,
    pub year: Option<u16>,
    pub min_rating: Option<f32>,
    pub sort_by: SortBy,
}

impl DiscoverFilters {
    pub fn with_genre(mut self, genre: GenreId) -> Self {
        self.genre = Some(genre);
        self
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_min_rating(mut self, rating: f32) -> Self {
        self.min_rating = Some(rating);
        self
    }

    pub fn with_sort(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// True when any constraint narrows the result set
    pub fn is_narrowed(&self) -> bool {
        self.genre.is_some() || self.year.is_some() || self.min_rating.is_some()
    }

    /// True when anything differs from the defaults, including sort order
    pub fn has_active_filters(&self) -> bool {
        self.is_narrowed() || self.sort_by != SortBy::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
