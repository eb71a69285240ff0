use chrono::{DateTime, NaiveDate, Utc};
use marquee_model::{
    CastMember, CatalogReview, Credits, CrewMember, Genre, GenreId, Movie,
    MovieDetails, MovieId, MoviePage,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbPage {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    results: Vec<TmdbMovie>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    vote_count: Option<u32>,
    #[serde(default)]
    genre_ids: Vec<u32>,
    overview: Option<String>,
    runtime: Option<u32>,
    budget: Option<u64>,
    revenue: Option<u64>,
    status: Option<String>,
    adult: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbMovieDetails {
    #[serde(flatten)]
    movie: TmdbMovie,
    #[serde(default)]
    genres: Vec<TmdbGenre>,
    tagline: Option<String>,
    imdb_id: Option<String>,
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbGenreList {
    #[serde(default)]
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbGenre {
    id: u32,
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCast>,
    #[serde(default)]
    crew: Vec<TmdbCrew>,
}

#[derive(Debug, Deserialize)]
struct TmdbCast {
    id: u64,
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
    #[serde(default)]
    order: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbCrew {
    id: u64,
    name: String,
    #[serde(default)]
    job: String,
    #[serde(default)]
    department: String,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbReviewList {
    #[serde(default)]
    results: Vec<TmdbReview>,
}

#[derive(Debug, Deserialize)]
struct TmdbReview {
    id: String,
    #[serde(default)]
    author: String,
    author_details: Option<TmdbAuthorDetails>,
    #[serde(default)]
    content: String,
    url: Option<String>,
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbAuthorDetails {
    username: Option<String>,
    rating: Option<f32>,
}

/// Error body the service returns alongside non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct TmdbStatus {
    pub(crate) status_message: Option<String>,
}

// The service sends "" for unknown release dates.
fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|date| !date.is_empty())
        .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

impl From<TmdbMovie> for Movie {
    fn from(raw: TmdbMovie) -> Self {
        Movie {
            id: MovieId(raw.id),
            title: raw.title,
            poster_path: non_empty(raw.poster_path),
            backdrop_path: non_empty(raw.backdrop_path),
            release_date: parse_date(raw.release_date.as_deref()),
            vote_average: raw.vote_average.unwrap_or_default(),
            vote_count: raw.vote_count.unwrap_or_default(),
            genre_ids: raw.genre_ids.into_iter().map(GenreId).collect(),
            overview: raw.overview.unwrap_or_default(),
            runtime: raw.runtime.filter(|minutes| *minutes > 0),
            budget: raw.budget.filter(|amount| *amount > 0),
            revenue: raw.revenue.filter(|amount| *amount > 0),
            status: non_empty(raw.status),
            adult: raw.adult,
        }
    }
}

impl From<TmdbPage> for MoviePage {
    fn from(raw: TmdbPage) -> Self {
        MoviePage {
            page: raw.page,
            results: raw.results.into_iter().map(Movie::from).collect(),
            total_pages: raw.total_pages,
            total_results: raw.total_results,
        }
    }
}

impl From<TmdbGenre> for Genre {
    fn from(raw: TmdbGenre) -> Self {
        Genre {
            id: GenreId(raw.id),
            name: raw.name,
        }
    }
}

impl From<TmdbGenreList> for Vec<Genre> {
    fn from(raw: TmdbGenreList) -> Self {
        raw.genres.into_iter().map(Genre::from).collect()
    }
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(raw: TmdbMovieDetails) -> Self {
        let genres: Vec<Genre> =
            raw.genres.into_iter().map(Genre::from).collect();
        let mut movie = Movie::from(raw.movie);
        // Detail payloads carry `genres` objects instead of `genre_ids`.
        if movie.genre_ids.is_empty() {
            movie.genre_ids = genres.iter().map(|genre| genre.id).collect();
        }
        MovieDetails {
            movie,
            genres,
            tagline: non_empty(raw.tagline),
            imdb_id: non_empty(raw.imdb_id),
            homepage: non_empty(raw.homepage),
        }
    }
}

impl From<TmdbCredits> for Credits {
    fn from(raw: TmdbCredits) -> Self {
        Credits {
            cast: raw
                .cast
                .into_iter()
                .map(|member| CastMember {
                    id: member.id,
                    name: member.name,
                    character: non_empty(member.character),
                    profile_path: non_empty(member.profile_path),
                    order: member.order,
                })
                .collect(),
            crew: raw
                .crew
                .into_iter()
                .map(|member| CrewMember {
                    id: member.id,
                    name: member.name,
                    job: member.job,
                    department: member.department,
                    profile_path: non_empty(member.profile_path),
                })
                .collect(),
        }
    }
}

impl From<TmdbReviewList> for Vec<CatalogReview> {
    fn from(raw: TmdbReviewList) -> Self {
        raw.results
            .into_iter()
            .map(|review| {
                let (username, rating) = review
                    .author_details
                    .map(|details| (details.username, details.rating))
                    .unwrap_or((None, None));
                let author = if review.author.trim().is_empty() {
                    username.unwrap_or_default()
                } else {
                    review.author
                };
                CatalogReview {
                    id: review.id,
                    author,
                    content: review.content,
                    rating,
                    url: non_empty(review.url),
                    created_at: review
                        .created_at
                        .as_deref()
                        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                        .map(|at| at.with_timezone(&Utc)),
                }
            })
            .collect()
    }
}
