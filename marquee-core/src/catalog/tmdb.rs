use async_trait::async_trait;
use marquee_config::CatalogConfig;
use marquee_contracts::{CatalogError, MovieCatalog};
use marquee_model::{
    CatalogReview, Credits, DiscoverFilters, Genre, MovieDetails, MovieId,
    MoviePage,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::params::{discover_params, page_params, search_params};
use super::wire::{
    TmdbCredits, TmdbGenreList, TmdbMovieDetails, TmdbPage, TmdbReviewList,
    TmdbStatus,
};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

/// HTTP client for the TMDB v3 API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TmdbCatalogClient {
    client: Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl TmdbCatalogClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: TMDB_API_BASE.to_string(),
            api_key: api_key.into(),
            language: None,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            language: Some(config.language.clone())
                .filter(|language| !language.is_empty()),
        }
        .normalized())
    }

    /// Point the client at a different API root, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self.normalized()
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn normalized(mut self) -> Self {
        while self.base_url.ends_with('/') {
            self.base_url.pop();
        }
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(endpoint, ?params, "TMDB request");

        let mut request = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params);
        if let Some(language) = &self.language {
            request = request.query(&[("language", language.as_str())]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        match status {
            StatusCode::UNAUTHORIZED => return Err(CatalogError::InvalidApiKey),
            StatusCode::NOT_FOUND => return Err(CatalogError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(CatalogError::RateLimited);
            }
            status if !status.is_success() => {
                let message = serde_json::from_slice::<TmdbStatus>(&body)
                    .ok()
                    .and_then(|status| status.status_message)
                    .unwrap_or_else(|| {
                        status
                            .canonical_reason()
                            .unwrap_or("unexpected status")
                            .to_string()
                    });
                return Err(CatalogError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Parse(format!("{endpoint}: {e}")))
    }

    async fn get_page(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<MoviePage, CatalogError> {
        let page: TmdbPage = self.get_json(endpoint, params).await?;
        let page = MoviePage::from(page);
        debug!(
            endpoint,
            page = page.page,
            results = page.results.len(),
            total_pages = page.total_pages,
            "TMDB page received"
        );
        Ok(page)
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalogClient {
    async fn list_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let genres: TmdbGenreList =
            self.get_json("genre/movie/list", &[]).await?;
        Ok(genres.into())
    }

    async fn discover(
        &self,
        filters: &DiscoverFilters,
        page: u32,
    ) -> Result<MoviePage, CatalogError> {
        self.get_page("discover/movie", &discover_params(filters, page))
            .await
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<MoviePage, CatalogError> {
        self.get_page("search/movie", &search_params(query, page))
            .await
    }

    async fn popular(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.get_page("movie/popular", &page_params(page)).await
    }

    async fn now_playing(&self, page: u32) -> Result<MoviePage, CatalogError> {
        self.get_page("movie/now_playing", &page_params(page)).await
    }

    async fn movie_details(
        &self,
        id: MovieId,
    ) -> Result<MovieDetails, CatalogError> {
        let details: TmdbMovieDetails =
            self.get_json(&format!("movie/{id}"), &[]).await?;
        Ok(details.into())
    }

    async fn movie_credits(
        &self,
        id: MovieId,
    ) -> Result<Credits, CatalogError> {
        let credits: TmdbCredits =
            self.get_json(&format!("movie/{id}/credits"), &[]).await?;
        Ok(credits.into())
    }

    async fn movie_reviews(
        &self,
        id: MovieId,
    ) -> Result<Vec<CatalogReview>, CatalogError> {
        let reviews: TmdbReviewList =
            self.get_json(&format!("movie/{id}/reviews"), &[]).await?;
        Ok(reviews.into())
    }
}
