use marquee_model::DiscoverFilters;

/// Query parameters for `discover/movie`.
///
/// Unset filters are left out entirely rather than sent empty.
pub fn discover_params(
    filters: &DiscoverFilters,
    page: u32,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", page.to_string()),
        ("sort_by", filters.sort_by.as_str().to_string()),
    ];

    if let Some(genre) = filters.genre {
        params.push(("with_genres", genre.to_string()));
    }
    if let Some(year) = filters.year {
        params.push(("primary_release_year", year.to_string()));
    }
    if let Some(rating) = filters.min_rating {
        params.push(("vote_average.gte", rating.to_string()));
    }

    params
}

pub fn search_params(query: &str, page: u32) -> Vec<(&'static str, String)> {
    vec![("query", query.to_string()), ("page", page.to_string())]
}

pub fn page_params(page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string())]
}
