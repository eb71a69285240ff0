/// A size token together with the kind of image it applies to.
///
/// The kind decides which placeholder is used when a path is missing.
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageSize {
    Poster(PosterSize),
    Backdrop(BackdropSize),
    Profile(ProfileSize),
}

impl ImageSize {
    /// Default poster size (500px)
    pub const fn poster() -> Self {
        Self::Poster(PosterSize::W500)
    }

    /// Default backdrop size (1280px)
    pub const fn backdrop() -> Self {
        Self::Backdrop(BackdropSize::W1280)
    }

    /// Default profile size (185px)
    pub const fn profile() -> Self {
        Self::Profile(ProfileSize::W185)
    }

    /// Size token used in the image URL path
    pub const fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Poster(s) => s.as_str(),
            ImageSize::Backdrop(s) => s.as_str(),
            ImageSize::Profile(s) => s.as_str(),
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            ImageSize::Profile(_) => super::PERSON_PLACEHOLDER,
            ImageSize::Poster(_) | ImageSize::Backdrop(_) => {
                super::POSTER_PLACEHOLDER
            }
        }
    }
}

/// Poster image sizes (2:3 aspect ratio)
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PosterSize {
    W92,
    W154,
    W185,
    W342,
    #[default]
    W500,
    W780,
    Original,
}

impl PosterSize {
    pub const ALL: [PosterSize; 6] = [
        Self::W92,
        Self::W154,
        Self::W185,
        Self::W342,
        Self::W500,
        Self::W780,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::W92 => "w92",
            Self::W154 => "w154",
            Self::W185 => "w185",
            Self::W342 => "w342",
            Self::W500 => "w500",
            Self::W780 => "w780",
            Self::Original => "original",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "original" => Some(Self::Original),
            _ => Self::ALL.into_iter().find(|size| size.as_str() == s),
        }
    }
}

/// Backdrop image sizes (16:9 aspect ratio)
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BackdropSize {
    W300,
    W780,
    #[default]
    W1280,
    Original,
}

impl BackdropSize {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::W300 => "w300",
            Self::W780 => "w780",
            Self::W1280 => "w1280",
            Self::Original => "original",
        }
    }
}

/// Person profile sizes
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProfileSize {
    W45,
    #[default]
    W185,
    H632,
    Original,
}

impl ProfileSize {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::W45 => "w45",
            Self::W185 => "w185",
            Self::H632 => "h632",
            Self::Original => "original",
        }
    }
}
