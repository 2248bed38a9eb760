use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::PuzzleError;

/// One image the host knows how to load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CatalogImage {
    /// Case-insensitive substring match on the name or any tag.
    pub fn matches(&self, theme: &str) -> bool {
        let theme = theme.trim().to_lowercase();
        if theme.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&theme)
            || self.tags.iter().any(|t| t.to_lowercase().contains(&theme))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageCatalog {
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

impl ImageCatalog {
    pub fn from_json(text: &str) -> Result<Self, PuzzleError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn matching<'a>(&'a self, theme: &str) -> impl Iterator<Item = &'a CatalogImage> + 'a {
        let theme = theme.to_owned();
        self.images.iter().filter(move |img| img.matches(&theme))
    }

    /// Pick one image for `theme` uniformly among the matches.
    pub fn pick<R: Rng + ?Sized>(
        &self,
        theme: &str,
        rng: &mut R,
    ) -> Result<&CatalogImage, PuzzleError> {
        let candidates: Vec<&CatalogImage> = self.matching(theme).collect();
        candidates.choose(rng).copied().ok_or_else(|| {
            PuzzleError::ImageResourceUnavailable(format!("no image matches theme '{theme}'"))
        })
    }
}
