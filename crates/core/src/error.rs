use thiserror::Error;

use crate::catalog::CatalogError;
use crate::model::{ExplainerSettingsError, ParseCategoryError, ParseGenderError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Gender(#[from] ParseGenderError),
    #[error(transparent)]
    Category(#[from] ParseCategoryError),
    #[error(transparent)]
    ExplainerSettings(#[from] ExplainerSettingsError),
}
