//! Property listings: the catalog, browse filters and publishing new listings.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::form::{FieldErrors, FormData};
use crate::format::parse_amount;
use crate::upload::{UploadError, UploadGateway};

const BUILTIN_LISTINGS: &str = include_str!("../data/listings.json");

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to read listings from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("listings are not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("listing {id} has {available} shares available out of {total}")]
    InvalidShares { id: u32, available: u32, total: u32 },
    #[error("listing is incomplete: {0}")]
    Incomplete(#[from] FieldErrors),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("no listing ids are left in this catalog")]
    IdsExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Condo,
    Townhouse,
    Land,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::House,
        PropertyType::Apartment,
        PropertyType::Condo,
        PropertyType::Townhouse,
        PropertyType::Land,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Apartment => "Apartment",
            PropertyType::Condo => "Condo",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Land => "Land",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }
}

/// Labels in [`PropertyType::ALL`] order, for choice fields.
pub const PROPERTY_TYPE_LABELS: &[&str] = &["House", "Apartment", "Condo", "Townhouse", "Land"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: u32,
    pub title: String,
    pub location: String,
    pub property_type: PropertyType,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqft: u32,
    pub total_shares: u32,
    pub available_shares: u32,
    #[serde(default)]
    pub photos: Vec<Url>,
}

impl Property {
    pub fn availability_percent(&self) -> f64 {
        self.ownership_percent(self.available_shares)
    }

    /// Share of the property represented by `shares`.
    pub fn ownership_percent(&self, shares: u32) -> f64 {
        if self.total_shares == 0 {
            return 0.0;
        }
        shares as f64 / self.total_shares as f64 * 100.0
    }

    pub fn share_price(&self) -> f64 {
        if self.total_shares == 0 {
            return self.price;
        }
        self.price / self.total_shares as f64
    }

    fn validate(&self) -> Result<(), ListingError> {
        if self.total_shares == 0 || self.available_shares > self.total_shares {
            return Err(ListingError::InvalidShares {
                id: self.id,
                available: self.available_shares,
                total: self.total_shares,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceLowToHigh,
    PriceHighToLow,
}

impl SortOrder {
    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Featured => "Featured",
            SortOrder::PriceLowToHigh => "Price: low to high",
            SortOrder::PriceHighToLow => "Price: high to low",
        }
    }

    pub fn next(self) -> Self {
        match self {
            SortOrder::Featured => SortOrder::PriceLowToHigh,
            SortOrder::PriceLowToHigh => SortOrder::PriceHighToLow,
            SortOrder::PriceHighToLow => SortOrder::Featured,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyFilter {
    pub query: String,
    pub property_type: Option<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub sort: SortOrder,
}

impl PropertyFilter {
    pub fn matches(&self, property: &Property) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty()
            && !property.title.to_lowercase().contains(&query)
            && !property.location.to_lowercase().contains(&query)
        {
            return false;
        }
        if self.property_type.is_some_and(|kind| kind != property.property_type) {
            return false;
        }
        if self.min_price.is_some_and(|min| property.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| property.price > max) {
            return false;
        }
        if self.min_bedrooms.is_some_and(|min| property.bedrooms < min) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, properties: &'a [Property]) -> Vec<&'a Property> {
        let mut matching: Vec<&Property> = properties.iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            SortOrder::Featured => {}
            SortOrder::PriceLowToHigh => matching.sort_by(|a, b| by_price(a, b)),
            SortOrder::PriceHighToLow => matching.sort_by(|a, b| by_price(b, a)),
        }
        matching
    }
}

fn by_price(a: &Property, b: &Property) -> Ordering {
    a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal)
}

/// Filter controls as typed on the browse screen. Numeric bounds that do not
/// parse are ignored rather than reported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterInputs {
    pub query: String,
    pub min_price: String,
    pub max_price: String,
    pub min_bedrooms: String,
    pub property_type: Option<PropertyType>,
    pub sort: SortOrder,
}

impl FilterInputs {
    pub fn to_filter(&self) -> PropertyFilter {
        PropertyFilter {
            query: self.query.clone(),
            property_type: self.property_type,
            min_price: parse_amount(&self.min_price),
            max_price: parse_amount(&self.max_price),
            min_bedrooms: self.min_bedrooms.trim().parse().ok(),
            sort: self.sort,
        }
    }

    /// Steps through "any type" followed by each property type.
    pub fn cycle_property_type(&mut self) {
        self.property_type = match self.property_type {
            None => Some(PropertyType::ALL[0]),
            Some(current) => PropertyType::ALL
                .iter()
                .position(|kind| *kind == current)
                .and_then(|i| PropertyType::ALL.get(i + 1).copied()),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    properties: Vec<Property>,
}

impl Catalog {
    /// The catalog shipped with the binary.
    pub fn builtin() -> Result<Self, ListingError> {
        Self::from_json(BUILTIN_LISTINGS)
    }

    pub fn from_json(raw: &str) -> Result<Self, ListingError> {
        let properties: Vec<Property> = serde_json::from_str(raw)?;
        for property in &properties {
            property.validate()?;
        }
        Ok(Self { properties })
    }

    pub fn load(path: &Path) -> Result<Self, ListingError> {
        let raw = fs::read_to_string(path).map_err(|source| ListingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&raw)?;
        info!(path = %path.display(), count = catalog.len(), "loaded listings");
        Ok(catalog)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Property> {
        self.properties.iter().find(|p| p.id == id)
    }

    pub fn search(&self, filter: &PropertyFilter) -> Vec<&Property> {
        filter.apply(&self.properties)
    }

    fn next_id(&self) -> Option<u32> {
        match self.properties.iter().map(|p| p.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }
}

/// Form keys of the listing upload flow.
pub mod fields {
    pub const TITLE: &str = "title";
    pub const PROPERTY_TYPE: &str = "property_type";
    pub const LOCATION: &str = "location";
    pub const PRICE: &str = "price";
    pub const BEDROOMS: &str = "bedrooms";
    pub const BATHROOMS: &str = "bathrooms";
    pub const AREA: &str = "area_sqft";
    pub const SHARES: &str = "total_shares";
    pub const PHOTOS: &str = "photos";
}

/// A listing that passed validation but has not been published yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub title: String,
    pub location: String,
    pub property_type: PropertyType,
    pub price: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area_sqft: u32,
    pub total_shares: u32,
    pub photos: Vec<PathBuf>,
}

impl ListingDraft {
    pub fn from_form(data: &FormData) -> Result<Self, ListingError> {
        let mut missing = FieldErrors::default();
        let text = |key: &'static str, missing: &mut FieldErrors| {
            data.text(key).map(str::to_string).unwrap_or_else(|| {
                missing.insert(key, "required");
                String::new()
            })
        };

        let title = text(fields::TITLE, &mut missing);
        let location = text(fields::LOCATION, &mut missing);
        let property_type = text(fields::PROPERTY_TYPE, &mut missing);
        let property_type = PropertyType::from_label(&property_type);
        if property_type.is_none() && missing.get(fields::PROPERTY_TYPE).is_none() {
            missing.insert(fields::PROPERTY_TYPE, "choose a property type");
        }
        let price = data.money(fields::PRICE);
        if price.is_none() {
            missing.insert(fields::PRICE, "required");
        }
        let total_shares = data.integer(fields::SHARES).unwrap_or(1);
        if total_shares == 0 {
            missing.insert(fields::SHARES, "must be at least 1");
        }

        match (property_type, price) {
            (Some(property_type), Some(price)) if missing.is_empty() => Ok(Self {
                title,
                location,
                property_type,
                price,
                bedrooms: data.integer(fields::BEDROOMS).unwrap_or(0),
                bathrooms: data.integer(fields::BATHROOMS).unwrap_or(0),
                area_sqft: data.integer(fields::AREA).unwrap_or(0),
                total_shares,
                photos: data
                    .text(fields::PHOTOS)
                    .map(split_photo_paths)
                    .unwrap_or_default(),
            }),
            _ => Err(ListingError::Incomplete(missing)),
        }
    }

    /// Uploads every photo and adds the listing to the catalog. If any upload
    /// fails, the photos already stored are discarded and nothing is added.
    pub fn publish<'c>(
        self,
        gateway: &mut dyn UploadGateway,
        catalog: &'c mut Catalog,
    ) -> Result<&'c Property, ListingError> {
        let id = catalog.next_id().ok_or(ListingError::IdsExhausted)?;

        let mut photos = Vec::with_capacity(self.photos.len());
        for path in &self.photos {
            match gateway.upload(path) {
                Ok(url) => photos.push(url),
                Err(e) => {
                    warn!("photo upload failed: {e}");
                    for url in &photos {
                        if let Err(e) = gateway.discard(url) {
                            warn!(%url, "could not remove partial upload: {e}");
                        }
                    }
                    return Err(e.into());
                }
            }
        }

        let property = Property {
            id,
            title: self.title,
            location: self.location,
            property_type: self.property_type,
            price: self.price,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            area_sqft: self.area_sqft,
            total_shares: self.total_shares,
            available_shares: self.total_shares,
            photos,
        };
        info!(id = property.id, title = %property.title, "published listing");
        catalog.properties.push(property);
        Ok(&catalog.properties[catalog.properties.len() - 1])
    }
}

fn split_photo_paths(raw: &str) -> Vec<PathBuf> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}
