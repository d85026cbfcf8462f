use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ValueObjectError {
  #[error("Title is required")]
  EmptyTitle,

  #[error("Title too long, maximum {max} characters")]
  TitleTooLong { max: usize },

  #[error("Description is required")]
  EmptyDescription,

  #[error("Description too long, maximum {max} characters")]
  DescriptionTooLong { max: usize },

  #[error("Price must be non-negative")]
  NegativePrice,

  #[error("Invalid price: {0}")]
  InvalidPrice(String),

  #[error("Unknown contact method: {0}")]
  UnknownContactMethod(String),

  #[error("Contact value is required")]
  EmptyContactValue,

  #[error("Contact value too long, maximum {max} characters")]
  ContactValueTooLong { max: usize },

  #[error("Image reference is required")]
  EmptyImageRef,

  #[error("Invalid image reference: {0}")]
  InvalidImageRef(String),

  #[error("Unknown listing status: {0}")]
  UnknownStatus(String),
}

// ============================================================================
// ListingTitle Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingTitle(String);

impl ListingTitle {
  const MAX_LENGTH: usize = 120;

  pub fn new(title: impl Into<String>) -> Result<Self, ValueObjectError> {
    let title = title.into().trim().to_string();

    if title.is_empty() {
      return Err(ValueObjectError::EmptyTitle);
    }
    if title.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::TitleTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(title))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for ListingTitle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// ListingDescription Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDescription(String);

impl ListingDescription {
  const MAX_LENGTH: usize = 2000;

  pub fn new(description: impl Into<String>) -> Result<Self, ValueObjectError> {
    let description = description.into().trim().to_string();

    if description.is_empty() {
      return Err(ValueObjectError::EmptyDescription);
    }
    if description.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::DescriptionTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(description))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// Price Value Object (non-negative decimal)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(Decimal);

impl Price {
  pub fn new(amount: Decimal) -> Result<Self, ValueObjectError> {
    if amount.is_sign_negative() {
      return Err(ValueObjectError::NegativePrice);
    }
    Ok(Self(amount))
  }

  pub fn parse(s: &str) -> Result<Self, ValueObjectError> {
    let amount =
      Decimal::from_str(s.trim()).map_err(|e| ValueObjectError::InvalidPrice(e.to_string()))?;
    Self::new(amount)
  }

  pub fn amount(&self) -> Decimal {
    self.0
  }
}

impl fmt::Display for Price {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// ContactMethod Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactMethod {
  Email,
  Phone,
  Instagram,
}

impl ContactMethod {
  pub fn as_str(&self) -> &'static str {
    match self {
      ContactMethod::Email => "email",
      ContactMethod::Phone => "phone",
      ContactMethod::Instagram => "instagram",
    }
  }
}

impl FromStr for ContactMethod {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "email" => Ok(ContactMethod::Email),
      "phone" => Ok(ContactMethod::Phone),
      "instagram" => Ok(ContactMethod::Instagram),
      other => Err(ValueObjectError::UnknownContactMethod(other.to_string())),
    }
  }
}

impl fmt::Display for ContactMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ============================================================================
// ContactValue Value Object
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactValue(String);

impl ContactValue {
  const MAX_LENGTH: usize = 120;

  pub fn new(value: impl Into<String>) -> Result<Self, ValueObjectError> {
    let value = value.into().trim().to_string();

    if value.is_empty() {
      return Err(ValueObjectError::EmptyContactValue);
    }
    if value.chars().count() > Self::MAX_LENGTH {
      return Err(ValueObjectError::ContactValueTooLong {
        max: Self::MAX_LENGTH,
      });
    }

    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

// ============================================================================
// ImageRef Value Object (opaque blob name)
// ============================================================================

/// Opaque reference into the blob store. Plain file names only: anything
/// that could traverse outside the uploads directory is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
  pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
    let name = name.into().trim().to_string();

    if name.is_empty() {
      return Err(ValueObjectError::EmptyImageRef);
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
      return Err(ValueObjectError::InvalidImageRef(name));
    }

    Ok(Self(name))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for ImageRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ============================================================================
// ListingStatus Value Object
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListingStatus {
  Active,
  Sold,
}

impl ListingStatus {
  /// `sold` is terminal: no application-level transition leaves it
  pub fn is_terminal(&self) -> bool {
    matches!(self, ListingStatus::Sold)
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      ListingStatus::Active => "active",
      ListingStatus::Sold => "sold",
    }
  }
}

impl FromStr for ListingStatus {
  type Err = ValueObjectError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(ListingStatus::Active),
      "sold" => Ok(ListingStatus::Sold),
      other => Err(ValueObjectError::UnknownStatus(other.to_string())),
    }
  }
}

impl fmt::Display for ListingStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
