use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::MarketError;

// ---------------------------------------------------------------------------
// Card — The card currently selected for analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Card {
    pub title: String,
    pub price: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Sale — One comparable sale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Sale {
    pub title: String,
    pub price: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Sale {
    pub fn new(title: &str, price: f64, date: NaiveDate) -> Self {
        Self {
            title: title.to_string(),
            price,
            date,
            image_url: None,
        }
    }
}

impl From<Sale> for Card {
    fn from(sale: Sale) -> Self {
        Card {
            title: sale.title,
            price: sale.price,
            date: sale.date,
            image_url: sale.image_url,
        }
    }
}

// ---------------------------------------------------------------------------
// Condition — Target condition for a resale
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    #[serde(rename = "Raw")]
    Raw,
    #[serde(rename = "PSA 9")]
    Psa9,
    #[serde(rename = "PSA 10")]
    Psa10,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::Raw, Condition::Psa9, Condition::Psa10];

    pub fn label(&self) -> &'static str {
        match self {
            Condition::Raw => "Raw",
            Condition::Psa9 => "PSA 9",
            Condition::Psa10 => "PSA 10",
        }
    }

    pub fn is_graded(&self) -> bool {
        !matches!(self, Condition::Raw)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = MarketError;

    /// Accepts `Raw`, `PSA 9`, `PSA 10` in any case, with or without the space.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        match compact.as_str() {
            "RAW" => Ok(Condition::Raw),
            "PSA9" => Ok(Condition::Psa9),
            "PSA10" => Ok(Condition::Psa10),
            _ => Err(MarketError::InvalidArgument(format!(
                "Unknown condition '{}'; expected Raw, PSA 9 or PSA 10",
                s
            ))),
        }
    }
}
