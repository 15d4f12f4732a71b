//! Per-city record of tornado strikes.

use tornado_alley_core::{CityId, EfRating, Rgb, TornadoId};

/// Latest strike summary for a single city.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    tornado: TornadoId,
    city: CityId,
    city_name: String,
    rating: EfRating,
    cumulative: u64,
}

impl LedgerEntry {
    /// Tornado responsible for the most recent strike.
    #[must_use]
    pub const fn tornado(&self) -> TornadoId {
        self.tornado
    }

    /// City the entry describes.
    #[must_use]
    pub const fn city(&self) -> CityId {
        self.city
    }

    /// Name of the city.
    #[must_use]
    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    /// Rating of the tornado at the most recent strike.
    #[must_use]
    pub const fn rating(&self) -> EfRating {
        self.rating
    }

    /// Casualties accumulated by the city.
    #[must_use]
    pub const fn cumulative(&self) -> u64 {
        self.cumulative
    }

    /// Accent color of the entry.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        self.rating.color()
    }

    /// One-line summary such as `T1: Omaha (EF3) - 42 cas.`.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "T{}: {} ({}) - {} cas.",
            self.tornado.get(),
            self.city_name,
            self.rating.label(),
            self.cumulative
        )
    }
}

/// Ordered strike ledger holding one entry per struck city.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitLedger {
    entries: Vec<LedgerEntry>,
}

impl HitLedger {
    /// Entries in order of each city's first strike.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Whether no city was struck yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn record(
        &mut self,
        tornado: TornadoId,
        city: CityId,
        city_name: &str,
        rating: EfRating,
        cumulative: u64,
    ) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.city == city) {
            entry.tornado = tornado;
            entry.rating = rating;
            entry.cumulative = cumulative;
            return;
        }
        self.entries.push(LedgerEntry {
            tornado,
            city,
            city_name: city_name.to_owned(),
            rating,
            cumulative,
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
