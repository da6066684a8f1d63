//! Backend
//!
//! Bundles the collaborator implementations a formatter needs. Starts from
//! the built-in providers; any piece can be swapped with a `with_*` call.

use std::fmt;
use std::sync::Arc;

use crate::builtin::BUILTIN_LOCALES;
use crate::currency::BuiltinCurrencies;
use crate::territory::BuiltinTerritories;
use crate::traits::{CurrencyData, ListFormatter, LocaleData, NumberFormatter, TerritoryContainment};

#[derive(Clone)]
pub struct Backend {
    locale_data: Arc<dyn LocaleData>,
    number_formatter: Arc<dyn NumberFormatter>,
    list_formatter: Arc<dyn ListFormatter>,
    territories: Arc<dyn TerritoryContainment>,
    currencies: Arc<dyn CurrencyData>,
}

impl Backend {
    /// Built-in locale data, number and list formatting, containment and
    /// currency tables
    pub fn builtin() -> Self {
        let locales = Arc::clone(&BUILTIN_LOCALES);
        Self {
            locale_data: locales.clone(),
            number_formatter: locales.clone(),
            list_formatter: locales,
            territories: Arc::new(BuiltinTerritories),
            currencies: Arc::new(BuiltinCurrencies),
        }
    }

    pub fn with_locale_data<L: LocaleData + 'static>(mut self, data: L) -> Self {
        self.locale_data = Arc::new(data);
        self
    }

    pub fn with_number_formatter<N: NumberFormatter + 'static>(mut self, formatter: N) -> Self {
        self.number_formatter = Arc::new(formatter);
        self
    }

    pub fn with_list_formatter<F: ListFormatter + 'static>(mut self, formatter: F) -> Self {
        self.list_formatter = Arc::new(formatter);
        self
    }

    pub fn with_territories<T: TerritoryContainment + 'static>(mut self, territories: T) -> Self {
        self.territories = Arc::new(territories);
        self
    }

    pub fn with_currencies<C: CurrencyData + 'static>(mut self, currencies: C) -> Self {
        self.currencies = Arc::new(currencies);
        self
    }

    pub fn locale_data(&self) -> &dyn LocaleData {
        self.locale_data.as_ref()
    }

    pub fn number_formatter(&self) -> &dyn NumberFormatter {
        self.number_formatter.as_ref()
    }

    pub fn list_formatter(&self) -> &dyn ListFormatter {
        self.list_formatter.as_ref()
    }

    pub fn territories(&self) -> &dyn TerritoryContainment {
        self.territories.as_ref()
    }

    pub fn currencies(&self) -> &dyn CurrencyData {
        self.currencies.as_ref()
    }
}

impl Default for Backend {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backend")
            .field("locales", &self.locale_data.locales())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WorldOnly;

    impl TerritoryContainment for WorldOnly {
        fn containment_chain(&self, _territory: &str) -> Vec<String> {
            vec!["001".to_string()]
        }
    }

    #[test]
    fn test_builtin_backend() {
        let backend = Backend::builtin();
        assert!(backend.locale_data().locales().contains(&"en".to_string()));
        assert_eq!(backend.territories().containment_chain("GB"), vec!["GB", "154", "150", "001"]);
        assert!(backend.currencies().is_currency("USD"));
    }

    #[test]
    fn test_replace_collaborator() {
        let backend = Backend::builtin().with_territories(WorldOnly);
        assert_eq!(backend.territories().containment_chain("US"), vec!["001"]);
    }
}
