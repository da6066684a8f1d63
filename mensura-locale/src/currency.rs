//! Currency metadata for currencies embedded in unit names (`curr_usd`)

use std::collections::BTreeMap;

use crate::traits::{CurrencyData, CurrencyMetadata};
use crate::PluralCategory;

/// (code, symbol, [(language, one, other)])
type CurrencyRow = (&'static str, &'static str, &'static [(&'static str, &'static str, &'static str)]);

const CURRENCIES: &[CurrencyRow] = &[
    ("USD", "$", &[("en", "US dollar", "US dollars"), ("de", "US-Dollar", "US-Dollar"), ("fr", "dollar des États-Unis", "dollars des États-Unis")]),
    ("EUR", "€", &[("en", "euro", "euros"), ("de", "Euro", "Euro"), ("fr", "euro", "euros")]),
    ("GBP", "£", &[("en", "British pound", "British pounds"), ("de", "Britisches Pfund", "Britische Pfund"), ("fr", "livre sterling", "livres sterling")]),
    ("JPY", "¥", &[("en", "Japanese yen", "Japanese yen"), ("de", "Japanischer Yen", "Japanische Yen"), ("fr", "yen japonais", "yens japonais")]),
    ("CHF", "CHF", &[("en", "Swiss franc", "Swiss francs"), ("de", "Schweizer Franken", "Schweizer Franken"), ("fr", "franc suisse", "francs suisses")]),
    ("CAD", "CA$", &[("en", "Canadian dollar", "Canadian dollars"), ("de", "Kanadischer Dollar", "Kanadische Dollar"), ("fr", "dollar canadien", "dollars canadiens")]),
    ("AUD", "A$", &[("en", "Australian dollar", "Australian dollars"), ("de", "Australischer Dollar", "Australische Dollar"), ("fr", "dollar australien", "dollars australiens")]),
    ("CNY", "CN¥", &[("en", "Chinese yuan", "Chinese yuan"), ("de", "Renminbi Yuan", "Renminbi Yuan"), ("fr", "yuan renminbi chinois", "yuans renminbi chinois")]),
    ("INR", "₹", &[("en", "Indian rupee", "Indian rupees"), ("de", "Indische Rupie", "Indische Rupien"), ("fr", "roupie indienne", "roupies indiennes")]),
    ("SEK", "kr", &[("en", "Swedish krona", "Swedish kronor"), ("de", "Schwedische Krone", "Schwedische Kronen"), ("fr", "couronne suédoise", "couronnes suédoises")]),
    ("NZD", "NZ$", &[("en", "New Zealand dollar", "New Zealand dollars"), ("de", "Neuseeland-Dollar", "Neuseeland-Dollar"), ("fr", "dollar néo-zélandais", "dollars néo-zélandais")]),
    ("MXN", "MX$", &[("en", "Mexican peso", "Mexican pesos"), ("de", "Mexikanischer Peso", "Mexikanische Pesos"), ("fr", "peso mexicain", "pesos mexicains")]),
    ("BRL", "R$", &[("en", "Brazilian real", "Brazilian reals"), ("de", "Brasilianischer Real", "Brasilianische Real"), ("fr", "réal brésilien", "réals brésiliens")]),
];

/// ISO 4217 codes recognised by the parser
pub fn currency_codes() -> impl Iterator<Item = &'static str> {
    CURRENCIES.iter().map(|(code, _, _)| *code)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCurrencies;

impl CurrencyData for BuiltinCurrencies {
    fn currency(&self, code: &str, locale: &str) -> Option<CurrencyMetadata> {
        let code = code.to_uppercase();
        let (code, symbol, names) = CURRENCIES.iter().find(|(c, _, _)| *c == code)?;
        let language = locale.split(['-', '_']).next().unwrap_or(locale).to_lowercase();
        let (_, one, other) = names
            .iter()
            .find(|(lang, _, _)| *lang == language)
            .or_else(|| names.iter().find(|(lang, _, _)| *lang == "en"))?;

        let mut count_names = BTreeMap::new();
        count_names.insert(PluralCategory::One, one.to_string());
        count_names.insert(PluralCategory::Other, other.to_string());
        Some(CurrencyMetadata {
            code: code.to_string(),
            symbol: symbol.to_string(),
            count_names,
        })
    }

    fn is_currency(&self, code: &str) -> bool {
        let code = code.to_uppercase();
        currency_codes().any(|c| c == code)
    }
}
