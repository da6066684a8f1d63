//! Territory containment
//!
//! A trimmed copy of the CLDR containment tree covering the territories the
//! built-in preference data mentions. Unknown territories fall straight to
//! the world ("001").

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::traits::TerritoryContainment;

pub const WORLD: &str = "001";

/// territory -> immediate parent region
static PARENTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut parents = HashMap::new();
    let tree: &[(&str, &[&str])] = &[
        // continents
        ("001", &["002", "009", "019", "142", "150"]),
        ("019", &["003", "005", "013", "021", "029", "419"]),
        ("150", &["151", "154", "155", "039"]),
        ("142", &["030", "034", "035", "143", "145"]),
        ("009", &["053", "054", "057", "061"]),
        ("002", &["015", "202"]),
        // subregions
        ("021", &["US", "CA", "BM", "PM", "GL"]),
        ("029", &["BS", "PR", "JM", "KY", "VI", "TT"]),
        ("013", &["MX", "BZ", "CR", "GT", "HN", "NI", "PA", "SV"]),
        ("005", &["AR", "BO", "BR", "CL", "CO", "EC", "PE", "PY", "UY", "VE"]),
        ("154", &["GB", "IE", "IS", "DK", "FI", "NO", "SE", "EE", "LV", "LT"]),
        ("155", &["DE", "FR", "AT", "BE", "CH", "LI", "LU", "MC", "NL"]),
        ("039", &["IT", "ES", "PT", "GR", "MT", "SI", "HR"]),
        ("151", &["RU", "PL", "CZ", "SK", "HU", "RO", "BG", "UA", "BY", "MD"]),
        ("053", &["AU", "NZ"]),
        ("030", &["CN", "JP", "KR", "HK", "MO", "TW", "MN"]),
        ("034", &["IN", "PK", "BD", "LK", "NP"]),
        ("035", &["ID", "MY", "PH", "SG", "TH", "VN", "MM"]),
        ("145", &["AE", "IL", "SA", "TR", "QA"]),
        ("015", &["EG", "MA", "DZ", "TN"]),
        ("202", &["NG", "ZA", "KE", "GH", "LR"]),
    ];
    for (parent, children) in tree {
        for child in children.iter() {
            parents.insert(*child, *parent);
        }
    }
    parents
});

/// The built-in containment tree
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTerritories;

impl TerritoryContainment for BuiltinTerritories {
    fn containment_chain(&self, territory: &str) -> Vec<String> {
        let mut chain = vec![territory.to_uppercase()];
        let mut current = chain[0].clone();
        while let Some(parent) = PARENTS.get(current.as_str()) {
            chain.push(parent.to_string());
            current = parent.to_string();
        }
        if chain.last().map(String::as_str) != Some(WORLD) {
            chain.push(WORLD.to_string());
        }
        chain
    }
}
