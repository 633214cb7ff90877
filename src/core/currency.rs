//! Static catalog of the currencies the board can track.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub flag: &'static str,
    pub region: &'static str,
}

/// Reference currency every fetched table is expressed against.
pub const REFERENCE_CURRENCY: &str = "USD";

/// Tracked when nothing usable is stored yet.
pub const DEFAULT_SELECTION: [&str; 5] = ["USD", "CNY", "JPY", "EUR", "HKD"];

pub const ALL_CURRENCIES: [Currency; 14] = [
    Currency {
        code: "USD",
        name: "US Dollar",
        symbol: "$",
        flag: "🇺🇸",
        region: "United States",
    },
    Currency {
        code: "CNY",
        name: "Chinese Yuan",
        symbol: "¥",
        flag: "🇨🇳",
        region: "China",
    },
    Currency {
        code: "JPY",
        name: "Japanese Yen",
        symbol: "¥",
        flag: "🇯🇵",
        region: "Japan",
    },
    Currency {
        code: "EUR",
        name: "Euro",
        symbol: "€",
        flag: "🇪🇺",
        region: "European Union",
    },
    Currency {
        code: "GBP",
        name: "British Pound",
        symbol: "£",
        flag: "🇬🇧",
        region: "United Kingdom",
    },
    Currency {
        code: "HKD",
        name: "Hong Kong Dollar",
        symbol: "HK$",
        flag: "🇭🇰",
        region: "Hong Kong",
    },
    Currency {
        code: "TWD",
        name: "New Taiwan Dollar",
        symbol: "NT$",
        flag: "🇹🇼",
        region: "Taiwan",
    },
    Currency {
        code: "KRW",
        name: "South Korean Won",
        symbol: "₩",
        flag: "🇰🇷",
        region: "South Korea",
    },
    Currency {
        code: "SGD",
        name: "Singapore Dollar",
        symbol: "S$",
        flag: "🇸🇬",
        region: "Singapore",
    },
    Currency {
        code: "AUD",
        name: "Australian Dollar",
        symbol: "A$",
        flag: "🇦🇺",
        region: "Australia",
    },
    Currency {
        code: "CAD",
        name: "Canadian Dollar",
        symbol: "C$",
        flag: "🇨🇦",
        region: "Canada",
    },
    Currency {
        code: "THB",
        name: "Thai Baht",
        symbol: "฿",
        flag: "🇹🇭",
        region: "Thailand",
    },
    Currency {
        code: "PHP",
        name: "Philippine Peso",
        symbol: "₱",
        flag: "🇵🇭",
        region: "Philippines",
    },
    Currency {
        code: "MYR",
        name: "Malaysian Ringgit",
        symbol: "RM",
        flag: "🇲🇾",
        region: "Malaysia",
    },
];

/// Looks up a catalog entry by its exact code.
pub fn find(code: &str) -> Option<&'static Currency> {
    ALL_CURRENCIES.iter().find(|c| c.code == code)
}

pub fn is_known(code: &str) -> bool {
    find(code).is_some()
}

/// Normalizes user input (`" eur"`) and resolves it against the catalog.
pub fn resolve(input: &str) -> anyhow::Result<&'static Currency> {
    let code = input.trim().to_uppercase();
    find(&code).ok_or_else(|| anyhow::anyhow!("Unknown currency code: {}", input.trim()))
}
