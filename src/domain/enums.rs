//! Closed sets of wire constants shared by routes and models.

use crate::utils::error::RsWikiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RsWikiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| {
                        RsWikiError::decode(format!(
                            "unknown {} value '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }
    };
}

wire_enum! {
    /// The upstream hosts the routes are resolved against.
    Host {
        WeirdGloop => "weird_gloop",
        RealtimePrices => "realtime_prices",
        MediaWiki => "mediawiki",
        MediaWikiOsrs => "mediawiki_osrs",
    }
}

impl Host {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Host::WeirdGloop => "https://api.weirdgloop.org",
            Host::RealtimePrices => "https://prices.runescape.wiki/api/v1",
            Host::MediaWiki => "https://runescape.wiki/api.php",
            Host::MediaWikiOsrs => "https://oldschool.runescape.wiki/api.php",
        }
    }
}

wire_enum! {
    /// Game types served by the Weird Gloop exchange API.
    WgGameType {
        /// RuneScape 3
        Rs => "rs",
        /// Old School RuneScape
        Osrs => "osrs",
        /// RuneScape 3 Fresh Start World
        RsFsw2022 => "rs-fsw-2022",
        /// Old School Fresh Start World
        OsrsFsw2022 => "osrs-fsw-2022",
    }
}

wire_enum! {
    Locale {
        En => "en",
        Pt => "pt",
    }
}

wire_enum! {
    /// Game types served by the realtime prices API.
    RtGameType {
        Osrs => "osrs",
        /// Deadman Mode
        Dmm => "dmm",
        Fsw => "fsw",
    }
}

wire_enum! {
    RtTimeFilter {
        FiveMins => "5m",
        OneHour => "1h",
    }
}

wire_enum! {
    TimeSeriesGameType {
        Osrs => "osrs",
        Fsw => "fsw",
    }
}

wire_enum! {
    TimeSeriesFilter {
        FiveMins => "5m",
        OneHour => "1h",
        SixHours => "6h",
    }
}

wire_enum! {
    WgTimeFilter {
        All => "all",
        Sample => "sample",
        Last90Days => "last90d",
    }
}

wire_enum! {
    MwGameType {
        Rs => "rs",
        Osrs => "osrs",
    }
}

wire_enum! {
    /// The eight Voice of Seren districts.
    VosDistrict {
        Amlodd => "Amlodd",
        Cadarn => "Cadarn",
        Crwys => "Crwys",
        Hefin => "Hefin",
        Iorwerth => "Iorwerth",
        Ithell => "Ithell",
        Meilyr => "Meilyr",
        Trahaearn => "Trahaearn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_strings() {
        assert_eq!(WgGameType::RsFsw2022.as_str(), "rs-fsw-2022");
        assert_eq!(WgTimeFilter::Last90Days.to_string(), "last90d");
        assert_eq!(RtTimeFilter::FiveMins.as_str(), "5m");
    }

    #[test]
    fn test_district_parses_case_insensitively() {
        assert_eq!("ITHELL".parse::<VosDistrict>().unwrap(), VosDistrict::Ithell);
        assert_eq!("amlodd".parse::<VosDistrict>().unwrap(), VosDistrict::Amlodd);
        assert!("Prifddinas".parse::<VosDistrict>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_string() {
        let json = serde_json::to_string(&WgGameType::OsrsFsw2022).unwrap();
        assert_eq!(json, "\"osrs-fsw-2022\"");
    }
}
