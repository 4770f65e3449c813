//! Browser impersonation profiles
//!
//! A profile describes the request headers a specific browser build sends on a
//! top-level navigation: its User-Agent, Accept headers, Chromium client hints
//! and Fetch Metadata headers, in the order that browser emits them. Each
//! profile also names the `wreq-util` emulation whose TLS handshake and HTTP/2
//! settings stand in for that build on the wire.
//!
//! Profiles are addressed by the names the widely used `curl-impersonate`
//! family of clients accepts (`chrome136`, `safari184_ios`, `firefox135`, ...),
//! by family aliases (`chrome`, `safari`, ...) that resolve to the newest build
//! of that family, and by the special name [`REALWORLD`], which draws a profile
//! at random weighted by real-world browser usage.

use crate::error::FetchError;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use wreq::header::{HeaderMap, HeaderName, HeaderValue};
use wreq_util::{Emulation, EmulationOS, EmulationOption};

/// Profile name that selects a browser at random, weighted by market share
pub const REALWORLD: &str = "realworld";

/// Browser families that profiles belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowserFamily {
    /// Desktop Google Chrome on Windows
    Chrome,
    /// Google Chrome on Android
    ChromeAndroid,
    /// Desktop Microsoft Edge on Windows
    Edge,
    /// Desktop Firefox on Windows
    Firefox,
    /// Firefox on Android
    FirefoxAndroid,
    /// Desktop Safari on macOS
    Safari,
    /// Mobile Safari on iPhone
    SafariIos,
    /// Tor Browser (Firefox ESR based)
    Tor,
}

impl BrowserFamily {
    /// Whether the browser sends `sec-ch-ua` client hints
    pub fn sends_client_hints(self) -> bool {
        matches!(
            self,
            BrowserFamily::Chrome | BrowserFamily::ChromeAndroid | BrowserFamily::Edge
        )
    }

    /// Operating system the family's User-Agent claims
    pub fn emulation_os(self) -> EmulationOS {
        match self {
            BrowserFamily::ChromeAndroid | BrowserFamily::FirefoxAndroid => EmulationOS::Android,
            BrowserFamily::Safari => EmulationOS::MacOS,
            BrowserFamily::SafariIos => EmulationOS::IOS,
            BrowserFamily::Chrome
            | BrowserFamily::Edge
            | BrowserFamily::Firefox
            | BrowserFamily::Tor => EmulationOS::Windows,
        }
    }

    fn is_gecko(self) -> bool {
        matches!(
            self,
            BrowserFamily::Firefox | BrowserFamily::FirefoxAndroid | BrowserFamily::Tor
        )
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::ChromeAndroid => "chrome_android",
            BrowserFamily::Edge => "edge",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::FirefoxAndroid => "firefox_android",
            BrowserFamily::Safari => "safari",
            BrowserFamily::SafariIos => "safari_ios",
            BrowserFamily::Tor => "tor",
        };
        f.write_str(name)
    }
}

/// A named browser build whose request headers can be reproduced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserProfile {
    /// Profile name as accepted by [`BrowserProfile::lookup`]
    pub name: &'static str,
    /// Browser family
    pub family: BrowserFamily,
    /// Browser version as it appears in the User-Agent
    ///
    /// Major version for Chromium and Gecko browsers (`"136"`), dotted
    /// version for Safari (`"18.4"`).
    pub version: &'static str,
    /// Closest TLS and HTTP/2 fingerprint `wreq-util` ships for this build
    ///
    /// The newest emulated release at or below `version`, or the oldest one
    /// of the family when the build predates them all.
    #[serde(skip)]
    pub emulation: Emulation,
    /// Relative weight used by the [`REALWORLD`] selector (0 = never picked)
    #[serde(skip)]
    realworld_weight: u32,
}

const fn profile(
    name: &'static str,
    family: BrowserFamily,
    version: &'static str,
    realworld_weight: u32,
    emulation: Emulation,
) -> BrowserProfile {
    BrowserProfile {
        name,
        family,
        version,
        emulation,
        realworld_weight,
    }
}

use BrowserFamily::*;

static PROFILES: [BrowserProfile; 34] = [
    profile("chrome99", Chrome, "99", 0, Emulation::Chrome100),
    profile("chrome100", Chrome, "100", 0, Emulation::Chrome100),
    profile("chrome101", Chrome, "101", 0, Emulation::Chrome101),
    profile("chrome104", Chrome, "104", 0, Emulation::Chrome104),
    profile("chrome107", Chrome, "107", 0, Emulation::Chrome107),
    profile("chrome110", Chrome, "110", 0, Emulation::Chrome110),
    profile("chrome116", Chrome, "116", 0, Emulation::Chrome116),
    profile("chrome119", Chrome, "119", 0, Emulation::Chrome119),
    profile("chrome120", Chrome, "120", 0, Emulation::Chrome120),
    profile("chrome123", Chrome, "123", 0, Emulation::Chrome123),
    profile("chrome124", Chrome, "124", 1, Emulation::Chrome124),
    profile("chrome131", Chrome, "131", 6, Emulation::Chrome131),
    profile("chrome133a", Chrome, "133", 8, Emulation::Chrome133),
    profile("chrome136", Chrome, "136", 30, Emulation::Chrome136),
    profile("chrome99_android", ChromeAndroid, "99", 0, Emulation::Chrome100),
    profile("chrome131_android", ChromeAndroid, "131", 18, Emulation::Chrome131),
    profile("safari153", Safari, "15.3", 0, Emulation::Safari15_3),
    profile("safari155", Safari, "15.5", 0, Emulation::Safari15_5),
    profile("safari170", Safari, "17.0", 1, Emulation::Safari17_0),
    profile("safari180", Safari, "18.0", 1, Emulation::Safari18),
    profile("safari184", Safari, "18.4", 4, Emulation::Safari18_3_1),
    profile("safari260", Safari, "26.0", 2, Emulation::Safari18_5),
    profile("safari172_ios", SafariIos, "17.2", 1, Emulation::SafariIos17_2),
    profile("safari180_ios", SafariIos, "18.0", 2, Emulation::SafariIos17_4_1),
    profile("safari184_ios", SafariIos, "18.4", 7, Emulation::SafariIos18_1_1),
    profile("safari260_ios", SafariIos, "26.0", 4, Emulation::SafariIos18_1_1),
    profile("firefox133", Firefox, "133", 1, Emulation::Firefox133),
    profile("firefox135", Firefox, "135", 3, Emulation::Firefox135),
    profile("firefox135_android", FirefoxAndroid, "135", 1, Emulation::FirefoxAndroid135),
    profile("tor145", Tor, "128", 0, Emulation::Firefox128),
    profile("edge99", Edge, "99", 0, Emulation::Edge101),
    profile("edge101", Edge, "101", 0, Emulation::Edge101),
    profile("edge133", Edge, "133", 2, Emulation::Edge131),
    profile("edge135", Edge, "135", 5, Emulation::Edge134),
];

/// Index of the newest desktop Chrome build in [`PROFILES`]
const CHROME_LATEST: usize = 13;

/// Family aliases and the profile each one resolves to
static ALIASES: [(&str, &str); 8] = [
    ("chrome", "chrome136"),
    ("chrome_android", "chrome131_android"),
    ("edge", "edge135"),
    ("firefox", "firefox135"),
    ("firefox_android", "firefox135_android"),
    ("safari", "safari260"),
    ("safari_ios", "safari260_ios"),
    ("tor", "tor145"),
];

const CHROMIUM_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";
const GECKO_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
const SAFARI_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

impl BrowserProfile {
    /// Look up a profile by name or family alias
    ///
    /// Matching ignores ASCII case and surrounding whitespace. Returns `None`
    /// for unknown names, including [`REALWORLD`], which is not a single profile.
    pub fn lookup(name: &str) -> Option<&'static BrowserProfile> {
        let name = name.trim().to_ascii_lowercase();
        let target = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, target)| *target)
            .unwrap_or(name.as_str());

        PROFILES.iter().find(|profile| profile.name == target)
    }

    /// The newest desktop Chrome profile
    pub fn latest_chrome() -> &'static BrowserProfile {
        &PROFILES[CHROME_LATEST]
    }

    /// All concrete profiles, oldest first within each family
    pub fn all() -> &'static [BrowserProfile] {
        &PROFILES
    }

    /// Major version number
    pub fn major_version(&self) -> &'static str {
        self.version.split('.').next().unwrap_or(self.version)
    }

    /// The User-Agent string this browser sends
    pub fn user_agent(&self) -> String {
        let v = self.major_version();
        match self.family {
            Chrome => format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{v}.0.0.0 Safari/537.36"
            ),
            ChromeAndroid => format!(
                "Mozilla/5.0 (Linux; Android 10; K) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{v}.0.0.0 Mobile Safari/537.36"
            ),
            Edge => format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{v}.0.0.0 Safari/537.36 Edg/{v}.0.0.0"
            ),
            Firefox => format!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:{v}.0) Gecko/20100101 Firefox/{v}.0"
            ),
            FirefoxAndroid => {
                format!("Mozilla/5.0 (Android 14; Mobile; rv:{v}.0) Gecko/{v}.0 Firefox/{v}.0")
            }
            Tor => format!("Mozilla/5.0 (Windows NT 10.0; rv:{v}.0) Gecko/20100101 Firefox/{v}.0"),
            Safari => format!(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Safari/605.1.15",
                self.version
            ),
            SafariIos => format!(
                "Mozilla/5.0 (iPhone; CPU iPhone OS {} like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/{} Mobile/15E148 Safari/604.1",
                self.version.replace('.', "_"),
                self.version
            ),
        }
    }

    fn client_hint_brands(&self) -> String {
        let v = self.major_version();
        match self.family {
            Edge => format!(
                "\"Microsoft Edge\";v=\"{v}\", \"Chromium\";v=\"{v}\", \"Not_A Brand\";v=\"24\""
            ),
            _ => format!(
                "\"Chromium\";v=\"{v}\", \"Google Chrome\";v=\"{v}\", \"Not_A Brand\";v=\"24\""
            ),
        }
    }

    /// `wreq` client settings reproducing this build's TLS and HTTP/2 fingerprint
    ///
    /// The emulation's default headers fix the header order on the wire;
    /// [`BrowserProfile::headers`] is sent per request on top of them.
    pub fn emulation_option(&self) -> EmulationOption {
        EmulationOption::builder()
            .emulation(self.emulation)
            .emulation_os(self.family.emulation_os())
            .build()
    }

    /// Request headers for a top-level navigation as a [`HeaderMap`]
    ///
    /// `Accept-Encoding` and `Host` are left to the HTTP client, which
    /// negotiates compression it can actually decode.
    pub fn headers(&self) -> HeaderMap {
        let pairs = self.header_pairs();
        let mut headers = HeaderMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
        headers
    }

    /// Request headers in the order the browser emits them
    pub fn header_pairs(&self) -> Vec<(&'static str, String)> {
        let user_agent = self.user_agent();

        if self.family.sends_client_hints() {
            let mobile = if self.family == ChromeAndroid { "?1" } else { "?0" };
            let platform = if self.family == ChromeAndroid {
                "\"Android\""
            } else {
                "\"Windows\""
            };
            return vec![
                ("sec-ch-ua", self.client_hint_brands()),
                ("sec-ch-ua-mobile", mobile.to_string()),
                ("sec-ch-ua-platform", platform.to_string()),
                ("upgrade-insecure-requests", "1".to_string()),
                ("user-agent", user_agent),
                ("accept", CHROMIUM_ACCEPT.to_string()),
                ("sec-fetch-site", "none".to_string()),
                ("sec-fetch-mode", "navigate".to_string()),
                ("sec-fetch-user", "?1".to_string()),
                ("sec-fetch-dest", "document".to_string()),
                ("accept-language", "en-US,en;q=0.9".to_string()),
            ];
        }

        if self.family.is_gecko() {
            return vec![
                ("user-agent", user_agent),
                ("accept", GECKO_ACCEPT.to_string()),
                ("accept-language", "en-US,en;q=0.5".to_string()),
                ("upgrade-insecure-requests", "1".to_string()),
                ("sec-fetch-dest", "document".to_string()),
                ("sec-fetch-mode", "navigate".to_string()),
                ("sec-fetch-site", "none".to_string()),
                ("sec-fetch-user", "?1".to_string()),
            ];
        }

        vec![
            ("accept", SAFARI_ACCEPT.to_string()),
            ("sec-fetch-site", "none".to_string()),
            ("sec-fetch-dest", "document".to_string()),
            ("accept-language", "en-US,en;q=0.9".to_string()),
            ("sec-fetch-mode", "navigate".to_string()),
            ("user-agent", user_agent),
        ]
    }
}

impl fmt::Display for BrowserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// All concrete profile names, in catalog order
pub fn profile_names() -> Vec<&'static str> {
    PROFILES.iter().map(|profile| profile.name).collect()
}

/// Family alias names and the profile each resolves to
pub fn alias_names() -> Vec<(&'static str, &'static str)> {
    ALIASES.to_vec()
}

/// A parsed impersonation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impersonate {
    /// Always present this profile
    Named(&'static BrowserProfile),
    /// Draw a profile per request from the usage-weighted distribution
    RealWorld,
}

impl Impersonate {
    /// Parse a profile name, alias or [`REALWORLD`]
    ///
    /// # Errors
    ///
    /// * `FetchError::UnsupportedProfile` - The name matches nothing in the catalog
    pub fn parse(name: &str) -> Result<Self, FetchError> {
        if name.trim().eq_ignore_ascii_case(REALWORLD) {
            return Ok(Impersonate::RealWorld);
        }

        BrowserProfile::lookup(name)
            .map(Impersonate::Named)
            .ok_or_else(|| FetchError::UnsupportedProfile(name.to_string()))
    }

    /// Resolve to a concrete profile using the thread-local RNG
    pub fn resolve(&self) -> &'static BrowserProfile {
        self.resolve_with(&mut rand::rng())
    }

    /// Resolve to a concrete profile, drawing from `rng` for [`Impersonate::RealWorld`]
    pub fn resolve_with<R: Rng>(&self, rng: &mut R) -> &'static BrowserProfile {
        match self {
            Impersonate::Named(profile) => profile,
            Impersonate::RealWorld => pick_realworld(rng),
        }
    }
}

fn pick_realworld<R: Rng>(rng: &mut R) -> &'static BrowserProfile {
    let total: u32 = PROFILES.iter().map(|p| p.realworld_weight).sum();
    let mut roll = rng.random_range(0..total);

    PROFILES
        .iter()
        .find(|profile| {
            if roll < profile.realworld_weight {
                true
            } else {
                roll -= profile.realworld_weight;
                false
            }
        })
        .unwrap_or_else(BrowserProfile::latest_chrome)
}
