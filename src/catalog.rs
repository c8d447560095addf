//! The fixed catalog of target cities

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

/// A target city (immutable reference data)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub country: &'static str,
    /// ISO 3166-1 alpha-2 code
    pub code: &'static str,
}

impl City {
    const fn new(
        name: &'static str,
        lat: f64,
        lon: f64,
        country: &'static str,
        code: &'static str,
    ) -> Self {
        Self {
            name,
            lat,
            lon,
            country,
            code,
        }
    }

    /// Target line shown while the round runs
    pub fn coordinate_text(&self) -> String {
        format!("{} - LAT: {:.1}°, LON: {:.1}°", self.name, self.lat, self.lon)
    }
}

/// A country as offered by the bonus quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: &'static str,
    pub code: &'static str,
}

impl Country {
    pub fn flag(&self) -> String {
        flag_emoji(self.code)
    }
}

pub static CITIES: [City; 45] = [
    City::new("Tokyo, Japan", 35.6762, 139.6503, "Japan", "JP"),
    City::new("London, UK", 51.5074, -0.1278, "United Kingdom", "GB"),
    City::new("New York, USA", 40.7128, -74.0060, "United States", "US"),
    City::new("Paris, France", 48.8566, 2.3522, "France", "FR"),
    City::new("Sydney, Australia", -33.8688, 151.2093, "Australia", "AU"),
    City::new("Rio de Janeiro, Brazil", -22.9068, -43.1729, "Brazil", "BR"),
    City::new("Moscow, Russia", 55.7558, 37.6173, "Russia", "RU"),
    City::new("Cairo, Egypt", 30.0444, 31.2357, "Egypt", "EG"),
    City::new("Mumbai, India", 19.0760, 72.8777, "India", "IN"),
    City::new("Beijing, China", 39.9042, 116.4074, "China", "CN"),
    City::new("Los Angeles, USA", 34.0522, -118.2437, "United States", "US"),
    City::new("Singapore", 1.3521, 103.8198, "Singapore", "SG"),
    City::new("Dubai, UAE", 25.2048, 55.2708, "United Arab Emirates", "AE"),
    City::new("Toronto, Canada", 43.6532, -79.3832, "Canada", "CA"),
    City::new("Mexico City, Mexico", 19.4326, -99.1332, "Mexico", "MX"),
    City::new("Cape Town, South Africa", -33.9249, 18.4241, "South Africa", "ZA"),
    City::new("Bangkok, Thailand", 13.7563, 100.5018, "Thailand", "TH"),
    City::new("Istanbul, Turkey", 41.0082, 28.9784, "Turkey", "TR"),
    City::new("Buenos Aires, Argentina", -34.6037, -58.3816, "Argentina", "AR"),
    City::new("Seoul, South Korea", 37.5665, 126.9780, "South Korea", "KR"),
    City::new("Berlin, Germany", 52.5200, 13.4050, "Germany", "DE"),
    City::new("Rome, Italy", 41.9028, 12.4964, "Italy", "IT"),
    City::new("Madrid, Spain", 40.4168, -3.7038, "Spain", "ES"),
    City::new("Amsterdam, Netherlands", 52.3676, 4.9041, "Netherlands", "NL"),
    City::new("Vienna, Austria", 48.2082, 16.3738, "Austria", "AT"),
    City::new("Stockholm, Sweden", 59.3293, 18.0686, "Sweden", "SE"),
    City::new("Oslo, Norway", 59.9139, 10.7522, "Norway", "NO"),
    City::new("Copenhagen, Denmark", 55.6761, 12.5683, "Denmark", "DK"),
    City::new("Warsaw, Poland", 52.2297, 21.0122, "Poland", "PL"),
    City::new("Prague, Czech Republic", 50.0755, 14.4378, "Czech Republic", "CZ"),
    City::new("Athens, Greece", 37.9838, 23.7275, "Greece", "GR"),
    City::new("Lisbon, Portugal", 38.7223, -9.1393, "Portugal", "PT"),
    City::new("Brussels, Belgium", 50.8503, 4.3517, "Belgium", "BE"),
    City::new("Zurich, Switzerland", 47.3769, 8.5417, "Switzerland", "CH"),
    City::new("Dublin, Ireland", 53.3498, -6.2603, "Ireland", "IE"),
    City::new("Helsinki, Finland", 60.1699, 24.9384, "Finland", "FI"),
    City::new("Budapest, Hungary", 47.4979, 19.0402, "Hungary", "HU"),
    City::new("Bucharest, Romania", 44.4268, 26.1025, "Romania", "RO"),
    City::new("Lagos, Nigeria", 6.5244, 3.3792, "Nigeria", "NG"),
    City::new("Nairobi, Kenya", -1.2864, 36.8172, "Kenya", "KE"),
    City::new("Lima, Peru", -12.0464, -77.0428, "Peru", "PE"),
    City::new("Bogota, Colombia", 4.7110, -74.0721, "Colombia", "CO"),
    City::new("Santiago, Chile", -33.4489, -70.6693, "Chile", "CL"),
    City::new("Kuala Lumpur, Malaysia", 3.1390, 101.6869, "Malaysia", "MY"),
    City::new("Manila, Philippines", 14.5995, 120.9842, "Philippines", "PH"),
];

/// Sample `n` distinct cities (without replacement) in random order
pub fn sample_cities<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<City> {
    let mut pool = CITIES.to_vec();
    pool.shuffle(rng);
    pool.truncate(n);
    pool
}

/// Every country in the catalog once, in catalog order
pub fn distinct_countries() -> Vec<Country> {
    let mut seen: Vec<Country> = Vec::new();
    for city in CITIES.iter() {
        if !seen.iter().any(|c| c.code == city.code) {
            seen.push(Country {
                name: city.country,
                code: city.code,
            });
        }
    }
    seen
}

/// Map an ISO code to its regional-indicator flag
pub fn flag_emoji(code: &str) -> String {
    code.to_ascii_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase())
        .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
        .collect()
}

/// Offline nearest-city lookup in degree space, limited to `max_deg`
pub fn nearest_city(lat: f64, lon: f64, max_deg: f64) -> Option<&'static City> {
    let lat = lat.clamp(-90.0, 90.0);
    let lon = crate::normalize_degrees(lon);
    CITIES
        .iter()
        .map(|c| (c, (c.lat - lat).hypot(c.lon - lon)))
        .filter(|(_, d)| *d <= max_deg)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(c, _)| c)
}
