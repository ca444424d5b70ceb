//! Curated city list offered by the dashboard, grouped by country.

use serde::Serialize;

use crate::types::Coordinate;

/// City offered by default when none is selected
pub const DEFAULT_CITY: &str = "New York";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub country: &'static str,
    pub coordinate: Coordinate,
}

impl City {
    /// Dropdown label, e.g. `Paris (France)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.country)
    }
}

const fn city(name: &'static str, country: &'static str, latitude: f64, longitude: f64) -> City {
    City {
        name,
        country,
        coordinate: Coordinate::new_unchecked(latitude, longitude),
    }
}

static CITIES: &[City] = &[
    // United States
    city("Akron", "United States", 41.08, -81.52),
    city("Albany", "United States", 42.65, -73.75),
    city("Albuquerque", "United States", 35.08, -106.65),
    city("Amarillo", "United States", 35.22, -101.83),
    city("Anaheim", "United States", 33.84, -117.91),
    city("Anchorage", "United States", 61.22, -149.90),
    city("Ann Arbor", "United States", 42.28, -83.74),
    city("Arlington TX", "United States", 32.74, -97.11),
    city("Arlington VA", "United States", 38.88, -77.10),
    city("Atlanta", "United States", 33.75, -84.39),
    city("Augusta", "United States", 33.47, -81.97),
    city("Aurora CO", "United States", 39.73, -104.83),
    city("Austin", "United States", 30.27, -97.74),
    city("Bakersfield", "United States", 35.37, -119.02),
    city("Baltimore", "United States", 39.29, -76.61),
    city("Baton Rouge", "United States", 30.45, -91.15),
    city("Bellevue", "United States", 47.61, -122.20),
    city("Berkeley", "United States", 37.87, -122.27),
    city("Billings", "United States", 45.79, -108.54),
    city("Birmingham", "United States", 33.52, -86.80),
    city("Boise", "United States", 43.62, -116.21),
    city("Boston", "United States", 42.36, -71.06),
    city("Boulder", "United States", 40.01, -105.27),
    city("Bridgeport", "United States", 41.19, -73.20),
    city("Buffalo", "United States", 42.89, -78.88),
    city("Burlington", "United States", 44.48, -73.21),
    city("Cambridge", "United States", 42.37, -71.11),
    city("Cape Coral", "United States", 26.56, -81.95),
    city("Carlsbad", "United States", 33.16, -117.35),
    city("Carrollton", "United States", 32.98, -96.89),
    city("Cary", "United States", 35.79, -78.78),
    city("Cedar Rapids", "United States", 41.98, -91.67),
    city("Chandler", "United States", 33.31, -111.84),
    city("Charleston", "United States", 32.78, -79.93),
    city("Charlotte", "United States", 35.23, -80.84),
    city("Chattanooga", "United States", 35.05, -85.31),
    city("Chesapeake", "United States", 36.77, -76.29),
    city("Chicago", "United States", 41.88, -87.63),
    city("Chula Vista", "United States", 32.64, -117.08),
    city("Cincinnati", "United States", 39.10, -84.51),
    city("Cleveland", "United States", 41.50, -81.69),
    city("Colorado Springs", "United States", 38.83, -104.82),
    city("Columbia", "United States", 34.00, -81.03),
    city("Columbus OH", "United States", 39.96, -82.99),
    city("Concord", "United States", 37.98, -122.03),
    city("Coral Springs", "United States", 26.27, -80.27),
    city("Corona", "United States", 33.88, -117.57),
    city("Corpus Christi", "United States", 27.80, -97.40),
    city("Dallas", "United States", 32.78, -96.80),
    city("Dayton", "United States", 39.76, -84.19),
    city("Denton", "United States", 33.21, -97.13),
    city("Denver", "United States", 39.74, -104.99),
    city("Des Moines", "United States", 41.59, -93.62),
    city("Detroit", "United States", 42.33, -83.05),
    city("Durham", "United States", 35.99, -78.90),
    city("El Paso", "United States", 31.76, -106.49),
    city("Elk Grove", "United States", 38.41, -121.38),
    city("Eugene", "United States", 44.05, -123.09),
    city("Evansville", "United States", 37.97, -87.56),
    city("Everett", "United States", 47.98, -122.20),
    city("Fairfax", "United States", 38.85, -77.30),
    city("Fargo", "United States", 46.88, -96.79),
    city("Fayetteville", "United States", 35.05, -78.88),
    city("Fort Collins", "United States", 40.59, -105.08),
    city("Fort Lauderdale", "United States", 26.12, -80.14),
    city("Fort Wayne", "United States", 41.08, -85.14),
    city("Fort Worth", "United States", 32.75, -97.33),
    city("Fremont", "United States", 37.55, -121.99),
    city("Fresno", "United States", 36.74, -119.77),
    city("Frisco", "United States", 33.15, -96.82),
    city("Gainesville", "United States", 29.65, -82.32),
    city("Garden Grove", "United States", 33.77, -117.94),
    city("Garland", "United States", 32.91, -96.64),
    city("Gilbert", "United States", 33.35, -111.79),
    city("Glendale AZ", "United States", 33.54, -112.19),
    city("Glendale CA", "United States", 34.14, -118.25),
    city("Grand Prairie", "United States", 32.75, -96.99),
    city("Grand Rapids", "United States", 42.96, -85.66),
    city("Green Bay", "United States", 44.52, -88.02),
    city("Greensboro", "United States", 36.07, -79.79),
    city("Gresham", "United States", 45.50, -122.43),
    city("Hampton", "United States", 37.03, -76.35),
    city("Hartford", "United States", 41.76, -72.67),
    city("Henderson", "United States", 36.04, -114.98),
    city("Hialeah", "United States", 25.86, -80.28),
    city("Hollywood", "United States", 26.01, -80.15),
    city("Honolulu", "United States", 21.31, -157.86),
    city("Houston", "United States", 29.76, -95.37),
    city("Huntington Beach", "United States", 33.66, -118.00),
    city("Huntsville", "United States", 34.73, -86.59),
    city("Independence", "United States", 39.09, -94.42),
    city("Indianapolis", "United States", 39.77, -86.16),
    city("Irvine", "United States", 33.68, -117.83),
    city("Irving", "United States", 32.81, -96.95),
    city("Jackson", "United States", 32.30, -90.18),
    city("Jacksonville", "United States", 30.33, -81.66),
    city("Jersey City", "United States", 40.73, -74.07),
    city("Joliet", "United States", 41.53, -88.08),
    city("Kansas City", "United States", 39.10, -94.58),
    city("Kent", "United States", 47.38, -122.23),
    city("Killeen", "United States", 31.12, -97.73),
    city("Knoxville", "United States", 35.96, -83.92),
    city("Lafayette", "United States", 30.22, -92.02),
    city("Lakeland", "United States", 28.04, -81.95),
    city("Lakewood", "United States", 39.70, -105.08),
    city("Lancaster", "United States", 34.70, -118.14),
    city("Lansing", "United States", 42.73, -84.55),
    city("Laredo", "United States", 27.51, -99.51),
    city("Las Vegas", "United States", 36.17, -115.14),
    city("Lexington", "United States", 38.04, -84.50),
    city("Lincoln", "United States", 40.81, -96.68),
    city("Little Rock", "United States", 34.74, -92.33),
    city("Long Beach", "United States", 33.77, -118.19),
    city("Los Angeles", "United States", 34.05, -118.24),
    city("Louisville", "United States", 38.25, -85.76),
    city("Lubbock", "United States", 33.58, -101.86),
    city("Madison", "United States", 43.07, -89.40),
    city("Manchester", "United States", 42.99, -71.46),
    city("McAllen", "United States", 26.20, -98.23),
    city("Memphis", "United States", 35.15, -90.05),
    city("Mesa", "United States", 33.42, -111.83),
    city("Miami", "United States", 25.77, -80.19),
    city("Midland", "United States", 31.99, -102.08),
    city("Milwaukee", "United States", 43.04, -87.91),
    city("Minneapolis", "United States", 44.98, -93.27),
    city("Mobile", "United States", 30.69, -88.04),
    city("Modesto", "United States", 37.64, -121.00),
    city("Montgomery", "United States", 32.37, -86.30),
    city("Moreno Valley", "United States", 33.94, -117.23),
    city("Murfreesboro", "United States", 35.85, -86.39),
    city("Naperville", "United States", 41.78, -88.15),
    city("Nashville", "United States", 36.16, -86.78),
    city("New Haven", "United States", 41.31, -72.92),
    city("New Orleans", "United States", 29.95, -90.07),
    city("New York", "United States", 40.71, -74.01),
    city("Newark", "United States", 40.74, -74.17),
    city("Newport News", "United States", 37.08, -76.47),
    city("Norfolk", "United States", 36.85, -76.29),
    city("Norman", "United States", 35.22, -97.44),
    city("North Las Vegas", "United States", 36.20, -115.12),
    city("Oakland", "United States", 37.80, -122.27),
    city("Oceanside", "United States", 33.20, -117.38),
    city("Oklahoma City", "United States", 35.47, -97.51),
    city("Omaha", "United States", 41.26, -95.93),
    city("Ontario", "United States", 34.06, -117.65),
    city("Orange", "United States", 33.79, -117.85),
    city("Orlando", "United States", 28.54, -81.38),
    city("Overland Park", "United States", 38.98, -94.67),
    city("Oxnard", "United States", 34.20, -119.21),
    city("Palm Bay", "United States", 28.03, -80.59),
    city("Palmdale", "United States", 34.58, -118.10),
    city("Pasadena", "United States", 29.69, -95.21),
    city("Paterson", "United States", 40.92, -74.17),
    city("Pearland", "United States", 29.56, -95.29),
    city("Pembroke Pines", "United States", 26.01, -80.34),
    city("Peoria", "United States", 40.69, -89.59),
    city("Philadelphia", "United States", 39.95, -75.17),
    city("Phoenix", "United States", 33.45, -112.07),
    city("Pittsburgh", "United States", 40.44, -80.00),
    city("Plano", "United States", 33.02, -96.70),
    city("Pomona", "United States", 34.06, -117.75),
    city("Portland", "United States", 45.52, -122.68),
    city("Port St. Lucie", "United States", 27.27, -80.35),
    city("Providence", "United States", 41.82, -71.42),
    city("Provo", "United States", 40.23, -111.66),
    city("Pueblo", "United States", 38.25, -104.61),
    city("Raleigh", "United States", 35.78, -78.64),
    city("Rancho Cucamonga", "United States", 34.11, -117.59),
    city("Reno", "United States", 39.53, -119.81),
    city("Richmond", "United States", 37.54, -77.44),
    city("Riverside", "United States", 33.95, -117.40),
    city("Rochester", "United States", 43.16, -77.61),
    city("Rockford", "United States", 42.27, -89.09),
    city("Sacramento", "United States", 38.58, -121.49),
    city("Salem", "United States", 44.94, -123.03),
    city("Salinas", "United States", 36.68, -121.66),
    city("Salt Lake City", "United States", 40.76, -111.89),
    city("San Antonio", "United States", 29.42, -98.49),
    city("San Bernardino", "United States", 34.11, -117.29),
    city("San Diego", "United States", 32.72, -117.16),
    city("San Francisco", "United States", 37.77, -122.42),
    city("San Jose", "United States", 37.34, -121.89),
    city("Santa Ana", "United States", 33.75, -117.87),
    city("Santa Clara", "United States", 37.35, -121.95),
    city("Santa Clarita", "United States", 34.39, -118.54),
    city("Santa Rosa", "United States", 38.44, -122.71),
    city("Savannah", "United States", 32.08, -81.09),
    city("Scottsdale", "United States", 33.49, -111.93),
    city("Seattle", "United States", 47.61, -122.33),
    city("Shreveport", "United States", 32.52, -93.75),
    city("Sioux Falls", "United States", 43.54, -96.73),
    city("South Bend", "United States", 41.68, -86.25),
    city("Spokane", "United States", 47.66, -117.43),
    city("Springfield MO", "United States", 37.21, -93.29),
    city("St. Louis", "United States", 38.63, -90.20),
    city("St. Paul", "United States", 44.95, -93.09),
    city("St. Petersburg", "United States", 27.77, -82.64),
    city("Stamford", "United States", 41.05, -73.54),
    city("Sterling Heights", "United States", 42.58, -83.03),
    city("Stockton", "United States", 37.96, -121.29),
    city("Sunnyvale", "United States", 37.37, -122.04),
    city("Syracuse", "United States", 43.05, -76.15),
    city("Tacoma", "United States", 47.25, -122.44),
    city("Tallahassee", "United States", 30.44, -84.28),
    city("Tampa", "United States", 27.95, -82.46),
    city("Tempe", "United States", 33.42, -111.94),
    city("Thornton", "United States", 39.87, -104.97),
    city("Toledo", "United States", 41.66, -83.58),
    city("Topeka", "United States", 39.05, -95.68),
    city("Torrance", "United States", 33.84, -118.34),
    city("Tucson", "United States", 32.22, -110.93),
    city("Tulsa", "United States", 36.15, -95.99),
    city("Tyler", "United States", 32.35, -95.30),
    city("Vallejo", "United States", 38.10, -122.26),
    city("Vancouver WA", "United States", 45.63, -122.67),
    city("Ventura", "United States", 34.27, -119.23),
    city("Virginia Beach", "United States", 36.85, -75.98),
    city("Visalia", "United States", 36.33, -119.29),
    city("Waco", "United States", 31.55, -97.15),
    city("Warren", "United States", 42.49, -83.03),
    city("Washington DC", "United States", 38.91, -77.04),
    city("Waterbury", "United States", 41.56, -73.05),
    city("West Valley City", "United States", 40.69, -112.00),
    city("Westminster", "United States", 39.84, -105.04),
    city("Wichita", "United States", 37.69, -97.34),
    city("Wilmington", "United States", 34.23, -77.94),
    city("Winston-Salem", "United States", 36.10, -80.24),
    city("Worcester", "United States", 42.26, -71.80),
    city("Yonkers", "United States", 40.93, -73.90),
    // China
    city("Beijing", "China", 39.90, 116.41),
    city("Changsha", "China", 28.20, 112.97),
    city("Chengdu", "China", 30.57, 104.07),
    city("Chongqing", "China", 29.56, 106.55),
    city("Dalian", "China", 38.91, 121.60),
    city("Dongguan", "China", 23.05, 113.74),
    city("Foshan", "China", 23.02, 113.12),
    city("Guangzhou", "China", 23.13, 113.26),
    city("Hangzhou", "China", 30.25, 120.17),
    city("Harbin", "China", 45.75, 126.65),
    city("Jinan", "China", 36.67, 117.00),
    city("Nanjing", "China", 32.06, 118.78),
    city("Qingdao", "China", 36.07, 120.38),
    city("Shanghai", "China", 31.23, 121.47),
    city("Shenzhen", "China", 22.54, 114.06),
    city("Tianjin", "China", 39.13, 117.20),
    city("Wuhan", "China", 30.59, 114.31),
    city("Xi'an", "China", 34.34, 108.94),
    city("Zhengzhou", "China", 34.75, 113.63),
    // Japan
    city("Fukuoka", "Japan", 33.59, 130.40),
    city("Nagoya", "Japan", 35.18, 136.91),
    city("Osaka", "Japan", 34.69, 135.50),
    city("Tokyo", "Japan", 35.68, 139.77),
    // India
    city("Ahmedabad", "India", 23.03, 72.58),
    city("Bangalore", "India", 12.97, 77.59),
    city("Chennai", "India", 13.08, 80.27),
    city("Delhi", "India", 28.61, 77.21),
    city("Hyderabad", "India", 17.38, 78.47),
    city("Kolkata", "India", 22.57, 88.36),
    city("Mumbai", "India", 19.08, 72.88),
    city("Pune", "India", 18.52, 73.86),
    city("Surat", "India", 21.20, 72.84),
    // United Kingdom
    city("London", "United Kingdom", 51.51, -0.13),
    // France
    city("Paris", "France", 48.85, 2.35),
    // Russia
    city("Moscow", "Russia", 55.75, 37.62),
    city("Saint Petersburg", "Russia", 59.93, 30.34),
    // Brazil
    city("Belo Horizonte", "Brazil", -19.92, -43.94),
    city("Rio de Janeiro", "Brazil", -22.91, -43.17),
    city("Sao Paulo", "Brazil", -23.55, -46.63),
    // Canada
    city("Montreal", "Canada", 45.50, -73.57),
    city("Toronto", "Canada", 43.65, -79.38),
    city("Vancouver", "Canada", 49.28, -123.12),
    // Other Asia
    city("Bangkok", "Other Asia", 13.75, 100.50),
    city("Dhaka", "Other Asia", 23.81, 90.41),
    city("Hanoi", "Other Asia", 21.03, 105.85),
    city("Ho Chi Minh City", "Other Asia", 10.82, 106.63),
    city("Hong Kong", "Other Asia", 22.32, 114.17),
    city("Jakarta", "Other Asia", -6.21, 106.85),
    city("Karachi", "Other Asia", 24.86, 67.01),
    city("Kuala Lumpur", "Other Asia", 3.14, 101.69),
    city("Lahore", "Other Asia", 31.55, 74.34),
    city("Manila", "Other Asia", 14.60, 120.98),
    city("Singapore", "Other Asia", 1.35, 103.82),
    city("Taipei", "Other Asia", 25.03, 121.57),
    city("Tehran", "Other Asia", 35.69, 51.39),
    city("Yangon", "Other Asia", 16.87, 96.20),
    // Middle East
    city("Baghdad", "Middle East", 33.34, 44.40),
    city("Dubai", "Middle East", 25.20, 55.27),
    city("Istanbul", "Middle East", 41.01, 28.95),
    city("Riyadh", "Middle East", 24.63, 46.72),
    // Europe
    city("Ankara", "Europe", 39.93, 32.85),
    city("Barcelona", "Europe", 41.39, 2.17),
    city("Kiev", "Europe", 50.45, 30.52),
    city("Madrid", "Europe", 40.42, -3.70),
    city("Milan", "Europe", 45.46, 9.19),
    city("Rome", "Europe", 41.90, 12.50),
    // Africa
    city("Alexandria", "Africa", 31.20, 29.92),
    city("Cairo", "Africa", 30.04, 31.24),
    city("Khartoum", "Africa", 15.50, 32.56),
    city("Kinshasa", "Africa", -4.32, 15.32),
    city("Lagos", "Africa", 6.52, 3.37),
    city("Luanda", "Africa", -8.84, 13.23),
    // Latin America
    city("Bogota", "Latin America", 4.71, -74.07),
    city("Buenos Aires", "Latin America", -34.60, -58.38),
    city("Guadalajara", "Latin America", 20.67, -103.35),
    city("Lima", "Latin America", -12.04, -77.03),
    city("Mexico City", "Latin America", 19.43, -99.13),
    city("Santiago", "Latin America", -33.45, -70.67),
    // Oceania
    city("Melbourne", "Oceania", -37.81, 144.96),
    city("Sydney", "Oceania", -33.87, 151.21),
];

/// Every city, grouped by country in display order.
pub fn all() -> &'static [City] {
    CITIES
}

/// Case-insensitive lookup by city name.
pub fn find(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

/// Countries in the order they first appear.
pub fn countries() -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for c in CITIES {
        if !seen.contains(&c.country) {
            seen.push(c.country);
        }
    }
    seen
}

pub fn cities_in(country: &str) -> impl Iterator<Item = &'static City> + '_ {
    CITIES.iter().filter(move |c| c.country == country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_city_is_registered() {
        let ny = find(DEFAULT_CITY).unwrap();
        assert_eq!(ny.country, "United States");
        assert_eq!(ny.coordinate.latitude(), 40.71);
        assert_eq!(ny.coordinate.longitude(), -74.01);
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("tokyo").map(|c| c.name), Some("Tokyo"));
        assert_eq!(find("  SAO PAULO ").map(|c| c.country), Some("Brazil"));
        assert!(find("Atlantis").is_none());
    }

    #[test]
    fn test_all_coordinates_in_range() {
        for c in all() {
            assert!(
                Coordinate::new(c.coordinate.latitude(), c.coordinate.longitude()).is_ok(),
                "{} out of range",
                c.name
            );
        }
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = all().iter().map(|c| c.name.to_lowercase()).collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn test_countries_keep_display_order() {
        let countries = countries();
        assert_eq!(countries.first(), Some(&"United States"));
        assert_eq!(countries.last(), Some(&"Oceania"));
        assert_eq!(countries.len(), 15);
    }

    #[test]
    fn test_cities_in_country() {
        let japan: Vec<_> = cities_in("Japan").map(|c| c.name).collect();
        assert_eq!(japan, vec!["Fukuoka", "Nagoya", "Osaka", "Tokyo"]);
    }

    #[test]
    fn test_label() {
        assert_eq!(find("Paris").unwrap().label(), "Paris (France)");
    }
}
