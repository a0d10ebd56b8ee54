//! Embedded airport directory
//!
//! A small, curated table of major airports used for instant autocomplete of
//! flight search inputs without any network call.

use crate::models::Airport;

/// A static directory entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirportRecord {
    pub code: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub country: &'static str,
}

impl AirportRecord {
    const fn new(
        code: &'static str,
        name: &'static str,
        city: &'static str,
        country: &'static str,
    ) -> Self {
        Self {
            code,
            name,
            city,
            country,
        }
    }

    fn to_airport(self) -> Airport {
        Airport::new(self.code, self.name, "AIRPORT", self.city, self.country)
    }
}

/// Directory entries in lookup order
pub static AIRPORTS: &[AirportRecord] = &[
    AirportRecord::new("ATL", "Hartsfield-Jackson Atlanta International Airport", "Atlanta", "United States"),
    AirportRecord::new("JFK", "John F. Kennedy International Airport", "New York", "United States"),
    AirportRecord::new("LAX", "Los Angeles International Airport", "Los Angeles", "United States"),
    AirportRecord::new("ORD", "O'Hare International Airport", "Chicago", "United States"),
    AirportRecord::new("DFW", "Dallas/Fort Worth International Airport", "Dallas", "United States"),
    AirportRecord::new("DEN", "Denver International Airport", "Denver", "United States"),
    AirportRecord::new("SFO", "San Francisco International Airport", "San Francisco", "United States"),
    AirportRecord::new("SEA", "Seattle-Tacoma International Airport", "Seattle", "United States"),
    AirportRecord::new("LAS", "Harry Reid International Airport", "Las Vegas", "United States"),
    AirportRecord::new("MIA", "Miami International Airport", "Miami", "United States"),
    AirportRecord::new("BOS", "Logan International Airport", "Boston", "United States"),
    AirportRecord::new("IAH", "George Bush Intercontinental Airport", "Houston", "United States"),
    AirportRecord::new("MSP", "Minneapolis-Saint Paul International Airport", "Minneapolis", "United States"),
    AirportRecord::new("DTW", "Detroit Metropolitan Airport", "Detroit", "United States"),
    AirportRecord::new("PHX", "Phoenix Sky Harbor International Airport", "Phoenix", "United States"),
    AirportRecord::new("LGA", "LaGuardia Airport", "New York", "United States"),
    AirportRecord::new("EWR", "Newark Liberty International Airport", "Newark", "United States"),
    AirportRecord::new("BWI", "Baltimore-Washington International Airport", "Baltimore", "United States"),
    AirportRecord::new("DCA", "Ronald Reagan Washington National Airport", "Washington", "United States"),
    AirportRecord::new("IAD", "Washington Dulles International Airport", "Washington", "United States"),
    AirportRecord::new("SLC", "Salt Lake City International Airport", "Salt Lake City", "United States"),
    AirportRecord::new("PDX", "Portland International Airport", "Portland", "United States"),
    AirportRecord::new("HNL", "Daniel K. Inouye International Airport", "Honolulu", "United States"),
    AirportRecord::new("LHR", "London Heathrow Airport", "London", "United Kingdom"),
    AirportRecord::new("LGW", "London Gatwick Airport", "London", "United Kingdom"),
    AirportRecord::new("CDG", "Charles de Gaulle Airport", "Paris", "France"),
    AirportRecord::new("ORY", "Orly Airport", "Paris", "France"),
    AirportRecord::new("FRA", "Frankfurt Airport", "Frankfurt", "Germany"),
    AirportRecord::new("MUC", "Munich Airport", "Munich", "Germany"),
    AirportRecord::new("AMS", "Amsterdam Airport Schiphol", "Amsterdam", "Netherlands"),
    AirportRecord::new("MAD", "Madrid-Barajas Airport", "Madrid", "Spain"),
    AirportRecord::new("BCN", "Barcelona-El Prat Airport", "Barcelona", "Spain"),
    AirportRecord::new("FCO", "Leonardo da Vinci-Fiumicino Airport", "Rome", "Italy"),
    AirportRecord::new("MXP", "Milan Malpensa Airport", "Milan", "Italy"),
    AirportRecord::new("ZUR", "Zurich Airport", "Zurich", "Switzerland"),
    AirportRecord::new("VIE", "Vienna International Airport", "Vienna", "Austria"),
    AirportRecord::new("CPH", "Copenhagen Airport", "Copenhagen", "Denmark"),
    AirportRecord::new("ARN", "Stockholm Arlanda Airport", "Stockholm", "Sweden"),
    AirportRecord::new("OSL", "Oslo Gardermoen Airport", "Oslo", "Norway"),
    AirportRecord::new("DUB", "Dublin Airport", "Dublin", "Ireland"),
    AirportRecord::new("LIS", "Lisbon Portela Airport", "Lisbon", "Portugal"),
    AirportRecord::new("ATH", "Athens International Airport", "Athens", "Greece"),
    AirportRecord::new("IST", "Istanbul Airport", "Istanbul", "Turkey"),
    AirportRecord::new("DXB", "Dubai International Airport", "Dubai", "United Arab Emirates"),
    AirportRecord::new("AUH", "Abu Dhabi International Airport", "Abu Dhabi", "United Arab Emirates"),
    AirportRecord::new("DOH", "Hamad International Airport", "Doha", "Qatar"),
    AirportRecord::new("NRT", "Narita International Airport", "Tokyo", "Japan"),
    AirportRecord::new("HND", "Haneda Airport", "Tokyo", "Japan"),
    AirportRecord::new("ICN", "Incheon International Airport", "Seoul", "South Korea"),
    AirportRecord::new("PEK", "Beijing Capital International Airport", "Beijing", "China"),
    AirportRecord::new("PVG", "Shanghai Pudong International Airport", "Shanghai", "China"),
    AirportRecord::new("HKG", "Hong Kong International Airport", "Hong Kong", "China"),
    AirportRecord::new("SIN", "Singapore Changi Airport", "Singapore", "Singapore"),
    AirportRecord::new("BKK", "Suvarnabhumi Airport", "Bangkok", "Thailand"),
    AirportRecord::new("KUL", "Kuala Lumpur International Airport", "Kuala Lumpur", "Malaysia"),
    AirportRecord::new("BOM", "Chhatrapati Shivaji Maharaj International Airport", "Mumbai", "India"),
    AirportRecord::new("DEL", "Indira Gandhi International Airport", "New Delhi", "India"),
    AirportRecord::new("SYD", "Sydney Kingsford Smith Airport", "Sydney", "Australia"),
    AirportRecord::new("MEL", "Melbourne Airport", "Melbourne", "Australia"),
    AirportRecord::new("YYZ", "Toronto Pearson International Airport", "Toronto", "Canada"),
    AirportRecord::new("YVR", "Vancouver International Airport", "Vancouver", "Canada"),
    AirportRecord::new("GRU", "São Paulo-Guarulhos International Airport", "São Paulo", "Brazil"),
    AirportRecord::new("GIG", "Rio de Janeiro-Galeão International Airport", "Rio de Janeiro", "Brazil"),
    AirportRecord::new("MEX", "Mexico City International Airport", "Mexico City", "Mexico"),
    AirportRecord::new("JNB", "O. R. Tambo International Airport", "Johannesburg", "South Africa"),
];

/// Default number of suggestions
pub const DEFAULT_AIRPORT_LIMIT: usize = 10;

/// Find a directory entry by its IATA code (case-insensitive)
#[must_use]
pub fn find_by_code(code: &str) -> Option<&'static AirportRecord> {
    let code = code.trim();
    AIRPORTS
        .iter()
        .find(|record| record.code.eq_ignore_ascii_case(code))
}

/// Search the directory by code, city or airport name.
///
/// An exact three-letter code returns just that airport. Otherwise city
/// matches come first, with every airport of a matched city listed together
/// in table order, followed by airport-name matches not already listed.
#[must_use]
pub fn search(query: &str, limit: usize) -> Vec<Airport> {
    let query = query.trim();
    if query.len() == 3 && query.chars().all(|c| c.is_ascii_alphabetic())
        && let Some(record) = find_by_code(query)
    {
        return vec![record.to_airport()].into_iter().take(limit).collect();
    }

    let needle = query.to_lowercase();
    let mut matched: Vec<&'static AirportRecord> = Vec::new();

    for city in cities_in_order() {
        if city.to_lowercase().contains(&needle) {
            matched.extend(AIRPORTS.iter().filter(|record| record.city == city));
        }
    }

    for record in AIRPORTS {
        if matched.iter().any(|m| m.code == record.code) {
            continue;
        }
        if record.name.to_lowercase().contains(&needle) {
            matched.push(record);
        }
    }

    matched
        .into_iter()
        .take(limit)
        .map(|record| record.to_airport())
        .collect()
}

/// Distinct city names in order of first appearance
fn cities_in_order() -> Vec<&'static str> {
    let mut cities: Vec<&'static str> = Vec::new();
    for record in AIRPORTS {
        if !cities.contains(&record.city) {
            cities.push(record.city);
        }
    }
    cities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(results: &[Airport]) -> Vec<&str> {
        results.iter().map(|a| a.code.as_str()).collect()
    }

    #[test]
    fn test_directory_size_and_unique_codes() {
        assert_eq!(AIRPORTS.len(), 65);
        for (index, record) in AIRPORTS.iter().enumerate() {
            assert!(
                AIRPORTS[index + 1..].iter().all(|other| other.code != record.code),
                "duplicate code {}",
                record.code
            );
        }
    }

    #[test]
    fn test_exact_code_short_circuits() {
        let results = search("JFK", 10);
        assert_eq!(results.len(), 1);
        let jfk = &results[0];
        assert_eq!(jfk.code, "JFK");
        assert_eq!(jfk.name, "John F. Kennedy International Airport");
        assert_eq!(jfk.kind, "AIRPORT");
        assert_eq!(jfk.city, "New York");
        assert_eq!(jfk.country, "United States");
        assert_eq!(jfk.display_name, "John F. Kennedy International Airport (JFK)");
    }

    #[test]
    fn test_lowercase_code_matches() {
        assert_eq!(codes(&search("lhr", 10)), vec!["LHR"]);
    }

    #[test]
    fn test_city_groups_all_airports() {
        assert_eq!(codes(&search("London", 10)), vec!["LHR", "LGW"]);
        assert_eq!(codes(&search("tokyo", 10)), vec!["NRT", "HND"]);
        assert_eq!(codes(&search("new york", 10)), vec!["JFK", "LGA"]);
    }

    #[test]
    fn test_city_matches_precede_name_matches() {
        // "new" hits the cities New York, Newark and New Delhi before any name match
        assert_eq!(codes(&search("new", 10)), vec!["JFK", "LGA", "EWR", "DEL"]);
    }

    #[test]
    fn test_unknown_three_letters_fall_back_to_names() {
        assert_eq!(codes(&search("par", 10)), vec!["CDG", "ORY"]);
    }

    #[test]
    fn test_airport_name_match() {
        assert_eq!(codes(&search("heathrow", 10)), vec!["LHR"]);
        assert_eq!(codes(&search("gatwick", 10)), vec!["LGW"]);
    }

    #[test]
    fn test_limit_truncates() {
        let results = search("international", 3);
        assert_eq!(results.len(), 3);
        assert_eq!(codes(&results), vec!["ATL", "JFK", "LAX"]);
    }

    #[test]
    fn test_no_match() {
        assert!(search("atlantis", 10).is_empty());
    }
}
